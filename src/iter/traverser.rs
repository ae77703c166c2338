use crate::raw::Table;

/// Walks the occupied slots of a table in index order.
#[derive(Debug, Clone)]
pub(crate) struct SlotIter<'a> {
    table: &'a Table,
    next: usize,
    remaining: usize,
}

impl<'a> SlotIter<'a> {
    /// `remaining` must be the number of occupied slots in `table`.
    pub(crate) fn new(table: &'a Table, remaining: usize) -> Self {
        Self {
            table,
            next: 0,
            remaining,
        }
    }

    pub(crate) fn table(&self) -> &'a Table {
        self.table
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for SlotIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        while self.next < self.table.len() {
            let slot = self.next;
            self.next += 1;
            if self.table.is_used(slot) {
                self.remaining -= 1;
                return Some(slot);
            }
        }
        None
    }
}
