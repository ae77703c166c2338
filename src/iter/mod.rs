//! Iterators over the entries of an [`IntCounterMap`](crate::IntCounterMap).

mod traverser;
pub(crate) use traverser::SlotIter;

use crate::raw::Table;
use std::iter::FusedIterator;

/// An iterator over a map's key-counter pairs.
///
/// See [`IntCounterMap::iter`](crate::IntCounterMap::iter) for details.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    pub(crate) slots: SlotIter<'a>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(table: &'a Table, len: usize) -> Self {
        Self {
            slots: SlotIter::new(table, len),
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = (u32, i32);
    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.next()?;
        let table = self.slots.table();
        Some((table.key(slot), table.value(slot)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.slots.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// An iterator over a map's keys.
///
/// See [`IntCounterMap::keys`](crate::IntCounterMap::keys) for details.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    pub(crate) iter: Iter<'a>,
}

impl Iterator for Keys<'_> {
    type Item = u32;
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}
impl FusedIterator for Keys<'_> {}

/// An iterator over a map's counters.
///
/// See [`IntCounterMap::values`](crate::IntCounterMap::values) for details.
#[derive(Debug, Clone)]
pub struct Values<'a> {
    pub(crate) iter: Iter<'a>,
}

impl Iterator for Values<'_> {
    type Item = i32;
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}
impl FusedIterator for Values<'_> {}
