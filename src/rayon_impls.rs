use crate::bigram::{count_into, BigramCounter};
use crate::error::Result;
use crate::hash::KeyHash;
use crate::map::IntCounterMap;
use crate::sync::SharedCounterMap;
use rayon::iter::{FromParallelIterator, IntoParallelIterator, ParallelExtend, ParallelIterator};

/// Inputs with fewer bigrams than this per pool thread are not split any further.
const MIN_CHUNK_PAIRS: usize = 16 * 1024;

fn chunk_count(pairs: usize) -> usize {
    (pairs / MIN_CHUNK_PAIRS).clamp(1, rayon::current_num_threads())
}

impl<H> BigramCounter<H>
where
    H: KeyHash + Clone + Send + Sync,
{
    /// Parallel form of [`BigramCounter::count`]. Produces the same counts.
    ///
    /// The input is cut into one range of bigrams per thread of the current rayon pool.
    /// Neighbouring ranges share one code unit so that every bigram is counted exactly once. Each
    /// range is counted into a local map on the pool and merged into the result once it is done.
    ///
    /// # Errors
    ///
    /// Fails the same way as [`BigramCounter::count`].
    pub fn par_count(&self, chars: &[u16]) -> Result<IntCounterMap<H>> {
        let pairs = chars.len().saturating_sub(1);
        let chunks = chunk_count(pairs);
        if chunks == 1 {
            return self.count(chars);
        }
        let per_chunk = (pairs + chunks - 1) / chunks;
        log::trace!(
            "counting {} bigrams in {} chunks of {}",
            pairs,
            chunks,
            per_chunk
        );

        let shared = SharedCounterMap::new(self.empty_map()?);
        (0..chunks).into_par_iter().try_for_each(|i| -> Result<()> {
            let start = i * per_chunk;
            let end = pairs.min(start + per_chunk);
            if start >= end {
                return Ok(());
            }
            let mut local = self.empty_map()?;
            // bigrams start..end span code units start..=end
            count_into(&chars[start..=end], &mut local)?;
            shared.try_merge(&local)
        })?;
        Ok(shared.into_inner())
    }
}

impl<H> ParallelExtend<(u32, i32)> for IntCounterMap<H>
where
    H: KeyHash,
{
    // The table is single-owner, so only the production of pairs runs in parallel.
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = (u32, i32)>,
    {
        let pairs: Vec<(u32, i32)> = par_iter.into_par_iter().collect();
        self.extend(pairs);
    }
}

impl<H> FromParallelIterator<(u32, i32)> for IntCounterMap<H>
where
    H: KeyHash + Default,
{
    fn from_par_iter<I>(par_iter: I) -> Self
    where
        I: IntoParallelIterator<Item = (u32, i32)>,
    {
        let mut created_map = IntCounterMap::default();
        created_map.par_extend(par_iter);
        created_map
    }
}
