//! Sliding-window sequence construction.

use tracing::debug;
use types::{FeatureVector, MarketSeries, Sequence};

use crate::assembler::FeatureAssembler;
use crate::registry::FeatureRegistry;

/// Builds fixed-length [`Sequence`]s of per-day feature vectors.
///
/// Every sequence holds exactly `timesteps` vectors. Near the start of the
/// series, where fewer days exist, the earliest vector is repeated at the
/// front. A sequence containing any day whose assembly failed is rejected
/// whole; partial sequences are never emitted.
#[derive(Debug, Clone, Copy)]
pub struct SequenceBuilder<'r> {
    assembler: FeatureAssembler<'r>,
    timesteps: usize,
    force_sequential: bool,
}

impl<'r> SequenceBuilder<'r> {
    /// # Panics
    /// Panics if `timesteps` is 0.
    pub fn new(registry: &'r FeatureRegistry, timesteps: usize) -> Self {
        assert!(timesteps > 0, "timesteps must be > 0");
        Self {
            assembler: FeatureAssembler::new(registry),
            timesteps,
            force_sequential: false,
        }
    }

    /// Assemble per-day vectors sequentially even with the `parallel` feature.
    pub fn with_force_sequential(mut self, force_sequential: bool) -> Self {
        self.force_sequential = force_sequential;
        self
    }

    #[inline]
    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    #[inline]
    pub fn assembler(&self) -> &FeatureAssembler<'r> {
        &self.assembler
    }

    /// Build the sequence ending at `end_index` (inclusive).
    ///
    /// Returns `None` if `end_index` is outside the series or any day in the
    /// window fails to assemble.
    pub fn build_sequence(&self, series: &MarketSeries, end_index: usize) -> Option<Sequence> {
        if end_index >= series.len() {
            return None;
        }
        let first = first_day(end_index, self.timesteps);
        let mut steps = Vec::with_capacity(self.timesteps);
        for day in first..=end_index {
            match self.assembler.assemble(series, day) {
                Ok(vector) => steps.push(vector),
                Err(e) => {
                    debug!(end_index, error = %e, "dropping sequence");
                    return None;
                }
            }
        }
        self.finish(end_index, steps)
    }

    /// Build sequences ending at `start, start + step, ...` below `end`.
    ///
    /// `end` is exclusive and clipped to the series length. Each day is
    /// assembled once and shared by every window that covers it; the result
    /// equals calling [`build_sequence`](Self::build_sequence) per end index
    /// and dropping the `None`s.
    pub fn build_batch(
        &self,
        series: &MarketSeries,
        start: usize,
        end: usize,
        step: usize,
    ) -> Vec<Sequence> {
        let end = end.min(series.len());
        if start >= end {
            return Vec::new();
        }
        let step = step.max(1);

        let lo = first_day(start, self.timesteps);
        let days: Vec<Option<FeatureVector>> = parallel::map_range(
            lo..end,
            |day| match self.assembler.assemble(series, day) {
                Ok(vector) => Some(vector),
                Err(e) => {
                    debug!(day, error = %e, "feature assembly failed");
                    None
                }
            },
            self.force_sequential,
        );

        let count = (end - start).div_ceil(step);
        parallel::filter_map_range(
            0..count,
            |k| {
                let end_index = start + k * step;
                let window = &days[first_day(end_index, self.timesteps) - lo..=end_index - lo];
                let steps: Option<Vec<FeatureVector>> = window.iter().cloned().collect();
                match steps {
                    Some(steps) => self.finish(end_index, steps),
                    None => {
                        debug!(end_index, "dropping sequence: window has an invalid day");
                        None
                    }
                }
            },
            self.force_sequential,
        )
    }

    /// Front-pad with the earliest vector and enforce the exact length.
    fn finish(&self, end_index: usize, mut steps: Vec<FeatureVector>) -> Option<Sequence> {
        let earliest = steps.first()?.clone();
        if steps.len() < self.timesteps {
            let missing = self.timesteps - steps.len();
            steps.splice(0..0, std::iter::repeat_n(earliest, missing));
        }
        if steps.len() > self.timesteps {
            steps.drain(..steps.len() - self.timesteps);
        }
        (steps.len() == self.timesteps).then(|| Sequence::new(end_index, steps))
    }
}

#[inline]
fn first_day(end_index: usize, timesteps: usize) -> usize {
    (end_index + 1).saturating_sub(timesteps)
}
