//! Fixed-capacity sample ring with overwrite-oldest insertion.

use heapless::Deque;

use crate::fifo::Sample;

/// Number of samples retained by the acquisition buffer.
pub const CAPACITY: usize = 64;

/// Bounded FIFO of samples that always keeps the `N` most recent entries.
///
/// Insertion never fails: when the ring is full the oldest sample is evicted
/// first. Losing stale samples is preferred to stalling the producer.
pub struct SampleRing<const N: usize = CAPACITY> {
    samples: Deque<Sample, N>,
}

impl<const N: usize> SampleRing<N> {
    /// Creates an empty ring.
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Appends `sample`, returning the evicted oldest sample if the ring was full.
    pub fn push_overwrite(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.samples.is_full() {
            self.samples.pop_front()
        } else {
            None
        };

        // Cannot fail: a slot was freed above when the ring was full.
        let _ = self.samples.push_back(sample);
        evicted
    }

    /// Removes the oldest sample.
    pub fn pop(&mut self) -> Option<Sample> {
        self.samples.pop_front()
    }

    /// Removes up to `max` of the oldest samples, oldest first.
    ///
    /// Samples are removed as the iterator is advanced.
    pub fn drain_up_to(&mut self, max: usize) -> impl Iterator<Item = Sample> + '_ {
        let count = max.min(self.samples.len());
        (0..count).map_while(move |_| self.samples.pop_front())
    }

    /// Iterates over the retained samples, oldest first, without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` when no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns `true` when the next push will evict a sample.
    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Maximum number of retained samples.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Discards every retained sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<const N: usize> Default for SampleRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
