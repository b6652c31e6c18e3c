//! rolling sample histories.

#[cfg(test)]
mod tests;

/// a fixed-capacity circular buffer of samples.
///
/// the backing store is allocated once, when the history is created. once it is full, each
/// push evicts the oldest sample.
#[derive(Clone, Debug)]
pub struct RingHistory<T> {
    /// the backing store.
    samples: Box<[T]>,
    /// the index the next sample will be written to.
    head: usize,
    /// the number of samples stored.
    len: usize,
}

// === impl RingHistory ===

impl<T: Copy + Default> RingHistory<T> {
    /// the number of samples kept for each metric by default.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// returns an empty history holding at most `capacity` samples.
    ///
    /// a history always has room for at least one sample.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: vec![T::default(); capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// appends a sample, evicting the oldest one if the history is full.
    pub fn push(&mut self, value: T) {
        let Self { samples, head, len } = self;

        samples[*head] = value;
        *head = (*head + 1) % samples.len();
        *len = (*len + 1).min(samples.len());
    }

    /// returns the most recent sample, or the default value if nothing has been pushed.
    pub fn latest(&self) -> T {
        self.last_n(1).next().unwrap_or_default()
    }

    /// returns up to `count` of the most recent samples, oldest first.
    pub fn last_n(&self, count: usize) -> impl ExactSizeIterator<Item = T> + '_ {
        let Self { samples, head, len } = self;

        let capacity = samples.len();
        let count = count.min(*len);
        let start = (head + capacity - count) % capacity;

        (0..count).map(move |i| samples[(start + i) % capacity])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }
}

impl<T: Copy + Default> Default for RingHistory<T> {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}
