#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Exhausted,
}

type Result<O> = core::result::Result<O, Error>;

/// A fixed-capacity ring buffer.
///
/// Elements are enqueued at the back. [`RingBuffer::push_overwrite`] keeps
/// only the most recent `N` elements, which is what the response matcher uses
/// as its window.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    storage: [T; N],
    read_at: usize,
    length: usize,
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    pub fn new() -> Self {
        Self {
            storage: [T::default(); N],
            read_at: 0,
            length: 0,
        }
    }

    /// Clear the ring buffer.
    pub fn clear(&mut self) {
        self.read_at = 0;
        self.length = 0;
    }

    /// Return the maximum number of elements in the ring buffer.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Return the current number of elements in the ring buffer.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Return the number of elements that can be added to the ring buffer.
    pub fn window(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Query whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Query whether the buffer is full.
    pub fn is_full(&self) -> bool {
        self.window() == 0
    }

    /// Shorthand for `(self.read_at + idx) % self.capacity()` with an
    /// additional check to ensure that the capacity is not zero.
    fn get_idx(&self, idx: usize) -> usize {
        if N > 0 {
            (self.read_at + idx) % N
        } else {
            0
        }
    }

    /// Enqueue a single element, or return `Err(Error::Exhausted)` if the
    /// buffer is full.
    pub fn enqueue_one(&mut self, value: T) -> Result<()> {
        if self.is_full() {
            return Err(Error::Exhausted);
        }
        let idx = self.get_idx(self.length);
        self.storage[idx] = value;
        self.length += 1;
        Ok(())
    }

    /// Enqueue an element, discarding the oldest one when full.
    pub fn push_overwrite(&mut self, value: T) {
        if N == 0 {
            return;
        }
        if self.is_full() {
            self.read_at = self.get_idx(1);
            self.length -= 1;
        }
        // Infallible after making room.
        self.enqueue_one(value).ok();
    }
}

impl<T: Copy + Default + PartialEq, const N: usize> RingBuffer<T, N> {
    /// Whether the newest elements equal `suffix`.
    pub fn ends_with(&self, suffix: &[T]) -> bool {
        if suffix.len() > self.length {
            return false;
        }
        let offset = self.length - suffix.len();
        suffix
            .iter()
            .enumerate()
            .all(|(i, v)| self.storage[self.get_idx(offset + i)] == *v)
    }
}
