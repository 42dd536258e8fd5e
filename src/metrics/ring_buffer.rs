use crate::error::{AppError, Result};

/// Fixed-capacity circular store. Once full, every push overwrites the
/// logically oldest slot.
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Clone> {
    slots: Vec<T>,
    start: usize,
    capacity: usize,
}

impl<T: Clone> RingBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(AppError::InvalidConfiguration(format!(
                "ring buffer capacity must be at least 1, got {}",
                capacity
            )));
        }

        Ok(Self {
            slots: Vec::new(),
            start: 0,
            capacity,
        })
    }

    pub fn push(&mut self, item: T) {
        if self.slots.len() < self.capacity {
            // start stays 0 until the first wrap
            self.slots.push(item);
        } else {
            self.slots[self.start] = item;
            self.start = (self.start + 1) % self.capacity;
        }
    }

    /// Retained items, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.slots.split_at(self.start);
        older.iter().chain(newer.iter())
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<&T> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = (self.start + self.slots.len() - 1) % self.slots.len();
        self.slots.get(idx)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.start = 0;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Sample;
    use pretty_assertions::assert_eq;

    fn samples(pairs: &[(i64, f64)]) -> Vec<Sample> {
        pairs.iter().map(|&(t, v)| Sample::new(t, v)).collect()
    }

    #[test]
    fn test_ring_buffer_rejects_zero_capacity() {
        let result = RingBuffer::<Sample>::new(0);
        assert!(matches!(result, Err(AppError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_ring_buffer_basic() {
        let mut buffer = RingBuffer::new(3).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.last(), None);

        buffer.push(1);
        buffer.push(2);
        buffer.push(3);

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.snapshot(), vec![1, 2, 3]);
        assert_eq!(buffer.last(), Some(&3));
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut buffer = RingBuffer::new(3).unwrap();
        for (t, v) in [(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)] {
            buffer.push(Sample::new(t, v));
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(
            buffer.snapshot(),
            samples(&[(2, 2.0), (3, 3.0), (4, 4.0)])
        );
    }

    #[test]
    fn test_ring_buffer_wraps_repeatedly() {
        let mut buffer = RingBuffer::new(3).unwrap();
        for i in 1..=8 {
            buffer.push(i);
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.snapshot(), vec![6, 7, 8]);
        assert_eq!(buffer.last(), Some(&8));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut buffer = RingBuffer::new(2).unwrap();
        buffer.push(Sample::new(1, 1.0));
        let before = buffer.snapshot();

        buffer.push(Sample::new(2, 2.0));
        buffer.push(Sample::new(3, 3.0));

        assert_eq!(before, samples(&[(1, 1.0)]));
    }

    #[test]
    fn test_ring_buffer_accepts_any_value() {
        let mut buffer = RingBuffer::new(2).unwrap();
        buffer.push(Sample::new(-5, f64::NAN));
        buffer.push(Sample::new(1, -42.0));

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[0].value.is_nan());
        assert_eq!(snapshot[1].value, -42.0);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buffer = RingBuffer::new(2).unwrap();
        buffer.clear();
        assert!(buffer.snapshot().is_empty());

        buffer.push(Sample::new(1, 1.0));
        buffer.push(Sample::new(2, 2.0));
        buffer.push(Sample::new(3, 3.0));
        buffer.clear();
        assert!(buffer.snapshot().is_empty());
        assert_eq!(buffer.capacity(), 2);

        buffer.push(Sample::new(4, 4.0));
        buffer.push(Sample::new(5, 5.0));
        buffer.push(Sample::new(6, 6.0));
        assert_eq!(buffer.snapshot(), samples(&[(5, 5.0), (6, 6.0)]));
    }

    #[test]
    fn test_ring_buffer_with_strings() {
        let mut buffer = RingBuffer::new(2).unwrap();

        buffer.push("first".to_string());
        buffer.push("second".to_string());
        buffer.push("third".to_string());

        let values: Vec<_> = buffer.iter().map(|s| s.as_str()).collect();
        assert_eq!(values, vec!["second", "third"]);
    }
}
