use crate::audio::AudioFrame;
use std::collections::VecDeque;

/// Bounded FIFO of audio frames produced before the server has confirmed
/// readiness. Owned exclusively by the session task, which is the single
/// serialization point for enqueue and drain.
#[derive(Debug)]
pub struct IngestQueue {
    frames: VecDeque<AudioFrame>,
    capacity: usize,
}

/// The queue is full. Surfaced by the controller as a session-ending
/// failure; frames are never silently evicted.
#[derive(Debug)]
pub struct QueueFull;

impl IngestQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Peek at the oldest frame without removing it.
    pub fn front(&self) -> Option<&AudioFrame> {
        self.frames.front()
    }

    /// Add a frame, failing when the bound would be exceeded.
    pub fn enqueue(&mut self, frame: AudioFrame) -> Result<(), QueueFull> {
        if self.frames.len() >= self.capacity {
            return Err(QueueFull);
        }
        self.frames.push_back(frame);
        Ok(())
    }

    /// Remove and return all frames in insertion order.
    pub fn drain_all(&mut self) -> Vec<AudioFrame> {
        self.frames.drain(..).collect()
    }

    /// Discard all pending frames (shutdown path; not an error).
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: i16) -> AudioFrame {
        AudioFrame::new(vec![tag], 16000, 1)
    }

    #[test]
    fn test_enqueue_preserves_fifo_order() {
        let mut queue = IngestQueue::new(10);
        for tag in 0..5 {
            queue.enqueue(frame(tag)).unwrap();
        }

        let drained = queue.drain_all();
        let tags: Vec<i16> = drained.iter().map(|f| f.samples[0]).collect();
        assert_eq!(tags, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_enqueue_past_capacity_fails() {
        let mut queue = IngestQueue::new(2);
        queue.enqueue(frame(0)).unwrap();
        queue.enqueue(frame(1)).unwrap();
        assert!(queue.enqueue(frame(2)).is_err());
        // The failed enqueue must not have displaced anything
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_drain_empties_and_allows_reuse() {
        let mut queue = IngestQueue::new(2);
        queue.enqueue(frame(0)).unwrap();
        queue.enqueue(frame(1)).unwrap();
        assert_eq!(queue.drain_all().len(), 2);
        // Bound applies to the new contents, not cumulative history
        queue.enqueue(frame(2)).unwrap();
        queue.enqueue(frame(3)).unwrap();
        assert!(queue.enqueue(frame(4)).is_err());
    }

    #[test]
    fn test_clear_discards_without_error() {
        let mut queue = IngestQueue::new(3);
        queue.enqueue(frame(0)).unwrap();
        queue.clear();
        assert!(queue.is_empty());
    }
}
