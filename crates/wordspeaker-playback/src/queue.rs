//! Playback queue construction.
//!
//! A queue is a permutation (or, for a non-looping ordered jump, a suffix) of
//! indices into the word list. Queues are rebuilt, never edited.

use rand::seq::SliceRandom;
use rand::Rng;

use wordspeaker_core::types::OrderMode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackQueue {
    order: Vec<usize>,
}

impl PlaybackQueue {
    /// Indices `0..len` in list order, starting at `start`.
    ///
    /// With `wrap`, the indices before `start` follow at the end; without it
    /// the queue is just the tail `start..len`.
    pub fn ordered(len: usize, start: usize, wrap: bool) -> Self {
        let start = if start < len { start } else { 0 };
        let mut order: Vec<usize> = (start..len).collect();
        if wrap {
            order.extend(0..start);
        }
        Self { order }
    }

    /// A shuffled permutation of `0..len`.
    ///
    /// `first` pins the first index. Otherwise `avoid_first` (the last index
    /// of the previous cycle) is kept out of the first slot when `len > 1`.
    pub fn random<R: Rng>(
        len: usize,
        first: Option<usize>,
        avoid_first: Option<usize>,
        rng: &mut R,
    ) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);

        match first.filter(|&i| i < len) {
            Some(pinned) => {
                if let Some(pos) = order.iter().position(|&i| i == pinned) {
                    order.swap(0, pos);
                }
                order[1..].shuffle(rng);
            }
            None => {
                if let Some(avoid) = avoid_first {
                    if len > 1 && order[0] == avoid {
                        let swap_with = rng.random_range(1..len);
                        order.swap(0, swap_with);
                    }
                }
            }
        }
        Self { order }
    }

    /// Build a queue for `mode`.
    pub fn build<R: Rng>(
        mode: OrderMode,
        len: usize,
        start: Option<usize>,
        wrap: bool,
        avoid_first: Option<usize>,
        rng: &mut R,
    ) -> Self {
        match mode {
            OrderMode::InOrder => Self::ordered(len, start.unwrap_or(0), wrap),
            OrderMode::Random => Self::random(len, start, avoid_first, rng),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Word index at queue `position`.
    pub fn get(&self, position: usize) -> Option<usize> {
        self.order.get(position).copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.order.last().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_permutation(queue: &PlaybackQueue, len: usize) -> bool {
        let mut sorted = queue.as_slice().to_vec();
        sorted.sort_unstable();
        sorted == (0..len).collect::<Vec<_>>()
    }

    #[test]
    fn test_ordered_identity() {
        assert_eq!(PlaybackQueue::ordered(4, 0, false).as_slice(), &[0, 1, 2, 3]);
        assert_eq!(PlaybackQueue::ordered(4, 0, true).as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_ordered_rotation() {
        assert_eq!(PlaybackQueue::ordered(5, 2, true).as_slice(), &[2, 3, 4, 0, 1]);
        assert_eq!(PlaybackQueue::ordered(5, 2, false).as_slice(), &[2, 3, 4]);
    }

    #[test]
    fn test_ordered_start_out_of_range_falls_back_to_zero() {
        assert_eq!(PlaybackQueue::ordered(3, 9, false).as_slice(), &[0, 1, 2]);
        assert!(PlaybackQueue::ordered(0, 0, true).is_empty());
    }

    #[test]
    fn test_random_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 0..12 {
            let queue = PlaybackQueue::random(len, None, None, &mut rng);
            assert!(is_permutation(&queue, len), "len {len}: {:?}", queue);
        }
    }

    #[test]
    fn test_random_pins_first() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let queue = PlaybackQueue::random(6, Some(4), None, &mut rng);
            assert_eq!(queue.get(0), Some(4));
            assert!(is_permutation(&queue, 6));
        }
    }

    #[test]
    fn test_random_avoids_previous_last_word() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let queue = PlaybackQueue::random(3, None, Some(1), &mut rng);
            assert_ne!(queue.get(0), Some(1));
            assert!(is_permutation(&queue, 3));
        }
    }

    #[test]
    fn test_random_single_word_cannot_avoid() {
        let mut rng = StdRng::seed_from_u64(3);
        let queue = PlaybackQueue::random(1, None, Some(0), &mut rng);
        assert_eq!(queue.as_slice(), &[0]);
    }

    #[test]
    fn test_build_dispatches_on_mode() {
        let mut rng = StdRng::seed_from_u64(1);
        let queue = PlaybackQueue::build(OrderMode::InOrder, 4, Some(1), false, None, &mut rng);
        assert_eq!(queue.as_slice(), &[1, 2, 3]);
        let queue = PlaybackQueue::build(OrderMode::Random, 4, Some(1), false, None, &mut rng);
        assert_eq!(queue.get(0), Some(1));
        assert_eq!(queue.len(), 4);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_every_random_queue_is_permutation(
            len in 0usize..40,
            first in prop::option::of(0usize..50),
            avoid in prop::option::of(0usize..40),
            seed in any::<u64>()
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let queue = PlaybackQueue::random(len, first, avoid, &mut rng);
            prop_assert!(is_permutation(&queue, len), "{:?}", queue);
            if let Some(pinned) = first.filter(|&i| i < len) {
                prop_assert_eq!(queue.get(0), Some(pinned));
            }
        }

        #[test]
        fn test_every_ordered_queue_covers_its_range(
            len in 0usize..40,
            start in 0usize..50,
            wrap in any::<bool>()
        ) {
            let queue = PlaybackQueue::ordered(len, start, wrap);
            if wrap {
                prop_assert!(is_permutation(&queue, len), "{:?}", queue);
            } else {
                let from = if start < len { start } else { 0 };
                prop_assert_eq!(queue.as_slice().to_vec(), (from..len).collect::<Vec<_>>());
            }
        }
    }
}
