//! Monotone radix heap with addressable entries.
//!
//! Entry `(key, value)` lives in bucket `b = NUM_BITS - leading_zeros(key ^ last)`, where
//! `last` is the key most recently popped. Bucket 0 therefore holds exactly the keys equal to
//! `last`; when it runs empty, the first non-empty bucket is split around its minimum.

use num::{FromPrimitive, ToPrimitive};

use crate::graph::Node;

pub trait RadixKey: Copy + Default + Ord {
    const NUM_BITS: usize;

    /// Index of the bucket `self` belongs to if `last` was popped most recently
    fn bucket_of(&self, last: &Self) -> usize;
}

macro_rules! impl_radix_key {
    ($($t:ty),*) => {
        $(
            impl RadixKey for $t {
                const NUM_BITS: usize = <$t>::BITS as usize;

                #[inline]
                fn bucket_of(&self, last: &Self) -> usize {
                    Self::NUM_BITS - (self ^ last).leading_zeros() as usize
                }
            }
        )*
    };
}

impl_radix_key!(u8, u16, u32, u64);

/// Values double as indices into the position table and hence have to convert to `usize`
pub trait RadixValue: FromPrimitive + ToPrimitive + Default + Copy {}
impl<T: FromPrimitive + ToPrimitive + Default + Copy> RadixValue for T {}

/// Marks a value that is not stored in the heap
const ABSENT: u8 = u8::MAX;

/// Min-heap over `(key, value)` pairs with values from `0..n`, each present at most once.
///
/// Pushed keys must never be smaller than the key popped last. The heap supports removal and
/// re-keying of arbitrary values in constant time.
///
/// `NUM_BUCKETS` must equal `K::NUM_BITS + 1`.
#[derive(Debug)]
pub struct IndexedRadixHeap<K: RadixKey, V: RadixValue, const NUM_BUCKETS: usize> {
    buckets: [Vec<(K, V)>; NUM_BUCKETS],
    /// bucket of every value, or `ABSENT`
    bucket_of: Vec<u8>,
    /// index within its bucket of every present value
    slot_of: Vec<V>,
    last: K,
    len: usize,
}

/// Nodes keyed by a `Node`-sized priority
pub type NodeHeap = IndexedRadixHeap<Node, Node, 33>;

impl<K: RadixKey, V: RadixValue, const NUM_BUCKETS: usize> IndexedRadixHeap<K, V, NUM_BUCKETS> {
    /// Heap for the values `0..n`; every key pushed has to be at least `lower_bound`
    pub fn new(n: usize, lower_bound: K) -> Self {
        debug_assert_eq!(NUM_BUCKETS, K::NUM_BITS + 1);
        Self {
            buckets: array_init::array_init(|_| Vec::new()),
            bucket_of: vec![ABSENT; n],
            slot_of: vec![V::default(); n],
            last: lower_bound,
            len: 0,
        }
    }

    #[inline]
    fn index(value: V) -> usize {
        // values are constructed from indices below `n`, so the conversion cannot fail
        value.to_usize().unwrap_or(usize::MAX)
    }

    /// Appends to `bucket` and records the slot of `value`
    fn place(&mut self, bucket: usize, key: K, value: V) {
        let slot = self.buckets[bucket].len();
        self.buckets[bucket].push((key, value));
        self.bucket_of[Self::index(value)] = bucket as u8;
        self.slot_of[Self::index(value)] = V::from_usize(slot).unwrap_or_default();
    }

    /// Inserts `value` with priority `key`; ignored if `value` is already present
    pub fn push(&mut self, key: K, value: V) {
        if self.contains(value) {
            return;
        }

        debug_assert!(key >= self.last);
        self.place(key.bucket_of(&self.last), key, value);
        self.len += 1;
    }

    pub fn contains(&self, value: V) -> bool {
        self.bucket_of
            .get(Self::index(value))
            .is_some_and(|&b| b != ABSENT)
    }

    /// Removes `value` and returns its key, or `None` if it is not present
    pub fn remove(&mut self, value: V) -> Option<K> {
        if !self.contains(value) {
            return None;
        }

        let idx = Self::index(value);
        let bucket = self.bucket_of[idx] as usize;
        let slot = Self::index(self.slot_of[idx]);

        let (key, _) = self.buckets[bucket].swap_remove(slot);
        if let Some(&(_, moved)) = self.buckets[bucket].get(slot) {
            self.slot_of[Self::index(moved)] = self.slot_of[idx];
        }

        self.bucket_of[idx] = ABSENT;
        self.len -= 1;
        Some(key)
    }

    /// Replaces the key `k` of `value` by `f(k)`; returns false if `value` is not present
    pub fn update_key(&mut self, value: V, f: impl FnOnce(K) -> K) -> bool {
        let Some(key) = self.remove(value) else {
            return false;
        };

        self.push(f(key), value);
        true
    }

    /// Pops an entry with the smallest key
    pub fn pop(&mut self) -> Option<(K, V)> {
        if self.buckets[0].is_empty() {
            let bucket = self.buckets.iter().position(|b| !b.is_empty())?;
            let entries = std::mem::take(&mut self.buckets[bucket]);

            self.last = entries.iter().map(|&(k, _)| k).min()?;
            for (key, value) in entries {
                self.place(key.bucket_of(&self.last), key, value);
            }
        }

        let (key, value) = self.buckets[0].pop()?;
        self.bucket_of[Self::index(value)] = ABSENT;
        self.len -= 1;

        Some((key, value))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::NodeHeap;

    #[test]
    fn pops_in_order() {
        let mut heap = NodeHeap::new(6, 0);
        for (key, value) in [(3, 0), (2, 1), (6, 2), (2, 3), (1, 4), (6, 5)] {
            heap.push(key, value);
        }
        heap.push(0, 2);
        assert_eq!(heap.len(), 6);

        assert_eq!(heap.pop(), Some((1, 4)));
        assert_eq!(heap.pop().map(|(k, _)| k), Some(2));
        assert_eq!(heap.pop().map(|(k, _)| k), Some(2));
        assert_eq!(heap.pop(), Some((3, 0)));
        assert_eq!(heap.pop().map(|(k, _)| k), Some(6));
        assert_eq!(heap.pop().map(|(k, _)| k), Some(6));
        assert_eq!(heap.pop(), None);
        assert!(heap.is_empty());
    }

    #[test]
    fn remove_and_rekey() {
        let mut heap = NodeHeap::new(6, 0);
        heap.push(3, 1);
        heap.push(3, 2);
        heap.push(7, 3);

        assert!(heap.update_key(3, |k| k - 2));
        assert_eq!(heap.remove(2), Some(3));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.remove(8), None);
        assert!(!heap.update_key(2, |k| k + 1));

        assert_eq!(heap.pop(), Some((3, 1)));
        assert!(heap.update_key(3, |k| k + 1));
        assert_eq!(heap.pop(), Some((6, 3)));
        assert_eq!(heap.pop(), None);
    }
}
