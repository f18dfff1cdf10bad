//! Bounded memo cache for expensive position predicates.
//!
//! Records are keyed by the pieces-only placement hash and populated lazily:
//! each field starts `Unknown` and is filled the first time a caller asks.
//! Lookups of existing records share a read lock. Creating a record is
//! serialized under the write lock, as is the eviction it may trigger: once
//! the map is full the oldest `capacity / 10 + 1` keys go, in insertion
//! order. Records are handed out as `Arc`s so a record evicted
//! while in use stays valid for its holder.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::game_state::bitboard::Bitboard;
use crate::game_state::chess_types::Color;

/// Tri-state memo slot value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Memo {
    Unknown,
    Known(bool),
}

const MEMO_UNKNOWN: u8 = 0;
const MEMO_FALSE: u8 = 1;
const MEMO_TRUE: u8 = 2;

#[derive(Debug, Default)]
struct MemoSlot(AtomicU8);

impl MemoSlot {
    #[inline]
    fn get(&self) -> Memo {
        match self.0.load(Ordering::Acquire) {
            MEMO_FALSE => Memo::Known(false),
            MEMO_TRUE => Memo::Known(true),
            _ => Memo::Unknown,
        }
    }

    #[inline]
    fn set(&self, value: bool) {
        let raw = if value { MEMO_TRUE } else { MEMO_FALSE };
        self.0.store(raw, Ordering::Release);
    }

    fn get_or_compute<F: FnOnce() -> bool>(&self, compute: F) -> bool {
        if let Memo::Known(value) = self.get() {
            return value;
        }
        let value = compute();
        self.set(value);
        value
    }
}

#[derive(Debug, Default)]
struct AttackSlot {
    known: AtomicBool,
    mask: AtomicU64,
}

/// Per-placement memo of check, checkmate and no-safe-move verdicts for
/// both colors, plus each color's attack set.
#[derive(Debug, Default)]
pub struct MemoRecord {
    check: [MemoSlot; 2],
    checkmate: [MemoSlot; 2],
    no_safe_moves: [MemoSlot; 2],
    attacks: [AttackSlot; 2],
}

impl MemoRecord {
    #[inline]
    pub fn check(&self, color: Color) -> Memo {
        self.check[color.index()].get()
    }

    #[inline]
    pub fn checkmate(&self, color: Color) -> Memo {
        self.checkmate[color.index()].get()
    }

    /// Turn-independent stalemate verdict: not in check and no move escapes.
    #[inline]
    pub fn no_safe_moves(&self, color: Color) -> Memo {
        self.no_safe_moves[color.index()].get()
    }

    pub fn check_or_compute<F: FnOnce() -> bool>(&self, color: Color, compute: F) -> bool {
        self.check[color.index()].get_or_compute(compute)
    }

    pub fn checkmate_or_compute<F: FnOnce() -> bool>(&self, color: Color, compute: F) -> bool {
        self.checkmate[color.index()].get_or_compute(compute)
    }

    pub fn no_safe_moves_or_compute<F: FnOnce() -> bool>(&self, color: Color, compute: F) -> bool {
        self.no_safe_moves[color.index()].get_or_compute(compute)
    }

    pub fn attacks(&self, color: Color) -> Option<Bitboard> {
        let slot = &self.attacks[color.index()];
        if slot.known.load(Ordering::Acquire) {
            Some(Bitboard(slot.mask.load(Ordering::Acquire)))
        } else {
            None
        }
    }

    pub fn attacks_or_compute<F: FnOnce() -> Bitboard>(&self, color: Color, compute: F) -> Bitboard {
        if let Some(mask) = self.attacks(color) {
            return mask;
        }
        let mask = compute();
        let slot = &self.attacks[color.index()];
        slot.mask.store(mask.raw(), Ordering::Release);
        slot.known.store(true, Ordering::Release);
        mask
    }
}

pub struct PositionCache {
    capacity: usize,
    records: RwLock<HashMap<u64, Arc<MemoRecord>>>,
    insertion_order: Mutex<VecDeque<u64>>,
}

impl PositionCache {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: RwLock::new(HashMap::new()),
            insertion_order: Mutex::new(VecDeque::new()),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: u64) -> Option<Arc<MemoRecord>> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
            .cloned()
    }

    /// Fetch the record for `key`, creating an empty one if absent. A hit
    /// only takes the read lock; a miss takes the write lock for the insert
    /// and any eviction, so concurrent creators queue behind each other.
    pub fn get_or_create(&self, key: u64) -> Arc<MemoRecord> {
        if let Some(record) = self.get(key) {
            return record;
        }

        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(record) = records.get(&key) {
            return Arc::clone(record);
        }

        let mut order = self
            .insertion_order
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if records.len() >= self.capacity {
            let batch = self.capacity / 10 + 1;
            let mut evicted = 0usize;
            while evicted < batch {
                let Some(old_key) = order.pop_front() else {
                    break;
                };
                if records.remove(&old_key).is_some() {
                    evicted += 1;
                }
            }
            debug!(evicted, remaining = records.len(), "position cache eviction");
        }

        let record = Arc::new(MemoRecord::default());
        records.insert(key, Arc::clone(&record));
        order.push_back(key);
        record
    }

    pub fn clear(&self) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut order = self
            .insertion_order
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.clear();
        order.clear();
    }
}

impl fmt::Debug for PositionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn memo_slots_start_unknown_and_fill_independently() {
        let record = MemoRecord::default();
        assert_eq!(record.check(Color::White), Memo::Unknown);
        assert!(!record.check_or_compute(Color::White, || false));
        assert_eq!(record.check(Color::White), Memo::Known(false));
        assert_eq!(record.checkmate(Color::White), Memo::Unknown);
        assert_eq!(record.check(Color::Black), Memo::Unknown);
    }

    #[test]
    fn computed_value_is_reused() {
        let record = MemoRecord::default();
        assert!(record.checkmate_or_compute(Color::Black, || true));
        assert!(record.checkmate_or_compute(Color::Black, || panic!("should be memoized")));
    }

    #[test]
    fn empty_attack_set_is_distinct_from_unknown() {
        let record = MemoRecord::default();
        assert_eq!(record.attacks(Color::White), None);
        let mask = record.attacks_or_compute(Color::White, || Bitboard::EMPTY);
        assert_eq!(mask, Bitboard::EMPTY);
        assert_eq!(record.attacks(Color::White), Some(Bitboard::EMPTY));
    }

    #[test]
    fn get_or_create_returns_shared_record() {
        let cache = PositionCache::with_capacity(8);
        let a = cache.get_or_create(42);
        a.check_or_compute(Color::White, || true);
        let b = cache.get_or_create(42);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.check(Color::White), Memo::Known(true));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn size_never_exceeds_capacity_and_oldest_go_first() {
        let cache = PositionCache::with_capacity(20);
        for key in 0..100u64 {
            cache.get_or_create(key);
            assert!(cache.len() <= cache.capacity());
        }
        assert!(cache.get(0).is_none());
        assert!(cache.get(99).is_some());
    }

    #[test]
    fn eviction_removes_a_tenth_plus_one() {
        let cache = PositionCache::with_capacity(10);
        for key in 0..10u64 {
            cache.get_or_create(key);
        }
        assert_eq!(cache.len(), 10);
        cache.get_or_create(10);
        // 10 / 10 + 1 == 2 evicted, one inserted.
        assert_eq!(cache.len(), 9);
        assert!(cache.get(0).is_none());
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
    }

    #[test]
    fn concurrent_readers_and_writers_stay_bounded() {
        let cache = Arc::new(PositionCache::with_capacity(64));
        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..500u64 {
                        let record = cache.get_or_create(worker * 1_000 + i % 100);
                        record.check_or_compute(Color::White, || i % 2 == 0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("cache worker should not panic");
        }
        assert!(cache.len() <= 64);
    }

    mod properties {
        use proptest::prelude::*;

        use super::super::PositionCache;

        proptest! {
            #[test]
            fn cache_never_exceeds_capacity(
                capacity in 1usize..64,
                keys in prop::collection::vec(any::<u64>(), 0..400),
            ) {
                let cache = PositionCache::with_capacity(capacity);
                for key in keys {
                    cache.get_or_create(key);
                    prop_assert!(cache.len() <= capacity);
                    prop_assert!(cache.get(key).is_some());
                }
            }
        }
    }
}
