use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

/// Position hash, remaining depth and side to move together identify a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TtKey {
    pub hash: u64,
    pub depth: u32,
    pub maximizing: bool,
}

impl TtKey {
    fn mixed(&self) -> u64 {
        let k = self.hash ^ (self.depth as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (self.maximizing as u64) << 63;
        k ^ (k >> 32)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub key: TtKey,
    pub score: f64,
    pub best: Option<Move>,
    pub bound: Bound,
}

impl Entry {
    /// Whether the stored score settles a node searched with window `(alpha, beta)`.
    pub fn usable(&self, alpha: f64, beta: f64) -> bool {
        match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.score >= beta,
            Bound::Upper => self.score <= alpha,
        }
    }
}

const DEFAULT_WAYS: usize = 4;
pub const DEFAULT_CAPACITY: usize = 1 << 16;

#[derive(Default, Clone, Copy)]
struct Bucket {
    slots: [Option<Entry>; DEFAULT_WAYS],
}

/// Set-associative transposition table. One instance belongs to one top-level
/// search and is dropped with it.
#[derive(Default)]
pub struct Tt {
    buckets: Vec<Bucket>,
}

impl Tt {
    pub fn new() -> Self { Self::with_capacity(DEFAULT_CAPACITY) }

    pub fn with_capacity(entries: usize) -> Self {
        let mut t = Self { buckets: Vec::new() };
        t.set_capacity_entries(entries);
        t
    }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(DEFAULT_WAYS);
        let buckets = entries.div_ceil(DEFAULT_WAYS);
        self.buckets.clear();
        self.buckets.resize_with(buckets, Bucket::default);
    }

    fn bucket_index(&self, key: &TtKey) -> usize {
        (key.mixed() as usize) % self.buckets.len().max(1)
    }

    pub fn get(&self, key: &TtKey) -> Option<Entry> {
        if self.buckets.is_empty() { return None; }
        let b = &self.buckets[self.bucket_index(key)];
        b.slots.iter().flatten().find(|e| e.key == *key).copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.slots.iter().flatten().count()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn put(&mut self, e: Entry) {
        if self.buckets.is_empty() { return; }
        let idx = self.bucket_index(&e.key);
        let b = &mut self.buckets[idx];
        // Same key: newest result wins
        if let Some(slot) = b.slots.iter_mut().find(|s| s.is_some_and(|cur| cur.key == e.key)) {
            *slot = Some(e);
            return;
        }
        if let Some(slot) = b.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(e);
            return;
        }
        // Evict the shallowest entry
        let mut victim = 0usize;
        let mut best_depth = u32::MAX;
        for (i, slot) in b.slots.iter().enumerate() {
            if let Some(cur) = slot {
                if cur.key.depth < best_depth { best_depth = cur.key.depth; victim = i; }
            }
        }
        b.slots[victim] = Some(e);
    }
}
