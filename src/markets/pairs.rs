use super::pair::{Pair, PairLite};
use crate::utils::constants::NO_BLOCK_NUM;
use ahash::{HashMap, HashSet};

/// All known pairs keyed by id, together with the block the snapshot is
/// consistent with and the pairs refreshed since then.
#[derive(Clone, Debug)]
pub struct Pairs {
    pairs: HashMap<String, Pair>,
    // Lowest `_meta.block.number` seen while paging, -1 if none was reported.
    lowest_block_number: i64,
    updated_since_lowest_block: HashSet<String>,
}

impl Default for Pairs {
    fn default() -> Self {
        Self { pairs: HashMap::default(), lowest_block_number: NO_BLOCK_NUM, updated_since_lowest_block: HashSet::default() }
    }
}

impl Pairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, replacing any previous record with the same id.
    pub fn add_pair(&mut self, pair: Pair) {
        self.pairs.insert(pair.id.clone(), pair);
    }

    pub fn get_pair(&self, id: &str) -> Option<&Pair> {
        self.pairs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pairs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.pairs.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.values()
    }

    pub fn set_lowest_block_number(&mut self, block_number: i64) {
        self.lowest_block_number = block_number;
    }

    pub fn lowest_block_number(&self) -> i64 {
        self.lowest_block_number
    }

    pub fn clear_updated_since_lowest_block_number(&mut self) {
        self.updated_since_lowest_block.clear();
    }

    pub fn updated_since_lowest_block_number(&self) -> &HashSet<String> {
        &self.updated_since_lowest_block
    }

    pub fn is_updated_since_lowest_block_number(&self, id: &str) -> bool {
        self.updated_since_lowest_block.contains(id)
    }

    /// Apply a reserve/price refresh to a stored pair and mark it updated.
    /// Updates for unknown pairs are ignored.
    pub fn update_pair(&mut self, update: &PairLite) -> bool {
        let Some(pair) = self.pairs.get_mut(&update.id) else {
            return false;
        };
        pair.apply_update(update);
        self.updated_since_lowest_block.insert(update.id.clone());
        true
    }
}

impl FromIterator<Pair> for Pairs {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        let mut pairs = Pairs::new();
        for pair in iter {
            pairs.add_pair(pair);
        }
        pairs
    }
}
