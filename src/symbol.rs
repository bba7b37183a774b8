use std::collections::BTreeMap;

/// Identifier of an alphabet element, usually a byte value.
pub type Symbol = u32;

/// Occurrence counts per symbol.
///
/// Only positive counts are stored; inserting a zero count is a no-op, so a
/// symbol is either absent or carries a count of at least one. Iteration is in
/// ascending symbol order, which is the scan order the tree builder relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable { counts: BTreeMap::new() }
    }

    /// Builds a table from a dense array where the index is the symbol id.
    pub fn from_counts(counts: &[u64]) -> Self {
        counts
            .iter()
            .enumerate()
            .map(|(symbol, &count)| (symbol as Symbol, count))
            .collect()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = FrequencyTable::new();
        for &byte in bytes {
            table.add(Symbol::from(byte), 1);
        }
        table
    }

    /// Sets the count for `symbol`, removing it when `count` is zero.
    pub fn insert(&mut self, symbol: Symbol, count: u64) {
        if count == 0 {
            self.counts.remove(&symbol);
        } else {
            self.counts.insert(symbol, count);
        }
    }

    /// Adds `count` occurrences of `symbol`, saturating at `u64::MAX`.
    pub fn add(&mut self, symbol: Symbol, count: u64) {
        if count > 0 {
            let entry = self.counts.entry(symbol).or_insert(0);
            *entry = entry.saturating_add(count);
        }
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl FromIterator<(Symbol, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (symbol, count) in iter {
            table.add(symbol, count);
        }
        table
    }
}
