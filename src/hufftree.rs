use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::bit_vec::BitVec;
use crate::error::{HuffmanError, Result};
use crate::min_heap::MinHeap;
use crate::symbol::{FrequencyTable, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
    },
    Internal {
        zero: Box<HuffNode>,
        one: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol) -> Self {
        HuffNode::Leaf { symbol }
    }

    /// Joins two subtrees; `zero` is taken on a 0 bit, `one` on a 1 bit.
    pub fn merge(zero: Self, one: Self) -> Self {
        HuffNode::Internal {
            zero: Box::new(zero),
            one: Box::new(one),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffNode::Leaf { symbol } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    /// Child selected by `bit`, `None` on a leaf.
    pub fn child(&self, bit: bool) -> Option<&HuffNode> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { zero, one } => Some(if bit { one.as_ref() } else { zero.as_ref() }),
        }
    }

    fn collect_codes(&self, table: &mut BTreeMap<Symbol, Code>, path: &mut Vec<bool>) {
        match self {
            HuffNode::Leaf { symbol } => {
                table.insert(*symbol, Code { bits: path.clone() });
            }
            HuffNode::Internal { zero, one } => {
                path.push(false);
                zero.collect_codes(table, path);
                path.pop();
                path.push(true);
                one.collect_codes(table, path);
                path.pop();
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { zero, one } => 1 + zero.depth().max(one.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { zero, one } => zero.leaf_count() + one.leaf_count(),
        }
    }
}

/// Root-to-leaf route of a symbol; `false` is a 0 bit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A subtree waiting in the builder's heap.
///
/// Ordered by `(weight, seq)`: lighter first, and among equal weights the one
/// pushed earlier. `seq` is handed out in insertion order, so leaves keep their
/// ascending symbol order and every merged node ranks after everything already
/// queued.
#[derive(Debug)]
struct Weighted {
    weight: u64,
    seq: u64,
    node: HuffNode,
}

impl PartialEq for Weighted {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Weighted {}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weighted {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A Huffman code tree. An empty tree has no root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<HuffNode>,
}

impl HuffmanTree {
    pub fn new(root: Option<HuffNode>) -> Self {
        HuffmanTree { root }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        HuffmanTree::build(&FrequencyTable::from_bytes(bytes))
    }

    /// Greedy Huffman construction.
    ///
    /// The two lightest subtrees are merged until one remains; the first one
    /// removed becomes the 0 child. An empty table yields an empty tree and a
    /// single symbol yields a lone leaf with an empty code.
    pub fn build(frequencies: &FrequencyTable) -> Self {
        let mut seq = 0u64;
        let leaves: Vec<Weighted> = frequencies
            .iter()
            .map(|(symbol, weight)| {
                let leaf = Weighted { weight, seq, node: HuffNode::leaf(symbol) };
                seq += 1;
                leaf
            })
            .collect();

        if leaves.is_empty() {
            warn!("frequency table has no positive counts, building an empty tree");
            return HuffmanTree::default();
        }

        let mut heap = MinHeap::build(leaves);
        while heap.heap_size() > 1 {
            let (Some(x), Some(y)) = (heap.extract_min(), heap.extract_min()) else {
                break;
            };
            trace!(zero = x.weight, one = y.weight, seq, "merge");
            heap.insert(Weighted {
                // saturation can only cost optimality on tables near u64::MAX
                weight: x.weight.saturating_add(y.weight),
                seq,
                node: HuffNode::merge(x.node, y.node),
            });
            seq += 1;
        }

        let root = heap.extract_min().map(|w| w.node);
        let tree = HuffmanTree { root };
        debug!(
            symbols = frequencies.len(),
            depth = tree.depth(),
            "built code tree"
        );
        tree
    }

    pub fn root(&self) -> Option<&HuffNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, HuffNode::leaf_count)
    }

    /// Length of the longest code; 0 for an empty or single-leaf tree.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, HuffNode::depth)
    }

    pub fn code_table(&self) -> BTreeMap<Symbol, Code> {
        let mut table = BTreeMap::new();
        if let Some(root) = &self.root {
            root.collect_codes(&mut table, &mut Vec::new());
        }
        table
    }

    /// Code of a single symbol, found by walking the tree without building
    /// the full table. Use [`code_table`](Self::code_table) for bulk lookups.
    pub fn code_for(&self, symbol: Symbol) -> Option<Code> {
        let mut path = Vec::new();
        // (node, length of the parent's path, bit taken from the parent)
        let mut stack: Vec<(&HuffNode, usize, Option<bool>)> = vec![(self.root.as_ref()?, 0, None)];
        while let Some((node, parent_len, bit)) = stack.pop() {
            path.truncate(parent_len);
            path.extend(bit);
            match node {
                HuffNode::Leaf { symbol: s } if *s == symbol => return Some(Code { bits: path }),
                HuffNode::Leaf { .. } => {}
                HuffNode::Internal { zero, one } => {
                    stack.push((one.as_ref(), path.len(), Some(true)));
                    stack.push((zero.as_ref(), path.len(), Some(false)));
                }
            }
        }
        None
    }

    /// Sum of `count * code length` over the table, saturating at `u64::MAX`.
    pub fn weighted_length(&self, frequencies: &FrequencyTable) -> Result<u64> {
        let table = self.code_table();
        frequencies.iter().try_fold(0u64, |acc, (symbol, count)| {
            let code = table.get(&symbol).ok_or(HuffmanError::UnknownSymbol(symbol))?;
            Ok(acc.saturating_add(count.saturating_mul(code.len() as u64)))
        })
    }

    /// Appends the concatenated codes of `symbols` to `out`.
    ///
    /// A single-leaf tree has an empty code, so there the run is written as one
    /// 0 bit per symbol after the first; the decoder emits once per bit plus
    /// once at the end, which gives back the original count.
    pub fn encode_into<I>(&self, symbols: I, out: &mut BitVec) -> Result<()>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let table = self.code_table();
        let degenerate = matches!(self.root, Some(HuffNode::Leaf { .. }));
        let mut first = true;

        for symbol in symbols {
            let code = table.get(&symbol).ok_or(HuffmanError::UnknownSymbol(symbol))?;
            if degenerate {
                if !first {
                    out.push_bit(false);
                }
            } else {
                out.extend_bits(code.bits().iter().copied());
            }
            first = false;
        }
        Ok(())
    }

    pub fn print_structure(&self) {
        println!("Huffman Tree Structure:");
        match &self.root {
            Some(root) => Self::print_node(root, 0, "root"),
            None => println!("(empty)"),
        }
    }

    fn print_node(node: &HuffNode, depth: usize, label: &str) {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { symbol } => {
                let shown = u8::try_from(*symbol)
                    .ok()
                    .filter(|b| b.is_ascii_graphic())
                    .map(|b| format!("'{}' ", b as char))
                    .unwrap_or_default();
                println!("{}{}-> Leaf: {}({})", indent, label, shown, symbol);
            }
            HuffNode::Internal { zero, one } => {
                println!("{}{}-> Internal", indent, label);
                Self::print_node(zero, depth + 1, "0");
                Self::print_node(one, depth + 1, "1");
            }
        }
    }
}

impl From<&str> for HuffmanTree {
    fn from(text: &str) -> Self {
        HuffmanTree::from_bytes(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(tree: &HuffmanTree) -> Vec<(Symbol, String)> {
        tree.code_table()
            .into_iter()
            .map(|(s, c)| (s, c.to_string()))
            .collect()
    }

    #[test]
    fn tie_break_follows_insertion_order() {
        let table: FrequencyTable = [(97, 5), (98, 2), (99, 1), (100, 1)].into_iter().collect();
        let tree = HuffmanTree::build(&table);
        assert_eq!(
            paths(&tree),
            vec![
                (97, "1".to_string()),
                (98, "00".to_string()),
                (99, "010".to_string()),
                (100, "011".to_string()),
            ]
        );
    }

    #[test]
    fn equal_weights_keep_symbol_order() {
        let table = FrequencyTable::from_counts(&[1, 1]);
        let tree = HuffmanTree::build(&table);
        assert_eq!(tree.code_for(0).unwrap().to_string(), "0");
        assert_eq!(tree.code_for(1).unwrap().to_string(), "1");
    }

    #[test]
    fn single_symbol_is_lone_leaf() {
        let table: FrequencyTable = [(65, 7)].into_iter().collect();
        let tree = HuffmanTree::build(&table);
        assert_eq!(tree.root(), Some(&HuffNode::leaf(65)));
        assert!(tree.code_for(65).unwrap().is_empty());
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn empty_table_builds_empty_tree() {
        let tree = HuffmanTree::build(&FrequencyTable::from_counts(&[0, 0, 0]));
        assert!(tree.is_empty());
        assert!(tree.code_table().is_empty());
        assert_eq!(tree.leaf_count(), 0);
    }

    #[test]
    fn build_is_deterministic() {
        let tree_a = HuffmanTree::from("abracadabra alakazam");
        let tree_b = HuffmanTree::from("abracadabra alakazam");
        assert_eq!(tree_a, tree_b);
    }

    #[test]
    fn every_branch_has_two_children() {
        let tree = HuffmanTree::from("the quick brown fox jumps over the lazy dog");
        let table = tree.code_table();
        assert_eq!(table.len(), tree.leaf_count());
        // Kraft equality holds only for full binary trees.
        let kraft: f64 = table.values().map(|c| 0.5f64.powi(c.len() as i32)).sum();
        assert!((kraft - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_length_matches_hand_count() {
        let table: FrequencyTable = [(97, 5), (98, 2), (99, 1), (100, 1)].into_iter().collect();
        let tree = HuffmanTree::build(&table);
        assert_eq!(tree.weighted_length(&table).unwrap(), 5 + 2 * 2 + 3 + 3);
    }

    #[test]
    fn encode_concatenates_codes() {
        let table: FrequencyTable = [(97, 5), (98, 2), (99, 1), (100, 1)].into_iter().collect();
        let tree = HuffmanTree::build(&table);
        let mut bits = BitVec::new();
        tree.encode_into([97, 99, 98], &mut bits).unwrap();
        let written: String = bits.iter().map(|b| if b { '1' } else { '0' }).collect();
        assert_eq!(written, "101000");
    }

    #[test]
    fn encode_rejects_unknown_symbol() {
        let tree = HuffmanTree::from("ab");
        let mut bits = BitVec::new();
        let err = tree.encode_into([b'z' as Symbol], &mut bits).unwrap_err();
        assert!(matches!(err, HuffmanError::UnknownSymbol(122)));
    }

    #[test]
    fn degenerate_encode_writes_one_bit_per_repeat() {
        let tree = HuffmanTree::from("aaaa");
        let mut bits = BitVec::new();
        tree.encode_into([97; 4], &mut bits).unwrap();
        assert_eq!(bits.bit_count(), 3);
        assert!(bits.iter().all(|b| !b));
    }

    #[test]
    fn code_for_matches_table() {
        let tree = HuffmanTree::from("code lookups walk the tree");
        for (symbol, code) in tree.code_table() {
            assert_eq!(tree.code_for(symbol), Some(code));
        }
        assert_eq!(tree.code_for(b'#' as Symbol), None);
        assert_eq!(HuffmanTree::default().code_for(0), None);
    }

    #[test]
    fn extreme_counts_do_not_overflow() {
        let table: FrequencyTable = [(1, u64::MAX), (2, u64::MAX), (3, u64::MAX)]
            .into_iter()
            .collect();
        let tree = HuffmanTree::build(&table);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.weighted_length(&table).unwrap(), u64::MAX);
    }
}
