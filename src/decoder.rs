use std::io::Write;

use tracing::debug;

use crate::bit_vec::BitSource;
use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::symbol::Symbol;

/// Receives decoded symbols in order.
pub trait SymbolSink {
    fn write_symbol(&mut self, symbol: Symbol) -> Result<()>;
}

impl SymbolSink for Vec<Symbol> {
    fn write_symbol(&mut self, symbol: Symbol) -> Result<()> {
        self.push(symbol);
        Ok(())
    }
}

/// Writes each symbol as one byte; symbols above 255 are an error.
#[derive(Debug)]
pub struct ByteSink<W: Write> {
    inner: W,
}

impl<W: Write> ByteSink<W> {
    pub fn new(inner: W) -> Self {
        ByteSink { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> SymbolSink for ByteSink<W> {
    fn write_symbol(&mut self, symbol: Symbol) -> Result<()> {
        let byte = u8::try_from(symbol).map_err(|_| HuffmanError::SymbolOutOfRange(symbol))?;
        self.inner.write_all(&[byte])?;
        Ok(())
    }
}

/// Walks a code tree bit by bit, yielding symbols lazily.
///
/// While bits remain, a cursor resting on a leaf emits that leaf and returns to
/// the root without reading; otherwise one bit is read and the cursor follows
/// it. When the source runs dry the node under the cursor is emitted once more,
/// and must be a leaf.
///
/// On a tree that is a single leaf the cursor never leaves the root, so each
/// available bit is read and answered with one emission, followed by the final
/// one: `n` bits decode to `n + 1` symbols.
pub struct Decoder<'t, B: BitSource> {
    root: &'t HuffNode,
    cursor: &'t HuffNode,
    source: B,
    bits_read: u64,
    done: bool,
}

impl<'t, B: BitSource> Decoder<'t, B> {
    pub fn new(tree: &'t HuffmanTree, source: B) -> Result<Self> {
        let root = tree.root().ok_or(HuffmanError::EmptyTree)?;
        Ok(Decoder {
            root,
            cursor: root,
            source,
            bits_read: 0,
            done: false,
        })
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Drains the decoder into `sink`, returning how many symbols were written.
    pub fn decode_into<S: SymbolSink + ?Sized>(mut self, sink: &mut S) -> Result<usize> {
        let mut written = 0;
        for symbol in &mut self {
            sink.write_symbol(symbol?)?;
            written += 1;
        }
        debug!(symbols = written, bits = self.bits_read, "decoded bit stream");
        Ok(written)
    }

    fn read_bit(&mut self) -> Result<bool> {
        let bit = self.source.next_bit().ok_or(HuffmanError::TruncatedCode {
            bits_read: self.bits_read,
        })?;
        self.bits_read += 1;
        Ok(bit)
    }

    fn step(&mut self) -> Result<Option<Symbol>> {
        while self.source.has_next_bit() {
            let node: &'t HuffNode = self.cursor;
            match node {
                HuffNode::Leaf { symbol } => {
                    if self.root.is_leaf() {
                        // lone leaf: every bit stands for one more symbol
                        self.read_bit()?;
                    } else {
                        self.cursor = self.root;
                    }
                    return Ok(Some(*symbol));
                }
                HuffNode::Internal { zero, one } => {
                    self.cursor = if self.read_bit()? { one.as_ref() } else { zero.as_ref() };
                }
            }
        }

        self.done = true;
        match self.cursor.symbol() {
            Some(symbol) => Ok(Some(symbol)),
            None => Err(HuffmanError::TruncatedCode { bits_read: self.bits_read }),
        }
    }
}

impl<B: BitSource> Iterator for Decoder<'_, B> {
    type Item = Result<Symbol>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(symbol) => symbol.map(Ok),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl HuffmanTree {
    /// Decodes every bit of `source` into `sink`.
    pub fn decode<B, S>(&self, source: B, sink: &mut S) -> Result<usize>
    where
        B: BitSource,
        S: SymbolSink + ?Sized,
    {
        Decoder::new(self, source)?.decode_into(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_vec::{BitVec, IterBits};
    use crate::symbol::FrequencyTable;

    fn bits(text: &str) -> IterBits<std::vec::IntoIter<bool>> {
        IterBits::new(text.chars().map(|c| c == '1').collect::<Vec<_>>())
    }

    fn sample_tree() -> HuffmanTree {
        let table: FrequencyTable = [(97, 5), (98, 2), (99, 1), (100, 1)].into_iter().collect();
        HuffmanTree::build(&table)
    }

    #[test]
    fn decodes_back_to_back_codes() {
        let tree = sample_tree();
        let mut out: Vec<Symbol> = Vec::new();
        // a=1 c=010 b=00 d=011 a=1
        let n = tree.decode(bits("1010000111"), &mut out).unwrap();
        assert_eq!(out, vec![97, 99, 98, 100, 97]);
        assert_eq!(n, 5);
    }

    #[test]
    fn iterator_is_lazy() {
        let tree = sample_tree();
        let mut decoder = Decoder::new(&tree, bits("1010")).unwrap();
        assert_eq!(decoder.next().unwrap().unwrap(), 97);
        assert_eq!(decoder.bits_read(), 1);
        assert_eq!(decoder.next().unwrap().unwrap(), 99);
        assert!(decoder.next().is_none());
    }

    #[test]
    fn trailing_partial_code_is_an_error() {
        let tree = sample_tree();
        let mut out: Vec<Symbol> = Vec::new();
        let err = tree.decode(bits("101"), &mut out).unwrap_err();
        assert!(matches!(err, HuffmanError::TruncatedCode { bits_read: 3 }));
        assert_eq!(out, vec![97]);
    }

    #[test]
    fn empty_source_on_branch_root_is_an_error() {
        let tree = sample_tree();
        let mut out: Vec<Symbol> = Vec::new();
        assert!(tree.decode(bits(""), &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn empty_tree_is_structural_error() {
        let tree = HuffmanTree::default();
        let mut out: Vec<Symbol> = Vec::new();
        let err = tree.decode(bits("0101"), &mut out).unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyTree));
    }

    #[test]
    fn lone_leaf_emits_once_per_bit_plus_final() {
        let tree = HuffmanTree::from("zzz");
        let mut out: Vec<Symbol> = Vec::new();
        tree.decode(bits("00"), &mut out).unwrap();
        assert_eq!(out, vec![122, 122, 122]);

        out.clear();
        tree.decode(bits(""), &mut out).unwrap();
        assert_eq!(out, vec![122]);
    }

    #[test]
    fn byte_sink_writes_raw_bytes() {
        let tree = HuffmanTree::from("hello");
        let mut encoded = BitVec::new();
        tree.encode_into("hello".bytes().map(Symbol::from), &mut encoded).unwrap();
        let mut sink = ByteSink::new(Vec::new());
        tree.decode(encoded.reader(), &mut sink).unwrap();
        assert_eq!(sink.into_inner(), b"hello");
    }

    #[test]
    fn byte_sink_rejects_wide_symbols() {
        let tree = HuffmanTree::from_records([(300, "")]).unwrap();
        let mut sink = ByteSink::new(Vec::new());
        let err = tree.decode(bits(""), &mut sink).unwrap_err();
        assert!(matches!(err, HuffmanError::SymbolOutOfRange(300)));
    }
}
