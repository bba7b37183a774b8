//! Text form of a code tree.
//!
//! One pair of lines per leaf, leaves in pre-order (0 side before 1 side):
//!
//! ```text
//! 98
//! 00
//! 99
//! 010
//! ```
//!
//! The first line is the decimal symbol id, the second its path from the root.
//! A tree that is a single leaf is written as its symbol followed by an empty
//! line. There is no header and no terminator.
//!
//! Loading is strict: a record whose path runs into an existing leaf, lands on
//! an existing node, or leaves a branch with a missing child once input ends is
//! rejected rather than patched over. Paths longer than [`MAX_PATH_LEN`] and
//! lines that are not UTF-8 are format errors too.

use std::io::{BufRead, Write};

use tracing::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::symbol::Symbol;

/// Longest path accepted on load. Built trees stay far below this since code
/// length is bounded by the total weight, and any full tree over a byte
/// alphabet is at most 255 deep.
pub const MAX_PATH_LEN: usize = 1024;

/// Node of a tree that is still being loaded.
#[derive(Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Leaf(Symbol),
    Branch(Box<Slot>, Box<Slot>),
}

impl Slot {
    fn place(&mut self, symbol: Symbol, path: &[u8], line: usize, full_path: &str) -> Result<()> {
        let conflict = || HuffmanError::PathConflict {
            line,
            path: full_path.to_string(),
        };
        let mut slot = self;
        for &bit in path {
            if matches!(slot, Slot::Empty) {
                *slot = Slot::Branch(Box::default(), Box::default());
            }
            slot = match { slot } {
                Slot::Branch(zero, one) => {
                    if bit == b'1' {
                        one.as_mut()
                    } else {
                        zero.as_mut()
                    }
                }
                _ => return Err(conflict()),
            };
        }
        match slot {
            Slot::Empty => {
                *slot = Slot::Leaf(symbol);
                Ok(())
            }
            _ => Err(conflict()),
        }
    }

    /// `path` is the route to this slot; an empty slot reports its parent.
    fn finish(self, path: &mut String) -> Result<HuffNode> {
        match self {
            Slot::Leaf(symbol) => Ok(HuffNode::leaf(symbol)),
            Slot::Empty => {
                path.pop();
                Err(HuffmanError::IncompleteTree { path: path.clone() })
            }
            Slot::Branch(zero, one) => {
                path.push('0');
                let zero = zero.finish(path)?;
                path.pop();
                path.push('1');
                let one = one.finish(path)?;
                path.pop();
                Ok(HuffNode::merge(zero, one))
            }
        }
    }
}

impl HuffmanTree {
    /// Every leaf as `(symbol, path)`, in the order [`save`](Self::save) writes them.
    pub fn records(&self) -> Vec<(Symbol, String)> {
        let mut records = Vec::new();
        if let Some(root) = self.root() {
            collect_records(root, &mut String::new(), &mut records);
        }
        records
    }

    pub fn save<W: Write>(&self, out: &mut W) -> Result<()> {
        let records = self.records();
        for (symbol, path) in &records {
            writeln!(out, "{}", symbol)?;
            writeln!(out, "{}", path)?;
        }
        debug!(leaves = records.len(), "saved code tree");
        Ok(())
    }

    /// Rebuilds a tree from `(symbol, path)` records.
    ///
    /// `line` numbers in errors count records from one, two lines each, as if
    /// the records had been read from a file.
    pub fn from_records<I, S>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, S)>,
        S: AsRef<str>,
    {
        let mut root = Slot::Empty;
        for (index, (symbol, path)) in records.into_iter().enumerate() {
            let path = path.as_ref();
            let line = index * 2 + 2;
            validate_path(path, line)?;
            trace!(symbol, path, "placing leaf");
            root.place(symbol, path.as_bytes(), line, path)?;
        }
        finish(root)
    }

    pub fn load<R: BufRead>(mut input: R) -> Result<Self> {
        let mut root = Slot::Empty;
        let mut line = 0;
        let mut leaves = 0usize;

        while let Some(symbol_line) = read_line(&mut input)? {
            line += 1;
            let symbol = parse_symbol(&symbol_line, line)?;

            let path_line = read_line(&mut input)?.ok_or(HuffmanError::TruncatedRecord { line })?;
            line += 1;
            let path = String::from_utf8(path_line).map_err(|e| HuffmanError::InvalidPath {
                line,
                text: String::from_utf8_lossy(e.as_bytes()).into_owned(),
            })?;
            validate_path(&path, line)?;

            trace!(symbol, path = path.as_str(), "placing leaf");
            root.place(symbol, path.as_bytes(), line, &path)?;
            leaves += 1;
        }

        let tree = finish(root)?;
        debug!(leaves, "loaded code tree");
        Ok(tree)
    }
}

fn finish(root: Slot) -> Result<HuffmanTree> {
    match root {
        Slot::Empty => Ok(HuffmanTree::default()),
        slot => Ok(HuffmanTree::new(Some(slot.finish(&mut String::new())?))),
    }
}

fn collect_records(node: &HuffNode, path: &mut String, out: &mut Vec<(Symbol, String)>) {
    match node {
        HuffNode::Leaf { symbol } => out.push((*symbol, path.clone())),
        HuffNode::Internal { zero, one } => {
            path.push('0');
            collect_records(zero, path, out);
            path.pop();
            path.push('1');
            collect_records(one, path, out);
            path.pop();
        }
    }
}

/// Next line without its `\n` or `\r\n`, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(buf))
}

fn parse_symbol(text: &[u8], line: usize) -> Result<Symbol> {
    std::str::from_utf8(text)
        .ok()
        .and_then(|t| t.parse::<Symbol>().ok())
        .ok_or_else(|| HuffmanError::InvalidSymbol {
            line,
            text: String::from_utf8_lossy(text).into_owned(),
        })
}

fn validate_path(path: &str, line: usize) -> Result<()> {
    if path.len() <= MAX_PATH_LEN && path.bytes().all(|b| b == b'0' || b == b'1') {
        Ok(())
    } else {
        Err(HuffmanError::InvalidPath {
            line,
            text: path.chars().take(64).collect(),
        })
    }
}
