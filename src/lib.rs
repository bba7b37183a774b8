//! # huffcode
//!
//! Huffman prefix codes: build a tree from symbol counts, persist it as text,
//! load it back, and decode bit streams with it.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffcode::{FrequencyTable, HuffmanTree, bit_vec::BitVec};
//! use std::io::Cursor;
//!
//! let table: FrequencyTable = [(97, 5), (98, 2), (99, 1), (100, 1)].into_iter().collect();
//! let tree = HuffmanTree::build(&table);
//!
//! let mut saved: Vec<u8> = Vec::new();
//! tree.save(&mut saved)?;
//! assert_eq!(saved, b"98\n00\n99\n010\n100\n011\n97\n1\n");
//!
//! let loaded = HuffmanTree::load(Cursor::new(saved))?;
//! let mut bits = BitVec::new();
//! loaded.encode_into([97, 100, 98], &mut bits)?;
//!
//! let mut symbols: Vec<huffcode::Symbol> = Vec::new();
//! loaded.decode(bits.reader(), &mut symbols)?;
//! assert_eq!(symbols, vec![97, 100, 98]);
//! # Ok::<(), huffcode::HuffmanError>(())
//! ```

pub mod bit_vec;
pub mod cli;
pub mod compressed_data;
pub mod decoder;
pub mod error;
pub mod huffman_codec;
pub mod hufftree;
pub mod symbol;
pub mod tree_format;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use decoder::{ByteSink, Decoder, SymbolSink};
pub use error::{ErrorKind, HuffmanError, Result};
pub use huffman_codec::HuffmanCodec;
pub use hufftree::{Code, HuffNode, HuffmanTree};
pub use symbol::{FrequencyTable, Symbol};
