use std::io::{BufRead, Read, Write};

use tracing::{debug, info};

use crate::bit_vec::BitVec;
use crate::compressed_data::CompressedData;
use crate::decoder::ByteSink;
use crate::error::{HuffmanError, Result};
use crate::hufftree::HuffmanTree;
use crate::symbol::Symbol;

/// Byte-level compression built on a single code tree.
///
/// A compressed artifact is two files: the tree in its text form and the
/// encoded bits in a [`CompressedData`] container.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    tree: HuffmanTree,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        HuffmanCodec { tree }
    }

    /// Builds the tree from the byte frequencies of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::new(HuffmanTree::from_bytes(data))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn encode(&self, data: &[u8]) -> Result<CompressedData> {
        let mut bit_vec = BitVec::new();
        self.tree
            .encode_into(data.iter().map(|&b| Symbol::from(b)), &mut bit_vec)?;
        debug!(bytes = data.len(), bits = bit_vec.bit_count(), "encoded");
        Ok(CompressedData::from(bit_vec))
    }

    /// Decodes `compressed` with this codec's tree.
    ///
    /// An empty tree stands for empty input and decodes to nothing; bits paired
    /// with an empty tree are an [`HuffmanError::EmptyTree`] error.
    pub fn decode(&self, compressed: &CompressedData) -> Result<Vec<u8>> {
        if self.tree.is_empty() {
            if compressed.bit_count > 0 {
                return Err(HuffmanError::EmptyTree);
            }
            return Ok(Vec::new());
        }
        let bits = compressed.bits();
        let mut sink = ByteSink::new(Vec::new());
        self.tree.decode(bits.reader(), &mut sink)?;
        Ok(sink.into_inner())
    }

    /// Reads all of `input`, then writes the tree description to `code_out` and
    /// the encoded bits to `data_out`.
    pub fn compress<R, C, D>(mut input: R, code_out: &mut C, data_out: &mut D) -> Result<Self>
    where
        R: Read,
        C: Write,
        D: Write,
    {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;

        let codec = Self::from_bytes(&data);
        let compressed = codec.encode(&data)?;
        codec.tree.save(code_out)?;
        compressed.write_to(data_out)?;

        info!(
            original = data.len(),
            compressed = compressed.compressed_bits.len() + 8,
            symbols = codec.tree.leaf_count(),
            "compressed"
        );
        Ok(codec)
    }

    /// Loads the tree from `code_in`, decodes `data_in` and writes the bytes to `output`.
    pub fn decompress<C, D, W>(code_in: C, data_in: &mut D, output: &mut W) -> Result<usize>
    where
        C: BufRead,
        D: Read,
        W: Write,
    {
        let codec = Self::new(HuffmanTree::load(code_in)?);
        let compressed = CompressedData::read_from(data_in)?;
        let decoded = codec.decode(&compressed)?;
        output.write_all(&decoded)?;
        info!(bits = compressed.bit_count, bytes = decoded.len(), "decompressed");
        Ok(decoded.len())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_roundtrip() {
        let text = b"The quick brown fox jumps over the lazy dog. Huffman encoding is a greedy algorithm.";
        let codec = HuffmanCodec::from_bytes(text);
        let compressed = codec.encode(text).unwrap();
        assert!(compressed.compressed_bits.len() < text.len());
        assert_eq!(codec.decode(&compressed).unwrap(), text);
    }

    #[test]
    fn test_stream_roundtrip() {
        let text = b"mississippi river";
        let mut code = Vec::new();
        let mut data = Vec::new();
        HuffmanCodec::compress(&text[..], &mut code, &mut data).unwrap();

        let mut out = Vec::new();
        let n = HuffmanCodec::decompress(Cursor::new(code), &mut Cursor::new(data), &mut out)
            .unwrap();
        assert_eq!(n, text.len());
        assert_eq!(out, text);
    }

    #[test]
    fn test_single_byte_input() {
        let text = b"aaaaaaa";
        let codec = HuffmanCodec::from_bytes(text);
        let compressed = codec.encode(text).unwrap();
        assert_eq!(compressed.bit_count, 6);
        assert_eq!(codec.decode(&compressed).unwrap(), text);
    }

    #[test]
    fn test_empty_input() {
        let mut code = Vec::new();
        let mut data = Vec::new();
        HuffmanCodec::compress(&b""[..], &mut code, &mut data).unwrap();
        assert!(code.is_empty());

        let mut out = Vec::new();
        HuffmanCodec::decompress(Cursor::new(code), &mut Cursor::new(data), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_foreign_bytes_fail_to_encode() {
        let codec = HuffmanCodec::from_bytes(b"abc");
        let err = codec.encode(b"abd").unwrap_err();
        assert!(matches!(err, HuffmanError::UnknownSymbol(100)));
    }

    #[test]
    fn test_bits_without_tree_are_rejected() {
        let codec = HuffmanCodec::new(HuffmanTree::default());
        let compressed = CompressedData {
            bit_count: 3,
            compressed_bits: vec![0b1010_0000],
        };
        let err = codec.decode(&compressed).unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyTree));
    }
}
