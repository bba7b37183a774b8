use std::io::{self, Read, Write};

use crate::bit_vec::BitVec;

/// An encoded bit stream as stored on disk.
///
/// Layout: the number of meaningful bits as a little-endian `u64`, then the
/// bits packed MSB-first, padded with zeros to a whole byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub bit_count: usize,
    pub compressed_bits: Vec<u8>,
}

impl CompressedData {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let bit_count = self.bit_count as u64;
        writer.write_all(&bit_count.to_le_bytes())?;
        writer.write_all(&self.compressed_bits)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<CompressedData> {
        let mut bit_count_bytes = [0u8; 8];
        reader.read_exact(&mut bit_count_bytes)?;
        let bit_count = usize::try_from(u64::from_le_bytes(bit_count_bytes))
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "bit count overflows usize"))?;

        // the header is untrusted; only allocate what the reader actually holds
        let data_len = bit_count.div_ceil(8);
        let mut compressed_bits = Vec::new();
        reader
            .by_ref()
            .take(data_len as u64)
            .read_to_end(&mut compressed_bits)?;
        if compressed_bits.len() != data_len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes of bit data, found {}", data_len, compressed_bits.len()),
            ));
        }

        Ok(CompressedData {
            bit_count,
            compressed_bits,
        })
    }

    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(8 + self.compressed_bits.len());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn bits(&self) -> BitVec {
        BitVec::from((self.bit_count, self.compressed_bits.clone()))
    }
}

impl From<BitVec> for CompressedData {
    fn from(bits: BitVec) -> Self {
        CompressedData {
            bit_count: bits.bit_count(),
            compressed_bits: bits.as_bytes().to_vec(),
        }
    }
}
