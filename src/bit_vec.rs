/// Growable bit buffer, packed MSB-first into bytes.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn extend_bits<I: IntoIterator<Item = bool>>(&mut self, bits: I) {
        for bit in bits {
            self.push_bit(bit);
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        let byte = self.bits[index / 8];
        Some(byte & (1 << (7 - index % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).filter_map(move |i| self.get(i))
    }

    pub fn reader(&self) -> BitReader<'_> {
        BitReader::new(self)
    }
}

impl From<(usize, Vec<u8>)> for BitVec {
    /// Wraps already-packed bytes; bits past `bit_count` are ignored.
    fn from((bit_count, bits): (usize, Vec<u8>)) -> Self {
        let bit_count = bit_count.min(bits.len() * 8);
        BitVec { bits, bit_count }
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitVec::new();
        bits.extend_bits(iter);
        bits
    }
}

/// Pull-based, sequential source of bits.
pub trait BitSource {
    fn has_next_bit(&mut self) -> bool;

    /// Returns the next bit, or `None` once the source is exhausted.
    fn next_bit(&mut self) -> Option<bool>;
}

/// Reads a [`BitVec`] front to back.
#[derive(Debug)]
pub struct BitReader<'a> {
    bits: &'a BitVec,
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a BitVec) -> Self {
        BitReader { bits, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl BitSource for BitReader<'_> {
    fn has_next_bit(&mut self) -> bool {
        self.position < self.bits.bit_count()
    }

    fn next_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.position)?;
        self.position += 1;
        Some(bit)
    }
}

/// Adapts any `bool` iterator into a [`BitSource`].
#[derive(Debug)]
pub struct IterBits<I: Iterator<Item = bool>> {
    inner: std::iter::Peekable<I>,
}

impl<I: Iterator<Item = bool>> IterBits<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(bits: T) -> Self {
        IterBits { inner: bits.into_iter().peekable() }
    }
}

impl<I: Iterator<Item = bool>> BitSource for IterBits<I> {
    fn has_next_bit(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    fn next_bit(&mut self) -> Option<bool> {
        self.inner.next()
    }
}
