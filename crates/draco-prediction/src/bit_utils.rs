//! Bit-level cursors shared by the encoder and decoder buffers.
//!
//! Bits are packed least-significant first within each byte.

/// Writes bits into a caller-owned byte slice.
pub struct BitEncoder<'a> {
    buffer: &'a mut [u8],
    bit_offset: usize,
}

impl<'a> BitEncoder<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::with_offset(buffer, 0)
    }

    /// Resumes writing at `bit_offset` bits into `buffer`.
    pub fn with_offset(buffer: &'a mut [u8], bit_offset: usize) -> Self {
        Self { buffer, bit_offset }
    }

    /// Writes the `nbits` least significant bits of `data`. Returns false if
    /// the slice is too short, in which case nothing is written.
    pub fn put_bits(&mut self, data: u32, nbits: u32) -> bool {
        if nbits > 32 || self.bit_offset + nbits as usize > self.buffer.len() * 8 {
            return false;
        }
        for i in 0..nbits {
            self.put_bit((data >> i) & 1);
        }
        true
    }

    fn put_bit(&mut self, bit: u32) {
        let byte_offset = self.bit_offset / 8;
        let bit_shift = self.bit_offset % 8;
        if bit != 0 {
            self.buffer[byte_offset] |= 1 << bit_shift;
        } else {
            self.buffer[byte_offset] &= !(1 << bit_shift);
        }
        self.bit_offset += 1;
    }

    pub fn bits(&self) -> usize {
        self.bit_offset
    }
}

/// Reads bits from a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct BitDecoder<'a> {
    buffer: &'a [u8],
    bit_offset: usize,
}

impl<'a> BitDecoder<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, bit_offset: 0 }
    }

    /// Reads `nbits` bits into the low bits of the result. On failure the
    /// cursor does not move.
    pub fn get_bits(&mut self, nbits: u32) -> Option<u32> {
        if nbits > 32 || self.bit_offset + nbits as usize > self.buffer.len() * 8 {
            return None;
        }
        let mut value = 0;
        for i in 0..nbits {
            let byte_offset = self.bit_offset / 8;
            let bit_shift = self.bit_offset % 8;
            let bit = ((self.buffer[byte_offset] >> bit_shift) & 1) as u32;
            value |= bit << i;
            self.bit_offset += 1;
        }
        Some(value)
    }

    pub fn bits_decoded(&self) -> usize {
        self.bit_offset
    }
}

/// Number of bits needed to represent `x` (0 for 0).
pub fn bits_required(x: u32) -> u32 {
    32 - x.leading_zeros()
}
