// Copyright 2022 The Draco Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::bit_utils::BitEncoder;
use crate::draco_types::{BufferValue, MAX_BUFFER_VALUE_SIZE};
use crate::status::{DracoError, Status};
use crate::version::{version_less_than, DEFAULT_BITSTREAM_VERSION, VERSION_VARINT_BIT_SEQUENCE_SIZE};

/// Append-only output buffer, the writing counterpart of `DecoderBuffer`.
/// Supports both byte-aligned and bit-level encoding. Writes the layout of
/// the bitstream version it is tagged with, 2.2 unless told otherwise.
#[derive(Debug, Clone)]
pub struct EncoderBuffer {
    buffer: Vec<u8>,

    /// Active bit sequence, if any
    bit_sequence: Option<BitSequence>,

    version_major: u8,
    version_minor: u8,
}

#[derive(Debug, Clone, Copy)]
struct BitSequence {
    /// First byte reserved for the bit data
    start_byte_offset: usize,

    /// Bits written so far
    bit_offset: usize,

    /// Whether the byte size is written in front of the sequence
    encode_size: bool,
}

impl Default for EncoderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderBuffer {
    pub fn new() -> Self {
        Self::with_version(DEFAULT_BITSTREAM_VERSION.0, DEFAULT_BITSTREAM_VERSION.1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Creates a buffer that writes the layout of version `major.minor`.
    pub fn with_version(major: u8, minor: u8) -> Self {
        Self {
            buffer: Vec::new(),
            bit_sequence: None,
            version_major: major,
            version_minor: minor,
        }
    }

    pub fn set_version(&mut self, major: u8, minor: u8) {
        self.version_major = major;
        self.version_minor = minor;
    }

    pub fn version_major(&self) -> u8 {
        self.version_major
    }

    pub fn version_minor(&self) -> u8 {
        self.version_minor
    }

    /// Returns true if the target stream version is older than `target`.
    pub fn is_version_before(&self, target: (u8, u8)) -> bool {
        version_less_than(self.version_major, self.version_minor, target)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.bit_sequence = None;
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Consumes the buffer and returns the encoded bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.buffer
    }

    pub fn bit_encoder_active(&self) -> bool {
        self.bit_sequence.is_some()
    }

    fn check_byte_mode(&self) -> Status {
        if self.bit_encoder_active() {
            return Err(DracoError::BufferError(
                "Cannot encode byte-aligned data during bit encoding".into(),
            ));
        }
        Ok(())
    }

    /// Appends a fixed-width value in little-endian order.
    pub fn encode<T: BufferValue>(&mut self, value: T) -> Status {
        self.check_byte_mode()?;
        let mut bytes = [0u8; MAX_BUFFER_VALUE_SIZE];
        value.write_le(&mut bytes[..T::SIZE]);
        self.buffer.extend_from_slice(&bytes[..T::SIZE]);
        Ok(())
    }

    /// Appends raw bytes.
    pub fn encode_bytes(&mut self, data: &[u8]) -> Status {
        self.check_byte_mode()?;
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Appends an unsigned LEB128 varint.
    pub fn encode_varint(&mut self, value: u64) -> Status {
        self.check_byte_mode()?;
        push_varint(&mut self.buffer, value);
        Ok(())
    }

    /// Starts a bit sequence of at most `required_bits` bits.
    ///
    /// With `encode_size` the byte size of the finished sequence is written
    /// in front of it by `end_bit_encoding()`: a fixed `u64` for versions
    /// older than 2.2, a varint otherwise.
    pub fn start_bit_encoding(&mut self, required_bits: usize, encode_size: bool) -> Status {
        self.check_byte_mode()?;
        let start_byte_offset = self.buffer.len();
        self.buffer.resize(start_byte_offset + (required_bits + 7) / 8, 0);
        self.bit_sequence = Some(BitSequence {
            start_byte_offset,
            bit_offset: 0,
            encode_size,
        });
        Ok(())
    }

    /// Encodes the `nbits` (0-32) least significant bits of `value`.
    pub fn encode_least_significant_bits32(&mut self, nbits: u32, value: u32) -> Status {
        if nbits > 32 {
            return Err(DracoError::BufferError(format!(
                "Cannot encode {} bits at once",
                nbits
            )));
        }
        let Some(sequence) = self.bit_sequence.as_mut() else {
            return Err(DracoError::BufferError("Bit encoder not active".into()));
        };
        let mut encoder = BitEncoder::with_offset(
            &mut self.buffer[sequence.start_byte_offset..],
            sequence.bit_offset,
        );
        if !encoder.put_bits(value, nbits) {
            return Err(DracoError::BufferError(
                "Bit sequence exceeds reserved space".into(),
            ));
        }
        sequence.bit_offset = encoder.bits();
        Ok(())
    }

    /// Ends the bit sequence, dropping unused reserved bytes.
    pub fn end_bit_encoding(&mut self) {
        let Some(sequence) = self.bit_sequence.take() else {
            return;
        };
        let encoded_bytes = (sequence.bit_offset + 7) / 8;
        self.buffer
            .truncate(sequence.start_byte_offset + encoded_bytes);
        if sequence.encode_size {
            let mut size = Vec::new();
            if self.is_version_before(VERSION_VARINT_BIT_SEQUENCE_SIZE) {
                size.extend_from_slice(&(encoded_bytes as u64).to_le_bytes());
            } else {
                push_varint(&mut size, encoded_bytes as u64);
            }
            let at = sequence.start_byte_offset;
            self.buffer.splice(at..at, size);
        }
    }
}

fn push_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}
