use crate::bit_utils::BitDecoder;
use crate::draco_types::BufferValue;
use crate::status::{DracoError, Status};
use crate::version::{
    bitstream_version, version_less_than, DEFAULT_BITSTREAM_VERSION,
    VERSION_VARINT_BIT_SEQUENCE_SIZE,
};

/// Input buffer for reading compressed Draco data.
///
/// `DecoderBuffer` is a non-owning cursor over an immutable byte slice. It
/// reads either byte-aligned values or, between `start_bit_decoding()` and
/// `end_bit_decoding()`, individual bits. A failed read never moves the
/// cursor.
///
/// # Example
///
/// ```
/// use draco_prediction::DecoderBuffer;
///
/// let data = [0x0F, 0x00, 0x00, 0x00, 0x2A];
/// let mut buffer = DecoderBuffer::new(&data);
///
/// assert_eq!(buffer.decode::<i32>().unwrap(), 15);
/// assert_eq!(buffer.peek::<u8>().unwrap(), 42);
/// assert_eq!(buffer.remaining_size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
    bit_decoder: Option<BitDecoder<'a>>,
    version_major: u8,
    version_minor: u8,
}

impl<'a> DecoderBuffer<'a> {
    /// Creates a buffer that assumes the latest bitstream version.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_version(data, DEFAULT_BITSTREAM_VERSION.0, DEFAULT_BITSTREAM_VERSION.1)
    }

    /// Creates a buffer for a stream written with version `major.minor`.
    pub fn with_version(data: &'a [u8], major: u8, minor: u8) -> Self {
        Self {
            data,
            pos: 0,
            bit_decoder: None,
            version_major: major,
            version_minor: minor,
        }
    }

    /// Sets the Draco bitstream version for version-dependent decoding.
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

    /// Returns `(major << 8) | minor`.
    pub fn bitstream_version(&self) -> u16 {
        bitstream_version(self.version_major, self.version_minor)
    }

    /// Returns true if the stream version is older than `target`.
    pub fn is_version_before(&self, target: (u8, u8)) -> bool {
        version_less_than(self.version_major, self.version_minor, target)
    }

    /// Returns the current read position in bytes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining in the buffer.
    pub fn remaining_size(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns the unread part of the buffer without advancing.
    pub fn remaining_data(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn bit_decoder_active(&self) -> bool {
        self.bit_decoder.is_some()
    }

    fn check_byte_mode(&self) -> Status {
        if self.bit_decoder_active() {
            return Err(DracoError::BufferError(
                "Cannot decode bytes while bit decoding is active".into(),
            ));
        }
        Ok(())
    }

    fn byte_range(&self, size: usize) -> Result<&'a [u8], DracoError> {
        self.check_byte_mode()?;
        if size > self.remaining_size() {
            return Err(DracoError::BufferError(format!(
                "Unexpected end of buffer: need {} bytes, have {}",
                size,
                self.remaining_size()
            )));
        }
        Ok(&self.data[self.pos..self.pos + size])
    }

    /// Decodes a fixed-width little-endian value and advances.
    pub fn decode<T: BufferValue>(&mut self) -> Result<T, DracoError> {
        let value = self.peek::<T>()?;
        self.pos += T::SIZE;
        Ok(value)
    }

    /// Decodes a fixed-width little-endian value without advancing.
    pub fn peek<T: BufferValue>(&self) -> Result<T, DracoError> {
        let bytes = self.byte_range(T::SIZE)?;
        Ok(T::read_le(bytes))
    }

    /// Fills `out` with the next `out.len()` bytes and advances.
    pub fn decode_bytes(&mut self, out: &mut [u8]) -> Status {
        self.peek_bytes(out)?;
        self.pos += out.len();
        Ok(())
    }

    /// Fills `out` with the next `out.len()` bytes without advancing.
    pub fn peek_bytes(&self, out: &mut [u8]) -> Status {
        let bytes = self.byte_range(out.len())?;
        out.copy_from_slice(bytes);
        Ok(())
    }

    /// Skips `n` bytes.
    pub fn advance(&mut self, n: usize) -> Status {
        self.byte_range(n)?;
        self.pos += n;
        Ok(())
    }

    /// Decodes an unsigned LEB128 varint.
    pub fn decode_varint(&mut self) -> Result<u64, DracoError> {
        self.check_byte_mode()?;
        let mut val = 0u64;
        let mut shift = 0u32;
        let mut cursor = self.pos;
        loop {
            let Some(&b) = self.data.get(cursor) else {
                return Err(DracoError::BufferError(
                    "Unexpected end of buffer inside varint".into(),
                ));
            };
            cursor += 1;
            if shift >= 64 || (shift == 63 && (b & 0x7F) > 1) {
                return Err(DracoError::BufferError("Varint exceeds 64 bits".into()));
            }
            val |= ((b & 0x7F) as u64) << shift;
            if (b & 0x80) == 0 {
                break;
            }
            shift += 7;
        }
        self.pos = cursor;
        Ok(val)
    }

    /// Starts bit-level decoding mode.
    ///
    /// When `decode_size` is true the byte size of the bit sequence is read
    /// first: a fixed `u64` for streams older than v2.2, a varint otherwise.
    /// The bit cursor is then limited to that many bytes. Without a size the
    /// bit cursor spans the rest of the buffer. Returns the decoded size (0
    /// when no size was read).
    pub fn start_bit_decoding(&mut self, decode_size: bool) -> Result<u64, DracoError> {
        if self.bit_decoder_active() {
            return Err(DracoError::BufferError("Bit decoding already active".into()));
        }
        let start = self.pos;
        let mut size_bytes = 0u64;
        if decode_size {
            size_bytes = if self.is_version_before(VERSION_VARINT_BIT_SEQUENCE_SIZE) {
                self.decode::<u64>()?
            } else {
                self.decode_varint()?
            };
            if size_bytes > self.remaining_size() as u64 {
                let remaining = self.remaining_size();
                self.pos = start;
                return Err(DracoError::BufferError(format!(
                    "Bit sequence of {} bytes exceeds remaining {} bytes",
                    size_bytes, remaining
                )));
            }
        }
        let end = if decode_size {
            self.pos + size_bytes as usize
        } else {
            self.data.len()
        };
        self.bit_decoder = Some(BitDecoder::new(&self.data[self.pos..end]));
        Ok(size_bytes)
    }

    /// Decodes up to 32 bits, least significant bit first.
    pub fn decode_least_significant_bits32(&mut self, nbits: u32) -> Result<u32, DracoError> {
        if nbits > 32 {
            return Err(DracoError::BufferError(format!(
                "Cannot decode {} bits at once",
                nbits
            )));
        }
        let Some(decoder) = self.bit_decoder.as_mut() else {
            return Err(DracoError::BufferError("Bit decoding not active".into()));
        };
        decoder
            .get_bits(nbits)
            .ok_or_else(|| DracoError::BufferError("Unexpected end of bit stream".into()))
    }

    /// Leaves bit mode. Byte decoding resumes at the first byte after the
    /// last consumed bit.
    pub fn end_bit_decoding(&mut self) {
        if let Some(decoder) = self.bit_decoder.take() {
            self.pos += (decoder.bits_decoded() + 7) / 8;
        }
    }
}
