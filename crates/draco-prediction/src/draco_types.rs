//! Fixed-width values that can be stored in Draco buffers.
//!
//! The reference encoder copied values in host byte order. This crate pins
//! the layout to little-endian, which is what every mainstream target
//! produced in practice.

use byteorder::{ByteOrder, LittleEndian};

/// Largest `BufferValue::SIZE`.
pub const MAX_BUFFER_VALUE_SIZE: usize = 8;

/// A plain value with a fixed little-endian wire layout.
pub trait BufferValue: Copy {
    const SIZE: usize;

    /// Reads the value from the first `SIZE` bytes of `bytes`.
    fn read_le(bytes: &[u8]) -> Self;

    /// Writes the value into the first `SIZE` bytes of `out`.
    fn write_le(self, out: &mut [u8]);
}

impl BufferValue for u8 {
    const SIZE: usize = 1;

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0]
    }

    fn write_le(self, out: &mut [u8]) {
        out[0] = self;
    }
}

impl BufferValue for i8 {
    const SIZE: usize = 1;

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }

    fn write_le(self, out: &mut [u8]) {
        out[0] = self as u8;
    }
}

macro_rules! impl_buffer_value {
    ($ty:ty, $read:ident, $write:ident) => {
        impl BufferValue for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn read_le(bytes: &[u8]) -> Self {
                LittleEndian::$read(bytes)
            }

            fn write_le(self, out: &mut [u8]) {
                LittleEndian::$write(out, self)
            }
        }
    };
}

impl_buffer_value!(u16, read_u16, write_u16);
impl_buffer_value!(i16, read_i16, write_i16);
impl_buffer_value!(u32, read_u32, write_u32);
impl_buffer_value!(i32, read_i32, write_i32);
impl_buffer_value!(u64, read_u64, write_u64);
impl_buffer_value!(i64, read_i64, write_i64);
impl_buffer_value!(f32, read_f32, write_f32);
impl_buffer_value!(f64, read_f64, write_f64);
