use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::normal_compression_utils::{MAX_QUANTIZATION_BITS, MIN_QUANTIZATION_BITS};
use crate::prediction_scheme::PredictionTransformType;
use crate::prediction_transform::PredictionTransformVariant;
use crate::status::{invalid_parameter, DracoError, Status};
use crate::version::{bitstream_version, DEFAULT_BITSTREAM_VERSION};

pub const DEFAULT_NORMAL_QUANTIZATION_BITS: i32 = 8;

/// Settings that pick and parameterize the transform of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    transform_type: PredictionTransformType,
    quantization_bits: i32,
    version: (u8, u8),
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            transform_type: PredictionTransformType::Wrap,
            quantization_bits: DEFAULT_NORMAL_QUANTIZATION_BITS,
            version: DEFAULT_BITSTREAM_VERSION,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for normals: canonicalized octahedron at 8 bits.
    pub fn for_normals() -> Self {
        Self {
            transform_type: PredictionTransformType::NormalOctahedronCanonicalized,
            ..Self::default()
        }
    }

    pub fn get_transform_type(&self) -> PredictionTransformType {
        self.transform_type
    }

    pub fn set_transform_type(&mut self, transform_type: PredictionTransformType) -> &mut Self {
        self.transform_type = transform_type;
        self
    }

    pub fn get_quantization_bits(&self) -> i32 {
        self.quantization_bits
    }

    pub fn set_quantization_bits(&mut self, quantization_bits: i32) -> &mut Self {
        self.quantization_bits = quantization_bits;
        self
    }

    pub fn get_version(&self) -> (u8, u8) {
        self.version
    }

    pub fn set_version(&mut self, major: u8, minor: u8) -> &mut Self {
        self.version = (major, minor);
        self
    }

    /// Checks the quantization depth of the octahedron variants and that the
    /// version is not newer than the one this crate writes.
    pub fn validate(&self) -> Status {
        let is_octahedron = matches!(
            self.transform_type,
            PredictionTransformType::NormalOctahedron
                | PredictionTransformType::NormalOctahedronCanonicalized
        );
        if is_octahedron
            && !(MIN_QUANTIZATION_BITS..=MAX_QUANTIZATION_BITS).contains(&self.quantization_bits)
        {
            tracing::warn!(
                quantization_bits = self.quantization_bits,
                "rejected transform options"
            );
            return Err(invalid_parameter(format!(
                "quantization bits {} outside [{}, {}]",
                self.quantization_bits, MIN_QUANTIZATION_BITS, MAX_QUANTIZATION_BITS
            )));
        }
        let (major, minor) = self.version;
        if bitstream_version(major, minor)
            > bitstream_version(DEFAULT_BITSTREAM_VERSION.0, DEFAULT_BITSTREAM_VERSION.1)
        {
            tracing::warn!(major, minor, "rejected transform options");
            return Err(invalid_parameter(format!(
                "unknown bitstream version {}.{}",
                major, minor
            )));
        }
        Ok(())
    }

    /// Validates the options and creates the encoder-side transform.
    pub fn build_transform(&self) -> Result<PredictionTransformVariant, DracoError> {
        self.validate()?;
        PredictionTransformVariant::for_encoding(self.transform_type, self.quantization_bits)
    }

    /// Empty encoder buffer that writes the layout of the configured version.
    pub fn encoder_buffer(&self) -> EncoderBuffer {
        EncoderBuffer::with_version(self.version.0, self.version.1)
    }

    /// Wraps `data` in a decoder buffer tagged with the configured version.
    pub fn decoder_buffer<'a>(&self, data: &'a [u8]) -> DecoderBuffer<'a> {
        DecoderBuffer::with_version(data, self.version.0, self.version.1)
    }
}
