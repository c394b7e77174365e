use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::normal_compression_utils::QuantizationParameters;
use crate::prediction_scheme::{PredictionTransform, PredictionTransformType, TransformHeader};
use crate::prediction_scheme_delta::DeltaTransform;
use crate::prediction_scheme_normal_octahedron_canonicalized_transform::NormalOctahedronCanonicalizedTransform;
use crate::prediction_scheme_normal_octahedron_transform::NormalOctahedronTransform;
use crate::prediction_scheme_wrap::WrapTransform;
use crate::status::{DracoError, Status};

/// Every transform a stream can select, over `i32` attribute values.
#[derive(Debug, Clone, Copy)]
pub enum PredictionTransformVariant {
    Delta(DeltaTransform<i32>),
    Wrap(WrapTransform<i32>),
    NormalOctahedron(NormalOctahedronTransform),
    NormalOctahedronCanonicalized(NormalOctahedronCanonicalizedTransform),
}

macro_rules! dispatch {
    ($self:expr, $transform:ident => $body:expr) => {
        match $self {
            PredictionTransformVariant::Delta($transform) => $body,
            PredictionTransformVariant::Wrap($transform) => $body,
            PredictionTransformVariant::NormalOctahedron($transform) => $body,
            PredictionTransformVariant::NormalOctahedronCanonicalized($transform) => $body,
        }
    };
}

impl PredictionTransformVariant {
    /// Creates an unconfigured transform. Its parameters are read later by
    /// `decode_transform_data()`.
    pub fn for_decoding(transform_type: PredictionTransformType) -> Self {
        match transform_type {
            PredictionTransformType::Delta => Self::Delta(DeltaTransform::new()),
            PredictionTransformType::Wrap => Self::Wrap(WrapTransform::new()),
            PredictionTransformType::NormalOctahedron => {
                Self::NormalOctahedron(NormalOctahedronTransform::new())
            }
            PredictionTransformType::NormalOctahedronCanonicalized => {
                Self::NormalOctahedronCanonicalized(NormalOctahedronCanonicalizedTransform::new())
            }
        }
    }

    /// Creates a decoder-side transform from its wire tag.
    pub fn from_tag(tag: u8) -> Result<Self, DracoError> {
        Ok(Self::for_decoding(PredictionTransformType::try_from(tag)?))
    }

    /// Creates an encoder-side transform. `quantization_bits` is the depth of
    /// the octahedral coordinates and only checked for the octahedron
    /// variants; the wrap bounds come from `init_from_values()`.
    pub fn for_encoding(
        transform_type: PredictionTransformType,
        quantization_bits: i32,
    ) -> Result<Self, DracoError> {
        let transform = match transform_type {
            PredictionTransformType::Delta | PredictionTransformType::Wrap => {
                Self::for_decoding(transform_type)
            }
            PredictionTransformType::NormalOctahedron => {
                let params = QuantizationParameters::from_bits(quantization_bits)?;
                Self::NormalOctahedron(NormalOctahedronTransform::with_max_quantized_value(
                    params.max_quantized_value(),
                )?)
            }
            PredictionTransformType::NormalOctahedronCanonicalized => {
                let params = QuantizationParameters::from_bits(quantization_bits)?;
                Self::NormalOctahedronCanonicalized(
                    NormalOctahedronCanonicalizedTransform::with_max_quantized_value(
                        params.max_quantized_value(),
                    )?,
                )
            }
        };
        Ok(transform)
    }
}

impl PredictionTransform for PredictionTransformVariant {
    type Value = i32;
    type Correction = i32;

    fn transform_type(&self) -> PredictionTransformType {
        dispatch!(self, t => t.transform_type())
    }

    fn init(&mut self, num_components: usize) -> Status {
        dispatch!(self, t => t.init(num_components))
    }

    fn init_from_values(&mut self, original_values: &[i32], num_components: usize) -> Status {
        dispatch!(self, t => t.init_from_values(original_values, num_components))
    }

    fn num_components(&self) -> usize {
        dispatch!(self, t => t.num_components())
    }

    fn encode_transform_data(&self, buffer: &mut EncoderBuffer) -> Status {
        dispatch!(self, t => t.encode_transform_data(buffer))
    }

    fn decode_transform_data(&mut self, buffer: &mut DecoderBuffer<'_>) -> Status {
        dispatch!(self, t => t.decode_transform_data(buffer))
    }

    fn compute_correction(
        &self,
        original_vals: &[i32],
        predicted_vals: &[i32],
        out_corr_vals: &mut [i32],
    ) -> Status {
        dispatch!(self, t => t.compute_correction(original_vals, predicted_vals, out_corr_vals))
    }

    fn compute_original_value(
        &self,
        predicted_vals: &[i32],
        corr_vals: &[i32],
        out_original_vals: &mut [i32],
    ) -> Status {
        dispatch!(self, t => t.compute_original_value(predicted_vals, corr_vals, out_original_vals))
    }

    fn are_corrections_positive(&self) -> bool {
        dispatch!(self, t => t.are_corrections_positive())
    }

    fn header(&self) -> TransformHeader<i32> {
        dispatch!(self, t => t.header())
    }
}
