use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::status::{invariant_violation, DracoError, Status};

/// Wire tags of the prediction transforms, as stored in the attribute
/// header of a Draco stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionTransformType {
    Delta = 0,
    Wrap = 1,
    NormalOctahedron = 2,
    NormalOctahedronCanonicalized = 3,
}

impl TryFrom<u8> for PredictionTransformType {
    type Error = DracoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PredictionTransformType::Delta),
            1 => Ok(PredictionTransformType::Wrap),
            2 => Ok(PredictionTransformType::NormalOctahedron),
            3 => Ok(PredictionTransformType::NormalOctahedronCanonicalized),
            _ => Err(DracoError::UnsupportedTransform(value)),
        }
    }
}

impl From<PredictionTransformType> for u8 {
    fn from(value: PredictionTransformType) -> Self {
        value as u8
    }
}

/// The per-attribute record a transform writes before any correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformHeader<T> {
    /// Transforms without parameters.
    None,
    /// Both normal-octahedron variants.
    Octahedron { max_quantized_value: i32 },
    Wrap { min_value: T, max_value: T },
}

/// Shared operations of every prediction transform.
///
/// Encoders call `init_from_values()`, `encode_transform_data()` and then
/// `compute_correction()` once per value; decoders call `init()`,
/// `decode_transform_data()` and then `compute_original_value()`. For any
/// `original` and `predicted` in the transform's domain,
/// `compute_original_value(predicted, compute_correction(original, predicted))`
/// yields `original` again.
pub trait PredictionTransform {
    type Value: Copy;
    type Correction: Copy;

    fn transform_type(&self) -> PredictionTransformType;

    fn init(&mut self, num_components: usize) -> Status;

    /// Encoder-side initialization with access to the whole attribute.
    fn init_from_values(&mut self, original_values: &[Self::Value], num_components: usize) -> Status {
        let _ = original_values;
        self.init(num_components)
    }

    fn num_components(&self) -> usize;

    fn encode_transform_data(&self, buffer: &mut EncoderBuffer) -> Status;

    fn decode_transform_data(&mut self, buffer: &mut DecoderBuffer<'_>) -> Status;

    fn compute_correction(
        &self,
        original_vals: &[Self::Value],
        predicted_vals: &[Self::Value],
        out_corr_vals: &mut [Self::Correction],
    ) -> Status;

    fn compute_original_value(
        &self,
        predicted_vals: &[Self::Value],
        corr_vals: &[Self::Correction],
        out_original_vals: &mut [Self::Value],
    ) -> Status;

    /// Returns true if corrections never go negative, so the entropy stage
    /// can skip the signed-to-symbol conversion.
    fn are_corrections_positive(&self) -> bool {
        false
    }

    fn header(&self) -> TransformHeader<Self::Value>;
}

/// Fails if any of the slices holds fewer than `num_components` entries.
pub(crate) fn check_component_slices(num_components: usize, lengths: &[usize]) -> Status {
    if let Some(len) = lengths.iter().find(|&&len| len < num_components) {
        return Err(invariant_violation(format!(
            "value slice of length {} is shorter than {} components",
            len, num_components
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_type_tags() {
        for tag in 0u8..4 {
            let ty = PredictionTransformType::try_from(tag).unwrap();
            assert_eq!(u8::from(ty), tag);
        }
        assert_eq!(
            PredictionTransformType::try_from(4),
            Err(DracoError::UnsupportedTransform(4))
        );
        assert_eq!(
            PredictionTransformType::try_from(255),
            Err(DracoError::UnsupportedTransform(255))
        );
    }

    #[test]
    fn test_check_component_slices() {
        assert!(check_component_slices(2, &[2, 3, 2]).is_ok());
        assert!(check_component_slices(0, &[]).is_ok());
        assert!(matches!(
            check_component_slices(3, &[3, 1]),
            Err(DracoError::InvariantViolation(_))
        ));
    }
}
