use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::prediction_scheme::{
    check_component_slices, PredictionTransform, PredictionTransformType, TransformHeader,
};
use crate::prediction_scheme_normal_octahedron_transform_base::{
    NormalOctahedronTransformBase, OCTAHEDRON_NUM_COMPONENTS,
};
use crate::status::{DracoError, Status};
use crate::version::VERSION_OCTAHEDRON_CENTER_VALUE_DROPPED;

/// Residuals of octahedral normal coordinates.
///
/// Predictions outside the central diamond are folded into it together with
/// the original before the difference is taken, which keeps corrections small
/// across the seams of the unfolded octahedron. Corrections always lie in
/// `[0, max_quantized_value]`.
///
/// Header: `max_quantized_value: i32`. Streams older than 2.2 follow it with
/// an unused `center_value: i32`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalOctahedronTransform {
    base: NormalOctahedronTransformBase,
    num_components: usize,
}

impl NormalOctahedronTransform {
    /// Unconfigured transform; `decode_transform_data()` sets it up.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_quantized_value(max_quantized_value: i32) -> Result<Self, DracoError> {
        Ok(Self {
            base: NormalOctahedronTransformBase::with_max_quantized_value(max_quantized_value)?,
            num_components: OCTAHEDRON_NUM_COMPONENTS,
        })
    }

    pub fn base(&self) -> &NormalOctahedronTransformBase {
        &self.base
    }

    pub fn max_quantized_value(&self) -> i32 {
        self.base.max_quantized_value()
    }

    pub fn center_value(&self) -> i32 {
        self.base.center_value()
    }

    pub fn quantization_bits(&self) -> i32 {
        self.base.quantization_bits()
    }
}

impl PredictionTransform for NormalOctahedronTransform {
    type Value = i32;
    type Correction = i32;

    fn transform_type(&self) -> PredictionTransformType {
        PredictionTransformType::NormalOctahedron
    }

    fn init(&mut self, num_components: usize) -> Status {
        NormalOctahedronTransformBase::check_num_components(num_components)?;
        self.num_components = num_components;
        Ok(())
    }

    fn num_components(&self) -> usize {
        self.num_components
    }

    fn encode_transform_data(&self, buffer: &mut EncoderBuffer) -> Status {
        self.base.check_ready()?;
        buffer.encode(self.base.max_quantized_value())?;
        if buffer.is_version_before(VERSION_OCTAHEDRON_CENTER_VALUE_DROPPED) {
            buffer.encode(self.base.center_value())?;
        }
        Ok(())
    }

    fn decode_transform_data(&mut self, buffer: &mut DecoderBuffer<'_>) -> Status {
        let has_center_value = buffer.is_version_before(VERSION_OCTAHEDRON_CENTER_VALUE_DROPPED);
        self.base.decode_header(buffer, has_center_value)
    }

    fn compute_correction(
        &self,
        original_vals: &[i32],
        predicted_vals: &[i32],
        out_corr_vals: &mut [i32],
    ) -> Status {
        self.base.check_ready()?;
        check_component_slices(OCTAHEDRON_NUM_COMPONENTS, &[out_corr_vals.len()])?;
        let mut orig = self.base.centered(original_vals)?;
        let mut pred = self.base.centered(predicted_vals)?;

        if !self.base.is_in_diamond(pred) {
            orig = self.base.invert_diamond(orig)?;
            pred = self.base.invert_diamond(pred)?;
        }

        let corr = self.base.positive_difference(orig, pred);
        out_corr_vals[..OCTAHEDRON_NUM_COMPONENTS].copy_from_slice(&corr);
        Ok(())
    }

    fn compute_original_value(
        &self,
        predicted_vals: &[i32],
        corr_vals: &[i32],
        out_original_vals: &mut [i32],
    ) -> Status {
        self.base.check_ready()?;
        let mut pred = self.base.centered(predicted_vals)?;
        let corr = self.base.correction(corr_vals)?;

        let pred_is_in_diamond = self.base.is_in_diamond(pred);
        if !pred_is_in_diamond {
            pred = self.base.invert_diamond(pred)?;
        }
        let mut orig = self.base.wrapped_sum(pred, corr);
        if !pred_is_in_diamond {
            orig = self.base.invert_diamond(orig)?;
        }
        self.base.uncentered(orig, out_original_vals)
    }

    fn are_corrections_positive(&self) -> bool {
        true
    }

    fn header(&self) -> TransformHeader<i32> {
        TransformHeader::Octahedron {
            max_quantized_value: self.base.max_quantized_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correction(transform: &NormalOctahedronTransform, orig: [i32; 2], pred: [i32; 2]) -> [i32; 2] {
        let mut corr = [0; 2];
        transform.compute_correction(&orig, &pred, &mut corr).unwrap();
        corr
    }

    #[test]
    fn test_known_corrections() {
        let transform = NormalOctahedronTransform::with_max_quantized_value(15).unwrap();
        assert_eq!(transform.center_value(), 7);
        assert_eq!(correction(&transform, [7, 7], [7, 7]), [0, 0]);
        assert_eq!(correction(&transform, [8, 8], [8, 8]), [0, 0]);
        assert_eq!(correction(&transform, [10, 11], [8, 8]), [2, 3]);
        // Predictions outside the diamond fold both points first.
        assert_eq!(correction(&transform, [2, 6], [13, 13]), [8, 12]);
        assert_eq!(correction(&transform, [9, 4], [3, 8]), [6, 11]);
    }

    #[test]
    fn test_round_trip_over_canonical_coords() {
        let transform = NormalOctahedronTransform::with_max_quantized_value(15).unwrap();
        let tool_box = *transform.base().tool_box();
        let max = tool_box.max_value();
        for s in 0..=max {
            for t in 0..=max {
                let (os, ot) = tool_box.canonicalize_octahedral_coords(s, t);
                for ps in 0..=max {
                    for pt in 0..=max {
                        let corr = correction(&transform, [os, ot], [ps, pt]);
                        assert!(corr.iter().all(|&c| (0..=15).contains(&c)));
                        let mut out = [0; 2];
                        transform.compute_original_value(&[ps, pt], &corr, &mut out).unwrap();
                        assert_eq!(out, [os, ot], "pred ({}, {})", ps, pt);
                    }
                }
            }
        }
    }

    #[test]
    fn test_header_round_trip() {
        let transform = NormalOctahedronTransform::with_max_quantized_value(255).unwrap();
        let mut buffer = EncoderBuffer::new();
        transform.encode_transform_data(&mut buffer).unwrap();
        assert_eq!(buffer.data(), &255i32.to_le_bytes());

        let mut decoder_buffer = DecoderBuffer::new(buffer.data());
        let mut decoded = NormalOctahedronTransform::new();
        decoded.init(2).unwrap();
        decoded.decode_transform_data(&mut decoder_buffer).unwrap();
        assert_eq!(decoded.max_quantized_value(), 255);
        assert_eq!(decoded.quantization_bits(), 8);
        assert_eq!(decoded.center_value(), 127);
        assert_eq!(decoder_buffer.remaining_size(), 0);
    }

    #[test]
    fn test_legacy_header_carries_center_value() {
        let mut data = Vec::new();
        data.extend_from_slice(&31i32.to_le_bytes());
        data.extend_from_slice(&15i32.to_le_bytes());
        data.push(0xAB);

        let mut legacy = DecoderBuffer::with_version(&data, 2, 1);
        let mut transform = NormalOctahedronTransform::new();
        transform.decode_transform_data(&mut legacy).unwrap();
        assert_eq!(transform.max_quantized_value(), 31);
        assert_eq!(legacy.remaining_data(), &[0xAB]);

        let mut current = DecoderBuffer::with_version(&data, 2, 2);
        let mut transform = NormalOctahedronTransform::new();
        transform.decode_transform_data(&mut current).unwrap();
        assert_eq!(current.remaining_size(), 5);
    }

    #[test]
    fn test_legacy_encoder_writes_center_value() {
        let transform = NormalOctahedronTransform::with_max_quantized_value(31).unwrap();
        let mut buffer = EncoderBuffer::with_version(2, 1);
        transform.encode_transform_data(&mut buffer).unwrap();
        assert_eq!(&buffer.data()[..4], &31i32.to_le_bytes());
        assert_eq!(&buffer.data()[4..], &15i32.to_le_bytes());

        let mut decoder_buffer = DecoderBuffer::with_version(buffer.data(), 2, 1);
        let mut decoded = NormalOctahedronTransform::new();
        decoded.decode_transform_data(&mut decoder_buffer).unwrap();
        assert_eq!(decoded.max_quantized_value(), 31);
        assert_eq!(decoder_buffer.remaining_size(), 0);
    }

    #[test]
    fn test_rejected_headers() {
        for value in [0, 14, -3, i32::MAX, 1] {
            let bytes = value.to_le_bytes();
            let mut buffer = DecoderBuffer::new(&bytes);
            let mut transform = NormalOctahedronTransform::new();
            assert!(transform.decode_transform_data(&mut buffer).is_err(), "{}", value);
            assert!(!transform.base().is_initialized());
        }

        let mut buffer = DecoderBuffer::new(&[0x0F, 0x00]);
        let mut transform = NormalOctahedronTransform::new();
        assert!(matches!(
            transform.decode_transform_data(&mut buffer),
            Err(DracoError::BufferError(_))
        ));
    }

    #[test]
    fn test_uninitialized_transform_fails() {
        let transform = NormalOctahedronTransform::new();
        let mut corr = [0; 2];
        assert_eq!(
            transform.compute_correction(&[1, 1], &[1, 1], &mut corr),
            Err(DracoError::Uninitialized("normal octahedron transform"))
        );
        let mut buffer = EncoderBuffer::new();
        assert!(transform.encode_transform_data(&mut buffer).is_err());
    }

    #[test]
    fn test_corrupted_values_are_rejected() {
        let transform = NormalOctahedronTransform::with_max_quantized_value(15).unwrap();
        let mut out = [0; 2];
        assert!(matches!(
            transform.compute_original_value(&[3, 3], &[16, 0], &mut out),
            Err(DracoError::InvariantViolation(_))
        ));
        assert!(transform.compute_original_value(&[15, 3], &[0, 0], &mut out).is_err());
        let mut corr = [0; 2];
        assert!(transform.compute_correction(&[-1, 3], &[3, 3], &mut corr).is_err());
        assert!(transform.compute_correction(&[1, 3], &[3, 3], &mut corr[..1]).is_err());
    }

    #[test]
    fn test_init_requires_two_components() {
        let mut transform = NormalOctahedronTransform::new();
        assert!(transform.init(3).is_err());
        assert!(transform.init(2).is_ok());
        assert!(transform.are_corrections_positive());
        assert_eq!(transform.transform_type(), PredictionTransformType::NormalOctahedron);
    }
}
