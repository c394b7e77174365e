use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::prediction_scheme::{
    check_component_slices, PredictionTransform, PredictionTransformType, TransformHeader,
};
use crate::prediction_scheme_normal_octahedron_transform_base::{
    NormalOctahedronTransformBase, OCTAHEDRON_NUM_COMPONENTS,
};
use crate::status::{DracoError, Status};

/// Number of quarter turns that bring `pred` into the bottom-left quadrant.
pub fn get_rotation_count(pred: [i32; 2]) -> i32 {
    let [sign_x, sign_y] = pred;
    if sign_x == 0 {
        if sign_y == 0 {
            0
        } else if sign_y > 0 {
            3
        } else {
            1
        }
    } else if sign_x > 0 {
        if sign_y >= 0 {
            2
        } else {
            1
        }
    } else if sign_y <= 0 {
        0
    } else {
        3
    }
}

/// Rotates `p` clockwise by `rotation_count` quarter turns. Counts outside
/// `1..=3` leave the point unchanged.
pub fn rotate_point(p: [i32; 2], rotation_count: i32) -> [i32; 2] {
    match rotation_count {
        1 => [p[1], -p[0]],
        2 => [-p[0], -p[1]],
        3 => [-p[1], p[0]],
        _ => p,
    }
}

pub fn is_in_bottom_left(p: [i32; 2]) -> bool {
    if p[0] == 0 && p[1] == 0 {
        return true;
    }
    p[0] < 0 && p[1] <= 0
}

/// Octahedron transform that also rotates each folded prediction into the
/// bottom-left quadrant, so the corrections of all four quadrants share one
/// distribution.
///
/// Header: `max_quantized_value: i32`, `center_value: i32`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalOctahedronCanonicalizedTransform {
    base: NormalOctahedronTransformBase,
    num_components: usize,
}

impl NormalOctahedronCanonicalizedTransform {
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

impl PredictionTransform for NormalOctahedronCanonicalizedTransform {
    type Value = i32;
    type Correction = i32;

    fn transform_type(&self) -> PredictionTransformType {
        PredictionTransformType::NormalOctahedronCanonicalized
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
        buffer.encode(self.base.center_value())
    }

    fn decode_transform_data(&mut self, buffer: &mut DecoderBuffer<'_>) -> Status {
        self.base.decode_header(buffer, true)
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
        if !is_in_bottom_left(pred) {
            let rotation_count = get_rotation_count(pred);
            orig = rotate_point(orig, rotation_count);
            pred = rotate_point(pred, rotation_count);
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
        let pred_is_in_bottom_left = is_in_bottom_left(pred);
        let rotation_count = get_rotation_count(pred);
        if !pred_is_in_bottom_left {
            pred = rotate_point(pred, rotation_count);
        }

        let mut orig = self.base.wrapped_sum(pred, corr);
        if !pred_is_in_bottom_left {
            orig = rotate_point(orig, (4 - rotation_count) % 4);
        }
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

    fn correction(
        transform: &NormalOctahedronCanonicalizedTransform,
        orig: [i32; 2],
        pred: [i32; 2],
    ) -> [i32; 2] {
        let mut corr = [0; 2];
        transform.compute_correction(&orig, &pred, &mut corr).unwrap();
        corr
    }

    fn original(
        transform: &NormalOctahedronCanonicalizedTransform,
        pred: [i32; 2],
        corr: [i32; 2],
    ) -> [i32; 2] {
        let mut out = [0; 2];
        transform.compute_original_value(&pred, &corr, &mut out).unwrap();
        out
    }

    #[test]
    fn test_rotation_count() {
        assert_eq!(get_rotation_count([1, 2]), 2);
        assert_eq!(get_rotation_count([-1, 2]), 3);
        assert_eq!(get_rotation_count([1, -2]), 1);
        assert_eq!(get_rotation_count([-1, -2]), 0);
        assert_eq!(get_rotation_count([0, 2]), 3);
        assert_eq!(get_rotation_count([0, -2]), 1);
        assert_eq!(get_rotation_count([2, 0]), 2);
        assert_eq!(get_rotation_count([-2, 0]), 0);
        assert_eq!(get_rotation_count([0, 0]), 0);
    }

    #[test]
    fn test_rotation_lands_in_bottom_left() {
        for x in -4..=4 {
            for y in -4..=4 {
                let rotated = rotate_point([x, y], get_rotation_count([x, y]));
                assert!(is_in_bottom_left(rotated), "({}, {}) -> {:?}", x, y, rotated);
            }
        }
    }

    #[test]
    fn test_rotate_point() {
        assert_eq!(rotate_point([1, 2], 0), [1, 2]);
        assert_eq!(rotate_point([1, 2], 1), [2, -1]);
        assert_eq!(rotate_point([1, 2], 2), [-1, -2]);
        assert_eq!(rotate_point([1, 2], 3), [-2, 1]);
        for n in 0..4 {
            assert_eq!(rotate_point(rotate_point([3, -5], n), (4 - n) % 4), [3, -5]);
        }
    }

    #[test]
    fn test_is_in_bottom_left() {
        assert!(is_in_bottom_left([0, 0]));
        assert!(is_in_bottom_left([-1, 0]));
        assert!(is_in_bottom_left([-1, -1]));
        assert!(is_in_bottom_left([-7, -7]));
        assert!(!is_in_bottom_left([0, -1]));
        assert!(!is_in_bottom_left([-1, 1]));
        assert!(!is_in_bottom_left([1, 0]));
    }

    #[test]
    fn test_known_corrections() {
        let transform = NormalOctahedronCanonicalizedTransform::with_max_quantized_value(15).unwrap();
        assert_eq!(correction(&transform, [7, 7], [7, 7]), [0, 0]);
        assert_eq!(correction(&transform, [8, 8], [8, 8]), [0, 0]);
        assert_eq!(correction(&transform, [10, 11], [8, 8]), [13, 12]);
        assert_eq!(correction(&transform, [2, 6], [13, 13]), [7, 3]);
        assert_eq!(correction(&transform, [9, 4], [3, 8]), [4, 6]);
    }

    #[test]
    fn test_decode_with_ten_bit_normals() {
        let transform = NormalOctahedronCanonicalizedTransform::with_max_quantized_value(1023).unwrap();
        assert_eq!(transform.center_value(), 511);
        assert_eq!(original(&transform, [0, 0], [511, 511]), [511, 511]);
        assert_eq!(original(&transform, [511, 511], [511, 511]), [1022, 1022]);
        assert_eq!(original(&transform, [1022, 1022], [511, 0]), [1022, 511]);
        assert_eq!(correction(&transform, [1022, 511], [1022, 1022]), [511, 0]);
    }

    #[test]
    fn test_round_trip_over_canonical_coords() {
        let transform = NormalOctahedronCanonicalizedTransform::with_max_quantized_value(31).unwrap();
        let tool_box = *transform.base().tool_box();
        let max = tool_box.max_value();
        for s in 0..=max {
            for t in 0..=max {
                let orig = {
                    let (os, ot) = tool_box.canonicalize_octahedral_coords(s, t);
                    [os, ot]
                };
                for ps in (0..=max).step_by(3) {
                    for pt in 0..=max {
                        let corr = correction(&transform, orig, [ps, pt]);
                        assert!(corr.iter().all(|&c| (0..=31).contains(&c)));
                        assert_eq!(original(&transform, [ps, pt], corr), orig);
                    }
                }
            }
        }
    }

    #[test]
    fn test_header_keeps_center_value() {
        let transform = NormalOctahedronCanonicalizedTransform::with_max_quantized_value(63).unwrap();
        let mut buffer = EncoderBuffer::new();
        transform.encode_transform_data(&mut buffer).unwrap();
        assert_eq!(buffer.size(), 8);
        assert_eq!(&buffer.data()[4..], &31i32.to_le_bytes());

        for (major, minor) in [(2, 1), (2, 2)] {
            let mut decoder_buffer = DecoderBuffer::with_version(buffer.data(), major, minor);
            let mut decoded = NormalOctahedronCanonicalizedTransform::new();
            decoded.decode_transform_data(&mut decoder_buffer).unwrap();
            assert_eq!(decoded.max_quantized_value(), 63);
            assert_eq!(decoder_buffer.remaining_size(), 0);
        }
    }

    #[test]
    fn test_truncated_header() {
        let mut decoder_buffer = DecoderBuffer::new(&[0x3F, 0, 0, 0, 0x1F]);
        let mut decoded = NormalOctahedronCanonicalizedTransform::new();
        assert!(matches!(
            decoded.decode_transform_data(&mut decoder_buffer),
            Err(DracoError::BufferError(_))
        ));
    }
}
