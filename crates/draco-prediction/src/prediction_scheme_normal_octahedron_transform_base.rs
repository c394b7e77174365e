use crate::bit_utils::bits_required;
use crate::decoder_buffer::DecoderBuffer;
use crate::normal_compression_utils::OctahedronToolBox;
use crate::prediction_scheme::check_component_slices;
use crate::status::{invalid_parameter, invariant_violation, DracoError, Status};

/// Octahedral coordinates always have two components.
pub const OCTAHEDRON_NUM_COMPONENTS: usize = 2;

/// State shared by both normal-octahedron transforms: the toolbox for the
/// stream's quantization and the validation of per-value inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalOctahedronTransformBase {
    octahedron_tool_box: OctahedronToolBox,
}

impl NormalOctahedronTransformBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_quantized_value(max_quantized_value: i32) -> Result<Self, DracoError> {
        let mut base = Self::new();
        base.set_max_quantized_value(max_quantized_value)?;
        Ok(base)
    }

    /// Accepts odd values only; the quantization depth is the bit length of
    /// `max_quantized_value` and must land in `[2, 30]`.
    pub fn set_max_quantized_value(&mut self, max_quantized_value: i32) -> Status {
        if max_quantized_value <= 0 || max_quantized_value % 2 == 0 {
            return Err(invalid_parameter(format!(
                "max quantized value {} must be positive and odd",
                max_quantized_value
            )));
        }
        let quantization_bits = bits_required(max_quantized_value as u32) as i32;
        self.octahedron_tool_box.set_quantization_bits(quantization_bits)
    }

    /// Reads `max_quantized_value` and, when `has_center_value` is set, the
    /// unused `center_value` that follows it. The cursor only moves when the
    /// whole header is read and accepted.
    pub fn decode_header(&mut self, buffer: &mut DecoderBuffer<'_>, has_center_value: bool) -> Status {
        let mut cursor = buffer.clone();
        let max_quantized_value = cursor.decode::<i32>()?;
        if has_center_value {
            let _center_value = cursor.decode::<i32>()?;
        }
        if let Err(err) = self.set_max_quantized_value(max_quantized_value) {
            tracing::warn!(max_quantized_value, "rejected normal octahedron transform header");
            return Err(err);
        }
        *buffer = cursor;
        tracing::debug!(
            max_quantized_value,
            quantization_bits = self.quantization_bits(),
            "decoded normal octahedron transform header"
        );
        Ok(())
    }

    pub fn tool_box(&self) -> &OctahedronToolBox {
        &self.octahedron_tool_box
    }

    pub fn is_initialized(&self) -> bool {
        self.octahedron_tool_box.is_initialized()
    }

    pub fn max_quantized_value(&self) -> i32 {
        self.octahedron_tool_box.max_quantized_value()
    }

    pub fn center_value(&self) -> i32 {
        self.octahedron_tool_box.center_value()
    }

    pub fn quantization_bits(&self) -> i32 {
        self.octahedron_tool_box.quantization_bits()
    }

    pub fn check_num_components(num_components: usize) -> Status {
        if num_components != OCTAHEDRON_NUM_COMPONENTS {
            return Err(invalid_parameter(format!(
                "octahedral coordinates have {} components, got {}",
                OCTAHEDRON_NUM_COMPONENTS, num_components
            )));
        }
        Ok(())
    }

    /// Fails until a valid `max_quantized_value` has been set.
    pub fn check_ready(&self) -> Status {
        if !self.is_initialized() {
            return Err(DracoError::Uninitialized("normal octahedron transform"));
        }
        Ok(())
    }

    /// Validates an `(s, t)` pair in `[0, max_value]` and returns it centered.
    pub fn centered(&self, vals: &[i32]) -> Result<[i32; 2], DracoError> {
        check_component_slices(OCTAHEDRON_NUM_COMPONENTS, &[vals.len()])?;
        let max = self.octahedron_tool_box.max_value();
        if !(0..=max).contains(&vals[0]) || !(0..=max).contains(&vals[1]) {
            return Err(invariant_violation(format!(
                "octahedral coordinate ({}, {}) outside [0, {}]",
                vals[0], vals[1], max
            )));
        }
        let c = self.center_value();
        Ok([vals[0] - c, vals[1] - c])
    }

    /// Validates a stored correction pair in `[0, max_quantized_value]`.
    pub fn correction(&self, vals: &[i32]) -> Result<[i32; 2], DracoError> {
        check_component_slices(OCTAHEDRON_NUM_COMPONENTS, &[vals.len()])?;
        let max = self.max_quantized_value();
        if !(0..=max).contains(&vals[0]) || !(0..=max).contains(&vals[1]) {
            return Err(invariant_violation(format!(
                "correction ({}, {}) outside [0, {}]",
                vals[0], vals[1], max
            )));
        }
        Ok([vals[0], vals[1]])
    }

    /// Folds a centered point from an outer triangle into the diamond or
    /// back.
    pub fn invert_diamond(&self, p: [i32; 2]) -> Result<[i32; 2], DracoError> {
        let (s, t) = self.octahedron_tool_box.invert_diamond(p[0], p[1])?;
        Ok([s, t])
    }

    pub fn is_in_diamond(&self, p: [i32; 2]) -> bool {
        self.octahedron_tool_box.is_in_diamond(p[0], p[1])
    }

    /// Difference of two centered points, shifted to be non-negative.
    pub fn positive_difference(&self, orig: [i32; 2], pred: [i32; 2]) -> [i32; 2] {
        let tb = &self.octahedron_tool_box;
        [
            tb.make_positive(orig[0] - pred[0]),
            tb.make_positive(orig[1] - pred[1]),
        ]
    }

    /// Adds a correction to a centered prediction, wrapping the sum back
    /// onto the lattice.
    pub fn wrapped_sum(&self, pred: [i32; 2], corr: [i32; 2]) -> [i32; 2] {
        let tb = &self.octahedron_tool_box;
        [tb.mod_max(pred[0] + corr[0]), tb.mod_max(pred[1] + corr[1])]
    }

    pub fn uncentered(&self, p: [i32; 2], out: &mut [i32]) -> Status {
        check_component_slices(OCTAHEDRON_NUM_COMPONENTS, &[out.len()])?;
        let c = self.center_value();
        out[0] = p[0] + c;
        out[1] = p[1] + c;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_max_quantized_value() {
        let base = NormalOctahedronTransformBase::with_max_quantized_value(15).unwrap();
        assert_eq!(base.quantization_bits(), 4);
        assert_eq!(base.center_value(), 7);
        assert_eq!(base.max_quantized_value(), 15);

        let base = NormalOctahedronTransformBase::with_max_quantized_value(1023).unwrap();
        assert_eq!(base.quantization_bits(), 10);
    }

    #[test]
    fn test_odd_value_rounds_up_to_bit_depth() {
        let base = NormalOctahedronTransformBase::with_max_quantized_value(11).unwrap();
        assert_eq!(base.quantization_bits(), 4);
        assert_eq!(base.max_quantized_value(), 15);
    }

    #[test]
    fn test_rejected_max_quantized_values() {
        for value in [0, 1, 2, 14, -1, -15, i32::MAX] {
            assert!(
                NormalOctahedronTransformBase::with_max_quantized_value(value).is_err(),
                "{} should be rejected",
                value
            );
        }
        assert!(NormalOctahedronTransformBase::with_max_quantized_value((1 << 30) - 1).is_ok());
    }

    #[test]
    fn test_value_validation() {
        let base = NormalOctahedronTransformBase::with_max_quantized_value(15).unwrap();
        assert_eq!(base.centered(&[0, 14]).unwrap(), [-7, 7]);
        assert!(base.centered(&[15, 0]).is_err());
        assert!(base.centered(&[0, -1]).is_err());
        assert!(base.centered(&[3]).is_err());
        assert_eq!(base.correction(&[15, 0]).unwrap(), [15, 0]);
        assert!(base.correction(&[16, 0]).is_err());
        assert!(base.correction(&[0, -1]).is_err());
    }

    #[test]
    fn test_uninitialized() {
        let base = NormalOctahedronTransformBase::new();
        assert!(matches!(base.check_ready(), Err(DracoError::Uninitialized(_))));
    }
}
