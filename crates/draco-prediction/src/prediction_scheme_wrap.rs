use std::fmt::Debug;

use num_traits::{PrimInt, Signed};

use crate::decoder_buffer::DecoderBuffer;
use crate::draco_types::BufferValue;
use crate::encoder_buffer::EncoderBuffer;
use crate::prediction_scheme::{
    check_component_slices, PredictionTransform, PredictionTransformType, TransformHeader,
};
use crate::status::{invalid_parameter, invariant_violation, DracoError, Status};

/// Upper bound on the components of a wrapped attribute value.
pub const MAX_NUM_COMPONENTS: usize = 16;

/// Signed integer types the wrap transform can operate on.
pub trait WrapValue: PrimInt + Signed + BufferValue + Debug {}

impl<T> WrapValue for T where T: PrimInt + Signed + BufferValue + Debug {}

/// Wraps corrections into half of the attribute's value range.
///
/// With the attribute bounded by `[min_value, max_value]`, any residual can
/// be replaced by one in `[min_correction, max_correction]` that differs by a
/// multiple of `max_dif = max_value - min_value + 1`. Header:
/// `min_value: T`, `max_value: T`.
#[derive(Debug, Clone, Copy)]
pub struct WrapTransform<T> {
    num_components: usize,
    min_value: T,
    max_value: T,
    max_dif: T,
    max_correction: T,
    min_correction: T,
    bounds_initialized: bool,
}

impl<T: WrapValue> Default for WrapTransform<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WrapValue> WrapTransform<T> {
    pub fn new() -> Self {
        Self {
            num_components: 0,
            min_value: T::zero(),
            max_value: T::zero(),
            max_dif: T::zero(),
            max_correction: T::zero(),
            min_correction: T::zero(),
            bounds_initialized: false,
        }
    }

    /// Creates a transform for values in `[min_value, max_value]`.
    pub fn with_bounds(min_value: T, max_value: T) -> Result<Self, DracoError> {
        let mut transform = Self::new();
        transform.set_bounds(min_value, max_value)?;
        Ok(transform)
    }

    pub fn min_value(&self) -> T {
        self.min_value
    }

    pub fn max_value(&self) -> T {
        self.max_value
    }

    pub fn max_dif(&self) -> T {
        self.max_dif
    }

    pub fn min_correction(&self) -> T {
        self.min_correction
    }

    pub fn max_correction(&self) -> T {
        self.max_correction
    }

    /// Sets the value range and derives the correction bounds. Fails if
    /// `max_value < min_value` or `max_value - min_value + 1` overflows `T`.
    pub fn set_bounds(&mut self, min_value: T, max_value: T) -> Status {
        if max_value < min_value {
            return Err(invalid_parameter(format!(
                "wrap bounds [{:?}, {:?}] are inverted",
                min_value, max_value
            )));
        }
        let max_dif = max_value
            .checked_sub(&min_value)
            .and_then(|dif| dif.checked_add(&T::one()))
            .ok_or_else(|| {
                invalid_parameter(format!(
                    "wrap range [{:?}, {:?}] overflows the value type",
                    min_value, max_value
                ))
            })?;

        let two = T::one() + T::one();
        let half = max_dif / two;
        self.min_value = min_value;
        self.max_value = max_value;
        self.max_dif = max_dif;
        self.min_correction = -half;
        self.max_correction = if max_dif % two == T::zero() {
            half - T::one()
        } else {
            half
        };
        self.bounds_initialized = true;
        Ok(())
    }

    fn check_bounds(&self) -> Status {
        if !self.bounds_initialized {
            return Err(DracoError::Uninitialized("wrap transform bounds"));
        }
        Ok(())
    }

    /// Adds a correction to a clamped prediction and wraps the sum back into
    /// `[min_value, max_value]`. The sum may leave the range of `T` on wide
    /// bounds; the overflowing cases are resolved without forming it.
    fn wrapped_value(&self, pred: T, corr: T) -> Result<T, DracoError> {
        if corr < self.min_correction || corr > self.max_correction {
            return Err(invariant_violation(format!(
                "wrap correction {:?} outside [{:?}, {:?}]",
                corr, self.min_correction, self.max_correction
            )));
        }
        let value = match pred.checked_add(&corr) {
            Some(sum) if sum > self.max_value => sum - self.max_dif,
            Some(sum) if sum < self.min_value => sum + self.max_dif,
            Some(sum) => sum,
            // Past T::MAX, hence past max_value.
            None if corr > T::zero() => pred - (self.max_dif - corr),
            // Below T::MIN, hence below min_value.
            None => pred + (corr + self.max_dif),
        };
        Ok(value)
    }

    /// Clamps each predicted component into `[min_value, max_value]`.
    fn clamp_predicted_value(&self, predicted_vals: &[T]) -> [T; MAX_NUM_COMPONENTS] {
        let mut clamped = [T::zero(); MAX_NUM_COMPONENTS];
        for (out, &pred) in clamped.iter_mut().zip(&predicted_vals[..self.num_components]) {
            *out = pred.max(self.min_value).min(self.max_value);
        }
        clamped
    }
}

impl<T: WrapValue> PredictionTransform for WrapTransform<T> {
    type Value = T;
    type Correction = T;

    fn transform_type(&self) -> PredictionTransformType {
        PredictionTransformType::Wrap
    }

    fn init(&mut self, num_components: usize) -> Status {
        if num_components > MAX_NUM_COMPONENTS {
            return Err(invalid_parameter(format!(
                "wrap transform supports at most {} components, got {}",
                MAX_NUM_COMPONENTS, num_components
            )));
        }
        self.num_components = num_components;
        Ok(())
    }

    /// Takes the bounds from the minimum and maximum of `original_values`.
    /// An empty attribute gets the range `[0, 0]`.
    fn init_from_values(&mut self, original_values: &[T], num_components: usize) -> Status {
        self.init(num_components)?;
        let mut values = original_values.iter().copied();
        let (min_value, max_value) = match values.next() {
            Some(first) => values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))),
            None => (T::zero(), T::zero()),
        };
        self.set_bounds(min_value, max_value)
    }

    fn num_components(&self) -> usize {
        self.num_components
    }

    fn encode_transform_data(&self, buffer: &mut EncoderBuffer) -> Status {
        self.check_bounds()?;
        buffer.encode(self.min_value)?;
        buffer.encode(self.max_value)?;
        Ok(())
    }

    fn decode_transform_data(&mut self, buffer: &mut DecoderBuffer<'_>) -> Status {
        let mut cursor = buffer.clone();
        let min_value = cursor.decode::<T>()?;
        let max_value = cursor.decode::<T>()?;
        if let Err(err) = self.set_bounds(min_value, max_value) {
            tracing::warn!(?min_value, ?max_value, "rejected wrap transform header");
            return Err(err);
        }
        *buffer = cursor;
        tracing::debug!(?min_value, ?max_value, "decoded wrap transform header");
        Ok(())
    }

    fn compute_correction(&self, original_vals: &[T], predicted_vals: &[T], out_corr_vals: &mut [T]) -> Status {
        self.check_bounds()?;
        check_component_slices(
            self.num_components,
            &[original_vals.len(), predicted_vals.len(), out_corr_vals.len()],
        )?;
        let clamped = self.clamp_predicted_value(predicted_vals);
        for i in 0..self.num_components {
            let orig = original_vals[i];
            if orig < self.min_value || orig > self.max_value {
                return Err(invariant_violation(format!(
                    "value {:?} outside wrap bounds [{:?}, {:?}]",
                    orig, self.min_value, self.max_value
                )));
            }
            // Both operands lie in the bounds, so the difference fits in T.
            let mut corr = orig - clamped[i];
            if corr < self.min_correction {
                corr = corr + self.max_dif;
            } else if corr > self.max_correction {
                corr = corr - self.max_dif;
            }
            out_corr_vals[i] = corr;
        }
        Ok(())
    }

    fn compute_original_value(&self, predicted_vals: &[T], corr_vals: &[T], out_original_vals: &mut [T]) -> Status {
        self.check_bounds()?;
        check_component_slices(
            self.num_components,
            &[predicted_vals.len(), corr_vals.len(), out_original_vals.len()],
        )?;
        let clamped = self.clamp_predicted_value(predicted_vals);
        for i in 0..self.num_components {
            out_original_vals[i] = self.wrapped_value(clamped[i], corr_vals[i])?;
        }
        Ok(())
    }

    fn header(&self) -> TransformHeader<T> {
        TransformHeader::Wrap {
            min_value: self.min_value,
            max_value: self.max_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_bounds_odd_range() {
        let transform = WrapTransform::<i32>::with_bounds(0, 14).unwrap();
        assert_eq!(transform.max_dif(), 15);
        assert_eq!(transform.min_correction(), -7);
        assert_eq!(transform.max_correction(), 7);
    }

    #[test]
    fn test_correction_bounds_even_range() {
        let transform = WrapTransform::<i32>::with_bounds(-3, 12).unwrap();
        assert_eq!(transform.max_dif(), 16);
        assert_eq!(transform.min_correction(), -8);
        assert_eq!(transform.max_correction(), 7);
    }

    #[test]
    fn test_corrections_stay_in_half_range() {
        let mut transform = WrapTransform::<i32>::with_bounds(0, 14).unwrap();
        transform.init(1).unwrap();
        for orig in 0..=14 {
            for pred in -5..=20 {
                let mut corr = [0];
                transform.compute_correction(&[orig], &[pred], &mut corr).unwrap();
                assert!((-7..=7).contains(&corr[0]), "orig {} pred {}", orig, pred);

                let mut out = [0];
                transform.compute_original_value(&[pred], &corr, &mut out).unwrap();
                assert_eq!(out[0], orig);
            }
        }
    }

    fn round_trip<T: WrapValue>(transform: &WrapTransform<T>, orig: T, pred: T) -> (T, T) {
        let mut corr = [T::zero()];
        transform.compute_correction(&[orig], &[pred], &mut corr).unwrap();
        let mut out = [T::zero()];
        transform.compute_original_value(&[pred], &corr, &mut out).unwrap();
        (corr[0], out[0])
    }

    #[test]
    fn test_sum_past_type_max_wraps_back() {
        let mut transform = WrapTransform::<i32>::with_bounds(1, i32::MAX).unwrap();
        transform.init(1).unwrap();
        assert_eq!(round_trip(&transform, 1, i32::MAX), (1, 1));
        assert_eq!(round_trip(&transform, i32::MAX, 1), (-1, i32::MAX));

        let mut transform = WrapTransform::<i8>::with_bounds(0, 126).unwrap();
        transform.init(1).unwrap();
        assert_eq!(round_trip(&transform, 62, 126), (63, 62));
        assert_eq!(round_trip(&transform, 64, 0), (-63, 64));
    }

    #[test]
    fn test_wide_i8_bounds_round_trip_every_value() {
        for (min_value, max_value) in [(-63i8, 63i8), (0, 126), (-127, -1), (1, 127), (-128, -2)] {
            let mut transform = WrapTransform::<i8>::with_bounds(min_value, max_value).unwrap();
            transform.init(1).unwrap();
            for orig in min_value..=max_value {
                for pred in i8::MIN..=i8::MAX {
                    let (corr, out) = round_trip(&transform, orig, pred);
                    assert!(corr >= transform.min_correction() && corr <= transform.max_correction());
                    assert_eq!(out, orig, "bounds [{}, {}] pred {}", min_value, max_value, pred);
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let mut transform = WrapTransform::<i32>::with_bounds(0, 14).unwrap();
        transform.init(1).unwrap();
        let mut corr = [0];
        assert!(matches!(
            transform.compute_correction(&[15], &[3], &mut corr),
            Err(DracoError::InvariantViolation(_))
        ));
        let mut out = [0];
        for bad in [8, -8, i32::MAX, i32::MIN] {
            assert!(matches!(
                transform.compute_original_value(&[3], &[bad], &mut out),
                Err(DracoError::InvariantViolation(_))
            ));
        }
    }

    #[test]
    fn test_init_from_values() {
        let mut transform = WrapTransform::<i32>::new();
        transform.init_from_values(&[5, -2, 9, 3, 0, 1], 2).unwrap();
        assert_eq!(transform.min_value(), -2);
        assert_eq!(transform.max_value(), 9);
        assert_eq!(transform.num_components(), 2);

        transform.init_from_values(&[], 2).unwrap();
        assert_eq!(transform.header(), TransformHeader::Wrap { min_value: 0, max_value: 0 });
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(WrapTransform::<i32>::with_bounds(5, 4).is_err());
        assert!(WrapTransform::<i32>::with_bounds(i32::MIN, i32::MAX).is_err());
        assert!(WrapTransform::<i32>::with_bounds(0, i32::MAX).is_err());
        assert!(WrapTransform::<i32>::with_bounds(1, i32::MAX).is_ok());
        assert!(WrapTransform::<i8>::with_bounds(-63, 63).is_ok());
        assert!(WrapTransform::<i8>::with_bounds(-64, 63).is_err());
    }

    #[test]
    fn test_too_many_components() {
        let mut transform = WrapTransform::<i32>::new();
        assert!(transform.init(MAX_NUM_COMPONENTS).is_ok());
        assert!(transform.init(MAX_NUM_COMPONENTS + 1).is_err());
    }

    #[test]
    fn test_uninitialized_bounds() {
        let mut transform = WrapTransform::<i32>::new();
        transform.init(1).unwrap();
        let mut out = [0];
        assert!(matches!(
            transform.compute_original_value(&[0], &[0], &mut out),
            Err(DracoError::Uninitialized(_))
        ));
        assert!(transform.encode_transform_data(&mut EncoderBuffer::new()).is_err());
    }

    #[test]
    fn test_header_round_trip() {
        let mut transform = WrapTransform::<i32>::new();
        transform.init_from_values(&[-100, 250, 7], 1).unwrap();
        let mut buffer = EncoderBuffer::new();
        transform.encode_transform_data(&mut buffer).unwrap();
        assert_eq!(buffer.data(), &[0x9C, 0xFF, 0xFF, 0xFF, 0xFA, 0x00, 0x00, 0x00]);

        let mut decoded = WrapTransform::<i32>::new();
        decoded.init(1).unwrap();
        let data = buffer.into_data();
        decoded
            .decode_transform_data(&mut DecoderBuffer::new(&data))
            .unwrap();
        assert_eq!(decoded.header(), transform.header());
        assert_eq!(decoded.max_dif(), 351);
    }

    #[test]
    fn test_decode_rejects_inverted_header() {
        let mut data = Vec::new();
        data.extend_from_slice(&10i32.to_le_bytes());
        data.extend_from_slice(&(-10i32).to_le_bytes());
        let mut transform = WrapTransform::<i32>::new();
        assert!(matches!(
            transform.decode_transform_data(&mut DecoderBuffer::new(&data)),
            Err(DracoError::InvalidParameter(_))
        ));
        assert!(transform
            .decode_transform_data(&mut DecoderBuffer::new(&data[..6]))
            .is_err());
    }

    #[test]
    fn test_corrupted_correction_does_not_panic() {
        let mut transform = WrapTransform::<i32>::with_bounds(-10, 10).unwrap();
        transform.init(2).unwrap();
        let mut out = [0; 2];
        transform
            .compute_original_value(&[i32::MAX, i32::MIN], &[i32::MAX, i32::MIN], &mut out)
            .unwrap();
    }
}
