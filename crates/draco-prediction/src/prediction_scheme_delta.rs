use std::marker::PhantomData;

use num_traits::{PrimInt, WrappingAdd, WrappingSub};

use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::prediction_scheme::{
    check_component_slices, PredictionTransform, PredictionTransformType, TransformHeader,
};
use crate::status::Status;

/// Plain difference between original and predicted values. Carries no
/// header. Arithmetic wraps, so the round trip holds for every input.
#[derive(Debug, Clone, Copy)]
pub struct DeltaTransform<T> {
    num_components: usize,
    _marker: PhantomData<T>,
}

impl<T> Default for DeltaTransform<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeltaTransform<T> {
    pub fn new() -> Self {
        Self {
            num_components: 0,
            _marker: PhantomData,
        }
    }
}

impl<T> PredictionTransform for DeltaTransform<T>
where
    T: PrimInt + WrappingAdd + WrappingSub,
{
    type Value = T;
    type Correction = T;

    fn transform_type(&self) -> PredictionTransformType {
        PredictionTransformType::Delta
    }

    fn init(&mut self, num_components: usize) -> Status {
        self.num_components = num_components;
        Ok(())
    }

    fn num_components(&self) -> usize {
        self.num_components
    }

    fn encode_transform_data(&self, _buffer: &mut EncoderBuffer) -> Status {
        Ok(())
    }

    fn decode_transform_data(&mut self, _buffer: &mut DecoderBuffer<'_>) -> Status {
        Ok(())
    }

    fn compute_correction(&self, original_vals: &[T], predicted_vals: &[T], out_corr_vals: &mut [T]) -> Status {
        check_component_slices(
            self.num_components,
            &[original_vals.len(), predicted_vals.len(), out_corr_vals.len()],
        )?;
        for i in 0..self.num_components {
            out_corr_vals[i] = original_vals[i].wrapping_sub(&predicted_vals[i]);
        }
        Ok(())
    }

    fn compute_original_value(&self, predicted_vals: &[T], corr_vals: &[T], out_original_vals: &mut [T]) -> Status {
        check_component_slices(
            self.num_components,
            &[predicted_vals.len(), corr_vals.len(), out_original_vals.len()],
        )?;
        for i in 0..self.num_components {
            out_original_vals[i] = predicted_vals[i].wrapping_add(&corr_vals[i]);
        }
        Ok(())
    }

    fn header(&self) -> TransformHeader<T> {
        TransformHeader::None
    }
}
