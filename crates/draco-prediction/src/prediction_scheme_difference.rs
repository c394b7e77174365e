use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::prediction_scheme::{PredictionTransform, PredictionTransformType};
use crate::status::{invalid_parameter, Status};

fn check_attribute_layout(num_values: usize, num_components: usize, out_len: usize) -> Status {
    if num_components == 0 || num_values % num_components != 0 {
        return Err(invalid_parameter(format!(
            "{} values do not split into entries of {} components",
            num_values, num_components
        )));
    }
    if out_len < num_values {
        return Err(invalid_parameter(format!(
            "output holds {} values, need {}",
            out_len, num_values
        )));
    }
    Ok(())
}

/// Predicts every entry from the one before it. The first entry is
/// predicted from zeros.
pub struct DifferencePredictionEncoder<T> {
    transform: T,
}

impl<T> DifferencePredictionEncoder<T>
where
    T: PredictionTransform,
    T::Value: Default,
{
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn transform_type(&self) -> PredictionTransformType {
        self.transform.transform_type()
    }

    pub fn are_corrections_positive(&self) -> bool {
        self.transform.are_corrections_positive()
    }

    /// Initializes the transform from `in_data` and writes one correction per
    /// value into `out_corr`.
    pub fn compute_correction_values(
        &mut self,
        in_data: &[T::Value],
        out_corr: &mut [T::Correction],
        num_components: usize,
    ) -> Status {
        check_attribute_layout(in_data.len(), num_components, out_corr.len())?;
        self.transform.init_from_values(in_data, num_components)?;

        let zero_vals = vec![T::Value::default(); num_components];
        let mut predicted: &[T::Value] = &zero_vals;
        for (original, corr) in in_data
            .chunks_exact(num_components)
            .zip(out_corr.chunks_exact_mut(num_components))
        {
            self.transform.compute_correction(original, predicted, corr)?;
            predicted = original;
        }
        Ok(())
    }

    pub fn encode_prediction_data(&self, buffer: &mut EncoderBuffer) -> Status {
        self.transform.encode_transform_data(buffer)
    }
}

/// Inverse of [`DifferencePredictionEncoder`].
pub struct DifferencePredictionDecoder<T> {
    transform: T,
}

impl<T> DifferencePredictionDecoder<T>
where
    T: PredictionTransform,
    T::Value: Default,
{
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn transform_type(&self) -> PredictionTransformType {
        self.transform.transform_type()
    }

    pub fn are_corrections_positive(&self) -> bool {
        self.transform.are_corrections_positive()
    }

    pub fn decode_prediction_data(&mut self, buffer: &mut DecoderBuffer<'_>) -> Status {
        self.transform.decode_transform_data(buffer)
    }

    /// Rebuilds the attribute front to back from `in_corr`.
    pub fn compute_original_values(
        &mut self,
        in_corr: &[T::Correction],
        out_data: &mut [T::Value],
        num_components: usize,
    ) -> Status {
        check_attribute_layout(in_corr.len(), num_components, out_data.len())?;
        self.transform.init(num_components)?;

        let zero_vals = vec![T::Value::default(); num_components];
        for (i, corr) in in_corr.chunks_exact(num_components).enumerate() {
            let start = i * num_components;
            let (decoded, rest) = out_data.split_at_mut(start);
            let predicted = if i == 0 {
                &zero_vals[..]
            } else {
                &decoded[start - num_components..]
            };
            self.transform
                .compute_original_value(predicted, corr, &mut rest[..num_components])?;
        }
        Ok(())
    }
}
