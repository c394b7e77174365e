//! Draco Prediction Transforms
//!
//! Attribute prediction transforms of the Draco geometry codec: octahedral
//! normal coding, wraparound residuals, and the little-endian buffers their
//! headers and corrections travel in.

// Component loops index several slices in lockstep.
#![allow(clippy::needless_range_loop)]

// =============================================================================
// Core modules
// =============================================================================

pub mod bit_utils;
pub mod draco_types;
pub mod normal_compression_utils;
pub mod status;
pub mod symbol_encoding;
pub mod version;

// =============================================================================
// Buffers
// =============================================================================

pub mod decoder_buffer;
pub mod encoder_buffer;

// =============================================================================
// Prediction transforms
// =============================================================================

pub mod prediction_scheme;
pub mod prediction_scheme_delta;
pub mod prediction_scheme_difference;
pub mod prediction_scheme_normal_octahedron_canonicalized_transform;
pub mod prediction_scheme_normal_octahedron_transform;
pub mod prediction_scheme_normal_octahedron_transform_base;
pub mod prediction_scheme_wrap;
pub mod prediction_transform;
pub mod transform_options;

// =============================================================================
// Re-exports
// =============================================================================

pub use decoder_buffer::DecoderBuffer;
pub use encoder_buffer::EncoderBuffer;
pub use normal_compression_utils::{OctahedronToolBox, QuantizationParameters};
pub use prediction_scheme::{PredictionTransform, PredictionTransformType, TransformHeader};
pub use prediction_scheme_delta::DeltaTransform;
pub use prediction_scheme_difference::{DifferencePredictionDecoder, DifferencePredictionEncoder};
pub use prediction_scheme_normal_octahedron_canonicalized_transform::NormalOctahedronCanonicalizedTransform;
pub use prediction_scheme_normal_octahedron_transform::NormalOctahedronTransform;
pub use prediction_scheme_wrap::WrapTransform;
pub use prediction_transform::PredictionTransformVariant;
pub use status::{DracoError, Status};
pub use transform_options::TransformOptions;
