//! Octahedral encoding of unit vectors.
//!
//! A unit vector is projected onto the L1 unit octahedron, whose two halves
//! are unfolded into a square of `(max_value + 1)^2` lattice points. The
//! upper hemisphere (`x >= 0`) fills the central diamond, the lower one the
//! four outer triangles. Fold and rotate helpers work on coordinates
//! centered at `(center_value, center_value)`.

use crate::status::{invalid_parameter, invariant_violation, DracoError, Status};

pub const MIN_QUANTIZATION_BITS: i32 = 2;
pub const MAX_QUANTIZATION_BITS: i32 = 30;

/// Constants derived from a quantization bit depth.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct QuantizationParameters {
    quantization_bits: i32,
    max_quantized_value: i32,
    max_value: i32,
    center_value: i32,
    dequantization_scale: f32,
}

impl QuantizationParameters {
    pub fn from_bits(q: i32) -> Result<Self, DracoError> {
        if !(MIN_QUANTIZATION_BITS..=MAX_QUANTIZATION_BITS).contains(&q) {
            return Err(invalid_parameter(format!(
                "quantization bits {} outside [{}, {}]",
                q, MIN_QUANTIZATION_BITS, MAX_QUANTIZATION_BITS
            )));
        }
        let max_quantized_value = (1 << q) - 1;
        let max_value = max_quantized_value - 1;
        Ok(Self {
            quantization_bits: q,
            max_quantized_value,
            max_value,
            center_value: max_value / 2,
            dequantization_scale: 2.0 / max_value as f32,
        })
    }

    pub fn quantization_bits(&self) -> i32 {
        self.quantization_bits
    }

    /// `2^bits - 1`, always odd.
    pub fn max_quantized_value(&self) -> i32 {
        self.max_quantized_value
    }

    /// `max_quantized_value - 1`, always even.
    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    pub fn center_value(&self) -> i32 {
        self.center_value
    }

    pub fn dequantization_scale(&self) -> f32 {
        self.dequantization_scale
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OctahedronToolBox {
    params: QuantizationParameters,
}

impl OctahedronToolBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quantization_bits(q: i32) -> Result<Self, DracoError> {
        Ok(Self {
            params: QuantizationParameters::from_bits(q)?,
        })
    }

    /// Fails for `q` outside `[2, 30]`, leaving the toolbox untouched.
    pub fn set_quantization_bits(&mut self, q: i32) -> Status {
        self.params = QuantizationParameters::from_bits(q)?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.params.quantization_bits != 0
    }

    pub fn parameters(&self) -> &QuantizationParameters {
        &self.params
    }

    pub fn quantization_bits(&self) -> i32 {
        self.params.quantization_bits
    }

    pub fn max_quantized_value(&self) -> i32 {
        self.params.max_quantized_value
    }

    pub fn max_value(&self) -> i32 {
        self.params.max_value
    }

    pub fn center_value(&self) -> i32 {
        self.params.center_value
    }

    fn check_initialized(&self) -> Status {
        if !self.is_initialized() {
            return Err(DracoError::Uninitialized("octahedron toolbox"));
        }
        Ok(())
    }

    /// Checks that `(s, t)` is a centered coordinate, i.e. both components
    /// lie in `[-center_value, center_value]`.
    pub fn check_centered(&self, s: i32, t: i32) -> Status {
        let c = self.params.center_value;
        if !(-c..=c).contains(&s) || !(-c..=c).contains(&t) {
            return Err(invariant_violation(format!(
                "centered coordinate ({}, {}) outside [-{}, {}]",
                s, t, c, c
            )));
        }
        Ok(())
    }

    /// Returns true if the centered point lies inside the central diamond.
    pub fn is_in_diamond(&self, s: i32, t: i32) -> bool {
        let st = s.unsigned_abs() as u64 + t.unsigned_abs() as u64;
        st <= self.params.center_value as u64
    }

    /// Mirrors a centered point across the diamond edge of its quadrant,
    /// mapping the outer triangles onto the diamond and back.
    pub fn invert_diamond(&self, s: i32, t: i32) -> Result<(i32, i32), DracoError> {
        self.check_centered(s, t)?;
        let c = self.params.center_value;

        let (sign_s, sign_t) = if s >= 0 && t >= 0 {
            (1, 1)
        } else if s <= 0 && t <= 0 {
            (-1, -1)
        } else {
            (if s > 0 { 1 } else { -1 }, if t > 0 { 1 } else { -1 })
        };

        let corner_s = sign_s * c;
        let corner_t = sign_t * c;
        let mut us = 2 * s - corner_s;
        let mut ut = 2 * t - corner_t;
        if sign_s * sign_t >= 0 {
            (us, ut) = (-ut, -us);
        } else {
            std::mem::swap(&mut us, &mut ut);
        }
        us += corner_s;
        ut += corner_t;

        // Both sums are even, the halving is exact.
        Ok((us / 2, ut / 2))
    }

    /// Maps a centered point to the opposite direction on the octahedron.
    pub fn invert_direction(&self, s: i32, t: i32) -> Result<(i32, i32), DracoError> {
        self.check_centered(s, t)?;
        self.invert_diamond(-s, -t)
    }

    /// Wraps `x` into `[-center_value, center_value]`.
    pub fn mod_max(&self, x: i32) -> i32 {
        if x > self.params.center_value {
            return x - self.params.max_quantized_value;
        }
        if x < -self.params.center_value {
            return x + self.params.max_quantized_value;
        }
        x
    }

    /// Shifts a difference in `[-2 * center_value, 2 * center_value]` into
    /// `[0, max_quantized_value]`.
    pub fn make_positive(&self, x: i32) -> i32 {
        if x < 0 {
            return x + self.params.max_quantized_value;
        }
        x
    }

    /// Resolves the periodic boundary of the unfolded octahedron so every
    /// direction has exactly one `(s, t)`.
    pub fn canonicalize_octahedral_coords(&self, s: i32, t: i32) -> (i32, i32) {
        let max = self.params.max_value;
        let c = self.params.center_value;
        if (s == 0 && t == 0) || (s == 0 && t == max) || (s == max && t == 0) {
            (max, max)
        } else if s == 0 && t > c {
            (s, c - (t - c))
        } else if s == max && t < c {
            (s, c + (c - t))
        } else if t == max && s < c {
            (c + (c - s), t)
        } else if t == 0 && s > c {
            (c - (s - c), t)
        } else {
            (s, t)
        }
    }

    /// Rescales an arbitrary integer vector onto the octahedron surface
    /// `|x| + |y| + |z| == center_value`. The zero vector maps to `+x`.
    pub fn canonicalize_integer_vector(&self, vec: &[i32; 3]) -> [i32; 3] {
        let c = self.params.center_value as i64;
        let abs_sum: i64 = vec.iter().map(|v| v.unsigned_abs() as i64).sum();
        if abs_sum == 0 {
            return [self.params.center_value, 0, 0];
        }
        let x = (vec[0] as i64 * c / abs_sum) as i32;
        let y = (vec[1] as i64 * c / abs_sum) as i32;
        let z = self.params.center_value - x.abs() - y.abs();
        [x, y, if vec[2] >= 0 { z } else { -z }]
    }

    /// Converts a point on the integer octahedron into canonical `(s, t)`.
    ///
    /// Fails unless `|x| + |y| + |z| == center_value`.
    pub fn integer_vector_to_quantized_octahedral_coords(
        &self,
        int_vec: &[i32; 3],
    ) -> Result<(i32, i32), DracoError> {
        self.check_initialized()?;
        let abs_sum: i64 = int_vec.iter().map(|v| v.unsigned_abs() as i64).sum();
        let c = self.params.center_value;
        if abs_sum != c as i64 {
            return Err(invariant_violation(format!(
                "integer vector {:?} has abs sum {}, expected {}",
                int_vec, abs_sum, c
            )));
        }

        let max = self.params.max_value;
        let (s, t) = if int_vec[0] >= 0 {
            (int_vec[1] + c, int_vec[2] + c)
        } else {
            let s = if int_vec[1] < 0 {
                int_vec[2].abs()
            } else {
                max - int_vec[2].abs()
            };
            let t = if int_vec[2] < 0 {
                int_vec[1].abs()
            } else {
                max - int_vec[1].abs()
            };
            (s, t)
        };
        Ok(self.canonicalize_octahedral_coords(s, t))
    }

    /// Quantizes a direction into canonical octahedral coordinates. Vectors
    /// too short to carry a direction are treated as `(1, 0, 0)`.
    pub fn float_vector_to_quantized_octahedral_coords(
        &self,
        vector: &[f32; 3],
    ) -> Result<(i32, i32), DracoError> {
        self.check_initialized()?;
        // f32 cannot represent center values past 2^24 exactly.
        let vector = vector.map(f64::from);
        let abs_sum = vector[0].abs() + vector[1].abs() + vector[2].abs();

        let scaled = if abs_sum > 1e-6 {
            let scale = 1.0 / abs_sum;
            [vector[0] * scale, vector[1] * scale, vector[2] * scale]
        } else {
            [1.0, 0.0, 0.0]
        };

        let c = self.params.center_value;
        let mut int_vec = [0i32; 3];
        int_vec[0] = ((scaled[0] * f64::from(c) + 0.5).floor() as i32).clamp(-c, c);
        int_vec[1] = (scaled[1] * f64::from(c) + 0.5).floor() as i32;
        int_vec[2] = c - int_vec[0].abs() - int_vec[1].abs();
        if int_vec[2] < 0 {
            // Rounding pushed |x| + |y| past the center value; shorten y.
            if int_vec[1] > 0 {
                int_vec[1] += int_vec[2];
            } else {
                int_vec[1] -= int_vec[2];
            }
            int_vec[2] = 0;
        }
        if scaled[2] < 0.0 {
            int_vec[2] = -int_vec[2];
        }

        self.integer_vector_to_quantized_octahedral_coords(&int_vec)
    }

    /// Inverse of the quantization: lattice point to unit vector.
    pub fn quantized_octahedral_coords_to_unit_vector(&self, s: i32, t: i32) -> [f32; 3] {
        let scale = self.params.dequantization_scale;
        octahedral_coords_to_unit_vector(s as f32 * scale - 1.0, t as f32 * scale - 1.0)
    }
}

/// Maps octahedral coordinates in `[-1, 1]^2` to a unit vector. Degenerate
/// inputs yield the zero vector.
pub fn octahedral_coords_to_unit_vector(s_scaled: f32, t_scaled: f32) -> [f32; 3] {
    let mut y = s_scaled;
    let mut z = t_scaled;
    let x = 1.0 - y.abs() - z.abs();

    // Outer triangles belong to the x < 0 hemisphere; fold them back.
    if x < 0.0 {
        let x_offset = -x;
        y += if y < 0.0 { x_offset } else { -x_offset };
        z += if z < 0.0 { x_offset } else { -x_offset };
    }

    let norm_squared = x * x + y * y + z * z;
    if norm_squared < 1e-6 {
        return [0.0, 0.0, 0.0];
    }
    let d = 1.0 / norm_squared.sqrt();
    [x * d, y * d, z * d]
}
