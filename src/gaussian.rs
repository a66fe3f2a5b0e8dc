//! Gaussian blend weights
//!
//! Used to soften the edges of an actor's influence on the base layer:
//! a weight of 255 means "all actor color", 0 means "all base color".

/// Gaussian weight (0-255) at `distance` pixels from the peak.
///
/// `variance` controls the width of the bell (higher = wider blob) and
/// must be positive. `temporal` scales the whole curve (1.0 = untouched).
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn gaussian_weight(distance: i32, variance: f32, temporal: f32) -> u8 {
    debug_assert!(variance > 0.0, "variance must be positive");

    let x = distance as f32;
    let spatial = libm::expf(-(x * x) / (2.0 * variance));
    let weight = spatial * temporal * 255.0 + 0.5;

    weight.clamp(0.0, 255.0) as u8
}

/// Precomputed Gaussian curve over a fixed window of `LEN` pixels.
///
/// The table is centered: `table[LEN / 2]` is the peak (255) and values
/// decay toward the edges.
#[derive(Debug, Clone)]
pub struct GaussianBlendTable<const LEN: usize> {
    table: [u8; LEN],
    variance: f32,
}

impl<const LEN: usize> GaussianBlendTable<LEN> {
    /// Build a table for the given variance
    ///
    /// 2.5 gives a ~6-8 pixel visible blob, 5.0 roughly twice that.
    pub fn new(variance: f32) -> Self {
        let mut lut = Self {
            table: [0; LEN],
            variance,
        };
        lut.fill();
        lut
    }

    /// Recompute the curve if the variance changed
    #[allow(clippy::float_cmp)]
    pub fn compute(&mut self, variance: f32) {
        if variance == self.variance {
            return;
        }
        self.variance = variance;
        self.fill();
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn fill(&mut self) {
        let center = (LEN / 2) as i32;
        for (i, weight) in self.table.iter_mut().enumerate() {
            *weight = gaussian_weight(i as i32 - center, self.variance, 1.0);
        }
    }

    /// Blend factor at position `i` within the window
    #[inline]
    pub fn get(&self, i: usize) -> u8 {
        self.table[i]
    }

    pub const fn variance(&self) -> f32 {
        self.variance
    }

    pub const fn as_slice(&self) -> &[u8] {
        &self.table
    }
}
