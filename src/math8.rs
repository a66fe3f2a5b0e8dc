/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16; // a * 65536
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    ); // (b - a) * amount_of_b * 257
    partial = partial.wrapping_add(0x8000); // + 32768 for rounding

    (partial >> 16) as u8
}

/// Re-map a number from one range to another (integer, truncating).
///
/// Same contract as the classic microcontroller `map()`: no clamping,
/// division truncates toward zero.
#[inline]
pub const fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Wrap any signed angle into `0..360` degrees
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn wrap_degrees(degrees: i32) -> u16 {
    degrees.rem_euclid(360) as u16
}

/// Convert a hue in degrees to the 0-255 hue circle used by [`crate::Hsv`]
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn hue8(degrees: i32) -> u8 {
    map_range(wrap_degrees(degrees) as i32, 0, 360, 0, 255) as u8
}

/// Interpolate linearly between `from` (at 0%) and `to` (at 100%).
///
/// `percent` is clamped to 0-100. Works for ascending and descending ranges.
#[inline]
pub const fn lerp_percent(from: i32, to: i32, percent: u8) -> i32 {
    let percent = if percent > 100 { 100 } else { percent as i32 };
    from + (to - from) * percent / 100
}
