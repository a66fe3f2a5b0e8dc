pub use smart_leds::hsv::hsv2rgb;

use crate::{
    color::{Hsv, Rgb},
    math8::blend8,
};

/// All channels off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Shorthand for building an [`Hsv`] value on the 0-255 hue circle
#[inline]
pub const fn hsv(hue: u8, sat: u8, val: u8) -> Hsv {
    Hsv { hue, sat, val }
}

/// Fill every LED of the slice with one color
pub fn fill_solid(leds: &mut [Rgb], color: Rgb) {
    for led in leds {
        *led = color;
    }
}

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}
