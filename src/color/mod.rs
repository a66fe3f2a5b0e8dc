mod harmony;
mod utils;

use smart_leds::RGB8;
use smart_leds::hsv::Hsv as HSV;

pub use harmony::{ANGLE_WIDTH, ActorPalette, Harmony, PRIMARY_HUE_SAT, generate_spread, pick_color};
pub use utils::{BLACK, blend_colors, fill_solid, hsv, hsv2rgb};

pub type Rgb = RGB8;
pub type Hsv = HSV;
