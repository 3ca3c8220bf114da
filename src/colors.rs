use crossterm::style::Color;
use serde::{Deserialize, Serialize};

/// A 24-bit color, kept separate from crossterm so tree data can be serialized
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn to_color(self) -> Color {
        Color::Rgb { r: self.0, g: self.1, b: self.2 }
    }

    /// Blend toward the (black) terminal background by `alpha` in [0, 1].
    pub fn fade(self, alpha: f64) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f64 * a).round() as u8;
        Rgb(scale(self.0), scale(self.1), scale(self.2))
    }
}

/// Hearts and particles share this palette
pub const HEART_PALETTE: [Rgb; 4] = [
    Rgb(0xff, 0x17, 0x44), // #ff1744
    Rgb(0xff, 0x40, 0x81), // #ff4081
    Rgb(0xf5, 0x00, 0x57), // #f50057
    Rgb(0xff, 0x80, 0xab), // #ff80ab
];

pub const BARK: Rgb = Rgb(0x5d, 0x40, 0x37);
pub const SOIL: Rgb = Rgb(0x3d, 0x28, 0x17);

// Text colors
pub const QUOTE: Color = Color::Rgb { r: 0xff, g: 0xcd, b: 0xd2 };
pub const QUOTE_ARROW: Color = Color::Rgb { r: 0xff, g: 0x40, b: 0x81 };
pub const MESSAGE: Color = Color::Rgb { r: 0xff, g: 0x80, b: 0xab };
pub const SPARKLE: Rgb = Rgb(0xff, 0xf1, 0x76);
