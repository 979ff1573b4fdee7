use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

/// The palette of a red/green LED matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelColour {
    Black,
    Red,
    Green,
    Yellow,
    Orange,
    LightOrange,
}

impl PixelColour {
    pub const ASTEROID: Self = Self::Green;
    pub const PROJECTILE: Self = Self::Red;
    pub const BASE: Self = Self::Yellow;
    pub const BACKGROUND: Self = Self::Black;

    pub fn to_rgb565(self) -> Rgb565 {
        match self {
            Self::Black => Rgb565::BLACK,
            Self::Red => Rgb565::RED,
            Self::Green => Rgb565::GREEN,
            Self::Yellow => Rgb565::YELLOW,
            Self::Orange => Rgb565::CSS_ORANGE,
            Self::LightOrange => Rgb565::new(31, 52, 12),
        }
    }
}

impl From<PixelColour> for Rgb565 {
    fn from(colour: PixelColour) -> Self {
        colour.to_rgb565()
    }
}
