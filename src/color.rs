//! Color type and pixel mixers
use bytemuck::{Pod, Zeroable};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// sRGBA color with straight (non-premultiplied) alpha packed as [u8; 4]
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba([u8; 4]);

impl Rgba {
    /// Create new RGBA color
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Fully transparent color
    pub const fn transparent() -> Self {
        Self([0, 0, 0, 0])
    }

    /// Red channel value
    pub const fn red(self) -> u8 {
        self.0[0]
    }

    /// Green channel value
    pub const fn green(self) -> u8 {
        self.0[1]
    }

    /// Blue channel value
    pub const fn blue(self) -> u8 {
        self.0[2]
    }

    /// Alpha channel value
    pub const fn alpha(self) -> u8 {
        self.0[3]
    }

    /// Same color with the alpha channel replaced
    pub const fn with_alpha(self, alpha: u8) -> Self {
        let Self([r, g, b, _]) = self;
        Self([r, g, b, alpha])
    }

    /// Color as a list of channel values
    pub const fn to_rgba(self) -> [u8; 4] {
        self.0
    }
}

impl From<[u8; 4]> for Rgba {
    #[inline]
    fn from(rgba: [u8; 4]) -> Self {
        Rgba(rgba)
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgba([r, g, b, a]) = self;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)?;
        if *a != 255 {
            write!(f, "{:02x}", a)?;
        }
        Ok(())
    }
}

/// Porter-Duff source-over for straight alpha colors
///
/// This is the mixer implementing the `Normal` blend mode. Mixers for other
/// blend modes can be supplied by the caller, any `Fn(Rgba, Rgba) -> Rgba`
/// is accepted by the rasterizer.
pub fn blend_normal(dst: Rgba, src: Rgba) -> Rgba {
    let src_a = src.alpha() as f32 / 255.0;
    if src_a >= 1.0 {
        return src;
    }
    let dst_a = dst.alpha() as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Rgba::transparent();
    }
    let channel = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        (((s * src_a + d * dst_a * (1.0 - src_a)) / out_a) * 255.0 + 0.5) as u8
    };
    Rgba::new(
        channel(src.red(), dst.red()),
        channel(src.green(), dst.green()),
        channel(src.blue(), dst.blue()),
        (out_a * 255.0 + 0.5) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_normal() {
        let red = Rgba::new(255, 0, 0, 255);
        let blue = Rgba::new(0, 0, 255, 255);

        // opaque source replaces the destination
        assert_eq!(blend_normal(red, blue), blue);

        // transparent source keeps the destination
        assert_eq!(blend_normal(red, Rgba::transparent()), red);

        // source over fully transparent destination keeps source channels
        let half_red = Rgba::new(255, 0, 0, 128);
        assert_eq!(blend_normal(Rgba::transparent(), half_red), half_red);

        // half red over opaque blue
        let mixed = blend_normal(blue, half_red);
        assert_eq!(mixed.alpha(), 255);
        assert!(mixed.red() > 120 && mixed.red() < 136);
        assert!(mixed.blue() > 120 && mixed.blue() < 136);
    }
}
