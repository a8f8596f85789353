//! Shading and feature attribute flags

use bitflags::bitflags;

bitflags! {
    /// Attribute bitmask captured into every draw record
    ///
    /// Bits that are not named here are preserved, so a raw attribute word
    /// survives capture unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderAttrs: u32 {
        /// Apply the captured light
        const LIGHTING = 0x01;
        /// Environment mapping through the specular texture
        const SPHERE_MAP = 0x02;
        /// Quantize lighting into toon bands
        const TOON_SHADING = 0x04;
        /// Honour per-polygon transparency
        const SEMI_TRANSPARENT = 0x08;
        /// Treat the texture's first palette entry as transparent
        const COLOR_KEY = 0x10;
        /// Half-blend bit of the blend mode field
        const BLEND_HALF = 0x20;
        /// Additive bit of the blend mode field
        const BLEND_ADD = 0x40;

        const _ = !0;
    }
}

/// Blend mode encoded in bits 5..6 of the attribute word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Overwrite
    Normal,
    /// 50/50 mix with the destination
    Half,
    /// Additive
    Add,
    /// Subtractive
    Sub,
}

impl RenderAttrs {
    /// Mask covering the blend mode field
    pub const BLEND_MASK: Self = Self::BLEND_HALF.union(Self::BLEND_ADD);

    /// Decode the blend mode field
    pub const fn blend_mode(self) -> BlendMode {
        match (self.bits() & Self::BLEND_MASK.bits()) >> 5 {
            0 => BlendMode::Normal,
            1 => BlendMode::Half,
            2 => BlendMode::Add,
            _ => BlendMode::Sub,
        }
    }

    /// Whether lighting applies
    pub const fn lighting(self) -> bool {
        self.contains(Self::LIGHTING)
    }

    /// Whether toon banding applies
    pub const fn toon_shading(self) -> bool {
        self.contains(Self::TOON_SHADING)
    }
}

impl From<u32> for RenderAttrs {
    fn from(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_bits_survive() {
        let attrs = RenderAttrs::from(0x8000_0001);
        assert!(attrs.lighting());
        assert_eq!(attrs.bits(), 0x8000_0001);
    }

    #[test]
    fn test_blend_mode_decoding() {
        assert_eq!(RenderAttrs::empty().blend_mode(), BlendMode::Normal);
        assert_eq!(RenderAttrs::BLEND_HALF.blend_mode(), BlendMode::Half);
        assert_eq!(RenderAttrs::BLEND_ADD.blend_mode(), BlendMode::Add);
        assert_eq!(RenderAttrs::BLEND_MASK.blend_mode(), BlendMode::Sub);
    }
}
