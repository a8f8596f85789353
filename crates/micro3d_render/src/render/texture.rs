//! Texture references
//!
//! Texture decoding and binding belong to the backend. Records only carry
//! opaque handles, copied by value.

use std::fmt;

/// Handle to a texture resource owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u64);

impl TextureHandle {
    /// Raw backend identifier
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture#{}", self.0)
    }
}
