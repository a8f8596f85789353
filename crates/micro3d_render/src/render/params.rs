//! Per-frame parameter snapshot
//!
//! The producer mutates one `RenderParams` as it walks the scene, and records
//! copy what they need out of it. Nothing in a record points back into the
//! parameters after capture.

use crate::foundation::math::{AffineMatrix, ProjectionMatrix};
use crate::render::{Light, RenderAttrs, TextureHandle};

/// Current view, projection, lighting and material state
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Affine view transform
    pub view: AffineMatrix,
    /// Projection transform
    pub projection: ProjectionMatrix,
    /// Shading and feature flags
    pub attrs: RenderAttrs,
    /// Light descriptor
    pub light: Light,
    /// Sphere-map texture, if any
    pub specular: Option<TextureHandle>,
    /// Bound textures; length and order are significant
    pub textures: Vec<TextureHandle>,
    /// Intensity of the bright toon band
    pub toon_high: i32,
    /// Intensity of the dark toon band
    pub toon_low: i32,
    /// Lighting level separating the two toon bands
    pub toon_threshold: i32,
}

impl RenderParams {
    /// Create parameters with identity transforms and no textures
    pub fn new() -> Self {
        Self {
            view: AffineMatrix::IDENTITY,
            projection: ProjectionMatrix::IDENTITY,
            attrs: RenderAttrs::empty(),
            light: Light::default(),
            specular: None,
            textures: Vec::new(),
            toon_high: 0,
            toon_low: 0,
            toon_threshold: 0,
        }
    }

    /// Set the view transform
    #[must_use]
    pub fn with_view(mut self, view: AffineMatrix) -> Self {
        self.view = view;
        self
    }

    /// Set the projection transform
    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionMatrix) -> Self {
        self.projection = projection;
        self
    }

    /// Set attribute flags
    #[must_use]
    pub fn with_attrs(mut self, attrs: RenderAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Set the light
    #[must_use]
    pub fn with_light(mut self, light: Light) -> Self {
        self.light = light;
        self
    }

    /// Set the specular texture
    #[must_use]
    pub fn with_specular(mut self, specular: Option<TextureHandle>) -> Self {
        self.specular = specular;
        self
    }

    /// Set toon-shading parameters
    #[must_use]
    pub fn with_toon(mut self, threshold: i32, high: i32, low: i32) -> Self {
        self.toon_threshold = threshold;
        self.toon_high = high;
        self.toon_low = low;
        self
    }

    /// Replace the bound texture list
    pub fn set_textures(&mut self, textures: &[TextureHandle]) {
        self.textures.clear();
        self.textures.extend_from_slice(textures);
    }

    /// Number of bound textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Texture used by single-texture draws
    ///
    /// This is the first bound texture, or `None` when nothing is bound.
    pub fn current_texture(&self) -> Option<TextureHandle> {
        self.textures.first().copied()
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self::new()
    }
}
