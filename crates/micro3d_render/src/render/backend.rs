//! Backend abstraction for draw dispatch
//!
//! Rasterization, texture binding and compositing are the backend's job.
//! Records hand it everything they captured through one of two entry points
//! and never touch live parameters while doing so.

use crate::foundation::math::{AffineMatrix, ProjectionMatrix};
use crate::render::{Light, Model, PrimitiveNode, RenderAttrs, RenderResult, TextureHandle};

/// Read-only view of a figure record, passed to [`RenderBackend::draw_figure`]
#[derive(Debug, Clone, Copy)]
pub struct FigureDrawCall<'a> {
    /// Shared geometry description
    pub model: &'a Model,
    /// Captured textures, in binding order
    pub textures: &'a [TextureHandle],
    /// Shading and feature flags
    pub attrs: RenderAttrs,
    /// Projection transform
    pub projection: &'a ProjectionMatrix,
    /// View transform
    pub view: &'a AffineMatrix,
    /// Transformed positions written by the last fill
    pub vertices: &'a [f32],
    /// Transformed normals, absent when the model has none
    pub normals: Option<&'a [f32]>,
    /// Light
    pub light: &'a Light,
    /// Sphere-map texture
    pub specular: Option<TextureHandle>,
    /// Toon band threshold
    pub toon_threshold: i32,
    /// Bright toon band intensity
    pub toon_high: i32,
    /// Dark toon band intensity
    pub toon_low: i32,
}

/// Consuming-side rendering backend
///
/// The backend owns frame sequencing. The pipeline only calls the two draw
/// entry points, once per record, in submission order, and reports frame
/// boundaries through [`finish_frame`](Self::finish_frame).
pub trait RenderBackend {
    /// Draw a figure record
    ///
    /// # Errors
    ///
    /// Backend-specific failures, typically [`crate::render::RenderError::Backend`].
    fn draw_figure(&mut self, call: &FigureDrawCall<'_>) -> RenderResult<()>;

    /// Draw a primitive record
    ///
    /// The backend branches on [`PrimitiveNode::kind`] for the rasterization
    /// mode and on [`PrimitiveNode::shading`] for texturing and per-vertex
    /// color.
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn draw_primitive(&mut self, node: &PrimitiveNode) -> RenderResult<()>;

    /// Called after every record of `frame` has been rendered and recycled
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn finish_frame(&mut self, frame: u64) -> RenderResult<()> {
        let _ = frame;
        Ok(())
    }
}
