//! Common captured state and the draw-record sum type

use crate::foundation::math::{AffineMatrix, ProjectionMatrix};
use crate::render::{
    FigureNode, Light, PrimitiveNode, RenderAttrs, RenderBackend, RenderParams, RenderResult,
    TextureHandle,
};

/// State every draw record captures from [`RenderParams`]
///
/// All fields are copies. Once captured, nothing here observes later changes
/// to the parameters it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    view: AffineMatrix,
    projection: ProjectionMatrix,
    attrs: RenderAttrs,
    light: Light,
    specular: Option<TextureHandle>,
    toon_high: i32,
    toon_low: i32,
    toon_threshold: i32,
}

impl NodeState {
    /// Capture a fresh state from the parameters
    pub fn capture(params: &RenderParams) -> Self {
        Self {
            view: params.view,
            projection: params.projection,
            attrs: params.attrs,
            light: params.light,
            specular: params.specular,
            toon_high: params.toon_high,
            toon_low: params.toon_low,
            toon_threshold: params.toon_threshold,
        }
    }

    /// Overwrite this state from the parameters
    ///
    /// Both matrices are overwritten in full and the owned light is updated in
    /// place. `params` is not modified.
    pub fn refresh(&mut self, params: &RenderParams) {
        self.view.copy_from(&params.view);
        self.projection.copy_from(&params.projection);
        self.attrs = params.attrs;
        self.light.copy_from(&params.light);
        self.specular = params.specular;
        self.toon_high = params.toon_high;
        self.toon_low = params.toon_low;
        self.toon_threshold = params.toon_threshold;
    }

    /// Captured view transform
    pub const fn view(&self) -> &AffineMatrix {
        &self.view
    }

    /// Captured projection transform
    pub const fn projection(&self) -> &ProjectionMatrix {
        &self.projection
    }

    /// Captured attribute flags
    pub const fn attrs(&self) -> RenderAttrs {
        self.attrs
    }

    /// Captured light
    pub const fn light(&self) -> &Light {
        &self.light
    }

    /// Captured specular texture
    pub const fn specular(&self) -> Option<TextureHandle> {
        self.specular
    }

    /// Bright toon band intensity
    pub const fn toon_high(&self) -> i32 {
        self.toon_high
    }

    /// Dark toon band intensity
    pub const fn toon_low(&self) -> i32 {
        self.toon_low
    }

    /// Toon band threshold
    pub const fn toon_threshold(&self) -> i32 {
        self.toon_threshold
    }
}

/// A draw record of either kind
#[derive(Debug)]
pub enum RenderNode {
    /// Pooled model draw
    Figure(FigureNode),
    /// Immediate-mode geometry draw
    Primitive(PrimitiveNode),
}

impl RenderNode {
    /// Captured common state
    pub const fn state(&self) -> &NodeState {
        match self {
            Self::Figure(node) => node.state(),
            Self::Primitive(node) => node.state(),
        }
    }

    /// Short kind name for logging
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Figure(_) => "figure",
            Self::Primitive(_) => "primitive",
        }
    }

    /// Re-capture this record from the current parameters
    ///
    /// # Errors
    ///
    /// Figure records propagate vertex fill failures; primitive records
    /// never fail.
    pub fn refresh(&mut self, params: &RenderParams) -> RenderResult<()> {
        match self {
            Self::Figure(node) => node.refresh(params),
            Self::Primitive(node) => {
                node.refresh(params);
                Ok(())
            }
        }
    }

    /// Draw this record through the backend
    ///
    /// Reads only captured state.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        log::trace!("Rendering {} record", self.kind());
        match self {
            Self::Figure(node) => node.render(backend),
            Self::Primitive(node) => node.render(backend),
        }
    }

    /// Release this record after it has been rendered
    ///
    /// Figure records return to their figure's reuse stack; primitive records
    /// are dropped.
    pub fn recycle(self) {
        match self {
            Self::Figure(node) => node.recycle(),
            Self::Primitive(node) => node.recycle(),
        }
    }
}

impl From<FigureNode> for RenderNode {
    fn from(node: FigureNode) -> Self {
        Self::Figure(node)
    }
}

impl From<PrimitiveNode> for RenderNode {
    fn from(node: PrimitiveNode) -> Self {
        Self::Primitive(node)
    }
}
