//! # Render Record Pipeline
//!
//! Draw records capture everything needed to render one object for one frame.
//! The producing side builds or refreshes records from the current
//! [`RenderParams`] and submits them through a [`RecordSender`]; the consuming
//! side receives them, calls [`RenderNode::render`] against a
//! [`RenderBackend`], and then [`RenderNode::recycle`].
//!
//! ## Record Kinds
//!
//! - [`FigureNode`]: a model drawn from pooled, per-figure vertex storage
//! - [`PrimitiveNode`]: immediate-mode geometry referencing caller buffers
//!
//! ## Ownership
//!
//! A record is exclusively owned by whoever holds it: the producer while it is
//! being refreshed, the channel while in flight, the consumer while it renders.
//! Recycling a figure record moves it onto its figure's reuse stack, the only
//! state shared between the two sides.

pub mod attributes;
pub mod backend;
pub mod figure;
pub mod lighting;
pub mod node;
pub mod params;
pub mod primitive;
pub mod queue;
pub mod texture;

#[cfg(test)]
mod tests;

pub use attributes::RenderAttrs;
pub use backend::{FigureDrawCall, RenderBackend};
pub use figure::{Figure, FigureNode, Model, PoolStats, RigidPose, VertexSource};
pub use lighting::Light;
pub use node::{NodeState, RenderNode};
pub use params::RenderParams;
pub use primitive::{PrimitiveBuffers, PrimitiveKind, PrimitiveNode, PrimitiveShading};
pub use queue::{record_channel, FrameStats, RecordReceiver, RecordSender};
pub use texture::TextureHandle;

use thiserror::Error;

/// Result type for record operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while building, dispatching or handing off draw records
///
/// None of these are retried by the pipeline; they surface synchronously at
/// the call that triggered them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Native buffer storage could not be obtained
    ///
    /// Raised at record construction. No partially built record is returned.
    #[error("Failed to allocate native buffer of {requested} floats")]
    AllocationFailed {
        /// Number of floats requested
        requested: usize,
    },

    /// A vertex source would write past a record's fixed buffer capacity
    ///
    /// This indicates a figure paired with a vertex source built for a
    /// different model. Data is never truncated to fit.
    #[error("Vertex data of {required} floats exceeds buffer capacity of {capacity} floats")]
    CapacityExceeded {
        /// Floats the source wants to write
        required: usize,
        /// Fixed capacity of the record's buffers
        capacity: usize,
    },

    /// Vertex source and record disagree on whether normals exist
    #[error("Normal data mismatch: source emits normals = {source_has}, record has normal buffer = {record_has}")]
    NormalsMismatch {
        /// Whether the vertex source produces normals
        source_has: bool,
        /// Whether the record carries a normal buffer
        record_has: bool,
    },

    /// A pooled record outlived the figure that owns its vertex source
    #[error("Figure for model '{0}' was released")]
    FigureReleased(String),

    /// Command word does not name a primitive kind
    #[error("Unknown primitive command: {0:#010x}")]
    UnknownPrimitive(u32),

    /// The other end of the hand-off channel is gone
    #[error("Record queue closed")]
    QueueClosed,

    /// A backend draw entry point failed
    #[error("Backend error: {0}")]
    Backend(String),
}
