//! # micro3d_render
//!
//! Render-record capture and playback for a fixed-function 3D figure renderer.
//!
//! The producing side snapshots per-object state (transforms, light, textures,
//! toon parameters) into draw records once per frame and hands them to a
//! consuming side that draws and recycles them. Figure records keep their
//! transformed vertex storage alive across frames through a per-figure reuse
//! stack, so steady-state frames do not allocate geometry buffers.
//!
//! ## Features
//!
//! - **Value snapshots**: records copy matrices and light by value, so the
//!   producer may mutate its parameters right after submission
//! - **Two draw kinds**: pooled skinned/textured figures and caller-supplied
//!   immediate-mode primitives behind one [`render::RenderNode`] dispatch
//! - **Buffer reuse**: per-figure LIFO reuse stack with stable buffer identity
//! - **Hand-off channel**: single-producer/single-consumer queue with
//!   end-of-frame markers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use micro3d_render::prelude::*;
//!
//! # fn run(backend: &mut dyn RenderBackend) -> RenderResult<()> {
//! let model = Arc::new(Model::new("cube", vec![0.0; 24], None));
//! let figure = Figure::new(model, RigidPose::identity());
//! let params = RenderParams::default();
//!
//! let (mut sender, receiver) = record_channel(&PipelineConfig::default());
//! sender.submit(FigureNode::obtain(&params, &figure)?.into())?;
//! sender.end_frame()?;
//!
//! receiver.render_frame(backend)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for pipeline users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PipelineConfig},
        foundation::{
            buffer::{ClientBuffer, NativeBuffer},
            math::{AffineMatrix, ProjectionMatrix},
        },
        render::{
            record_channel, Figure, FigureDrawCall, FigureNode, FrameStats, Light, Model,
            PrimitiveBuffers, PrimitiveKind, PrimitiveNode, PrimitiveShading, RecordReceiver,
            RecordSender, RenderAttrs, RenderBackend, RenderError, RenderNode, RenderParams,
            RenderResult, RigidPose, TextureHandle, VertexSource,
        },
    };
}
