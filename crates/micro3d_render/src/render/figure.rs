//! Figure draw records and their per-figure reuse stack
//!
//! A [`Figure`] is a geometry owner: it pairs an immutable [`Model`] with the
//! [`VertexSource`] that produces the current pose, and keeps a LIFO stack of
//! spent [`FigureNode`]s. Native vertex storage is expensive and its size is
//! fixed per model, so records are reused by identity rather than rebuilt:
//!
//! ```text
//! producer: claim() ──► refresh(params) ──► submit
//!                                              │
//! consumer:         push() ◄── recycle() ◄── render
//! ```
//!
//! The stack is the only state the two sides share and is guarded by a
//! mutex, one per figure.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::config::PipelineConfig;
use crate::foundation::buffer::NativeBuffer;
use crate::foundation::math::{AffineMatrix, Vec3};
use crate::render::{
    FigureDrawCall, NodeState, RenderBackend, RenderError, RenderParams, RenderResult,
    TextureHandle,
};

/// Immutable shared shape description of a model
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    vertex_array_capacity: usize,
    vertices: Vec<f32>,
    normals: Option<Vec<f32>>,
}

impl Model {
    /// Create a model from rest-pose positions and optional normals
    ///
    /// The vertex array capacity defaults to the number of position floats.
    pub fn new(name: impl Into<String>, vertices: Vec<f32>, normals: Option<Vec<f32>>) -> Self {
        Self {
            name: name.into(),
            vertex_array_capacity: vertices.len(),
            vertices,
            normals,
        }
    }

    /// Override the vertex array capacity
    ///
    /// Models whose evaluated output is larger than their rest pose (for
    /// example when vertices are expanded per polygon) declare it here.
    #[must_use]
    pub fn with_vertex_array_capacity(mut self, capacity: usize) -> Self {
        self.vertex_array_capacity = capacity;
        self
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Floats each record buffer must hold
    pub const fn vertex_array_capacity(&self) -> usize {
        self.vertex_array_capacity
    }

    /// Whether the model carries normal data
    pub const fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Rest-pose positions, three floats per vertex
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Rest-pose normals, three floats per vertex
    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    /// Number of rest-pose vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Produces transformed vertex data for a model's current pose
///
/// Skinning and animation live behind this trait. Implementations write
/// exactly [`output_len`](Self::output_len) floats into each slice they are
/// given.
pub trait VertexSource: Send {
    /// Floats the current pose writes into the vertex (and normal) buffer
    fn output_len(&self, model: &Model) -> usize;

    /// Whether this source writes normals
    fn emits_normals(&self, model: &Model) -> bool {
        model.has_normals()
    }

    /// Write transformed positions and, when present, normals
    ///
    /// Both slices are exactly `output_len(model)` floats long.
    fn fill(&self, model: &Model, vertices: &mut [f32], normals: Option<&mut [f32]>);
}

/// Whole-model rigid transform of the rest pose
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidPose {
    /// Model-to-world transform
    pub transform: AffineMatrix,
}

impl RigidPose {
    /// Rest pose, unchanged
    pub const fn identity() -> Self {
        Self {
            transform: AffineMatrix::IDENTITY,
        }
    }

    /// Rest pose under `transform`
    pub const fn new(transform: AffineMatrix) -> Self {
        Self { transform }
    }
}

impl VertexSource for RigidPose {
    fn output_len(&self, model: &Model) -> usize {
        // Whole vertices only; a trailing partial triple is never written.
        model.vertices().len() / 3 * 3
    }

    fn fill(&self, model: &Model, vertices: &mut [f32], normals: Option<&mut [f32]>) {
        for (src, dst) in model.vertices().chunks_exact(3).zip(vertices.chunks_exact_mut(3)) {
            dst.copy_from_slice(&self.transform.transform_point([src[0], src[1], src[2]]));
        }

        if let (Some(src_normals), Some(dst_normals)) = (model.normals(), normals) {
            for (src, dst) in src_normals.chunks_exact(3).zip(dst_normals.chunks_exact_mut(3)) {
                let [x, y, z] = self.transform.transform_direction([src[0], src[1], src[2]]);
                let n = Vec3::new(x, y, z);
                let n = n.try_normalize(f32::EPSILON).unwrap_or(n);
                dst.copy_from_slice(n.as_slice());
            }
        }
    }
}

/// Reuse-stack counters for one figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Claims answered from the stack
    pub claimed: u64,
    /// Claims that found the stack empty
    pub missed: u64,
    /// Records pushed back onto the stack
    pub recycled: u64,
    /// Records dropped because the stack was full
    pub dropped: u64,
}

struct ReuseStack {
    records: Vec<FigureNode>,
    limit: Option<usize>,
    stats: PoolStats,
}

struct FigureShared {
    model: Arc<Model>,
    source: Mutex<Box<dyn VertexSource>>,
    stack: Mutex<ReuseStack>,
}

fn lock_recovering<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("{what} lock poisoned, recovering");
        PoisonError::into_inner(poisoned)
    })
}

impl FigureShared {
    fn stack(&self) -> MutexGuard<'_, ReuseStack> {
        lock_recovering(&self.stack, "Figure reuse stack")
    }

    fn source(&self) -> MutexGuard<'_, Box<dyn VertexSource>> {
        lock_recovering(&self.source, "Figure vertex source")
    }
}

/// Geometry owner: a model, its current pose, and its spent records
///
/// Cloning a `Figure` clones the handle; all clones share one reuse stack.
#[derive(Clone)]
pub struct Figure {
    shared: Arc<FigureShared>,
}

impl Figure {
    /// Create a figure with a growable reuse stack
    pub fn new(model: Arc<Model>, source: impl VertexSource + 'static) -> Self {
        Self {
            shared: Arc::new(FigureShared {
                model,
                source: Mutex::new(Box::new(source)),
                stack: Mutex::new(ReuseStack {
                    records: Vec::new(),
                    limit: None,
                    stats: PoolStats::default(),
                }),
            }),
        }
    }

    /// Create a figure sized and pre-filled per the pipeline configuration
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::AllocationFailed`] if pre-allocating records
    /// fails.
    pub fn with_config(
        model: Arc<Model>,
        source: impl VertexSource + 'static,
        config: &PipelineConfig,
    ) -> RenderResult<Self> {
        let figure = Self::new(model, source);
        figure.set_pool_limit(config.max_pooled_per_figure);
        figure.prewarm(config.prewarm_per_figure)?;
        Ok(figure)
    }

    /// Shared model description
    pub fn model(&self) -> &Arc<Model> {
        &self.shared.model
    }

    /// Replace the vertex source, e.g. to advance the pose
    ///
    /// Records refreshed afterwards see the new pose; records already
    /// refreshed keep the data they captured.
    pub fn set_source(&self, source: impl VertexSource + 'static) {
        *self.shared.source() = Box::new(source);
    }

    /// Bound the reuse stack; `None` lets it grow
    ///
    /// Shrinking below the current depth drops the surplus records.
    pub fn set_pool_limit(&self, limit: Option<usize>) {
        let mut stack = self.shared.stack();
        stack.limit = limit;
        if let Some(limit) = limit {
            let surplus = stack.records.len().saturating_sub(limit);
            if surplus > 0 {
                stack.records.truncate(limit);
                stack.stats.dropped += surplus as u64;
            }
        }
    }

    /// Allocate up to `count` records onto the reuse stack
    ///
    /// Stops early once the stack reaches its limit.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::AllocationFailed`] if storage cannot be
    /// obtained; records allocated before the failure stay pooled.
    pub fn prewarm(&self, count: usize) -> RenderResult<()> {
        let params = RenderParams::default();
        for _ in 0..count {
            {
                let stack = self.shared.stack();
                if stack.limit.is_some_and(|limit| stack.records.len() >= limit) {
                    break;
                }
            }
            let node = FigureNode::construct(&params, self)?;
            self.shared.stack().records.push(node);
        }
        log::debug!(
            "Prewarmed figure '{}': {} pooled records",
            self.shared.model.name(),
            self.pooled()
        );
        Ok(())
    }

    /// Take the most recently recycled record, if any
    pub fn claim(&self) -> Option<FigureNode> {
        let mut stack = self.shared.stack();
        let node = stack.records.pop();
        if node.is_some() {
            stack.stats.claimed += 1;
        } else {
            stack.stats.missed += 1;
        }
        node
    }

    /// Return a record to this figure's reuse stack
    ///
    /// Records that belong to another figure, or that arrive when the stack is
    /// full, are dropped.
    pub fn push(&self, node: FigureNode) {
        if !Weak::ptr_eq(&node.owner, &Arc::downgrade(&self.shared)) {
            log::warn!(
                "Record for model '{}' pushed onto figure '{}'; dropping it",
                node.model.name(),
                self.shared.model.name()
            );
            return;
        }
        self.shared.release(node);
    }

    /// Records currently waiting on the reuse stack
    pub fn pooled(&self) -> usize {
        self.shared.stack().records.len()
    }

    /// Reuse-stack counters
    pub fn pool_stats(&self) -> PoolStats {
        self.shared.stack().stats
    }

    /// Whether two handles refer to the same figure
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl FigureShared {
    fn release(&self, node: FigureNode) {
        let mut stack = self.stack();
        if stack.limit.is_some_and(|limit| stack.records.len() >= limit) {
            stack.stats.dropped += 1;
            log::warn!(
                "Reuse stack for '{}' full, freeing record",
                self.model.name()
            );
            return;
        }
        stack.records.push(node);
        stack.stats.recycled += 1;
    }
}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Figure")
            .field("model", &self.shared.model.name())
            .field("pooled", &self.pooled())
            .finish_non_exhaustive()
    }
}

/// Draw record for one figure in one frame
///
/// Owns two native buffers sized to the model's vertex array capacity. A
/// record reused from the pool keeps the same buffers; only their contents
/// change on refresh.
pub struct FigureNode {
    state: NodeState,
    textures: Vec<TextureHandle>,
    vertices: NativeBuffer,
    normals: Option<NativeBuffer>,
    filled: usize,
    model: Arc<Model>,
    owner: Weak<FigureShared>,
}

impl FigureNode {
    /// Build a new record for `figure` and fill it from `params`
    ///
    /// # Errors
    ///
    /// [`RenderError::AllocationFailed`] when native storage cannot be
    /// obtained, or any fill error from [`refresh`](Self::refresh).
    pub fn construct(params: &RenderParams, figure: &Figure) -> RenderResult<Self> {
        let model = Arc::clone(&figure.shared.model);
        let capacity = model.vertex_array_capacity();
        let vertices = NativeBuffer::allocate(capacity)?;
        let normals = if model.has_normals() {
            Some(NativeBuffer::allocate(capacity)?)
        } else {
            None
        };

        let mut node = Self {
            state: NodeState::capture(params),
            textures: params.textures.clone(),
            vertices,
            normals,
            filled: 0,
            model,
            owner: Arc::downgrade(&figure.shared),
        };
        node.fill(&figure.shared)?;
        log::trace!(
            "Constructed figure record for '{}' ({} floats)",
            node.model.name(),
            capacity
        );
        Ok(node)
    }

    /// Claim a pooled record for `figure` or build one, then fill it
    ///
    /// # Errors
    ///
    /// Construction or fill errors. A claimed record that fails to refresh
    /// goes back on the stack.
    pub fn obtain(params: &RenderParams, figure: &Figure) -> RenderResult<Self> {
        match figure.claim() {
            Some(mut node) => match node.refresh(params) {
                Ok(()) => Ok(node),
                Err(err) => {
                    figure.push(node);
                    Err(err)
                }
            },
            None => {
                log::debug!(
                    "Reuse stack for '{}' empty, allocating record",
                    figure.model().name()
                );
                Self::construct(params, figure)
            }
        }
    }

    /// Re-capture state and textures and re-fill the buffers
    ///
    /// # Errors
    ///
    /// [`RenderError::CapacityExceeded`] or [`RenderError::NormalsMismatch`]
    /// when the vertex source does not fit this record, and
    /// [`RenderError::FigureReleased`] if the owning figure no longer exists.
    pub fn refresh(&mut self, params: &RenderParams) -> RenderResult<()> {
        log::trace!("Refreshing figure record for '{}'", self.model.name());
        let owner = self
            .owner
            .upgrade()
            .ok_or_else(|| RenderError::FigureReleased(self.model.name().to_string()))?;

        self.state.refresh(params);
        self.textures.clear();
        self.textures.extend_from_slice(&params.textures);
        self.fill(&owner)
    }

    fn fill(&mut self, owner: &FigureShared) -> RenderResult<()> {
        let source = owner.source();
        let capacity = self.vertices.capacity();
        let required = source.output_len(&self.model);
        if required > capacity {
            return Err(RenderError::CapacityExceeded { required, capacity });
        }

        let source_has = source.emits_normals(&self.model);
        let record_has = self.normals.is_some();
        if source_has != record_has {
            return Err(RenderError::NormalsMismatch {
                source_has,
                record_has,
            });
        }

        let normals = self
            .normals
            .as_mut()
            .map(|buffer| &mut buffer.as_mut_slice()[..required]);
        source.fill(
            &self.model,
            &mut self.vertices.as_mut_slice()[..required],
            normals,
        );
        self.filled = required;
        Ok(())
    }

    /// Draw through the backend's figure entry point
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        backend.draw_figure(&self.draw_call())
    }

    /// Push this record onto its figure's reuse stack
    ///
    /// If the figure has been dropped the record is freed instead.
    pub fn recycle(self) {
        match self.owner.upgrade() {
            Some(owner) => owner.release(self),
            None => log::debug!(
                "Figure for '{}' released before recycle, freeing record",
                self.model.name()
            ),
        }
    }

    /// Read-only view handed to the backend
    pub fn draw_call(&self) -> FigureDrawCall<'_> {
        FigureDrawCall {
            model: &self.model,
            textures: &self.textures,
            attrs: self.state.attrs(),
            projection: self.state.projection(),
            view: self.state.view(),
            vertices: &self.vertices.as_slice()[..self.filled],
            normals: self
                .normals
                .as_ref()
                .map(|buffer| &buffer.as_slice()[..self.filled]),
            light: self.state.light(),
            specular: self.state.specular(),
            toon_threshold: self.state.toon_threshold(),
            toon_high: self.state.toon_high(),
            toon_low: self.state.toon_low(),
        }
    }

    /// Captured common state
    pub const fn state(&self) -> &NodeState {
        &self.state
    }

    /// Captured texture list
    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    /// Source model
    pub const fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Full position buffer
    pub const fn vertices(&self) -> &NativeBuffer {
        &self.vertices
    }

    /// Full normal buffer, absent when the model has no normals
    pub const fn normals(&self) -> Option<&NativeBuffer> {
        self.normals.as_ref()
    }

    /// Floats written by the last fill
    pub const fn filled_len(&self) -> usize {
        self.filled
    }
}

impl std::fmt::Debug for FigureNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigureNode")
            .field("model", &self.model.name())
            .field("textures", &self.textures)
            .field("capacity", &self.vertices.capacity())
            .field("filled", &self.filled)
            .field("has_normals", &self.normals.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Light;
    use approx::assert_relative_eq;

    fn triangle_model(with_normals: bool) -> Arc<Model> {
        let normals = with_normals.then(|| vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        Arc::new(Model::new(
            "triangle",
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals,
        ))
    }

    struct Oversized;

    impl VertexSource for Oversized {
        fn output_len(&self, model: &Model) -> usize {
            model.vertex_array_capacity() + 3
        }

        fn fill(&self, _model: &Model, _vertices: &mut [f32], _normals: Option<&mut [f32]>) {
            unreachable!("fill must not run when the output does not fit");
        }
    }

    #[test]
    fn test_construct_sizes_buffers_to_capacity() {
        let model = Arc::new(
            Model::new("padded", vec![0.0; 9], Some(vec![0.0, 0.0, 1.0].repeat(3)))
                .with_vertex_array_capacity(30),
        );
        let figure = Figure::new(model, RigidPose::identity());
        let node = FigureNode::construct(&RenderParams::default(), &figure).unwrap();

        assert_eq!(node.vertices().capacity(), 30);
        assert_eq!(node.normals().map(NativeBuffer::capacity), Some(30));
        assert_eq!(node.filled_len(), 9);
    }

    #[test]
    fn test_rigid_pose_fill_transforms_geometry() {
        let figure = Figure::new(
            triangle_model(true),
            RigidPose::new(AffineMatrix::translation(0.0, 0.0, -5.0)),
        );
        let node = FigureNode::construct(&RenderParams::default(), &figure).unwrap();
        let call = node.draw_call();

        assert_relative_eq!(call.vertices[3], 1.0);
        assert_relative_eq!(call.vertices[5], -5.0);
        let normals = call.normals.unwrap();
        assert_relative_eq!(normals[2], 1.0);
    }

    #[test]
    fn test_capacity_violation_is_an_error() {
        let figure = Figure::new(triangle_model(false), Oversized);
        let err = FigureNode::construct(&RenderParams::default(), &figure).unwrap_err();
        assert_eq!(
            err,
            RenderError::CapacityExceeded {
                required: 12,
                capacity: 9
            }
        );
    }

    /// Writes a marker value and disagrees with the model about normals
    struct NormalsDisagree {
        emits: bool,
    }

    impl VertexSource for NormalsDisagree {
        fn output_len(&self, model: &Model) -> usize {
            model.vertices().len()
        }

        fn emits_normals(&self, _model: &Model) -> bool {
            self.emits
        }

        fn fill(&self, _model: &Model, vertices: &mut [f32], normals: Option<&mut [f32]>) {
            vertices.fill(99.0);
            if let Some(normals) = normals {
                normals.fill(99.0);
            }
        }
    }

    #[test]
    fn test_normals_mismatch_is_an_error() {
        let figure = Figure::new(triangle_model(false), NormalsDisagree { emits: true });
        assert_eq!(
            FigureNode::construct(&RenderParams::default(), &figure).unwrap_err(),
            RenderError::NormalsMismatch {
                source_has: true,
                record_has: false
            }
        );

        let figure = Figure::new(triangle_model(true), NormalsDisagree { emits: false });
        assert_eq!(
            FigureNode::construct(&RenderParams::default(), &figure).unwrap_err(),
            RenderError::NormalsMismatch {
                source_has: false,
                record_has: true
            }
        );
    }

    #[test]
    fn test_normals_mismatch_leaves_buffers_untouched() {
        for with_normals in [false, true] {
            let figure = Figure::new(triangle_model(with_normals), RigidPose::identity());
            let mut node = FigureNode::construct(&RenderParams::default(), &figure).unwrap();
            let vertices = node.vertices().as_slice().to_vec();
            let normals = node.normals().map(|n| n.as_slice().to_vec());

            figure.set_source(NormalsDisagree {
                emits: !with_normals,
            });
            assert!(matches!(
                node.refresh(&RenderParams::default()),
                Err(RenderError::NormalsMismatch { .. })
            ));
            assert_eq!(node.vertices().as_slice(), vertices.as_slice());
            assert_eq!(node.normals().map(|n| n.as_slice().to_vec()), normals);
            assert_eq!(node.filled_len(), 9);
        }
    }

    #[test]
    fn test_rigid_pose_skips_partial_vertex() {
        let model = Arc::new(Model::new("ragged", vec![1.0; 10], None));
        let figure = Figure::new(model, RigidPose::identity());
        let node = FigureNode::construct(&RenderParams::default(), &figure).unwrap();

        assert_eq!(node.vertices().capacity(), 10);
        assert_eq!(node.filled_len(), 9);
        assert_eq!(node.draw_call().vertices, &[1.0; 9]);
    }

    #[test]
    fn test_failed_refresh_returns_record_to_stack() {
        let figure = Figure::new(triangle_model(false), RigidPose::identity());
        FigureNode::construct(&RenderParams::default(), &figure)
            .unwrap()
            .recycle();
        assert_eq!(figure.pooled(), 1);

        figure.set_source(Oversized);
        assert!(FigureNode::obtain(&RenderParams::default(), &figure).is_err());
        assert_eq!(figure.pooled(), 1);
    }

    #[test]
    fn test_refresh_replaces_textures_and_light() {
        let figure = Figure::new(triangle_model(false), RigidPose::identity());
        let mut params = RenderParams::default();
        params.set_textures(&[TextureHandle(1), TextureHandle(2), TextureHandle(3)]);
        let mut node = FigureNode::construct(&params, &figure).unwrap();
        assert_eq!(node.textures(), &[TextureHandle(1), TextureHandle(2), TextureHandle(3)]);

        params.set_textures(&[TextureHandle(9)]);
        params.light = Light::new(0.1, 0.2, [0.0, 1.0, 0.0]);
        node.refresh(&params).unwrap();
        assert_eq!(node.textures(), &[TextureHandle(9)]);
        assert_eq!(*node.state().light(), params.light);
    }

    #[test]
    fn test_recycle_then_claim_reuses_storage() {
        let figure = Figure::new(triangle_model(true), RigidPose::identity());
        let params = RenderParams::default();

        let first = FigureNode::obtain(&params, &figure).unwrap();
        let vertices = first.vertices().as_ptr();
        let normals = first.normals().map(NativeBuffer::as_ptr);
        first.recycle();

        for _ in 0..2 {
            let node = FigureNode::obtain(&params, &figure).unwrap();
            assert_eq!(node.vertices().as_ptr(), vertices);
            assert_eq!(node.normals().map(NativeBuffer::as_ptr), normals);
            node.recycle();
        }

        let stats = figure.pool_stats();
        assert_eq!(stats.missed, 1);
        assert_eq!(stats.claimed, 2);
        assert_eq!(stats.recycled, 3);
    }

    #[test]
    fn test_pool_limit_drops_surplus() {
        let figure = Figure::new(triangle_model(false), RigidPose::identity());
        figure.set_pool_limit(Some(1));
        let a = FigureNode::construct(&RenderParams::default(), &figure).unwrap();
        let b = FigureNode::construct(&RenderParams::default(), &figure).unwrap();
        a.recycle();
        b.recycle();

        let stats = figure.pool_stats();
        assert_eq!(figure.pooled(), 1);
        assert_eq!(stats.recycled, 1);
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn test_prewarm_respects_limit() {
        let config = PipelineConfig::new()
            .with_max_pooled_per_figure(2)
            .with_prewarm_per_figure(2);
        let figure = Figure::with_config(triangle_model(false), RigidPose::identity(), &config).unwrap();
        assert_eq!(figure.pooled(), 2);

        figure.prewarm(5).unwrap();
        assert_eq!(figure.pooled(), 2);
    }

    #[test]
    fn test_push_rejects_foreign_record() {
        let a = Figure::new(triangle_model(false), RigidPose::identity());
        let b = Figure::new(triangle_model(false), RigidPose::identity());
        let node = FigureNode::construct(&RenderParams::default(), &a).unwrap();
        b.push(node);
        assert_eq!(a.pooled(), 0);
        assert_eq!(b.pooled(), 0);
    }

    #[test]
    fn test_recycle_after_figure_dropped_frees_record() {
        let figure = Figure::new(triangle_model(false), RigidPose::identity());
        let mut node = FigureNode::construct(&RenderParams::default(), &figure).unwrap();
        drop(figure);

        let mut params = RenderParams::new()
            .with_attrs(crate::render::RenderAttrs::LIGHTING)
            .with_toon(10, 200, 50);
        params.set_textures(&[TextureHandle(7)]);
        assert!(matches!(
            node.refresh(&params),
            Err(RenderError::FigureReleased(name)) if name == "triangle"
        ));
        assert_eq!(*node.state(), NodeState::capture(&RenderParams::default()));
        assert!(node.textures().is_empty());
        node.recycle();
    }
}
