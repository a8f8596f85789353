//! Immediate-mode primitive draw records
//!
//! Primitive records reference caller buffers instead of copying them and
//! are never pooled. Any optional buffer may be absent; every combination of
//! texture coordinates and colors selects a valid [`PrimitiveShading`].

use crate::foundation::buffer::ClientBuffer;
use crate::render::{NodeState, RenderBackend, RenderError, RenderParams, RenderResult, TextureHandle};

/// Rasterization mode of a primitive draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Individual points
    Points,
    /// Independent line segments
    Lines,
    /// Independent triangles
    Triangles,
    /// Independent quads
    Quads,
    /// Textured point sprites
    PointSprites,
}

impl PrimitiveKind {
    /// Bits of the command word holding the kind
    pub const COMMAND_MASK: u32 = 0x0700_0000;

    /// Decode the kind from a command word
    ///
    /// # Errors
    ///
    /// [`RenderError::UnknownPrimitive`] when the kind bits are unassigned.
    pub fn from_command(command: u32) -> RenderResult<Self> {
        match (command & Self::COMMAND_MASK) >> 24 {
            1 => Ok(Self::Points),
            2 => Ok(Self::Lines),
            3 => Ok(Self::Triangles),
            4 => Ok(Self::Quads),
            5 => Ok(Self::PointSprites),
            _ => Err(RenderError::UnknownPrimitive(command)),
        }
    }

    /// Kind bits of the command word
    pub const fn command(self) -> u32 {
        let kind = match self {
            Self::Points => 1,
            Self::Lines => 2,
            Self::Triangles => 3,
            Self::Quads => 4,
            Self::PointSprites => 5,
        };
        kind << 24
    }

    /// Vertices consumed per primitive
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            Self::Points | Self::PointSprites => 1,
            Self::Lines => 2,
            Self::Triangles => 3,
            Self::Quads => 4,
        }
    }

    /// Whether this kind rasterizes as lines or points rather than filled area
    pub const fn is_outline(self) -> bool {
        matches!(self, Self::Points | Self::Lines)
    }
}

/// Texturing and coloring path selected by which buffers are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveShading {
    /// Neither texture coordinates nor colors
    Flat,
    /// Texture coordinates only
    Textured,
    /// Per-vertex colors only
    VertexColored,
    /// Texture coordinates blended with per-vertex colors
    TexturedVertexColored,
}

impl PrimitiveShading {
    /// Select the path for a buffer combination
    pub const fn from_presence(textured: bool, colored: bool) -> Self {
        match (textured, colored) {
            (false, false) => Self::Flat,
            (true, false) => Self::Textured,
            (false, true) => Self::VertexColored,
            (true, true) => Self::TexturedVertexColored,
        }
    }

    /// Whether texture coordinates are sampled
    pub const fn is_textured(self) -> bool {
        matches!(self, Self::Textured | Self::TexturedVertexColored)
    }

    /// Whether per-vertex colors are blended
    pub const fn is_colored(self) -> bool {
        matches!(self, Self::VertexColored | Self::TexturedVertexColored)
    }
}

/// Caller buffers referenced by a primitive record
#[derive(Debug, Clone)]
pub struct PrimitiveBuffers {
    /// Positions, three floats per vertex
    pub vertices: ClientBuffer<f32>,
    /// Normals, three floats per vertex
    pub normals: Option<ClientBuffer<f32>>,
    /// Texture coordinates, two bytes per vertex
    pub tex_coords: Option<ClientBuffer<u8>>,
    /// Colors, three bytes per vertex
    pub colors: Option<ClientBuffer<u8>>,
}

impl PrimitiveBuffers {
    /// Positions only
    pub fn new(vertices: ClientBuffer<f32>) -> Self {
        Self {
            vertices,
            normals: None,
            tex_coords: None,
            colors: None,
        }
    }

    /// Attach normals
    #[must_use]
    pub fn with_normals(mut self, normals: ClientBuffer<f32>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Attach texture coordinates
    #[must_use]
    pub fn with_tex_coords(mut self, tex_coords: ClientBuffer<u8>) -> Self {
        self.tex_coords = Some(tex_coords);
        self
    }

    /// Attach per-vertex colors
    #[must_use]
    pub fn with_colors(mut self, colors: ClientBuffer<u8>) -> Self {
        self.colors = Some(colors);
        self
    }
}

/// Draw record for caller-supplied geometry
#[derive(Debug)]
pub struct PrimitiveNode {
    state: NodeState,
    command: u32,
    kind: PrimitiveKind,
    buffers: PrimitiveBuffers,
    texture: Option<TextureHandle>,
}

impl PrimitiveNode {
    /// Capture a primitive draw from a raw command word
    ///
    /// # Errors
    ///
    /// [`RenderError::UnknownPrimitive`] when the command names no kind.
    pub fn construct(params: &RenderParams, command: u32, buffers: PrimitiveBuffers) -> RenderResult<Self> {
        let kind = PrimitiveKind::from_command(command)?;
        Ok(Self::with_command(params, command, kind, buffers))
    }

    /// Capture a primitive draw of `kind`
    pub fn new(params: &RenderParams, kind: PrimitiveKind, buffers: PrimitiveBuffers) -> Self {
        Self::with_command(params, kind.command(), kind, buffers)
    }

    fn with_command(params: &RenderParams, command: u32, kind: PrimitiveKind, buffers: PrimitiveBuffers) -> Self {
        Self {
            state: NodeState::capture(params),
            command,
            kind,
            buffers,
            texture: params.current_texture(),
        }
    }

    /// Re-capture common state; the texture and buffers are kept
    pub fn refresh(&mut self, params: &RenderParams) {
        self.state.refresh(params);
    }

    /// Draw through the backend's primitive entry point
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        backend.draw_primitive(self)
    }

    /// Release the record; caller buffers are left untouched
    pub fn recycle(self) {
        log::trace!("Releasing {:?} primitive record", self.kind);
    }

    /// Captured common state
    pub const fn state(&self) -> &NodeState {
        &self.state
    }

    /// Raw command word
    pub const fn command(&self) -> u32 {
        self.command
    }

    /// Decoded rasterization mode
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Texture captured at construction
    pub const fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Referenced caller buffers
    pub const fn buffers(&self) -> &PrimitiveBuffers {
        &self.buffers
    }

    /// Positions
    pub const fn vertices(&self) -> &ClientBuffer<f32> {
        &self.buffers.vertices
    }

    /// Normals
    pub const fn normals(&self) -> Option<&ClientBuffer<f32>> {
        self.buffers.normals.as_ref()
    }

    /// Texture coordinates
    pub const fn tex_coords(&self) -> Option<&ClientBuffer<u8>> {
        self.buffers.tex_coords.as_ref()
    }

    /// Per-vertex colors
    pub const fn colors(&self) -> Option<&ClientBuffer<u8>> {
        self.buffers.colors.as_ref()
    }

    /// Path selected by the present optional buffers
    pub const fn shading(&self) -> PrimitiveShading {
        PrimitiveShading::from_presence(
            self.buffers.tex_coords.is_some(),
            self.buffers.colors.is_some(),
        )
    }

    /// Vertices currently in the position buffer
    pub fn vertex_count(&self) -> usize {
        self.buffers.vertices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_decoding() {
        assert_eq!(PrimitiveKind::from_command(0x0300_0000), Ok(PrimitiveKind::Triangles));
        assert_eq!(PrimitiveKind::from_command(0x0200_0010), Ok(PrimitiveKind::Lines));
        assert_eq!(
            PrimitiveKind::from_command(0x0600_0000),
            Err(RenderError::UnknownPrimitive(0x0600_0000))
        );
        for kind in [
            PrimitiveKind::Points,
            PrimitiveKind::Lines,
            PrimitiveKind::Triangles,
            PrimitiveKind::Quads,
            PrimitiveKind::PointSprites,
        ] {
            assert_eq!(PrimitiveKind::from_command(kind.command()), Ok(kind));
        }
    }

    #[test]
    fn test_every_buffer_combination_is_valid() {
        let params = RenderParams::default();
        let cases = [
            (false, false, PrimitiveShading::Flat),
            (true, false, PrimitiveShading::Textured),
            (false, true, PrimitiveShading::VertexColored),
            (true, true, PrimitiveShading::TexturedVertexColored),
        ];
        for (textured, colored, expected) in cases {
            let mut buffers = PrimitiveBuffers::new(ClientBuffer::new(vec![0.0; 9]));
            if textured {
                buffers = buffers.with_tex_coords(ClientBuffer::new(vec![0; 6]));
            }
            if colored {
                buffers = buffers.with_colors(ClientBuffer::new(vec![255; 9]));
            }
            let node = PrimitiveNode::new(&params, PrimitiveKind::Triangles, buffers);
            assert_eq!(node.shading(), expected);
            assert_eq!(node.shading().is_textured(), textured);
            assert_eq!(node.shading().is_colored(), colored);
        }
    }

    #[test]
    fn test_texture_captured_at_construction() {
        let mut params = RenderParams::default();
        params.set_textures(&[TextureHandle(4), TextureHandle(8)]);
        let mut node = PrimitiveNode::new(
            &params,
            PrimitiveKind::Quads,
            PrimitiveBuffers::new(ClientBuffer::new(vec![0.0; 12])),
        );
        assert_eq!(node.texture(), Some(TextureHandle(4)));

        params.set_textures(&[]);
        node.refresh(&params);
        assert_eq!(node.texture(), Some(TextureHandle(4)));
    }

    #[test]
    fn test_buffers_are_referenced_not_copied() {
        let vertices = ClientBuffer::new(vec![0.0_f32; 9]);
        let node = PrimitiveNode::new(
            &RenderParams::default(),
            PrimitiveKind::Triangles,
            PrimitiveBuffers::new(vertices.clone()),
        );
        vertices.write()[0] = 42.0;
        vertices.write().extend_from_slice(&[1.0, 1.0, 1.0]);

        assert!(node.vertices().ptr_eq(&vertices));
        assert_eq!(node.vertices().read()[0], 42.0);
        assert_eq!(node.vertex_count(), 4);
    }
}
