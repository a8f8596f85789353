//! Scenario tests spanning records, reuse stacks and the hand-off channel

mod handoff;

use crate::render::{
    FigureDrawCall, PrimitiveKind, PrimitiveNode, PrimitiveShading, RenderBackend, RenderError,
    RenderResult,
};

/// What the backend saw for one draw
#[derive(Debug, Clone, PartialEq)]
enum Drawn {
    Figure {
        model: String,
        vertices: Vec<f32>,
        vertex_addr: usize,
        has_normals: bool,
        textures: usize,
        attrs: u32,
    },
    Primitive {
        kind: PrimitiveKind,
        shading: PrimitiveShading,
        vertices: Vec<f32>,
    },
}

#[derive(Default)]
struct RecordingBackend {
    drawn: Vec<Drawn>,
    finished: Vec<u64>,
    fail_primitives: bool,
}

impl RenderBackend for RecordingBackend {
    fn draw_figure(&mut self, call: &FigureDrawCall<'_>) -> RenderResult<()> {
        self.drawn.push(Drawn::Figure {
            model: call.model.name().to_string(),
            vertices: call.vertices.to_vec(),
            vertex_addr: call.vertices.as_ptr() as usize,
            has_normals: call.normals.is_some(),
            textures: call.textures.len(),
            attrs: call.attrs.bits(),
        });
        Ok(())
    }

    fn draw_primitive(&mut self, node: &PrimitiveNode) -> RenderResult<()> {
        if self.fail_primitives {
            return Err(RenderError::Backend("primitive path disabled".to_string()));
        }
        self.drawn.push(Drawn::Primitive {
            kind: node.kind(),
            shading: node.shading(),
            vertices: node.vertices().read().clone(),
        });
        Ok(())
    }

    fn finish_frame(&mut self, frame: u64) -> RenderResult<()> {
        self.finished.push(frame);
        Ok(())
    }
}
