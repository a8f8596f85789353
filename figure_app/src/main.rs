//! Headless figure demo
//!
//! Animates a small scene on a producer thread and plays its draw records back
//! on the main thread through a backend that only tallies what it is asked to
//! draw. Pass a `.toml` or `.ron` pipeline configuration as the first argument
//! to override the defaults.

use std::sync::Arc;
use std::thread;

use micro3d_render::foundation::logging::{self, debug, error, info};
use micro3d_render::foundation::math::{Mat4, Vec3};
use micro3d_render::prelude::*;
use slotmap::{new_key_type, SlotMap};

const FRAMES: u64 = 240;
const FRAMES_PER_SECOND: f32 = 60.0;
const TEXTURES: [TextureHandle; 2] = [TextureHandle(1), TextureHandle(2)];
const SPRITE_TEXTURE: TextureHandle = TextureHandle(3);

new_key_type! {
    struct FigureKey;
}

struct SceneFigure {
    figure: Figure,
    orbit_radius: f32,
    spin_speed: f32,
    attrs: RenderAttrs,
}

impl SceneFigure {
    fn pose_at(&self, seconds: f32) -> RigidPose {
        let angle = seconds * self.spin_speed;
        let offset = Vec3::new(
            self.orbit_radius * angle.cos(),
            0.0,
            self.orbit_radius * angle.sin(),
        );
        let transform = Mat4::new_translation(&offset) * Mat4::new_rotation(Vec3::y() * angle);
        RigidPose::new(AffineMatrix::from_mat4(&transform))
    }
}

/// Axis-aligned cube with per-face normals, four vertices per face
fn cube_model(name: &str, half: f32) -> Model {
    let mut vertices = Vec::with_capacity(6 * 4 * 3);
    let mut normals = Vec::with_capacity(6 * 4 * 3);
    for axis in 0..3 {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        for sign in [-1.0_f32, 1.0] {
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let mut position = [0.0_f32; 3];
                position[axis] = sign * half;
                position[u] = su * half;
                position[v] = sv * half;
                vertices.extend_from_slice(&position);

                let mut normal = [0.0_f32; 3];
                normal[axis] = sign;
                normals.extend_from_slice(&normal);
            }
        }
    }
    Model::new(name, vertices, Some(normals))
}

#[allow(clippy::cast_precision_loss)]
fn grid_lines(half_extent: i32, spacing: f32) -> Vec<f32> {
    let edge = half_extent as f32 * spacing;
    let mut lines = Vec::new();
    for i in -half_extent..=half_extent {
        let offset = i as f32 * spacing;
        lines.extend_from_slice(&[offset, 0.0, -edge, offset, 0.0, edge]);
        lines.extend_from_slice(&[-edge, 0.0, offset, edge, 0.0, offset]);
    }
    lines
}

fn build_scene(config: &PipelineConfig) -> RenderResult<SlotMap<FigureKey, SceneFigure>> {
    let cube = Arc::new(cube_model("cube", 0.5));
    let crate_box = Arc::new(cube_model("crate", 1.0));

    let layout = [
        (&cube, 0.0, 0.8, RenderAttrs::LIGHTING),
        (&cube, 3.0, 0.5, RenderAttrs::LIGHTING | RenderAttrs::TOON_SHADING),
        (
            &crate_box,
            5.0,
            -0.3,
            RenderAttrs::LIGHTING | RenderAttrs::SEMI_TRANSPARENT | RenderAttrs::BLEND_HALF,
        ),
    ];

    let mut scene = SlotMap::with_key();
    for (model, orbit_radius, spin_speed, attrs) in layout {
        let figure = Figure::with_config(Arc::clone(model), RigidPose::identity(), config)?;
        scene.insert(SceneFigure {
            figure,
            orbit_radius,
            spin_speed,
            attrs,
        });
    }
    Ok(scene)
}

#[allow(clippy::cast_precision_loss)]
fn produce(scene: &SlotMap<FigureKey, SceneFigure>, mut sender: RecordSender) -> RenderResult<()> {
    let grid = ClientBuffer::new(grid_lines(8, 1.0));
    let grid_colors = ClientBuffer::new(vec![96_u8; grid.len()]);
    let sprites = ClientBuffer::new(vec![0.0, 2.5, 0.0, 4.0, 2.5, 0.0]);
    let sprite_uv = ClientBuffer::new(vec![0_u8, 0, 255, 255]);

    let mut params = RenderParams::new()
        .with_view(AffineMatrix::translation(0.0, -2.0, -12.0))
        .with_projection(ProjectionMatrix::perspective(16.0 / 9.0, 1.0, 0.1, 100.0))
        .with_light(Light::new(0.3, 0.7, [0.0, -1.0, -0.5]))
        .with_toon(96, 224, 64);

    for frame in 0..FRAMES {
        let seconds = frame as f32 / FRAMES_PER_SECOND;

        params.set_textures(&TEXTURES);
        for entry in scene.values() {
            params.attrs = entry.attrs;
            entry.figure.set_source(entry.pose_at(seconds));
            sender.submit(FigureNode::obtain(&params, &entry.figure)?.into())?;
        }

        params.attrs = RenderAttrs::empty();
        let grid_node = PrimitiveNode::new(
            &params,
            PrimitiveKind::Lines,
            PrimitiveBuffers::new(grid.clone()).with_colors(grid_colors.clone()),
        );
        sender.submit(grid_node.into())?;

        params.set_textures(&[SPRITE_TEXTURE]);
        let sprite_node = PrimitiveNode::construct(
            &params,
            PrimitiveKind::PointSprites.command(),
            PrimitiveBuffers::new(sprites.clone()).with_tex_coords(sprite_uv.clone()),
        )?;
        sender.submit(sprite_node.into())?;

        sender.end_frame()?;
    }
    Ok(())
}

fn consume(receiver: RecordReceiver, backend: &mut TallyBackend) -> RenderResult<usize> {
    let mut rendered = 0;
    for _ in 0..FRAMES {
        rendered += receiver.render_frame(backend)?.total();
    }
    Ok(rendered)
}

/// Backend that counts what it would have drawn
#[derive(Debug, Default)]
struct TallyBackend {
    figure_floats: usize,
    primitive_vertices: usize,
    textured_draws: usize,
    frames: u64,
}

impl RenderBackend for TallyBackend {
    fn draw_figure(&mut self, call: &FigureDrawCall<'_>) -> RenderResult<()> {
        self.figure_floats += call.vertices.len();
        if !call.textures.is_empty() {
            self.textured_draws += 1;
        }
        Ok(())
    }

    fn draw_primitive(&mut self, node: &PrimitiveNode) -> RenderResult<()> {
        self.primitive_vertices += node.vertex_count();
        if node.shading().is_textured() && node.texture().is_some() {
            self.textured_draws += 1;
        }
        Ok(())
    }

    fn finish_frame(&mut self, frame: u64) -> RenderResult<()> {
        self.frames += 1;
        if frame % 60 == 0 {
            debug!("Frame {} presented", frame);
        }
        Ok(())
    }
}

fn load_config() -> Result<PipelineConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => PipelineConfig::load_from_file(&path)?,
        None => PipelineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let scene = build_scene(config)?;
    let (sender, receiver) = record_channel(config);
    let mut backend = TallyBackend::default();

    let rendered = thread::scope(|scope| -> Result<usize, Box<dyn std::error::Error>> {
        let producer = scope.spawn(|| produce(&scene, sender));
        // Dropping the receiver on a consumer error unblocks the producer.
        let consumed = consume(receiver, &mut backend);
        producer.join().map_err(|_| "producer thread panicked")??;
        Ok(consumed?)
    })?;

    info!(
        "Rendered {} records over {} frames ({} figure floats, {} primitive vertices, {} textured draws)",
        rendered, backend.frames, backend.figure_floats, backend.primitive_vertices, backend.textured_draws
    );
    for (key, entry) in &scene {
        let stats = entry.figure.pool_stats();
        info!(
            "{:?} '{}': {} pooled, {} reused, {} allocated, {} dropped",
            key,
            entry.figure.model().name(),
            entry.figure.pooled(),
            stats.claimed,
            stats.missed,
            stats.dropped
        );
    }
    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init();
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    logging::init_with_level(&config.log_level);
    info!("Starting figure demo ({} frames)", FRAMES);

    if let Err(e) = run(&config) {
        error!("Figure demo failed: {}", e);
        std::process::exit(1);
    }
    info!("Figure demo completed successfully");
}
