//! Producer/consumer hand-off across threads

use std::sync::Arc;
use std::thread;

use super::{Drawn, RecordingBackend};
use crate::config::PipelineConfig;
use crate::foundation::buffer::ClientBuffer;
use crate::foundation::math::AffineMatrix;
use crate::render::{
    record_channel, Figure, FigureNode, Model, PrimitiveBuffers, PrimitiveKind, PrimitiveNode,
    RenderError, RenderNode, RenderParams, RigidPose,
};

const FRAMES: u64 = 64;

fn triangle_figure(name: &str) -> Figure {
    let model = Arc::new(Model::new(
        name,
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        None,
    ));
    Figure::new(model, RigidPose::identity())
}

/// Produce `FRAMES` frames of two figures and one primitive on a second thread
fn run_frames(config: &PipelineConfig) -> (RecordingBackend, Vec<Figure>) {
    let figures = vec![triangle_figure("left"), triangle_figure("right")];
    let (mut sender, receiver) = record_channel(config);

    let producer_figures = figures.clone();
    let producer = thread::spawn(move || {
        let mut params = RenderParams::default();
        let lines = ClientBuffer::new(vec![0.0_f32; 6]);
        for frame in 0..FRAMES {
            params.toon_threshold = frame as i32;
            for figure in &producer_figures {
                figure.set_source(RigidPose::new(AffineMatrix::translation(
                    frame as f32,
                    0.0,
                    0.0,
                )));
                sender.submit(FigureNode::obtain(&params, figure)?.into())?;
            }
            let primitive = PrimitiveNode::new(
                &params,
                PrimitiveKind::Lines,
                PrimitiveBuffers::new(lines.clone()),
            );
            sender.submit(primitive.into())?;
            sender.end_frame()?;
        }
        Ok::<_, RenderError>(())
    });

    let consumer = thread::spawn(move || {
        let mut backend = RecordingBackend::default();
        for frame in 0..FRAMES {
            let stats = receiver.render_frame(&mut backend).unwrap();
            assert_eq!(stats.frame, frame);
            assert_eq!(stats.figures, 2);
            assert_eq!(stats.primitives, 1);
        }
        assert_eq!(receiver.render_pending(&mut backend).unwrap(), 0);
        backend
    });

    producer.join().unwrap().unwrap();
    let backend = consumer.join().unwrap();
    (backend, figures)
}

fn figure_offsets(backend: &RecordingBackend, name: &str) -> Vec<f32> {
    backend
        .drawn
        .iter()
        .filter_map(|drawn| match drawn {
            Drawn::Figure {
                model, vertices, ..
            } if model == name => Some(vertices[0]),
            _ => None,
        })
        .collect()
}

fn check_run(backend: &RecordingBackend, figures: &[Figure], in_flight_bound: u64) {
    assert_eq!(backend.finished, (0..FRAMES).collect::<Vec<_>>());
    assert_eq!(backend.drawn.len(), FRAMES as usize * 3);

    let expected: Vec<f32> = (0..FRAMES).map(|frame| frame as f32).collect();
    assert_eq!(figure_offsets(backend, "left"), expected);
    assert_eq!(figure_offsets(backend, "right"), expected);

    for figure in figures {
        let stats = figure.pool_stats();
        assert_eq!(stats.claimed + stats.missed, FRAMES);
        assert_eq!(stats.recycled, FRAMES);
        assert!(
            stats.missed <= in_flight_bound,
            "{} allocations for '{}'",
            stats.missed,
            figure.model().name()
        );
        assert_eq!(figure.pooled() as u64, stats.missed);
    }
}

#[test]
fn test_bounded_handoff_preserves_order_and_reuses_records() {
    let config = PipelineConfig::new().with_queue_capacity(4);
    let (backend, figures) = run_frames(&config);
    // Queued envelopes plus the record being rendered and the one being built.
    check_run(&backend, &figures, 6);
}

#[test]
fn test_unbounded_handoff_renders_every_frame_in_order() {
    let (backend, figures) = run_frames(&PipelineConfig::default());
    check_run(&backend, &figures, FRAMES);
}

#[test]
fn test_submit_after_receiver_dropped_recycles_record() {
    let figure = triangle_figure("orphan");
    let (sender, receiver) = record_channel(&PipelineConfig::default());
    drop(receiver);

    let node = FigureNode::obtain(&RenderParams::default(), &figure).unwrap();
    assert_eq!(sender.submit(node.into()), Err(RenderError::QueueClosed));
    assert_eq!(figure.pooled(), 1);
}

#[test]
fn test_receiver_reports_producer_disconnect() {
    let figure = triangle_figure("partial");
    let (sender, receiver) = record_channel(&PipelineConfig::default());
    sender
        .submit(FigureNode::obtain(&RenderParams::default(), &figure).unwrap().into())
        .unwrap();
    drop(sender);

    let mut backend = RecordingBackend::default();
    assert_eq!(
        receiver.render_frame(&mut backend),
        Err(RenderError::QueueClosed)
    );
    assert_eq!(backend.drawn.len(), 1);
    assert!(backend.finished.is_empty());
    assert_eq!(figure.pooled(), 1);
    assert!(receiver.is_finished());
}

#[test]
fn test_backend_failure_still_recycles() {
    let figure = triangle_figure("survivor");
    let (mut sender, receiver) = record_channel(&PipelineConfig::default());
    let params = RenderParams::default();

    sender
        .submit(RenderNode::from(PrimitiveNode::new(
            &params,
            PrimitiveKind::Points,
            PrimitiveBuffers::new(ClientBuffer::new(vec![0.0; 3])),
        )))
        .unwrap();
    sender
        .submit(FigureNode::obtain(&params, &figure).unwrap().into())
        .unwrap();
    sender.end_frame().unwrap();

    let mut backend = RecordingBackend {
        fail_primitives: true,
        ..RecordingBackend::default()
    };
    assert!(matches!(
        receiver.render_frame(&mut backend),
        Err(RenderError::Backend(_))
    ));

    // The rest of the frame is still queued and drains normally.
    backend.fail_primitives = false;
    assert_eq!(receiver.render_pending(&mut backend).unwrap(), 1);
    assert_eq!(backend.finished, vec![0]);
    assert_eq!(figure.pooled(), 1);
}

#[test]
fn test_render_pending_does_not_block() {
    let figure = triangle_figure("idle");
    let (mut sender, receiver) = record_channel(&PipelineConfig::new().with_queue_capacity(8));
    let mut backend = RecordingBackend::default();

    assert_eq!(receiver.render_pending(&mut backend).unwrap(), 0);

    for _ in 0..3 {
        sender
            .submit(FigureNode::obtain(&RenderParams::default(), &figure).unwrap().into())
            .unwrap();
    }
    assert_eq!(sender.pending(), 3);
    assert_eq!(sender.end_frame().unwrap(), 0);
    assert_eq!(sender.frame(), 1);

    assert_eq!(receiver.render_pending(&mut backend).unwrap(), 3);
    assert_eq!(sender.pending(), 0);
    assert_eq!(backend.finished, vec![0]);
    assert_eq!(figure.pooled(), 3);
    assert!(!receiver.is_finished());
}
