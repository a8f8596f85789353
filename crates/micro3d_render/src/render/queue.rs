//! # Record Hand-off
//!
//! Single-producer/single-consumer channel carrying draw records from the
//! producing side to the consuming side. Sending a record moves it: the
//! producer cannot write to it again until a later claim hands it back from a
//! reuse stack.
//!
//! Records arrive in submission order. The producer closes each frame with an
//! end-of-frame marker so the consumer knows when to call
//! [`RenderBackend::finish_frame`]. A lagging consumer makes records queue up;
//! with a bounded channel the producer waits instead. Nothing is discarded.

use crate::config::PipelineConfig;
use crate::render::{RenderBackend, RenderError, RenderNode, RenderResult};

enum Envelope {
    Record(RenderNode),
    EndFrame(u64),
}

/// Per-frame counts reported by the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Frame number
    pub frame: u64,
    /// Figure records rendered
    pub figures: usize,
    /// Primitive records rendered
    pub primitives: usize,
}

impl FrameStats {
    /// Records rendered of either kind
    pub const fn total(&self) -> usize {
        self.figures + self.primitives
    }

    fn count(&mut self, node: &RenderNode) {
        match node {
            RenderNode::Figure(_) => self.figures += 1,
            RenderNode::Primitive(_) => self.primitives += 1,
        }
    }
}

/// Create a connected sender/receiver pair
///
/// `config.queue_capacity` bounds the number of envelopes in flight; `None`
/// gives an unbounded channel. A capacity of zero is raised to one so that a
/// submit never waits for the consumer to be inside a receive.
pub fn record_channel(config: &PipelineConfig) -> (RecordSender, RecordReceiver) {
    let (tx, rx) = match config.queue_capacity {
        Some(0) => {
            log::warn!("Record queue capacity of 0 raised to 1");
            flume::bounded(1)
        }
        Some(capacity) => flume::bounded(capacity),
        None => flume::unbounded(),
    };
    log::debug!("Record channel created (capacity: {:?})", config.queue_capacity);
    (RecordSender { tx, frame: 0 }, RecordReceiver { rx })
}

/// Producing end of the hand-off channel
pub struct RecordSender {
    tx: flume::Sender<Envelope>,
    frame: u64,
}

impl RecordSender {
    /// Hand a fully built record to the consumer
    ///
    /// # Errors
    ///
    /// [`RenderError::QueueClosed`] when the receiver is gone. The record is
    /// recycled before returning, so pooled storage is not lost.
    pub fn submit(&self, node: RenderNode) -> RenderResult<()> {
        log::trace!("Submitting {} record for frame {}", node.kind(), self.frame);
        self.tx.send(Envelope::Record(node)).map_err(|flume::SendError(envelope)| {
            if let Envelope::Record(node) = envelope {
                node.recycle();
            }
            log::error!("Record receiver disconnected");
            RenderError::QueueClosed
        })
    }

    /// Close the current frame and start the next one
    ///
    /// Returns the number of the frame just closed.
    ///
    /// # Errors
    ///
    /// [`RenderError::QueueClosed`] when the receiver is gone.
    pub fn end_frame(&mut self) -> RenderResult<u64> {
        let frame = self.frame;
        self.tx
            .send(Envelope::EndFrame(frame))
            .map_err(|_| RenderError::QueueClosed)?;
        self.frame += 1;
        Ok(frame)
    }

    /// Number of the frame currently being produced
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Envelopes waiting for the consumer
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

/// Consuming end of the hand-off channel
pub struct RecordReceiver {
    rx: flume::Receiver<Envelope>,
}

impl RecordReceiver {
    /// Render and recycle records until the end of the next frame
    ///
    /// Blocks while the channel is empty.
    ///
    /// # Errors
    ///
    /// [`RenderError::QueueClosed`] when the producer disconnects mid-frame,
    /// or the first backend error. A record whose render fails is still
    /// recycled.
    pub fn render_frame(&self, backend: &mut dyn RenderBackend) -> RenderResult<FrameStats> {
        let mut stats = FrameStats::default();
        loop {
            match self.rx.recv().map_err(|_| RenderError::QueueClosed)? {
                Envelope::Record(node) => {
                    stats.count(&node);
                    Self::play(node, backend)?;
                }
                Envelope::EndFrame(frame) => {
                    stats.frame = frame;
                    backend.finish_frame(frame)?;
                    log::debug!(
                        "Frame {} rendered: {} figures, {} primitives",
                        frame,
                        stats.figures,
                        stats.primitives
                    );
                    return Ok(stats);
                }
            }
        }
    }

    /// Render everything already queued without waiting
    ///
    /// Frame markers reached along the way are reported to the backend.
    /// Returns the number of records rendered.
    ///
    /// # Errors
    ///
    /// The first backend error.
    pub fn render_pending(&self, backend: &mut dyn RenderBackend) -> RenderResult<usize> {
        let mut rendered = 0;
        for envelope in self.rx.try_iter() {
            match envelope {
                Envelope::Record(node) => {
                    rendered += 1;
                    Self::play(node, backend)?;
                }
                Envelope::EndFrame(frame) => backend.finish_frame(frame)?,
            }
        }
        Ok(rendered)
    }

    /// Whether the producer has gone away and nothing is left to render
    pub fn is_finished(&self) -> bool {
        self.rx.is_disconnected() && self.rx.is_empty()
    }

    fn play(node: RenderNode, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        let result = node.render(backend);
        node.recycle();
        result
    }
}
