//! Two-thread analysis/synthesis handoff.
//!
//! Analysis and the window processor stay on the calling thread. Synthesis
//! runs on a scoped worker that owns the sink for the length of the session.
//!
//! Windows move between the threads by ownership over two bounded channels:
//!
//! ```text
//!   analysis ──ready(Handoff)──▶ synthesis
//!       ▲                            │
//!       └──────────free(W)───────────┘
//! ```
//!
//! `free` starts with `depth` spare windows. Each delivery takes a spare,
//! swaps it into the ring in place of the oldest window, and sends the
//! oldest window on `ready`. Synthesis returns every window on `free` once
//! it has been overlap-added, so at most `depth` windows are ever in flight
//! and analysis blocks on `free` when synthesis falls behind.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::analysis::Resynthesis;
use crate::error::{Result, TransformError};
use crate::io::SampleSink;
use crate::ring::WindowRing;
use crate::synthesis::SynthesisStage;
use crate::window::SpectralWindow;

/// Lifecycle of a pipelined session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PipelineState {
    /// Spares allocated, worker not started.
    Idle,
    /// Analysis is producing windows.
    Running,
    /// End of stream sent, worker finishing queued windows.
    Draining,
    /// Worker joined.
    Stopped,
}

/// A window travelling from analysis to synthesis.
struct Handoff<W> {
    sequence: u64,
    window: W,
}

/// `None` marks the end of the stream.
type Message<W> = Option<Handoff<W>>;

#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl InFlight {
    fn sent(&self) {
        let now = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        self.max.fetch_max(now, Ordering::AcqRel);
    }

    fn returned(&self) {
        self.current.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Analysis-side end of the handoff.
pub(crate) struct PipelineProducer<'a, W> {
    ready: Sender<Message<W>>,
    free: Receiver<W>,
    next_sequence: u64,
    in_flight: &'a InFlight,
}

impl<W: SpectralWindow> Resynthesis<W> for PipelineProducer<'_, W> {
    fn deliver(&mut self, ring: &mut WindowRing<W>) -> Result<()> {
        let spare = self
            .free
            .recv()
            .map_err(|_| TransformError::coordination("synthesis stage stopped"))?;
        let window = ring.replace_oldest(spare);

        self.in_flight.sent();
        let handoff = Handoff {
            sequence: self.next_sequence,
            window,
        };
        self.ready
            .send(Some(handoff))
            .map_err(|_| TransformError::coordination("synthesis stage stopped"))?;
        self.next_sequence += 1;
        Ok(())
    }
}

/// Outcome of a pipelined session besides the producer's own result.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PipelineReport {
    pub windows_sent: u64,
    pub max_in_flight: usize,
}

/// Owns the spare windows and runs one pipelined session.
pub(crate) struct PipelineCoordinator<W> {
    spares: Vec<W>,
    state: PipelineState,
}

impl<W: SpectralWindow> PipelineCoordinator<W> {
    /// Allocate `depth` spare windows for the free list.
    pub fn new(depth: usize, spectrum_size: usize) -> Result<Self> {
        let mut spares = Vec::new();
        spares
            .try_reserve_exact(depth)
            .map_err(|e| TransformError::allocation("pipeline window pool", e))?;
        spares.extend((0..depth).map(|_| W::with_spectrum_size(spectrum_size)));
        Ok(Self {
            spares,
            state: PipelineState::Idle,
        })
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!("pipeline: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run `produce` on the calling thread while a worker reconstructs the
    /// windows it delivers into `sink`.
    ///
    /// The worker is joined before this returns, on every path. A failure on
    /// the worker side takes precedence over the disconnect it causes on the
    /// producer side.
    pub fn run<K, T, F>(
        &mut self,
        stage: &mut SynthesisStage,
        sink: &mut K,
        produce: F,
    ) -> (Result<T>, PipelineReport)
    where
        K: SampleSink + Send + ?Sized,
        F: FnOnce(&mut PipelineProducer<'_, W>) -> Result<T>,
    {
        let depth = self.spares.len();
        let (ready_tx, ready_rx) = bounded::<Message<W>>(depth);
        let (free_tx, free_rx) = bounded::<W>(depth);
        for spare in self.spares.drain(..) {
            // Capacity equals the number of spares.
            let _ = free_tx.try_send(spare);
        }

        let in_flight = &InFlight::default();
        self.transition(PipelineState::Running);

        let (produced, consumed, windows_sent) = thread::scope(|scope| {
            // Channel ends move into the worker; its exit (or panic)
            // disconnects a blocked producer.
            let worker = scope.spawn(move || synthesize(stage, sink, ready_rx, free_tx, in_flight));

            let mut producer = PipelineProducer {
                ready: ready_tx,
                free: free_rx,
                next_sequence: 0,
                in_flight,
            };
            let produced = produce(&mut producer);
            let windows_sent = producer.next_sequence;

            self.transition(PipelineState::Draining);
            let PipelineProducer { ready, free, .. } = producer;
            // Fails only if the worker already exited; its result says why.
            let _ = ready.send(None);
            drop(ready);

            let consumed = worker
                .join()
                .unwrap_or_else(|_| Err(TransformError::coordination("synthesis thread panicked")));

            // Reclaim the pool for the next run.
            self.spares.extend(free.try_iter());
            (produced, consumed, windows_sent)
        });
        self.transition(PipelineState::Stopped);

        let report = PipelineReport {
            windows_sent,
            max_in_flight: in_flight.max.load(Ordering::Acquire),
        };
        let result = match (produced, consumed) {
            (Ok(value), Ok(())) => Ok(value),
            (Err(TransformError::Coordination(_)), Err(worker)) => Err(worker),
            (Err(e), _) => Err(e),
            (Ok(_), Err(worker)) => Err(worker),
        };
        (result, report)
    }
}

/// Worker loop: reconstruct windows in arrival order until end of stream.
fn synthesize<W, K>(
    stage: &mut SynthesisStage,
    sink: &mut K,
    ready: Receiver<Message<W>>,
    free: Sender<W>,
    in_flight: &InFlight,
) -> Result<()>
where
    W: SpectralWindow,
    K: SampleSink + ?Sized,
{
    let mut expected = 0u64;
    loop {
        let handoff = match ready.recv() {
            Ok(Some(handoff)) => handoff,
            Ok(None) => return Ok(()),
            Err(_) => {
                return Err(TransformError::coordination(
                    "analysis stage disconnected before end of stream",
                ));
            }
        };
        if handoff.sequence != expected {
            return Err(TransformError::coordination(format!(
                "window {} arrived out of order, expected {expected}",
                handoff.sequence
            )));
        }
        expected += 1;

        stage.reconstruct(handoff.window.coefficients(), &mut *sink)?;
        in_flight.returned();
        // Analysis may have finished already; the window is simply dropped.
        let _ = free.send(handoff.window);
    }
}
