//! The worker thread and its message loop.
//!
//! One dedicated thread owns all engine state and talks to the caller over a
//! pair of channels; nothing is shared. Long batches drain the request
//! channel at every yield point so a TERMINATE arriving mid-batch can cancel
//! the run instead of waiting behind it.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use simulation::{BatchRun, BatchStatus};

use crate::handler::{elapsed_ms, WorkerState};
use crate::protocol::{self, BatchStepPayload, Envelope, Response, ResponseBody, WorkerError};

/// Handle to a spawned worker: send request envelopes in, receive responses
/// out. Dropping the handle disconnects the channels and the worker exits on
/// its own; [`WorkerHandle::join`] waits for that explicitly.
pub struct WorkerHandle {
    requests: Sender<Envelope>,
    responses: Receiver<Response>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    /// Queue a request. False once the worker has shut down.
    pub fn send(&self, envelope: Envelope) -> bool {
        self.requests.send(envelope).is_ok()
    }

    /// Block for the next response. None once the worker has shut down and
    /// drained its outbox.
    pub fn recv(&self) -> Option<Response> {
        self.responses.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        self.responses.recv_timeout(timeout).ok()
    }

    /// Disconnect and wait for the worker thread to exit.
    pub fn join(self) {
        let WorkerHandle {
            requests,
            responses,
            thread,
        } = self;
        drop(requests);
        drop(responses);
        let _ = thread.join(); // Thread panic result intentionally ignored during shutdown
    }
}

/// Spawn the worker thread. WORKER_READY is emitted before any request is
/// served.
pub fn spawn() -> WorkerHandle {
    let (request_tx, request_rx) = mpsc::channel();
    let (response_tx, response_rx) = mpsc::channel();

    let thread = thread::spawn(move || run_loop(&request_rx, &response_tx));

    WorkerHandle {
        requests: request_tx,
        responses: response_rx,
        thread,
    }
}

fn run_loop(inbox: &Receiver<Envelope>, outbox: &Sender<Response>) {
    let mut state = WorkerState::new();

    match memory_stats::memory_stats() {
        Some(stats) => info!(physical_mem = stats.physical_mem, "worker started"),
        None => info!("worker started"),
    }
    let _ = outbox.send(Response::unsolicited(ResponseBody::WorkerReady {
        timestamp: Utc::now().timestamp_millis(),
    }));

    // Requests drained during a batch wait here for their turn.
    let mut pending: VecDeque<Envelope> = VecDeque::new();

    loop {
        let envelope = match pending.pop_front() {
            Some(envelope) => envelope,
            None => match inbox.recv() {
                Ok(envelope) => envelope,
                Err(_) => break, // caller dropped the handle
            },
        };

        if handle_envelope(&mut state, envelope, inbox, outbox, &mut pending) {
            break;
        }
    }

    info!("worker stopped");
}

/// Dispatch one envelope. True when the worker should shut down.
fn handle_envelope(
    state: &mut WorkerState,
    envelope: Envelope,
    inbox: &Receiver<Envelope>,
    outbox: &Sender<Response>,
    pending: &mut VecDeque<Envelope>,
) -> bool {
    let Envelope { id, kind, payload } = envelope;

    match kind.as_str() {
        protocol::INITIALIZE => {
            let body = match parse(&kind, payload) {
                Ok(request) => state.initialize(request),
                Err(err) => error_body(&err),
            };
            let _ = outbox.send(Response::to(id, body));
            false
        }
        protocol::STEP => {
            let body = match parse(&kind, payload) {
                Ok(request) => state.step(request),
                Err(err) => error_body(&err),
            };
            let _ = outbox.send(Response::to(id, body));
            false
        }
        protocol::BATCH_STEP => {
            match parse::<BatchStepPayload>(&kind, payload) {
                Ok(request) => run_batch(state, &id, request, inbox, outbox, pending),
                Err(err) => {
                    let _ = outbox.send(Response::to(id, error_body(&err)));
                }
            }
            false
        }
        protocol::TERMINATE => {
            let body = state.terminate();
            let _ = outbox.send(Response::to(id, body));
            true
        }
        other => {
            warn!(kind = other, "unknown request type");
            let err = WorkerError::UnknownType(other.to_string());
            let _ = outbox.send(Response::to(id, error_body(&err)));
            false
        }
    }
}

/// Drive one batch to completion, yielding to the request channel every
/// [`simulation::batch::YIELD_INTERVAL`] generations.
fn run_batch(
    state: &mut WorkerState,
    id: &str,
    request: BatchStepPayload,
    inbox: &Receiver<Envelope>,
    outbox: &Sender<Response>,
    pending: &mut VecDeque<Envelope>,
) {
    let BatchStepPayload {
        bacteria,
        parameters,
        steps,
        report_progress,
    } = request;
    let population = bacteria.len();
    info!(steps, population, "batch started");

    state.run_flag.set_running(true);
    let mut run = BatchRun::new(
        bacteria,
        parameters,
        steps,
        report_progress,
        state.run_flag.clone(),
    );

    let started = Instant::now();
    loop {
        let status = run.resume(&mut state.rng, |snapshot| {
            let _ = outbox.send(Response::to(
                id,
                ResponseBody::BatchStepProgress {
                    current_step: snapshot.current_step,
                    total_steps: snapshot.total_steps,
                    progress: snapshot.progress,
                    bacteria: snapshot.population,
                    statistics: snapshot.statistics,
                },
            ));
        });

        match status {
            BatchStatus::Yielded => drain_inbox(state, inbox, pending),
            BatchStatus::Complete(outcome) => {
                state
                    .performance
                    .record(elapsed_ms(started), outcome.population.len());
                info!(
                    steps_run = run.current_step(),
                    population = outcome.population.len(),
                    "batch complete"
                );
                let _ = outbox.send(Response::to(
                    id,
                    ResponseBody::BatchStepComplete {
                        bacteria: outcome.population,
                        statistics: outcome.statistics,
                    },
                ));
                return;
            }
        }
    }
}

/// Pull queued requests without blocking so a mid-batch TERMINATE can cancel
/// the run now; the drained requests are answered after the batch.
fn drain_inbox(
    state: &mut WorkerState,
    inbox: &Receiver<Envelope>,
    pending: &mut VecDeque<Envelope>,
) {
    loop {
        match inbox.try_recv() {
            Ok(envelope) => {
                if envelope.kind == protocol::TERMINATE {
                    debug!("terminate observed mid-batch, cancelling run");
                    state.run_flag.set_running(false);
                }
                pending.push_back(envelope);
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(kind: &str, payload: Value) -> Result<T, WorkerError> {
    serde_json::from_value(payload).map_err(|source| WorkerError::InvalidPayload {
        kind: kind.to_string(),
        source,
    })
}

fn error_body(err: &WorkerError) -> ResponseBody {
    ResponseBody::Error {
        error: err.to_string(),
    }
}
