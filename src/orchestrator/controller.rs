//! Request controller.
//!
//! Runs the dialog's network work on the async runtime and reports completions
//! back to presentation layers, which own all dialog state.

use crate::api::{ApiError, SegmentApi};
use crate::dialog::{ActivationId, SubmitRequest};
use crate::model::{CreatedSegment, RawOption};
use crate::options::OptionsTicket;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{Duration, Instant};

/// Commands emitted by UI layers.
#[derive(Debug)]
pub(crate) enum UiCommand {
    FetchOptions(OptionsTicket),
    Submit(SubmitRequest),
    Quit,
}

/// Completions reported back to UI layers.
#[derive(Debug)]
pub(crate) enum DialogEvent {
    OptionsFetched {
        ticket: OptionsTicket,
        result: Result<Vec<RawOption>, ApiError>,
    },
    SubmissionFinished {
        activation: ActivationId,
        result: Result<CreatedSegment, ApiError>,
    },
}

/// How long a quit waits for outstanding requests before giving up on them.
const QUIT_GRACE: Duration = Duration::from_secs(3);

/// Serve UI commands until quit. Requests run concurrently and are never
/// cancelled; a quit waits briefly so an in-flight save is not cut off.
pub(crate) async fn run_controller(
    api: Arc<dyn SegmentApi>,
    event_tx: UnboundedSender<DialogEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) {
    let mut inflight: FuturesUnordered<BoxFuture<'static, DialogEvent>> = FuturesUnordered::new();
    let mut quit_deadline: Option<Instant> = None;
    let mut watchdog = tokio::time::interval(Duration::from_millis(250));

    loop {
        if quit_deadline.is_some() && inflight.is_empty() {
            break;
        }
        tokio::select! {
            cmd = cmd_rx.recv(), if quit_deadline.is_none() => {
                match cmd {
                    Some(UiCommand::FetchOptions(ticket)) => {
                        let api = api.clone();
                        inflight.push(Box::pin(async move {
                            let result = api.fetch_options().await;
                            DialogEvent::OptionsFetched { ticket, result }
                        }));
                    }
                    Some(UiCommand::Submit(request)) => {
                        let api = api.clone();
                        inflight.push(Box::pin(async move {
                            let SubmitRequest { activation, pending } = request;
                            let result = pending.send(api.as_ref()).await;
                            DialogEvent::SubmissionFinished { activation, result }
                        }));
                    }
                    Some(UiCommand::Quit) | None => {
                        if !inflight.is_empty() {
                            tracing::info!(pending = inflight.len(), "waiting for outstanding requests");
                        }
                        quit_deadline = Some(Instant::now() + QUIT_GRACE);
                    }
                }
            }
            Some(ev) = inflight.next(), if !inflight.is_empty() => {
                // The UI may already be gone during shutdown.
                let _ = event_tx.send(ev);
            }
            _ = watchdog.tick() => {
                if let Some(deadline) = quit_deadline {
                    if Instant::now() >= deadline {
                        tracing::warn!(pending = inflight.len(), "abandoning outstanding requests");
                        break;
                    }
                }
            }
        }
    }
}
