//! Entry point reacting to the arrival of a source file.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    Error,
    dispatch::Dispatcher,
    payload::PayloadStatics,
    pipeline::{BatchSummary, run_batch},
    store::StoreConnector,
    trigger::{ObjectStore, TriggerEvent},
};

const SUCCESS_BODY: &str = "Successfully processed CSV data.";
const FAILURE_BODY: &str = "Error processing CSV data.";

/// Outcome reported to the caller of the process. Row failures are not reflected here.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: SUCCESS_BODY.to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            status_code: 500,
            body: FAILURE_BODY.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Fetches the file announced by `event` and runs it through the pipeline.
pub fn handle_event<C: StoreConnector>(
    event: &TriggerEvent,
    objects: &impl ObjectStore,
    connector: &C,
    dispatcher: &impl Dispatcher,
    statics: &PayloadStatics,
) -> HandlerResponse {
    match run(event, objects, connector, dispatcher, statics) {
        Ok(summary) => {
            info!(
                rows = summary.rows,
                dispatched = summary.dispatched,
                "Source file processed"
            );
            HandlerResponse::success()
        }
        Err(err) => {
            debug_assert!(err.is_fatal(), "row-level error escaped the batch: {err}");
            error!("Error processing CSV data: {err}");
            HandlerResponse::failure()
        }
    }
}

fn run<C: StoreConnector>(
    event: &TriggerEvent,
    objects: &impl ObjectStore,
    connector: &C,
    dispatcher: &impl Dispatcher,
    statics: &PayloadStatics,
) -> Result<BatchSummary, Error> {
    let location = event.source_location()?;
    let content = objects.fetch(&location)?;

    run_batch(
        content.as_bytes(),
        connector,
        dispatcher,
        statics,
        handle_row_error,
        |record| debug!("{record}"),
    )
}

// Just logs here; the customer identifier is part of the error message
fn handle_row_error(error: Error) {
    warn!("skipped row: {error}")
}
