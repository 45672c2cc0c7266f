//! Module driving a whole source file through the notification pipeline

mod row;


use std::{fmt, io::Read};

use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::{
    Error,
    dispatch::Dispatcher,
    domain::CustomerId,
    input::parse_rows,
    payload::PayloadStatics,
    store::{StoreConnection, StoreConnector},
};

/// Public DTO describing a row whose notification was handed to the messaging API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub customer_id: CustomerId,
    pub correlation_id: Uuid,
    /// HTTP status answered by the API, `None` if the request never got an answer.
    pub status: Option<u16>,
}

impl DispatchRecord {
    pub fn is_delivered(&self) -> bool {
        self.status == Some(200)
    }
}

impl fmt::Display for DispatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            Some(status) => status.to_string(),
            None => "none".to_string(),
        };
        write!(
            f,
            "Dispatch {{ customer: {}, correlation_id: {}, status: {status} }}",
            self.customer_id, self.correlation_id
        )
    }
}

/// Counters of one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Data lines read from the source, including unparseable ones.
    pub rows: usize,
    /// Rows whose request was handed to the messaging API.
    pub dispatched: usize,
    /// Dispatched rows acknowledged with HTTP 200.
    pub delivered: usize,
    /// Rows abandoned before dispatch.
    pub skipped: usize,
}

///
/// Processes all rows of the source in file order over a single store connection.
/// Row failures are reported to `on_error` and do not stop the batch; only a failure to open the
/// connection is returned as an error.
///
pub(crate) fn run_batch<C: StoreConnector>(
    reader: impl Read,
    connector: &C,
    dispatcher: &impl Dispatcher,
    statics: &PayloadStatics,
    mut on_error: impl FnMut(Error),
    mut on_success: impl FnMut(DispatchRecord),
) -> Result<BatchSummary, Error> {
    let mut connection = connector.connect()?;
    let mut summary = BatchSummary::default();

    for result in parse_rows(reader) {
        summary.rows += 1;

        let row = match result {
            Ok(row) => row,
            Err(err) => {
                summary.skipped += 1;
                on_error(err);
                continue;
            }
        };

        let span = info_span!(
            "row",
            customer_id = %row.customer_id(),
            reminder = %row.reminder()
        );
        let _entered = span.enter();

        match row::process_row(&row, &mut connection, dispatcher, statics) {
            Ok(record) => {
                summary.dispatched += 1;
                if record.is_delivered() {
                    summary.delivered += 1;
                }
                on_success(record);
            }
            Err(err) => {
                summary.skipped += 1;
                on_error(err);
            }
        }
    }

    if let Err(err) = connection.close() {
        warn!("{err}");
    }

    info!(
        rows = summary.rows,
        dispatched = summary.dispatched,
        delivered = summary.delivered,
        skipped = summary.skipped,
        "Batch finished"
    );
    Ok(summary)
}
