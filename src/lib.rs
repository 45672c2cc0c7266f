mod config;
mod dispatch;
mod domain;
mod error;
mod handler;
mod input;
mod payload;
mod pipeline;
mod secrets;
mod store;
mod telemetry;
mod trigger;

pub use config::Config;
pub use dispatch::{DispatchResponse, Dispatcher, Endpoint, HttpDispatcher};
pub use domain::{
    CustomerId, EnrichmentRecord, InputRow, LookupOutcome, cashback::filter_cashback_refs,
    package::normalize_package_name,
};
pub use error::Error;
pub use handler::{HandlerResponse, handle_event};
pub use payload::{
    MergeFields, NotificationRequest, PayloadStatics, ReferenceNumber, build_merge_fields,
    build_request,
};
pub use pipeline::{BatchSummary, DispatchRecord};
pub use secrets::{EnvSecretStore, SecretStore};
pub use store::{
    ReferenceLookup, StoreConnection, StoreConnector, StoreTarget,
    pg::{PgConnector, PgLookup},
};
pub use telemetry::setup_logging;
pub use trigger::{FsObjectStore, ObjectLocation, ObjectStore, TriggerEvent};

/// Sends one cashback notification per row of a CSV source and reports how the batch went.
///
/// Every row is enriched through a lookup on a single store connection, which is opened before
/// the first row and closed after the last one, even for a file without data lines. The
/// resulting request is handed to `dispatcher`.
///
/// # Error handling
///
/// A row can fail on its own: it may be malformed, the customer may be unknown to the store, or
/// the store may fail to answer. Such rows are reported to the caller-supplied `on_error`
/// callback and processing continues with the next row. Rows whose request reached the
/// dispatcher are reported to `on_success`, whatever the messaging API answered.
///
/// Only a failure to open the store connection is returned as an `Err`.
///
/// # Example
///
/// ```no_run
/// use cashback_notifier::{Config, EnvSecretStore, Error, HttpDispatcher, PgConnector, process};
///
/// let config = Config::load().unwrap();
/// let connector = PgConnector::new(config.store_target(), EnvSecretStore);
/// let dispatcher = HttpDispatcher::new(&config.endpoint()).unwrap();
/// let reader = std::fs::File::open("reminders.csv").unwrap();
///
/// let summary = process(
///     reader,
///     &connector,
///     &dispatcher,
///     &config.payload_statics(),
///     |e: Error| eprintln!("skipped: {e}"),
///     |record| println!("{record}"),
/// )
/// .unwrap();
/// println!("{} of {} rows dispatched", summary.dispatched, summary.rows);
/// ```
pub fn process<C: StoreConnector>(
    reader: impl std::io::Read,
    connector: &C,
    dispatcher: &impl Dispatcher,
    statics: &PayloadStatics,
    on_error: impl FnMut(Error),
    on_success: impl FnMut(DispatchRecord),
) -> Result<BatchSummary, Error> {
    pipeline::run_batch(reader, connector, dispatcher, statics, on_error, on_success)
}
