//! Module focused on the logic of processing an individual row.

use tracing::{error, info, warn};

use crate::{
    Error,
    dispatch::Dispatcher,
    domain::{InputRow, LookupOutcome, cashback::filter_cashback_refs},
    error::not_found_error,
    payload::{self, PayloadStatics},
    pipeline::DispatchRecord,
    store::ReferenceLookup,
};

/// Runs one row through filtering, lookup, payload assembly and dispatch.
///
/// Returns an error when the row is skipped before dispatch. Once a request has been handed to
/// the dispatcher the row counts as processed, whatever the API answered.
pub(super) fn process_row(
    row: &InputRow,
    lookup: &mut impl ReferenceLookup,
    dispatcher: &impl Dispatcher,
    statics: &PayloadStatics,
) -> Result<DispatchRecord, Error> {
    let customer_id = row.customer_id();
    let cashback_refs = filter_cashback_refs(row.cashback_refs());

    let enrichment = match lookup.lookup(customer_id)? {
        LookupOutcome::Found(record) => record,
        LookupOutcome::NotFound => return Err(not_found_error(customer_id)),
    };

    let request = payload::build_request(&enrichment, cashback_refs, customer_id, statics)?;
    let correlation_id = request.correlation_id;

    let status = match dispatcher.dispatch(&request) {
        Ok(response) if response.is_delivered() => {
            info!(
                status = response.status,
                response = %response.body,
                %correlation_id,
                "Notification sent to the messaging API"
            );
            Some(response.status)
        }
        Ok(response) => {
            warn!(
                status = response.status,
                response = %response.body,
                %correlation_id,
                "Messaging API rejected the notification"
            );
            Some(response.status)
        }
        Err(err) => {
            error!(%correlation_id, "{err}");
            None
        }
    };

    Ok(DispatchRecord {
        customer_id: customer_id.clone(),
        correlation_id,
        status,
    })
}
