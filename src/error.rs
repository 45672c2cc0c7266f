//! Module defining the errors which are exposed to the users of the crate

use crate::domain::CustomerId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid CSV, including rows missing one of the required columns
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Valid CSV, but the row cannot identify a customer
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// The reference store could not answer the query for this customer
    #[error("lookup failed (customer: {customer_id}): {message}")]
    Lookup {
        customer_id: CustomerId,
        message: String,
    },

    /// The reference store has no record for this customer
    #[error("no enrichment data found (customer: {customer_id})")]
    NotFound { customer_id: CustomerId },

    /// The reference store answered with a record lacking some of the expected fields
    #[error("malformed enrichment record (customer: {customer_id}): {message}")]
    MalformedRecord {
        customer_id: CustomerId,
        message: String,
    },

    /// The notification request could not be assembled
    #[error("cannot build notification (customer: {customer_id}): {message}")]
    Payload {
        customer_id: CustomerId,
        message: String,
    },

    /// The notification request could not be delivered to the messaging API
    #[error("dispatch failed (customer: {customer_id}): {message}")]
    Dispatch {
        customer_id: CustomerId,
        message: String,
    },

    #[error("invalid trigger event: {0}")]
    Event(String),

    #[error("object storage error: {0}")]
    Storage(String),

    #[error("secret retrieval error: {0}")]
    Secret(String),

    #[error("store connection error: {0}")]
    Connection(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error prevents the batch from being processed at all.
    /// Everything else is scoped to a single row.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Event(_)
                | Error::Storage(_)
                | Error::Secret(_)
                | Error::Connection(_)
                | Error::Config(_)
        )
    }

    /// The customer the error refers to, if it is scoped to one.
    pub fn customer_id(&self) -> Option<&CustomerId> {
        match self {
            Error::Lookup { customer_id, .. }
            | Error::NotFound { customer_id }
            | Error::MalformedRecord { customer_id, .. }
            | Error::Payload { customer_id, .. }
            | Error::Dispatch { customer_id, .. } => Some(customer_id),
            _ => None,
        }
    }
}

pub(crate) fn lookup_error(customer_id: &CustomerId, message: impl ToString) -> Error {
    Error::Lookup {
        customer_id: customer_id.clone(),
        message: message.to_string(),
    }
}

pub(crate) fn not_found_error(customer_id: &CustomerId) -> Error {
    Error::NotFound {
        customer_id: customer_id.clone(),
    }
}

pub(crate) fn malformed_record_error(customer_id: &CustomerId, message: impl Into<String>) -> Error {
    Error::MalformedRecord {
        customer_id: customer_id.clone(),
        message: message.into(),
    }
}

pub(crate) fn payload_error(customer_id: &CustomerId, message: impl Into<String>) -> Error {
    Error::Payload {
        customer_id: customer_id.clone(),
        message: message.into(),
    }
}

pub(crate) fn dispatch_error(customer_id: &CustomerId, message: impl ToString) -> Error {
    Error::Dispatch {
        customer_id: customer_id.clone(),
        message: message.to_string(),
    }
}
