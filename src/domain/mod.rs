//! Module for the types describing a notification row and the data it is enriched with.

pub(crate) mod cashback;
pub(crate) mod package;


use std::fmt;

use serde::Serialize;

use crate::error::{Error, malformed_record_error};

/// Number of cashback reference columns in the source file.
pub(crate) const CASHBACK_SLOTS: usize = 4;

/// External reference of a customer as delivered in the source file.
/// Keys the lookup in the reference store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    customer_id: CustomerId,
    reminder: String,
    cashback_refs: [String; CASHBACK_SLOTS],
}

impl InputRow {
    pub(crate) fn new(
        customer_id: CustomerId,
        reminder: String,
        cashback_refs: [String; CASHBACK_SLOTS],
    ) -> Self {
        Self {
            customer_id,
            reminder,
            cashback_refs,
        }
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// Content of the `First/Reminder` column. Carried for logging only.
    pub fn reminder(&self) -> &str {
        &self.reminder
    }

    /// The raw cashback references, placeholders included.
    pub fn cashback_refs(&self) -> &[String; CASHBACK_SLOTS] {
        &self.cashback_refs
    }
}

/// Customer data resolved from the reference store.
///
/// Only ever constructed with all four fields; a store answer lacking one of them
/// is reported as an error instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRecord {
    pub first_name: String,
    pub package_name: String,
    pub primary_email: String,
    pub member_id: String,
}

/// Names of the store columns an [`EnrichmentRecord`] is built from, in order.
pub(crate) const ENRICHMENT_COLUMNS: [&str; 4] =
    ["fname", "pkg_name", "primary_email_address", "ng_member_id"];

impl EnrichmentRecord {
    /// Builds the record from the store columns in [`ENRICHMENT_COLUMNS`] order.
    /// A missing column makes the whole record malformed.
    pub fn from_columns(
        customer_id: &CustomerId,
        columns: [Option<String>; 4],
    ) -> Result<Self, Error> {
        if let Some(idx) = columns.iter().position(Option::is_none) {
            return Err(malformed_record_error(
                customer_id,
                format!("column {} is NULL", ENRICHMENT_COLUMNS[idx]),
            ));
        }

        let [first_name, package_name, primary_email, member_id] =
            columns.map(Option::unwrap_or_default);
        Ok(Self {
            first_name,
            package_name,
            primary_email,
            member_id,
        })
    }
}

/// Result of a reference store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(EnrichmentRecord),
    NotFound,
}
