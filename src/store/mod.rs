//! Module for the access to the reference store holding the customer data used to enrich the rows.

pub(crate) mod pg;


use std::time::Duration;

use crate::{
    Error,
    domain::{CustomerId, LookupOutcome},
};

/// Resolves the enrichment data of a customer.
pub trait ReferenceLookup {
    /// Returns [`LookupOutcome::NotFound`] when the store has no matching record.
    /// Errors are scoped to the customer being looked up.
    fn lookup(&mut self, customer_id: &CustomerId) -> Result<LookupOutcome, Error>;
}

/// An open connection to the reference store. Lives for the duration of one batch.
pub trait StoreConnection: ReferenceLookup {
    fn close(self) -> Result<(), Error>;
}

/// Opens connections to the reference store.
pub trait StoreConnector {
    type Connection: StoreConnection;

    fn connect(&self) -> Result<Self::Connection, Error>;
}

/// Where and how to reach the reference store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
    /// Name of the secret holding the password of `user`.
    pub password_param: String,
    /// Only packages of these clients are considered by the lookup.
    pub client_ids: Vec<u64>,
    pub connect_timeout: Duration,
    pub statement_timeout: Duration,
}

impl StoreTarget {
    /// Longest time transmitted data may stay unacknowledged before the connection is dropped.
    /// Leaves the server room to cancel a statement on its own first.
    pub fn io_timeout(&self) -> Duration {
        self.statement_timeout + self.connect_timeout
    }
}
