//! PostgreSQL implementation of the reference store.

use postgres::{Client, NoTls, Row, Statement};
use tracing::{debug, info};

use crate::{
    Error,
    domain::{CustomerId, ENRICHMENT_COLUMNS, EnrichmentRecord, LookupOutcome},
    error::{lookup_error, malformed_record_error},
    secrets::SecretStore,
    store::{ReferenceLookup, StoreConnection, StoreConnector, StoreTarget},
};

/// Connects to PostgreSQL with a password taken from the secret store.
pub struct PgConnector<S> {
    target: StoreTarget,
    secrets: S,
}

impl<S: SecretStore> PgConnector<S> {
    pub fn new(target: StoreTarget, secrets: S) -> Self {
        Self { target, secrets }
    }
}

impl<S: SecretStore> StoreConnector for PgConnector<S> {
    type Connection = PgLookup;

    fn connect(&self) -> Result<PgLookup, Error> {
        let target = &self.target;
        info!(
            host = %target.host,
            port = target.port,
            database = %target.database,
            "Connecting to the reference store"
        );

        let password = self.secrets.get_secret(&target.password_param)?;

        let config = client_config(target, password);
        let mut client = config
            .connect(NoTls)
            .map_err(|e| Error::Connection(e.to_string()))?;

        let statement = client
            .prepare(&lookup_query(&target.client_ids))
            .map_err(|e| Error::Connection(format!("cannot prepare lookup query: {e}")))?;

        info!("Reference store connection established");
        Ok(PgLookup { client, statement })
    }
}

/// Open PostgreSQL session with the lookup query already prepared.
pub struct PgLookup {
    client: Client,
    statement: Statement,
}

impl ReferenceLookup for PgLookup {
    fn lookup(&mut self, customer_id: &CustomerId) -> Result<LookupOutcome, Error> {
        debug!(%customer_id, "Querying the reference store");

        let row = self
            .client
            .query_opt(&self.statement, &[&customer_id.as_str()])
            .map_err(|e| lookup_error(customer_id, e))?;

        match row {
            Some(row) => record_from_row(customer_id, &row).map(LookupOutcome::Found),
            None => Ok(LookupOutcome::NotFound),
        }
    }
}

impl StoreConnection for PgLookup {
    fn close(self) -> Result<(), Error> {
        self.client
            .close()
            .map_err(|e| Error::Connection(e.to_string()))?;
        info!("Reference store connection closed");
        Ok(())
    }
}

/// Connection settings. Besides the server-side statement timeout, TCP keepalives and a TCP user
/// timeout bound how long a query can hang on a stalled network.
pub(crate) fn client_config(target: &StoreTarget, password: String) -> postgres::Config {
    let mut config = postgres::Config::new();
    config
        .host(&target.host)
        .port(target.port)
        .user(&target.user)
        .password(password)
        .dbname(&target.database)
        .connect_timeout(target.connect_timeout)
        .keepalives(true)
        .keepalives_idle(target.connect_timeout)
        .tcp_user_timeout(target.io_timeout())
        .options(&format!(
            "-c statement_timeout={}",
            target.statement_timeout.as_millis()
        ));
    config
}

/// Query resolving a customer's reference through the member, membership, solicitation and package
/// relations, restricted to the packages of the given clients.
pub(crate) fn lookup_query(client_ids: &[u64]) -> String {
    let client_ids = client_ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT sm.fname::text, p.pkg_name::text, sm.primary_email_address::text, sm.ng_member_id::text \
         FROM ng_intermediate_data_store.stage_membership_member smm \
         INNER JOIN ng_intermediate_data_store.stage_membership smp ON smp.membership_id = smm.membership_id \
         INNER JOIN ng_intermediate_data_store.solicitation s ON s.sol_id = smp.sol_id \
         INNER JOIN ng_intermediate_data_store.package p ON p.pkg_id = s.ben_pkg_id \
         INNER JOIN ng_intermediate_data_store.stage_member sm ON sm.member_id = smm.member_id \
         WHERE smm.ext_member_ref::text = $1 AND p.client_id IN ({client_ids}) \
         LIMIT 1"
    )
}

fn record_from_row(customer_id: &CustomerId, row: &Row) -> Result<EnrichmentRecord, Error> {
    if row.len() != ENRICHMENT_COLUMNS.len() {
        return Err(malformed_record_error(
            customer_id,
            format!(
                "expected {} columns, got {}",
                ENRICHMENT_COLUMNS.len(),
                row.len()
            ),
        ));
    }

    let mut columns: [Option<String>; 4] = Default::default();
    for (idx, column) in columns.iter_mut().enumerate() {
        *column = row
            .try_get::<_, Option<String>>(idx)
            .map_err(|e| lookup_error(customer_id, e))?;
    }
    EnrichmentRecord::from_columns(customer_id, columns)
}
