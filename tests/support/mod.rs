//! In-memory stand-ins for the external collaborators of the pipeline.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use cashback_notifier::{
    CustomerId, DispatchResponse, Dispatcher, EnrichmentRecord, Error, LookupOutcome,
    NotificationRequest, ObjectLocation, ObjectStore, PayloadStatics, ReferenceLookup,
    StoreConnection, StoreConnector,
};

pub(crate) const HEADER: &str = "CUSTOMER_IDENTIFIER,First/Reminder,Cashback Ref1,Cashback Ref2,Cashback Ref3,Cashback Ref4";

/// Builds a source file from data lines.
pub(crate) fn csv(lines: &[&str]) -> String {
    std::iter::once(HEADER)
        .chain(lines.iter().copied())
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn statics() -> PayloadStatics {
    PayloadStatics {
        tenant_id: "1024226".to_string(),
        application_id: "cashback-app".to_string(),
        sender_identity: "noreply@ufirst.example".to_string(),
        sender_name: "Ufirst".to_string(),
        template_name: "cashback-reminder".to_string(),
    }
}

pub(crate) fn member(first_name: &str, package_name: &str, member_id: &str) -> EnrichmentRecord {
    EnrichmentRecord {
        first_name: first_name.to_string(),
        package_name: package_name.to_string(),
        primary_email: format!("{}@example.com", first_name.to_lowercase()),
        member_id: member_id.to_string(),
    }
}

/// Reference store holding a fixed set of members. Counts connections opened and closed.
#[derive(Default)]
pub(crate) struct MemoryConnector {
    members: HashMap<String, EnrichmentRecord>,
    broken: Vec<String>,
    connects: Cell<usize>,
    closes: Rc<Cell<usize>>,
    refuse: bool,
}

impl MemoryConnector {
    pub(crate) fn with_member(mut self, customer_id: &str, record: EnrichmentRecord) -> Self {
        self.members.insert(customer_id.to_string(), record);
        self
    }

    /// Lookups of this customer fail as if the query timed out.
    pub(crate) fn with_failing_lookup(mut self, customer_id: &str) -> Self {
        self.broken.push(customer_id.to_string());
        self
    }

    pub(crate) fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.get()
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.get()
    }
}

pub(crate) struct MemoryConnection {
    members: HashMap<String, EnrichmentRecord>,
    broken: Vec<String>,
    closes: Rc<Cell<usize>>,
}

impl StoreConnector for MemoryConnector {
    type Connection = MemoryConnection;

    fn connect(&self) -> Result<MemoryConnection, Error> {
        self.connects.set(self.connects.get() + 1);
        if self.refuse {
            return Err(Error::Connection("password authentication failed".to_string()));
        }
        Ok(MemoryConnection {
            members: self.members.clone(),
            broken: self.broken.clone(),
            closes: Rc::clone(&self.closes),
        })
    }
}

impl ReferenceLookup for MemoryConnection {
    fn lookup(&mut self, customer_id: &CustomerId) -> Result<LookupOutcome, Error> {
        if self.broken.iter().any(|id| id == customer_id.as_str()) {
            return Err(Error::Lookup {
                customer_id: customer_id.clone(),
                message: "canceling statement due to statement timeout".to_string(),
            });
        }
        Ok(match self.members.get(customer_id.as_str()) {
            Some(record) => LookupOutcome::Found(record.clone()),
            None => LookupOutcome::NotFound,
        })
    }
}

impl StoreConnection for MemoryConnection {
    fn close(self) -> Result<(), Error> {
        self.closes.set(self.closes.get() + 1);
        Ok(())
    }
}

/// Dispatcher keeping every request it was handed.
pub(crate) struct RecordingDispatcher {
    sent: RefCell<Vec<NotificationRequest>>,
    status: u16,
}

impl RecordingDispatcher {
    pub(crate) fn answering(status: u16) -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            status,
        }
    }

    pub(crate) fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.borrow().clone()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&self, request: &NotificationRequest) -> Result<DispatchResponse, Error> {
        self.sent.borrow_mut().push(request.clone());
        Ok(DispatchResponse {
            status: self.status,
            body: r#"{"status":"queued"}"#.to_string(),
        })
    }
}

/// Object store serving a single file.
pub(crate) struct SingleObject {
    pub(crate) location: ObjectLocation,
    pub(crate) content: String,
}

impl ObjectStore for SingleObject {
    fn fetch(&self, location: &ObjectLocation) -> Result<String, Error> {
        if *location == self.location {
            Ok(self.content.clone())
        } else {
            Err(Error::Storage(format!(
                "NoSuchKey: {}/{}",
                location.bucket, location.key
            )))
        }
    }
}
