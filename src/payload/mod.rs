//! Module assembling the request body sent to the messaging API for one row.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{CustomerId, EnrichmentRecord, package::normalize_package_name};
use crate::error::{Error, payload_error};


const USER_TYPE: &str = "member";
const COMM_TYPE: &str = "email";

/// Process-wide values copied into every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadStatics {
    pub tenant_id: String,
    pub application_id: String,
    pub sender_identity: String,
    pub sender_name: String,
    pub template_name: String,
}

/// Template variables of the notification.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MergeFields {
    #[serde(rename = "params.firstName")]
    pub first_name: String,
    #[serde(rename = "params.packageName")]
    pub package_name: String,
    #[serde(rename = "params.cashbackCount")]
    pub cashback_count: usize,
    #[serde(rename = "params.reffnumberList")]
    pub reference_numbers: Vec<ReferenceNumber>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReferenceNumber {
    #[serde(rename = "reffNumbers")]
    pub reference_number: String,
}

/// Body of the request posted to the messaging API.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub correlation_id: Uuid,
    pub tenant_id: String,
    pub application_id: String,
    #[serde(rename = "timeStamp")]
    pub timestamp: String,
    pub user_type: &'static str,
    pub member_id: String,
    pub attributes: Attributes,
    pub message_configuration: MessageConfiguration,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub external_ref_id: CustomerId,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageConfiguration {
    pub comm_type: &'static str,
    pub sender_identity: String,
    pub receiver_identity: String,
    pub template_name: String,
    pub merge_fields: MergeFields,
    pub email_message: EmailMessage,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub sender_name: String,
}

impl NotificationRequest {
    pub fn customer_id(&self) -> &CustomerId {
        &self.attributes.external_ref_id
    }

    pub fn merge_fields(&self) -> &MergeFields {
        &self.message_configuration.merge_fields
    }

    pub fn recipient(&self) -> &str {
        &self.message_configuration.receiver_identity
    }
}

/// Builds the template variables from the enrichment data and the surviving cashback references.
pub fn build_merge_fields(enrichment: &EnrichmentRecord, cashback_refs: Vec<String>) -> MergeFields {
    let reference_numbers: Vec<ReferenceNumber> = cashback_refs
        .into_iter()
        .map(|reference_number| ReferenceNumber { reference_number })
        .collect();

    MergeFields {
        first_name: enrichment.first_name.clone(),
        package_name: normalize_package_name(&enrichment.package_name),
        cashback_count: reference_numbers.len(),
        reference_numbers,
    }
}

/// Builds the request for one customer, stamped with a fresh correlation id and the current time.
pub fn build_request(
    enrichment: &EnrichmentRecord,
    cashback_refs: Vec<String>,
    customer_id: &CustomerId,
    statics: &PayloadStatics,
) -> Result<NotificationRequest, Error> {
    build_request_at(
        enrichment,
        cashback_refs,
        customer_id,
        statics,
        Uuid::new_v4(),
        Utc::now(),
    )
}

pub(crate) fn build_request_at(
    enrichment: &EnrichmentRecord,
    cashback_refs: Vec<String>,
    customer_id: &CustomerId,
    statics: &PayloadStatics,
    correlation_id: Uuid,
    now: DateTime<Utc>,
) -> Result<NotificationRequest, Error> {
    if enrichment.primary_email.is_empty() {
        return Err(payload_error(customer_id, "no recipient email address"));
    }
    if enrichment.member_id.is_empty() {
        return Err(payload_error(customer_id, "no member id"));
    }

    let merge_fields = build_merge_fields(enrichment, cashback_refs);

    Ok(NotificationRequest {
        correlation_id,
        tenant_id: statics.tenant_id.clone(),
        application_id: statics.application_id.clone(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        user_type: USER_TYPE,
        member_id: enrichment.member_id.clone(),
        attributes: Attributes {
            external_ref_id: customer_id.clone(),
        },
        message_configuration: MessageConfiguration {
            comm_type: COMM_TYPE,
            sender_identity: statics.sender_identity.clone(),
            receiver_identity: enrichment.primary_email.clone(),
            template_name: statics.template_name.clone(),
            merge_fields,
            email_message: EmailMessage {
                sender_name: statics.sender_name.clone(),
            },
        },
    })
}
