//! Module defining the parsing logic used to convert the dropped source file into the rows fed to the pipeline.

use std::io::Read;

use serde::Deserialize;

use crate::domain::{CustomerId, InputRow};
use crate::error::Error;


/// Parses the data provided by the reader and returns an iterator over the parsing results, one per data line
pub(crate) fn parse_rows(reader: impl Read) -> impl Iterator<Item = Result<InputRow, Error>> {
    let csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.into_deserialize::<RawRow>().map(|result| {
        let raw = result?;
        InputRow::try_from(raw)
    })
}

// Intermediate type mirroring the required CSV columns; any other column is ignored
#[derive(Deserialize)]
struct RawRow {
    #[serde(rename = "CUSTOMER_IDENTIFIER")]
    customer_identifier: String,
    #[serde(rename = "First/Reminder")]
    reminder: String,
    #[serde(rename = "Cashback Ref1")]
    cashback_ref1: String,
    #[serde(rename = "Cashback Ref2")]
    cashback_ref2: String,
    #[serde(rename = "Cashback Ref3")]
    cashback_ref3: String,
    #[serde(rename = "Cashback Ref4")]
    cashback_ref4: String,
}

impl TryFrom<RawRow> for InputRow {
    type Error = crate::error::Error;

    fn try_from(raw: RawRow) -> Result<Self, Self::Error> {
        let RawRow {
            customer_identifier,
            reminder,
            cashback_ref1,
            cashback_ref2,
            cashback_ref3,
            cashback_ref4,
        } = raw;

        if customer_identifier.is_empty() {
            return Err(Error::InvalidRow(
                "empty CUSTOMER_IDENTIFIER".to_string(),
            ));
        }

        Ok(InputRow::new(
            CustomerId::new(customer_identifier),
            reminder,
            [cashback_ref1, cashback_ref2, cashback_ref3, cashback_ref4],
        ))
    }
}
