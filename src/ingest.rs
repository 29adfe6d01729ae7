//! Ingestion boundary: raw participant records in, instrument-exploded and
//! availability-normalized [`Person`]s out.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::availability::{canonicalize, normalize_availability, parse_instruments, RawDay};
use crate::data::{Person, PersonId, Role};
use crate::error::{Error, Result};

/// A participant as it arrives from a form or sheet export.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPerson {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    /// Free text such as `"guitar, drums"`.
    #[serde(default)]
    pub instruments: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub availability: Vec<RawDay>,
}

/// Builds one [`Person`] per (record, instrument), in record order.
///
/// Fails on a record without a name or with an instrument label outside the
/// known set. A record listing no instrument yields no people.
pub fn ingest(records: &[RawPerson], role: Role, canonicalize_labels: bool) -> Result<Vec<Person>> {
    let mut people = Vec::new();
    for (row, record) in records.iter().enumerate() {
        let name = record.name.trim();
        if name.is_empty() {
            return Err(Error::invalid(format!("{role} record {row} has no name")));
        }
        let instruments = parse_instruments(&record.instruments).map_err(|e| match e {
            Error::InvalidInput(msg) => Error::invalid(format!("{role} '{name}': {msg}")),
            other => other,
        })?;
        if instruments.is_empty() {
            warn!("{role} '{name}' lists no instrument and will be skipped");
            continue;
        }

        let mut availability = normalize_availability(&record.availability);
        if canonicalize_labels {
            availability = canonicalize(availability);
        }
        debug!(
            "{role} '{name}': {} instrument(s), {} slot(s)",
            instruments.len(),
            availability.len()
        );

        for instrument in instruments {
            people.push(Person {
                id: PersonId(row),
                name: name.to_string(),
                contact: record.contact.clone(),
                instrument,
                remarks: record.remarks.clone(),
                availability: availability.clone(),
            });
        }
    }
    Ok(people)
}
