use serde::Serialize;

use crate::error::ImportError;
use crate::model::{EventInput, EventRecord, TimeValue};

/// Render records as indented JSON for the View/Edit JSON dialogs.
pub fn to_pretty_json(records: &[EventRecord]) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match records.serialize(&mut ser) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not render events as JSON");
            String::from("[]")
        }
    }
}

/// Parse user-edited JSON into event inputs without applying anything.
///
/// Accepts an array of `{name?, start?, end?}` objects where times are
/// epoch milliseconds or RFC 3339 strings. Epoch values chrono cannot
/// represent are rejected.
pub fn parse_import(text: &str) -> Result<Vec<EventInput>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_array() {
        return Err(ImportError::NotAnArray);
    }
    let inputs: Vec<EventInput> = serde_json::from_value(value)?;
    for (index, input) in inputs.iter().enumerate() {
        for time in [input.start, input.end].into_iter().flatten() {
            if let TimeValue::EpochMs(ms) = time {
                if !time.is_representable() {
                    return Err(ImportError::TimeOutOfRange { index, ms });
                }
            }
        }
    }
    Ok(inputs)
}
