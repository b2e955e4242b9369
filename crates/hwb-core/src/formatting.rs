//! Homework record → notification text.

use crate::{catalog, domain::HomeworkRecord, errors::Error, Result};

/// Render the notification for one record.
///
/// Fails with `MissingData` when the name or status is absent, and with
/// `UnknownStatus` for codes outside the catalog.
pub fn format_status(record: &HomeworkRecord) -> Result<String> {
    let (Some(name), Some(status)) = (record.name.as_deref(), record.status.as_deref()) else {
        return Err(Error::MissingData);
    };
    let entry = catalog::lookup(status)?;
    Ok(format!("{} \"{name}\"\n\n{}", entry.headline, entry.verdict))
}
