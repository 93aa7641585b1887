use std::io::Write;

use crate::consts::CSV_HEADER;
use crate::core::TimeEntry;
use crate::error::AppError;

/// Write the Noko import file: fixed header, then one row per entry
pub(crate) fn write_entries_csv<W: Write>(writer: W, entries: &[TimeEntry]) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(CSV_HEADER)?;
    for entry in entries {
        writer.write_record(entry.to_record())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
