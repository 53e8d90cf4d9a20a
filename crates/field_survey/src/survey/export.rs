//! Delimited-text export of survey records.
//!
//! One header row, one comma-separated record per line, fields written as-is (no
//! quoting), coordinates with six decimals.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::survey::runner::SurveyRecord;

pub const CSV_HEADER: &str = "region,district,ward,grid_id,longitude,latitude";

/// Writes `records` to `writer`.
pub fn write_csv<W: Write>(mut writer: W, records: &[SurveyRecord]) -> Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{:.6},{:.6}",
            r.region, r.district, r.ward, r.grid_id, r.longitude, r.latitude
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `records` to a new file at `path`.
pub fn write_csv_file(path: impl AsRef<Path>, records: &[SurveyRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), records)?;
    info!("Wrote {} survey records to {}.", records.len(), path.display());
    Ok(())
}

/// Renders `records` as one string.
pub fn to_csv_string(records: &[SurveyRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
