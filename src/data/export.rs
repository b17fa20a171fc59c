//! Annotated-table export.
//!
//! The output always has exactly these columns, in this order:
//!
//! ```text
//! timestamp,axis1,axis2,axis3,vm,sleep,discard
//! ```
//!
//! Flags are written as `0`/`1`. Files are written to a hidden sibling and
//! renamed into place, so the target either holds the complete table or is
//! left as it was.

use crate::data::annotate::Annotation;
use crate::data::csv::write_record;
use crate::data::table::SampleTable;
use crate::error::{Result, ResultExt};
use chrono::NaiveDateTime;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output column order
pub const EXPORT_COLUMNS: [&str; 7] = ["timestamp", "axis1", "axis2", "axis3", "vm", "sleep", "discard"];

/// Timestamp format used in exported files
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Format a timestamp the way exported files store it
pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Render the annotated table as CSV text
pub fn render_csv(table: &SampleTable, annotation: &Annotation) -> String {
    debug_assert_eq!(table.len(), annotation.len());

    let mut out = String::with_capacity(table.len() * 48);
    write_record(&mut out, &EXPORT_COLUMNS);
    for (sample, flags) in table.samples().iter().zip(annotation.flags()) {
        write_record(
            &mut out,
            &[
                format_timestamp(sample.timestamp),
                sample.axis1.to_string(),
                sample.axis2.to_string(),
                sample.axis3.to_string(),
                sample.vm.to_string(),
                flag(flags.sleep).to_string(),
                flag(flags.discard).to_string(),
            ],
        );
    }
    out
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    path.with_file_name(format!(".{}.partial", name))
}

/// Write the annotated table to `path`, all or nothing
pub fn export_to_file(path: impl AsRef<Path>, table: &SampleTable, annotation: &Annotation) -> Result<()> {
    let path = path.as_ref();
    let partial = partial_path(path);
    let csv = render_csv(table, annotation);

    let written = (|| -> std::io::Result<()> {
        let mut file = std::fs::File::create(&partial)?;
        file.write_all(csv.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&partial, path)
    })();

    if written.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    written.with_context(|| format!("Failed to export {}", path.display()))?;

    tracing::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::annotate::annotate;
    use crate::data::markers::MarkerSequence;
    use crate::types::{Marker, MarkerKind};

    fn table() -> SampleTable {
        SampleTable::parse(
            "Timestamp,Axis1,Axis2,Axis3,VM,Extra\n\
             2019-01-05 10:00:00,1,2,3,50,x\n\
             2019-01-05 10:01:00,4,5,6,600.5,y\n\
             2019-01-05 10:02:00,7,8,9,60,z\n",
            "night.csv",
        )
        .unwrap()
    }

    #[test]
    fn test_render_csv() {
        let table = table();
        let mut markers = MarkerSequence::new();
        markers
            .append(Marker::new(table.samples()[1].timestamp, MarkerKind::SleepStart))
            .unwrap();
        markers
            .append(Marker::new(table.samples()[0].timestamp, MarkerKind::DiscardBefore))
            .unwrap();

        let csv = render_csv(&table, &annotate(&table, &markers));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,axis1,axis2,axis3,vm,sleep,discard");
        assert_eq!(lines[1], "2019-01-05 10:00:00,1,2,3,50,0,1");
        assert_eq!(lines[2], "2019-01-05 10:01:00,4,5,6,600.5,1,0");
        assert_eq!(lines[3], "2019-01-05 10:02:00,7,8,9,60,1,0");
        assert_eq!(lines.len(), 4);
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_fractional_timestamp() {
        let t = crate::data::table::parse_timestamp("2019-01-05 10:00:00.250").unwrap();
        assert_eq!(format_timestamp(t), "2019-01-05 10:00:00.250");
    }

    #[test]
    fn test_partial_path_is_hidden_sibling() {
        let p = partial_path(Path::new("/out/night.csv"));
        assert_eq!(p, PathBuf::from("/out/.night.csv.partial"));
    }
}
