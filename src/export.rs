//! Export of seatings and metric sweeps.
//!
//! Writes plain CSV or JSON that the plotting and spreadsheet front ends
//! read directly:
//!
//! ```text
//! sweep  → write_metrics_csv()  → d,tableable_percentage,...
//!        → write_metrics_json() → [{"d": 0.1, ...}, ...]
//! seating → write_tabling_csv() → id,seat
//! ```

use std::io::Write;

use crate::model::{MetricsRecord, Tabling};
use crate::Result;

/// Write metrics records as CSV with a header row.
pub fn write_metrics_csv(records: &[MetricsRecord], writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "d,{}", MetricsRecord::COLUMNS.join(","))?;
    for record in records {
        let values: Vec<String> = record.values().iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{},{}", record.d, values.join(","))?;
    }
    Ok(())
}

/// Write metrics records as a pretty-printed JSON array.
pub fn write_metrics_json(records: &[MetricsRecord], writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, records)?;
    writeln!(writer)?;
    Ok(())
}

/// Read records written by [`write_metrics_json`].
pub fn read_metrics_json(reader: impl std::io::Read) -> Result<Vec<MetricsRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Write a seating as `id,seat` rows in collection order.
///
/// Seats use the sheet conventions: table id, `-1` for noise, `lonely`,
/// `outsider`.
pub fn write_tabling_csv(tabling: &Tabling, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "id,seat")?;
    for (id, seat) in tabling.iter() {
        writeln!(writer, "{},{}", escape_csv(id.as_str()), seat)?;
    }
    Ok(())
}

/// Quote a CSV field if it contains a delimiter, quote or newline.
fn escape_csv(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Seat;
    use pretty_assertions::assert_eq;

    fn record(d: f64) -> MetricsRecord {
        MetricsRecord {
            d,
            tableable_percentage: 0.5,
            noise_percentage: 0.25,
            intra_table_sharing_ratio: 1.0,
            inter_table_sharing_ratio: 0.0,
            guest_sharing_differential: 1.0,
            overlap_coefficient: 0.0,
            jaccard_index: 0.0,
            unique_vs_shared_guests: 0.0,
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let mut out = Vec::new();
        write_metrics_csv(&[record(0.1), record(0.2)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("d,tableable_percentage,noise_percentage"));
        assert_eq!(lines[1], "0.1,0.5,0.25,1,0,1,0,0,0");
    }

    #[test]
    fn json_reads_back() {
        let records = vec![record(0.1), record(0.3)];
        let mut out = Vec::new();
        write_metrics_json(&records, &mut out).unwrap();
        assert_eq!(read_metrics_json(out.as_slice()).unwrap(), records);
    }

    #[test]
    fn tabling_csv_uses_sheet_labels() {
        let tabling = Tabling::new(
            vec!["a".into(), "b,c".into(), "d".into()],
            vec![Seat::Table(2), Seat::Noise, Seat::Outsider],
        );
        let mut out = Vec::new();
        write_tabling_csv(&tabling, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,seat\na,2\n\"b,c\",-1\nd,outsider\n"
        );
    }
}
