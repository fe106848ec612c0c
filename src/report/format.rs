//! Terminal rendering of the load report.
//!
//! Formatting lives in one place so output changes are localized
//! (important for future snapshot tests).

use crate::report::{LoadReport, StreamReport};

/// How many skipped lines / warnings to list per stream before eliding.
const MAX_DETAIL: usize = 20;

/// Format the per-stream load summary printed at the end of a run.
pub fn format_load_summary(report: &LoadReport) -> String {
    let mut out = String::new();

    out.push_str("=== cafe - stream load summary ===\n");
    for stream in &report.streams {
        format_stream(&mut out, stream);
    }

    out
}

fn format_stream(out: &mut String, stream: &StreamReport) {
    if stream.absent {
        out.push_str(&format!(
            "{:<8} ABSENT ({} missing or unreadable)\n",
            stream.name, stream.path
        ));
        return;
    }

    out.push_str(&format!(
        "{:<8} rows={} loaded={} skipped={} warnings={}\n",
        stream.name,
        stream.rows_read,
        stream.rows_loaded,
        stream.rows_skipped,
        stream.warnings.len()
    ));

    for line in stream.skipped_lines.iter().take(MAX_DETAIL) {
        out.push_str(&format!("  invalid entry on line {line}\n"));
    }
    if stream.skipped_lines.len() > MAX_DETAIL {
        out.push_str(&format!(
            "  ... and {} more skipped rows\n",
            stream.skipped_lines.len() - MAX_DETAIL
        ));
    }

    for warning in stream.warnings.iter().take(MAX_DETAIL) {
        out.push_str(&format!(
            "  line {}: unparseable {} value '{}'\n",
            warning.line, warning.field, warning.raw
        ));
    }
    if stream.warnings.len() > MAX_DETAIL {
        out.push_str(&format!(
            "  ... and {} more warnings\n",
            stream.warnings.len() - MAX_DETAIL
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn summary_lists_counts_and_absent_streams() {
        let mut gates = StreamReport::new("gates", Path::new("gatesData.csv"));
        gates.rows_read = 10;
        gates.rows_loaded = 8;
        gates.skip(3);
        gates.skip(7);
        gates.warn(4, "in_count", "lots");

        let mut weather = StreamReport::new("weather", Path::new("weatherData.csv"));
        weather.absent = true;

        let text = format_load_summary(&LoadReport {
            streams: vec![gates, weather],
        });

        assert!(text.contains("gates    rows=10 loaded=8 skipped=2 warnings=1"));
        assert!(text.contains("invalid entry on line 3"));
        assert!(text.contains("unparseable in_count value 'lots'"));
        assert!(text.contains("weather  ABSENT"));
    }
}
