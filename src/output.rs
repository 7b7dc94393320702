//! Optional stdout rendering of a finished run.
//!
//! Scripts branch on the exit code; nothing here feeds back into it.

use crate::check::RunReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the log lines on stderr.
    Log,
    Json,
    Table,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Log
    }
}

/// Renders `report` for stdout, or `None` when the format prints nothing.
pub fn render(
    report: &RunReport,
    format: OutputFormat,
) -> Result<Option<String>, serde_json::Error> {
    match format {
        OutputFormat::Log => Ok(None),
        OutputFormat::Json => serde_json::to_string_pretty(report).map(Some),
        OutputFormat::Table => Ok(Some(table(report).to_string())),
    }
}

fn table(report: &RunReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Endpoint",
            "#",
            "Subject",
            "Issuer",
            "Not after",
            "Days left",
            "Status",
        ]);

    for endpoint in &report.endpoints {
        if let Some(error) = &endpoint.error {
            table.add_row(vec![
                Cell::new(&endpoint.endpoint),
                Cell::new("-"),
                Cell::new(error),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new("RED"),
            ]);
            continue;
        }
        for (position, cert) in endpoint.certificates.iter().enumerate() {
            table.add_row(vec![
                Cell::new(&endpoint.endpoint),
                Cell::new(position),
                Cell::new(&cert.certificate.subject),
                Cell::new(&cert.certificate.issuer),
                Cell::new(&cert.certificate.not_after),
                Cell::new(cert.validity.days_remaining),
                Cell::new(cert.severity),
            ]);
        }
    }
    table
}
