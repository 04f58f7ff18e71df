use chrono::{NaiveDate, SecondsFormat};
use serde::Deserialize;

use super::domain::CandidateRecord;

const STANDARD_HEADERS: [&str; 13] = [
    "Name",
    "Email",
    "Contact",
    "Tier",
    "HTML/CSS/JS",
    "React/Next",
    "CRUD",
    "Auth",
    "Backend",
    "Golang",
    "Cloud",
    "System Design",
    "Created At",
];

const UTF8_BOM: &[u8] = "\u{FEFF}".as_bytes();

/// CSV flavour. `Spreadsheet` adds a BOM, tier titles, and US-style dates for Excel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Standard,
    Spreadsheet,
}

/// Finished export ready to hand to a client or write to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub body: Vec<u8>,
}

impl CsvExport {
    pub const CONTENT_TYPE: &'static str = "text/csv; charset=utf-8";
}

pub fn export_candidates(
    records: &[CandidateRecord],
    format: ExportFormat,
    today: NaiveDate,
) -> Result<CsvExport, csv::Error> {
    let mut body = Vec::new();
    if format == ExportFormat::Spreadsheet {
        body.extend_from_slice(UTF8_BOM);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(body);

    let mut headers: Vec<&str> = STANDARD_HEADERS.to_vec();
    if format == ExportFormat::Spreadsheet {
        headers.insert(4, "Tier Description");
    }
    writer.write_record(&headers)?;

    for record in records {
        writer.write_record(row(record, format))?;
    }

    let body = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;

    Ok(CsvExport {
        file_name: format!("candidates-{}.csv", today.format("%Y-%m-%d")),
        body,
    })
}

fn row(record: &CandidateRecord, format: ExportFormat) -> Vec<String> {
    let tier = record.tier();
    let mut fields = vec![
        record.name.clone(),
        record.email.clone(),
        record.contact.clone().unwrap_or_default(),
        tier.to_string(),
    ];
    if format == ExportFormat::Spreadsheet {
        fields.push(tier.definition().title.to_string());
    }
    fields.extend(
        record
            .skills
            .labelled()
            .iter()
            .map(|(_, declared)| yes_no(*declared).to_string()),
    );
    fields.push(match format {
        ExportFormat::Standard => record.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ExportFormat::Spreadsheet => record.created_at.format("%m/%d/%Y").to_string(),
    });
    fields
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
