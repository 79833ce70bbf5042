//! CSV export of a form's responses.

use snapform_db::ResponseRecord;

const FIXED_COLUMNS: [&str; 3] = ["ID", "Email", "Submitted At"];

/// A rendered export, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// `<form name>_responses.csv`, with whitespace runs replaced by `_`.
pub fn export_filename(form_name: &str) -> String {
    let mut name = String::with_capacity(form_name.len());
    let mut in_space = false;
    for c in form_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    format!("{name}_responses.csv")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn header_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}

/// Distinct answer labels across `records`, in first-seen order.
pub fn column_labels(records: &[ResponseRecord]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for record in records {
        for label in record.fields.keys() {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }
    labels
}

/// Renders `records` as CSV, one row per response.
///
/// Answer cells are always quoted; a response without an answer for a
/// column leaves the cell empty.
pub fn responses_to_csv(records: &[ResponseRecord]) -> String {
    let labels = column_labels(records);
    let header: Vec<String> = FIXED_COLUMNS
        .iter()
        .map(|c| (*c).to_string())
        .chain(labels.iter().map(|l| header_cell(l)))
        .collect();

    let mut lines = vec![header.join(",")];
    for record in records {
        let mut row = vec![
            quote(&record.id),
            quote(record.email.as_deref().unwrap_or_default()),
            quote(&record.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ];
        row.extend(labels.iter().map(|label| {
            record
                .fields
                .get(label)
                .map(|answer| quote(&answer.value))
                .unwrap_or_default()
        }));
        lines.push(row.join(","));
    }
    lines.join("\n")
}

pub fn export_responses(form_name: &str, records: &[ResponseRecord]) -> CsvExport {
    CsvExport {
        filename: export_filename(form_name),
        content: responses_to_csv(records),
    }
}
