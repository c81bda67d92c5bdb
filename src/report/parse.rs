/// Parsing of the fixed-width text output taskwarrior prints for a report
use std::collections::HashMap;

use super::{report_title, ColumnType, Report, ReportError, ReportRow};

/// Label of the UUID column prepended to every report invocation
pub const UUID_LABEL: &str = "UUID";

const READ_ONLY_ATTRIBUTES: [&str; 3] = ["id", "urgency", "uuid"];

/// Decide the column type from a report column such as `due.relative`
pub fn classify_column(column: &str) -> ColumnType {
    let attribute = column
        .split_once('.')
        .map(|(attribute, _format)| attribute)
        .unwrap_or(column);

    if READ_ONLY_ATTRIBUTES.contains(&attribute) {
        ColumnType::ReadOnly
    } else {
        ColumnType::String
    }
}

/// Parse report output produced with the UUID column prepended.
///
/// `columns` and `labels` are the report definition as configured in
/// taskwarrior, without the UUID column. Columns that are empty for every
/// task are omitted by taskwarrior, so only labels present in the output
/// header end up in the report.
pub fn parse_report(
    name: &str,
    output: &str,
    columns: &[String],
    labels: &[String],
) -> Result<Report, ReportError> {
    if columns.len() != labels.len() {
        return Err(ReportError::LabelMismatch {
            columns: columns.len(),
            labels: labels.len(),
        });
    }

    let label_to_column: HashMap<&str, &str> = labels
        .iter()
        .map(String::as_str)
        .zip(columns.iter().map(String::as_str))
        .collect();

    let mut lines = output.lines();
    let label_line = match lines.next() {
        Some(line) if !line.trim().is_empty() => line,
        _ => return Ok(Report::empty(name)),
    };
    // Separator line made of '-' chars
    lines.next();

    let (offsets, mut present_labels) = column_offsets(label_line);
    if present_labels.first().map(String::as_str) != Some(UUID_LABEL) {
        return Err(ReportError::UnexpectedOutput(format!(
            "report {} (missing {} column)",
            name, UUID_LABEL
        )));
    }
    present_labels.remove(0);
    tracing::trace!(?present_labels, "parsed report header");

    let rows = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| split_row(line, &offsets))
        .map(|mut fields| {
            let uuid = fields.remove(0);
            ReportRow {
                uuid,
                attributes: fields,
            }
        })
        .collect();

    let column_types = present_labels
        .iter()
        .map(|label| {
            label_to_column
                .get(label.as_str())
                .map(|column| classify_column(column))
                .ok_or_else(|| ReportError::UnknownLabel(label.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    tracing::trace!(?column_types, "classified report columns");

    Ok(Report {
        title: report_title(name),
        labels: present_labels,
        column_types,
        rows,
    })
}

/// Char offset where each label starts, and the labels themselves
fn column_offsets(label_line: &str) -> (Vec<usize>, Vec<String>) {
    let mut offsets = Vec::new();
    let mut labels = Vec::new();
    let mut current = String::new();

    for (offset, c) in label_line.chars().enumerate() {
        if c.is_whitespace() {
            if !current.is_empty() {
                labels.push(std::mem::take(&mut current));
            }
        } else {
            if current.is_empty() {
                offsets.push(offset);
            }
            current.push(c);
        }
    }
    if !current.is_empty() {
        labels.push(current);
    }

    (offsets, labels)
}

/// Split a report line at the given char offsets, trimming every field
fn split_row(line: &str, offsets: &[usize]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();

    offsets
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            // The first column always starts at the beginning of the line
            let start = if i == 0 { 0 } else { start.min(len) };
            let end = offsets.get(i + 1).map_or(len, |&end| end.min(len));
            chars[start..end.max(start)]
                .iter()
                .collect::<String>()
                .trim()
                .to_string()
        })
        .collect()
}
