//! Re-ingest the "Current scan results" sheet of an earlier report.
//!
//! The sheet is read as a fixed window: from row 3, columns C through J.
//! Its first row must be the finding header, otherwise the workbook was
//! not laid out by this tool and the read is refused.

use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use scandiff_core::{FindingRow, SheetRow};

use crate::error::{ReportError, Result};
use crate::section::{Section, FINDING_COLUMNS, FIRST_COLUMN, FIRST_ROW};

/// Read a prior report's current results as previously-normalized rows.
///
/// The returned rows start with the header row, like a normalized snapshot.
pub fn read_prior_report(path: &Path) -> Result<Vec<FindingRow>> {
    let path_text = path.display().to_string();
    let is_xlsx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if !is_xlsx {
        return Err(ReportError::UnsupportedFormat { path: path_text });
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let section = Section::CurrentResults.name();
    if !workbook.sheet_names().iter().any(|name| name == section) {
        return Err(ReportError::MissingSection {
            path: path_text,
            section: section.to_string(),
        });
    }

    let range = workbook.worksheet_range(section)?;
    let rows = rows_in_window(&range);

    match rows.first() {
        Some(first) if *first == FindingRow::header() => {}
        first => {
            return Err(ReportError::LayoutMismatch {
                path: path_text,
                row: FIRST_ROW + 1,
                found: first
                    .map(|row| row_cells(row).join(", "))
                    .unwrap_or_default(),
            });
        }
    }

    tracing::info!(path = %path_text, rows = rows.len(), "Prior report read");
    Ok(rows)
}

fn rows_in_window(range: &Range<Data>) -> Vec<FindingRow> {
    let Some((last_row, _)) = range.end() else {
        return Vec::new();
    };

    (FIRST_ROW..=last_row)
        .filter_map(|row| {
            let cells: [String; FINDING_COLUMNS] = std::array::from_fn(|offset| {
                cell_text(range.get_value((row, u32::from(FIRST_COLUMN) + offset as u32)))
            });
            if cells.iter().all(String::is_empty) {
                None
            } else {
                Some(FindingRow::from_cells(cells))
            }
        })
        .collect()
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn row_cells(row: &FindingRow) -> Vec<String> {
    row.cells().into_iter().map(String::from).collect()
}
