//! Workbook sink backed by `rust_xlsxwriter`.
//!
//! One worksheet per section. Every cell is written as a string, starting
//! at row 3 column C, so the "Current scan results" sheet can be read back
//! verbatim by [`crate::prior`].

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet};
use scandiff_core::SheetRow;

use crate::error::Result;
use crate::section::{Section, FIRST_COLUMN, FIRST_ROW};
use crate::sink::{is_visible, ReportSink};

pub struct XlsxSink {
    workbook: Workbook,
    path: PathBuf,
    include_informational: bool,
    sections: usize,
}

impl XlsxSink {
    /// Start a workbook that will be saved at `path` by [`XlsxSink::finish`].
    pub fn new(path: impl Into<PathBuf>, include_informational: bool) -> Self {
        Self {
            workbook: Workbook::new(),
            path: path.into(),
            include_informational,
            sections: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the workbook. A workbook without sections is saved as an empty shell.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.workbook.save(&self.path)?;
        tracing::info!(
            path = %self.path.display(),
            sections = self.sections,
            "Report saved"
        );
        Ok(self.path)
    }
}

impl ReportSink for XlsxSink {
    fn write_section<R: SheetRow>(&mut self, section: Section, rows: &[R]) -> Result<usize> {
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(section.name())?;

        let mut row: RowNum = FIRST_ROW;
        for cells in section.preamble() {
            write_cells(worksheet, row, cells)?;
            row += 1;
        }

        let mut written = 0;
        for data in rows
            .iter()
            .filter(|r| is_visible(section, *r, self.include_informational))
        {
            write_cells(worksheet, row, &data.cells())?;
            row += 1;
            written += 1;
        }

        self.sections += 1;
        tracing::debug!(section = %section, rows = written, "Section written");
        Ok(written)
    }
}

fn write_cells(worksheet: &mut Worksheet, row: RowNum, cells: &[&str]) -> Result<()> {
    for (offset, cell) in cells.iter().enumerate() {
        worksheet.write_string(row, FIRST_COLUMN + offset as ColNum, *cell)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prior::read_prior_report;
    use scandiff_core::{FindingRow, HostTriple};

    fn finding(cvss: &str, risk: &str, ip: &str, name: &str) -> FindingRow {
        FindingRow::from_cells(
            [cvss, risk, ip, "web.lan", "", "tcp", "443", name].map(String::from),
        )
    }

    #[test]
    fn current_results_sheet_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        let rows = vec![
            FindingRow::header(),
            finding("7.2", "High", "10.0.0.1", "Cert issue"),
            finding("", "None", "10.0.0.1", "Scan info"),
        ];
        let mut sink = XlsxSink::new(&path, false);
        assert_eq!(sink.write_section(Section::CurrentResults, &rows).unwrap(), 2);
        sink.write_section(Section::NewHosts, &[HostTriple::new("10.0.0.1", "web.lan", "")])
            .unwrap();
        let saved = sink.finish().unwrap();
        assert_eq!(saved, path);

        let read = read_prior_report(&path).unwrap();
        assert_eq!(read, rows[..2].to_vec());
    }

    #[test]
    fn empty_workbook_is_still_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let sink = XlsxSink::new(&path, false);
        assert_eq!(sink.path(), path.as_path());
        sink.finish().unwrap();
        assert!(path.exists());
    }
}
