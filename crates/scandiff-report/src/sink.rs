//! The report sink contract and an in-memory implementation.

use scandiff_core::SheetRow;

use crate::error::Result;
use crate::section::Section;

/// Receives named, ordered row collections and renders them as sections.
pub trait ReportSink {
    /// Write `rows` as `section`, after the section's preamble.
    ///
    /// Returns the number of data rows actually written.
    fn write_section<R: SheetRow>(&mut self, section: Section, rows: &[R]) -> Result<usize>;
}

/// Whether `row` survives the informational filter for `section`.
pub fn is_visible<R: SheetRow>(section: Section, row: &R, include_informational: bool) -> bool {
    include_informational
        || !section.filters_informational()
        || row.risk() != Some(scandiff_core::types::INFORMATIONAL_RISK)
}

/// Sink that keeps every rendered sheet row in memory.
///
/// Used for dry runs and for asserting on report contents in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    include_informational: bool,
    sections: Vec<(Section, Vec<Vec<String>>)>,
}

impl MemorySink {
    pub fn new(include_informational: bool) -> Self {
        Self {
            include_informational,
            sections: Vec::new(),
        }
    }

    /// Sections in the order they were written.
    pub fn sections(&self) -> Vec<Section> {
        self.sections.iter().map(|(s, _)| *s).collect()
    }

    /// Every row of a section, preamble included.
    pub fn rows(&self, section: Section) -> Option<&[Vec<String>]> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, rows)| rows.as_slice())
    }

    /// Data rows of a section, preamble excluded.
    pub fn data_rows(&self, section: Section) -> Option<&[Vec<String>]> {
        self.rows(section)
            .map(|rows| &rows[section.preamble().len()..])
    }
}

impl ReportSink for MemorySink {
    fn write_section<R: SheetRow>(&mut self, section: Section, rows: &[R]) -> Result<usize> {
        let mut rendered: Vec<Vec<String>> = section
            .preamble()
            .into_iter()
            .map(|cells| cells.iter().map(|c| c.to_string()).collect())
            .collect();

        let before = rendered.len();
        rendered.extend(
            rows.iter()
                .filter(|r| is_visible(section, *r, self.include_informational))
                .map(|r| r.cells().into_iter().map(String::from).collect()),
        );
        let written = rendered.len() - before;

        self.sections.push((section, rendered));
        Ok(written)
    }
}
