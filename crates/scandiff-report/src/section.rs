//! The report's sections, in the order they appear in the workbook.

use scandiff_core::types::{FINDING_HEADER, HOST_HEADER};

/// Zero-based worksheet row of the first written row (Excel row 3).
pub const FIRST_ROW: u32 = 2;

/// Zero-based worksheet column of the first written cell (column C).
pub const FIRST_COLUMN: u16 = 2;

/// Width of a finding row on a sheet.
pub const FINDING_COLUMNS: usize = FINDING_HEADER.len();

static WARNING_ROW: &[&str] = &[
    "Note:",
    " False positives that were manually removed from current scan results are included in the table below",
];
static FINDING_HEADER_ROW: &[&str] = &FINDING_HEADER;
static HOST_HEADER_ROW: &[&str] = &HOST_HEADER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    CurrentResults,
    PreviousResults,
    NewIssues,
    FixedIssues,
    HostOverview,
    NewHosts,
    DisappearedHosts,
}

impl Section {
    /// Every section in workbook order.
    pub const ALL: [Section; 7] = [
        Section::CurrentResults,
        Section::PreviousResults,
        Section::NewIssues,
        Section::FixedIssues,
        Section::HostOverview,
        Section::NewHosts,
        Section::DisappearedHosts,
    ];

    /// Worksheet name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CurrentResults => "Current scan results",
            Self::PreviousResults => "Previous scan results",
            Self::NewIssues => "New issues",
            Self::FixedIssues => "Fixed issues",
            Self::HostOverview => "Host overview",
            Self::NewHosts => "New hosts",
            Self::DisappearedHosts => "Disappeared hosts",
        }
    }

    /// Fixed rows written ahead of the section's data rows.
    ///
    /// The scan result sections carry their header as their first data row.
    pub fn preamble(&self) -> Vec<&'static [&'static str]> {
        match self {
            Self::CurrentResults | Self::PreviousResults => vec![],
            Self::NewIssues | Self::FixedIssues => vec![WARNING_ROW, FINDING_HEADER_ROW],
            Self::HostOverview | Self::NewHosts | Self::DisappearedHosts => vec![HOST_HEADER_ROW],
        }
    }

    /// Whether informational findings are dropped unless explicitly requested.
    pub fn filters_informational(&self) -> bool {
        matches!(
            self,
            Self::CurrentResults | Self::PreviousResults | Self::NewIssues | Self::FixedIssues
        )
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
