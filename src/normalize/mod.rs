//src/normalize/mod.rs

//! Per-tool adapters turning raw aligner output into canonical rows.

pub mod microrazers;
pub mod miraligner;
pub mod quagmir;
pub mod sam;

use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use ahash::AHashSet;
use log::{debug, info};

use crate::errors::{Result, ScoreError};
use crate::types::{AlignerResultRow, Granularity};

/// The aligners this crate knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    Quagmir,
    Microrazers,
    Star,
    Miraligner,
    Razers3,
}

/// Shape of a tool's native output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFamily {
    /// Named-column table keyed by read name
    IdentifierTable,
    /// Named-column table keyed by read sequence
    ContentKeyed,
    /// Headerless positional table keyed by read name
    CoordinateTable,
    /// SAM records
    AlignmentRecord,
}

/// What a tool's results are joined to the reads on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKey {
    ReadId,
    Sequence,
}

impl ToolKind {
    /// Every tool, in the column order of the scoring manifest.
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Quagmir,
        ToolKind::Microrazers,
        ToolKind::Star,
        ToolKind::Miraligner,
        ToolKind::Razers3,
    ];

    /// Name used in tool tags and as the manifest column.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Quagmir => "quagmir",
            ToolKind::Microrazers => "microrazers",
            ToolKind::Star => "star",
            ToolKind::Miraligner => "miraligner",
            ToolKind::Razers3 => "razers3",
        }
    }

    pub fn family(&self) -> ToolFamily {
        match self {
            ToolKind::Miraligner => ToolFamily::IdentifierTable,
            ToolKind::Quagmir => ToolFamily::ContentKeyed,
            ToolKind::Microrazers => ToolFamily::CoordinateTable,
            ToolKind::Star | ToolKind::Razers3 => ToolFamily::AlignmentRecord,
        }
    }

    pub fn join_key(&self) -> JoinKey {
        match self.family() {
            ToolFamily::ContentKeyed => JoinKey::Sequence,
            _ => JoinKey::ReadId,
        }
    }

    /// miRNA-aware tools name the mature miRNA; genome-style aligners only see hairpins.
    pub fn granularity(&self) -> Granularity {
        match self.family() {
            ToolFamily::IdentifierTable | ToolFamily::ContentKeyed => Granularity::Mirna,
            ToolFamily::CoordinateTable | ToolFamily::AlignmentRecord => Granularity::Hairpin,
        }
    }

    /// Load and normalize a result file. A missing or blank file is an empty result.
    pub fn normalize<P: AsRef<Path>>(&self, path: P) -> Result<Vec<AlignerResultRow>> {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No {} result file at '{}'; scoring as unaligned", self, path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(ScoreError::io(path, e)),
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            info!("{} result file '{}' is empty; scoring as unaligned", self, path.display());
            return Ok(Vec::new());
        }
        self.normalize_reader(data.as_slice(), &path.display().to_string())
    }

    /// Normalize results from any reader; `source_name` labels errors.
    pub fn normalize_reader<R: Read>(&self, reader: R, source_name: &str) -> Result<Vec<AlignerResultRow>> {
        let rows = match self {
            ToolKind::Miraligner => miraligner::normalize(reader, source_name)?,
            ToolKind::Quagmir => quagmir::normalize(reader, source_name)?,
            ToolKind::Microrazers => microrazers::normalize(reader, source_name)?,
            ToolKind::Star | ToolKind::Razers3 => sam::normalize(*self, reader, source_name)?,
        };
        let rows = dedup_rows(rows);
        debug!("{}: {} distinct alignments in '{}'", self, rows.len(), source_name);
        Ok(rows)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tool '{s}'"))
    }
}

/// Remove exact duplicate rows, keeping first-seen order.
pub fn dedup_rows(rows: Vec<AlignerResultRow>) -> Vec<AlignerResultRow> {
    let mut seen = AHashSet::with_capacity(rows.len());
    rows.into_iter().filter(|r| seen.insert(r.clone())).collect()
}

// ---------- helpers shared by the adapters ----------

pub(crate) fn tsv_reader<R: Read>(reader: R, has_headers: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

pub(crate) fn schema_error(tool: ToolKind, source_name: &str, reason: String) -> ScoreError {
    ScoreError::SchemaMismatch {
        tool,
        source_name: source_name.to_string(),
        reason,
    }
}

pub(crate) fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Index of a named header column.
pub(crate) fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    tool: ToolKind,
    source_name: &str,
) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| schema_error(tool, source_name, format!("missing column '{name}'")))
}

/// Fetch a non-empty field or report which column was missing.
pub(crate) fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    column: &str,
    tool: ToolKind,
    source_name: &str,
) -> Result<&'r str> {
    match record.get(idx).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(schema_error(
            tool,
            source_name,
            format!("line {}: no value for column {column}", line_of(record)),
        )),
    }
}

pub(crate) fn parse_position(
    value: &str,
    record: &csv::StringRecord,
    column: &str,
    tool: ToolKind,
    source_name: &str,
) -> Result<i64> {
    value.parse::<i64>().map_err(|_| {
        schema_error(
            tool,
            source_name,
            format!("line {}: column {column} value '{value}' is not an integer", line_of(record)),
        )
    })
}

/// Convert a 1-based coordinate to 0-based.
pub(crate) fn to_zero_based(
    value: i64,
    record: &csv::StringRecord,
    column: &str,
    tool: ToolKind,
    source_name: &str,
) -> Result<i64> {
    value.checked_sub(1).ok_or_else(|| {
        schema_error(
            tool,
            source_name,
            format!("line {}: column {column} value '{value}' is out of range", line_of(record)),
        )
    })
}
