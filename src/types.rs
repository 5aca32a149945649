//src/types.rs

use std::fmt;

use crate::normalize::ToolKind;

/// A minimal representation of a simulated read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedRead {
    pub id: String,
    pub seq: String,
    pub quals: String,
}

/// Edit applied at the ends of a simulated read, as carried in the `add:` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addition {
    None,
    /// Bases removed from the 5' end relative to the hairpin
    Loss5p(String),
    /// Random bases prepended at the 5' end
    Gain5p(String),
    /// Any other edit (3' gain/loss, ...); does not move the start
    Other(String),
}

impl Addition {
    /// Signed correction applied to `start - shift5p`.
    pub fn start_offset(&self) -> i64 {
        match self {
            Addition::Loss5p(bases) => bases.len() as i64,
            Addition::Gain5p(bases) => -(bases.len() as i64),
            Addition::None | Addition::Other(_) => 0,
        }
    }
}

/// Ground truth decoded from a simulated read identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruth {
    pub hairpin: String,
    pub mirna: String,
    pub start: i64,
    pub end: i64,
    pub shift_5p: i64,
    pub shift_3p: i64,
    pub mutation: Option<String>,
    pub addition: Addition,
    /// Expected 0-based alignment start in hairpin coordinates
    pub adjusted_start: i64,
}

/// Whether a tool names the hairpin or the mature miRNA it aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Hairpin,
    Mirna,
}

impl GroundTruth {
    pub fn id_for(&self, granularity: Granularity) -> &str {
        match granularity {
            Granularity::Hairpin => &self.hairpin,
            Granularity::Mirna => &self.mirna,
        }
    }
}

/// One canonical alignment reported by a tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlignerResultRow {
    /// Read identifier, or raw read sequence for content-keyed tools
    pub join_key: String,
    pub predicted_id: String,
    /// 0-based; `None` when the tool does not report a position
    pub predicted_start: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub id: String,
    pub start: Option<i64>,
}

/// Which tool scored which dataset; rendered `tool;dataset`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolTag {
    pub tool: ToolKind,
    pub dataset: String,
}

impl fmt::Display for ToolTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.tool, self.dataset)
    }
}

/// A read joined against one of its candidate alignments (or none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledRow {
    pub read_id: String,
    pub truth_id: String,
    pub truth_start: i64,
    pub prediction: Option<Prediction>,
    pub tag: ToolTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Unaligned,
    Correct,
    Incorrect,
    MultiCorrect,
    MultiIncorrect,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Unaligned => "unaligned",
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
            Outcome::MultiCorrect => "multi-correct",
            Outcome::MultiIncorrect => "multi-incorrect",
        }
    }

    /// Tokens used by the older yes/no scoring tables.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            Outcome::Unaligned => "NA",
            Outcome::Correct => "yes",
            Outcome::Incorrect => "no",
            Outcome::MultiCorrect => "multi-yes",
            Outcome::MultiIncorrect => "multi-no",
        }
    }

    pub fn render(&self, style: LabelStyle) -> &'static str {
        match style {
            LabelStyle::Descriptive => self.label(),
            LabelStyle::Legacy => self.legacy_label(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelStyle {
    #[default]
    Descriptive,
    Legacy,
}

/// Final verdict for one read under one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub read_id: String,
    pub outcome: Outcome,
    pub tag: ToolTag,
    /// Candidate kept by the tie-break rule
    pub representative: Option<Prediction>,
}
