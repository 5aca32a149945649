//src/read_name.rs

//! Decoding of simulated read identifiers.
//!
//! Simulated reads carry their ground truth in the name:
//! ```text
//! hairpin_mirna_start:end_shift5p:shift3p_mut:<spec>_add:<spec>
//! hsa-let-7a-1_hsa-let-7a-5p_5:29_2:0_mut:null_add:null
//! ```

use crate::errors::{Result, ScoreError};
use crate::types::{Addition, GroundTruth, SimulatedRead};

const FIELD_COUNT: usize = 6;

/// Parse a read identifier into its ground truth.
pub fn decode_read_name(name: &str) -> Result<GroundTruth> {
    let err = |reason: String| ScoreError::Decode {
        read_name: name.to_string(),
        reason,
    };

    let fields: Vec<&str> = name.split('_').collect();
    if fields.len() != FIELD_COUNT {
        return Err(err(format!(
            "expected {FIELD_COUNT} '_'-separated fields, found {}",
            fields.len()
        )));
    }

    let (start, end) = parse_pair(fields[2]).map_err(|r| err(format!("position field: {r}")))?;
    let (shift_5p, shift_3p) = parse_pair(fields[3]).map_err(|r| err(format!("shift field: {r}")))?;

    let mutation = fields[4]
        .strip_prefix("mut:")
        .ok_or_else(|| err(format!("mutation field '{}' lacks 'mut:' prefix", fields[4])))?;
    let addition = fields[5]
        .strip_prefix("add:")
        .ok_or_else(|| err(format!("addition field '{}' lacks 'add:' prefix", fields[5])))?;
    let addition = parse_addition(addition);
    let adjusted_start = start
        .checked_sub(shift_5p)
        .and_then(|s| s.checked_add(addition.start_offset()))
        .ok_or_else(|| err(format!("start {start} shifted by {shift_5p} overflows")))?;

    Ok(GroundTruth {
        hairpin: fields[0].to_string(),
        mirna: fields[1].to_string(),
        start,
        end,
        shift_5p,
        shift_3p,
        mutation: non_null(mutation),
        adjusted_start,
        addition,
    })
}

/// Decode every read of a dataset, stopping at the first malformed name.
pub fn decode_reads(reads: &[SimulatedRead]) -> Result<Vec<GroundTruth>> {
    reads.iter().map(|r| decode_read_name(&r.id)).collect()
}

fn parse_pair(field: &str) -> std::result::Result<(i64, i64), String> {
    let (a, b) = field
        .split_once(':')
        .ok_or_else(|| format!("'{field}' is not of the form a:b"))?;
    let a = a.parse::<i64>().map_err(|_| format!("'{a}' is not an integer"))?;
    let b = b.parse::<i64>().map_err(|_| format!("'{b}' is not an integer"))?;
    Ok((a, b))
}

fn parse_addition(spec: &str) -> Addition {
    if let Some(bases) = spec.strip_prefix("loss-5p-") {
        Addition::Loss5p(bases.to_string())
    } else if let Some(bases) = spec.strip_prefix("gain-5p-") {
        Addition::Gain5p(bases.to_string())
    } else if spec == "null" || spec.is_empty() {
        Addition::None
    } else {
        Addition::Other(spec.to_string())
    }
}

fn non_null(spec: &str) -> Option<String> {
    match spec {
        "null" | "" => None,
        s => Some(s.to_string()),
    }
}
