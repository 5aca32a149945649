use crate::types::{ClassifiedRow, Outcome, ReconciledRow};

/// A candidate is correct when it names the expected reference and, if the
/// tool reports positions, starts exactly at the adjusted ground-truth start.
pub fn verdict(row: &ReconciledRow) -> bool {
    match &row.prediction {
        None => false,
        Some(p) => p.id == row.truth_id && p.start.map_or(true, |s| s == row.truth_start),
    }
}

/// Tie-break among the candidates of one read: first correct one, else the first.
pub fn pick_representative(group: &[ReconciledRow]) -> Option<&ReconciledRow> {
    group.iter().find(|r| verdict(r)).or_else(|| group.first())
}

/// Collapse all candidate rows of a single read into one classified row.
///
/// Rows of `group` share a single read identifier. Returns `None` for an empty group.
pub fn classify_group(group: &[ReconciledRow]) -> Option<ClassifiedRow> {
    let first = group.first()?;
    debug_assert!(group.iter().all(|r| r.read_id == first.read_id));

    let any_correct = group.iter().any(verdict);
    let outcome = match group {
        [only] if only.prediction.is_none() => Outcome::Unaligned,
        [_] if any_correct => Outcome::Correct,
        [_] => Outcome::Incorrect,
        _ if any_correct => Outcome::MultiCorrect,
        _ => Outcome::MultiIncorrect,
    };

    let chosen = pick_representative(group).unwrap_or(first);
    Some(ClassifiedRow {
        read_id: chosen.read_id.clone(),
        outcome,
        tag: chosen.tag.clone(),
        representative: chosen.prediction.clone(),
    })
}

/// Classify reconciled rows, one output row per read.
///
/// Rows of a read must be contiguous, as produced by `reconcile`.
pub fn classify_reconciled(rows: &[ReconciledRow]) -> Vec<ClassifiedRow> {
    rows.chunk_by(|a, b| a.read_id == b.read_id)
        .filter_map(classify_group)
        .collect()
}
