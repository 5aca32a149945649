use ahash::AHashMap;
use log::warn;

use crate::errors::{Result, ScoreError};
use crate::normalize::{JoinKey, ToolKind};
use crate::types::{AlignerResultRow, GroundTruth, Prediction, ReconciledRow, SimulatedRead, ToolTag};

/// Left-join every read against a tool's canonical results.
///
/// Each read yields one row per candidate alignment, or a single row with no
/// prediction when the tool reported nothing for it. Rows of one read are
/// contiguous and reads keep their dataset order. `truths[i]` is the ground
/// truth of `reads[i]`.
pub fn reconcile(
    reads: &[SimulatedRead],
    truths: &[GroundTruth],
    results: &[AlignerResultRow],
    tool: ToolKind,
    tag: &ToolTag,
) -> Result<Vec<ReconciledRow>> {
    if reads.len() != truths.len() {
        return Err(ScoreError::TruthCountMismatch {
            reads: reads.len(),
            truths: truths.len(),
        });
    }

    let mut index: AHashMap<&str, Vec<&AlignerResultRow>> = AHashMap::with_capacity(results.len());
    for row in results {
        index.entry(row.join_key.as_str()).or_default().push(row);
    }

    let join_key = tool.join_key();
    let granularity = tool.granularity();
    let mut key_hits: AHashMap<&str, usize> = AHashMap::new();
    let mut out = Vec::with_capacity(reads.len().max(results.len()));

    for (read, truth) in reads.iter().zip(truths) {
        let key = match join_key {
            JoinKey::ReadId => read.id.as_str(),
            JoinKey::Sequence => read.seq.as_str(),
        };
        let base = |prediction: Option<Prediction>| ReconciledRow {
            read_id: read.id.clone(),
            truth_id: truth.id_for(granularity).to_string(),
            truth_start: truth.adjusted_start,
            prediction,
            tag: tag.clone(),
        };

        match index.get(key) {
            None => out.push(base(None)),
            Some(candidates) => {
                if join_key == JoinKey::Sequence {
                    *key_hits.entry(key).or_insert(0) += 1;
                }
                out.extend(candidates.iter().map(|c| {
                    base(Some(Prediction {
                        id: c.predicted_id.clone(),
                        start: c.predicted_start,
                    }))
                }));
            }
        }
    }

    let shared = key_hits.values().filter(|&&n| n > 1).count();
    if shared > 0 {
        warn!(
            "{}: {} result sequences match more than one simulated read; each read is scored on its own ground truth",
            tag, shared
        );
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_name::decode_read_name;

    fn read(id: &str, seq: &str) -> SimulatedRead {
        SimulatedRead { id: id.to_string(), seq: seq.to_string(), quals: "I".repeat(seq.len()) }
    }

    fn result(key: &str, id: &str, start: Option<i64>) -> AlignerResultRow {
        AlignerResultRow { join_key: key.to_string(), predicted_id: id.to_string(), predicted_start: start }
    }

    fn tag(tool: ToolKind) -> ToolTag {
        ToolTag { tool, dataset: "ds".to_string() }
    }

    #[test]
    fn test_preserves_every_read() {
        let reads = vec![
            read("hp1_m1_5:29_2:0_mut:null_add:null", "AAAA"),
            read("hp2_m2_1:20_0:0_mut:null_add:null", "CCCC"),
            read("hp3_m3_1:20_0:0_mut:null_add:null", "GGGG"),
        ];
        let truths: Vec<_> = reads.iter().map(|r| decode_read_name(&r.id).unwrap()).collect();
        let results = vec![
            result(&reads[1].id, "hp2", Some(1)),
            result(&reads[1].id, "hp9", Some(4)),
            result(&reads[0].id, "hp1", Some(3)),
            result("not_a_read", "hp1", Some(3)),
        ];
        let rows = reconcile(&reads, &truths, &results, ToolKind::Star, &tag(ToolKind::Star)).unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.read_id.as_str()).collect();
        assert_eq!(ids, vec![reads[0].id.as_str(), reads[1].id.as_str(), reads[1].id.as_str(), reads[2].id.as_str()]);
        assert_eq!(rows[0].truth_id, "hp1");
        assert_eq!(rows[0].truth_start, 3);
        assert_eq!(rows[2].prediction.as_ref().unwrap().id, "hp9");
        assert!(rows[3].prediction.is_none());
    }

    #[test]
    fn test_content_key_joins_on_sequence() {
        let reads = vec![
            read("hp1_m1_5:29_0:0_mut:null_add:null", "ACGT"),
            read("hp2_m2_5:29_0:0_mut:null_add:null", "ACGT"),
        ];
        let truths: Vec<_> = reads.iter().map(|r| decode_read_name(&r.id).unwrap()).collect();
        let results = vec![result("ACGT", "m1", None)];
        let rows = reconcile(&reads, &truths, &results, ToolKind::Quagmir, &tag(ToolKind::Quagmir)).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].truth_id, "m1");
        assert_eq!(rows[1].truth_id, "m2");
        assert!(rows.iter().all(|r| r.prediction.as_ref().unwrap().id == "m1"));
    }

    #[test]
    fn test_rejects_unpaired_truths() {
        let reads = vec![
            read("hp1_m1_5:29_0:0_mut:null_add:null", "ACGT"),
            read("hp2_m2_5:29_0:0_mut:null_add:null", "GGCC"),
        ];
        let truths = vec![decode_read_name(&reads[0].id).unwrap()];
        let err = reconcile(&reads, &truths, &[], ToolKind::Star, &tag(ToolKind::Star)).unwrap_err();
        assert!(matches!(err, ScoreError::TruthCountMismatch { reads: 2, truths: 1 }));
    }
}
