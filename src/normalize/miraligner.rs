//! miraligner: one row per read with named columns `name`, `mir`, `start`.
//! `start` is 1-based.

use std::io::Read;

use super::{column_index, field, parse_position, to_zero_based, tsv_reader, ToolKind};
use crate::errors::Result;
use crate::types::AlignerResultRow;

const TOOL: ToolKind = ToolKind::Miraligner;

pub fn normalize<R: Read>(reader: R, source_name: &str) -> Result<Vec<AlignerResultRow>> {
    let mut rdr = tsv_reader(reader, true);
    let headers = rdr.headers()?.clone();

    let name_idx = column_index(&headers, "name", TOOL, source_name)?;
    let mir_idx = column_index(&headers, "mir", TOOL, source_name)?;
    let start_idx = column_index(&headers, "start", TOOL, source_name)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let name = field(&record, name_idx, "name", TOOL, source_name)?;
        let mir = field(&record, mir_idx, "mir", TOOL, source_name)?;
        let start = field(&record, start_idx, "start", TOOL, source_name)?;
        let start = parse_position(start, &record, "start", TOOL, source_name)?;
        let start = to_zero_based(start, &record, "start", TOOL, source_name)?;

        rows.push(AlignerResultRow {
            join_key: name.to_string(),
            predicted_id: mir.to_string(),
            predicted_start: Some(start),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScoreError;

    #[test]
    fn test_selects_columns_and_shifts_start() {
        let text = "seq\tname\tmir\tstart\tend\n\
                    ACGT\tr1\thsa-mir-1\t4\t25\n\
                    ACGT\tr1\thsa-mir-1\t4\t25\n\
                    GGCC\tr2\thsa-mir-2\t1\t22\n";
        let rows = ToolKind::Miraligner.normalize_reader(text.as_bytes(), "mira.tsv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].join_key, "r1");
        assert_eq!(rows[0].predicted_id, "hsa-mir-1");
        assert_eq!(rows[0].predicted_start, Some(3));
        assert_eq!(rows[1].predicted_start, Some(0));
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let text = "name\tmirna\tstart\nr1\tm\t3\n";
        let err = normalize(text.as_bytes(), "mira.tsv").unwrap_err();
        match err {
            ScoreError::SchemaMismatch { tool, reason, .. } => {
                assert_eq!(tool, ToolKind::Miraligner);
                assert!(reason.contains("'mir'"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_start() {
        let text = "name\tmir\tstart\nr1\tm\tNA\n";
        let err = normalize(text.as_bytes(), "mira.tsv").unwrap_err();
        assert!(format!("{err}").contains("'NA' is not an integer"));
    }

    #[test]
    fn test_start_out_of_range() {
        let text = "name\tmir\tstart\nr1\tm\t-9223372036854775808\n";
        let err = normalize(text.as_bytes(), "mira.tsv").unwrap_err();
        assert!(matches!(err, ScoreError::SchemaMismatch { .. }));
        assert!(format!("{err}").contains("'-9223372036854775808' is out of range"));
    }

    #[test]
    fn test_header_only() {
        let rows = normalize("name\tmir\tstart\n".as_bytes(), "mira.tsv").unwrap();
        assert!(rows.is_empty());
    }
}
