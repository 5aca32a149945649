//! microRazerS: headerless tab-separated rows. Column 0 is the read name,
//! column 4 the hairpin and column 5 the 0-based start on it.

use std::io::Read;

use super::{field, parse_position, schema_error, tsv_reader, ToolKind};
use crate::errors::Result;
use crate::types::AlignerResultRow;

const TOOL: ToolKind = ToolKind::Microrazers;

const NAME_COL: usize = 0;
const REF_COL: usize = 4;
const START_COL: usize = 5;

pub fn normalize<R: Read>(reader: R, source_name: &str) -> Result<Vec<AlignerResultRow>> {
    let mut rdr = tsv_reader(reader, false);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() <= START_COL {
            return Err(schema_error(
                TOOL,
                source_name,
                format!(
                    "line {}: expected at least {} columns, found {}",
                    super::line_of(&record),
                    START_COL + 1,
                    record.len()
                ),
            ));
        }
        let name = field(&record, NAME_COL, "0", TOOL, source_name)?;
        let reference = field(&record, REF_COL, "4", TOOL, source_name)?;
        let start = field(&record, START_COL, "5", TOOL, source_name)?;
        let start = parse_position(start, &record, "5", TOOL, source_name)?;

        rows.push(AlignerResultRow {
            join_key: name.to_string(),
            predicted_id: reference.to_string(),
            predicted_start: Some(start),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_columns() {
        let text = "r1\t22\t0\t22\thsa-let-7a-1\t5\t27\tF\n\
                    r1\t22\t0\t22\thsa-let-7a-2\t4\t26\tF\n\
                    r1\t22\t0\t22\thsa-let-7a-1\t5\t27\tF\n";
        let rows = ToolKind::Microrazers.normalize_reader(text.as_bytes(), "m.txt").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].join_key, "r1");
        assert_eq!(rows[0].predicted_id, "hsa-let-7a-1");
        assert_eq!(rows[0].predicted_start, Some(5));
        assert_eq!(rows[1].predicted_id, "hsa-let-7a-2");
    }

    #[test]
    fn test_short_row_is_rejected() {
        let err = normalize("r1\t22\t0\t22\thp\n".as_bytes(), "m.txt").unwrap_err();
        assert!(format!("{err}").contains("at least 6 columns"));
    }

    #[test]
    fn test_non_numeric_start() {
        let err = normalize("r1\t22\t0\t22\thp\tF\n".as_bytes(), "m.txt").unwrap_err();
        assert!(format!("{err}").contains("column 5"));
    }
}
