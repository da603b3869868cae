//! Reconstruction of logical table rows.
//!
//! The table extractor returns physical lines. A parameter whose description
//! wraps shows up as several lines, and only the last one carries the score:
//!
//! ```text
//! Лидерство   Умение вести        |
//!             за собой            | 57
//! ```
//!
//! Lines are accumulated until one with a numeric third cell closes the
//! logical row.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::PifError;
use crate::model::{AData, AssessmentWarning};

/// One physical row: parameter fragment, description fragment, score
/// candidate.
pub type RawRow = [String; 3];

/// Result of merging one table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    pub items: Vec<AData>,
    pub warnings: Vec<AssessmentWarning>,
}

/// Merges physical rows into [`AData`] records, starting after `header`.
#[derive(Debug, Clone)]
pub struct RowMerger {
    header: RawRow,
}

impl RowMerger {
    pub fn new(header: RawRow) -> Self {
        RowMerger {
            header: header.map(|c| c.trim().to_string()),
        }
    }

    /// Fails if a completing score does not fit an `i64`.
    pub fn merge<'a, I>(&self, rows: I) -> Result<MergeOutcome, PifError>
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        let mut outcome = MergeOutcome::default();
        let mut started = false;
        let mut pending: Option<RawRow> = None;

        for row in rows {
            if self.is_header(row) {
                started = true;
                continue;
            }
            if !started || is_blank(row) {
                continue;
            }

            if !is_legit_number(&row[2]) {
                pending = Some(concat_row(pending.take(), row));
                continue;
            }

            let [parameter, description, _] = concat_row(pending.take(), row);
            let value = parse_number(&row[2])
                .and_then(truncate_score)
                .ok_or_else(|| PifError::ScoreOutOfRange {
                    parameter: parameter.clone(),
                    score: row[2].trim().to_string(),
                })?;
            outcome.items.push(AData {
                parameter,
                description,
                value,
            });
        }

        if !started {
            outcome.warnings.push(AssessmentWarning::TableHeaderMissing);
        }
        if let Some([parameter, description, score]) = pending {
            outcome.warnings.push(AssessmentWarning::DanglingRow {
                parameter,
                description,
                score,
            });
        }

        Ok(outcome)
    }

    fn is_header(&self, row: &RawRow) -> bool {
        row.iter().zip(&self.header).all(|(c, h)| c.trim() == h)
    }
}

fn is_blank(row: &RawRow) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

fn concat_value(pending: &str, new: &str) -> String {
    if pending.is_empty() {
        return new.to_string();
    }
    if new.is_empty() {
        return pending.to_string();
    }
    format!("{pending} {new}")
}

fn concat_row(pending: Option<RawRow>, row: &RawRow) -> RawRow {
    match pending {
        None => row.clone(),
        Some(p) => [
            concat_value(&p[0], &row[0]),
            concat_value(&p[1], &row[1]),
            concat_value(&p[2], &row[2]),
        ],
    }
}

/// True if the cell holds a finite number, whatever its magnitude.
pub fn is_legit_number(cell: &str) -> bool {
    parse_number(cell).is_some() || cell.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

/// Parse a decimal number, plain or in scientific notation.
/// Returns `None` for empty or non-numeric cells.
pub fn parse_number(cell: &str) -> Option<Decimal> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Integer part of a score, truncated toward zero. `None` if it does not
/// fit an `i64`.
pub fn truncate_score(number: Decimal) -> Option<i64> {
    number.trunc().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> RawRow {
        [
            "ШКАЛА".to_string(),
            "ОПИСАНИЕ ШКАЛЫ".into(),
            "Процентиль".into(),
        ]
    }

    fn row(a: &str, b: &str, c: &str) -> RawRow {
        [a.to_string(), b.to_string(), c.to_string()]
    }

    fn item(parameter: &str, description: &str, value: i64) -> AData {
        AData {
            parameter: parameter.into(),
            description: description.into(),
            value,
        }
    }

    #[test]
    fn test_single_row_truncates_score() {
        let rows = vec![header(), row("a", "b", "1.5")];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert_eq!(outcome.items, vec![item("a", "b", 1)]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_continuation_lines_are_joined() {
        let rows = vec![header(), row("a", "b", ""), row("", "c", "3")];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert_eq!(outcome.items, vec![item("a", "b c", 3)]);
    }

    #[test]
    fn test_parameter_wraps_too() {
        let rows = vec![
            header(),
            row("Стратегическое", "Видит", ""),
            row("мышление", "перспективу", ""),
            row("", "", "88"),
        ];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert_eq!(
            outcome.items,
            vec![item("Стратегическое мышление", "Видит перспективу", 88)]
        );
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let rows = vec![header(), row("", "", ""), row("a", "b", "2")];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert_eq!(outcome.items, vec![item("a", "b", 2)]);
    }

    #[test]
    fn test_blank_row_does_not_break_accumulation() {
        let rows = vec![header(), row("a", "b", ""), row(" ", "", ""), row("", "c", "4")];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert_eq!(outcome.items, vec![item("a", "b c", 4)]);
    }

    #[test]
    fn test_dangling_row_is_reported_not_emitted() {
        let rows = vec![header(), row("a", "b", "")];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert!(outcome.items.is_empty());
        assert_eq!(
            outcome.warnings,
            vec![AssessmentWarning::DanglingRow {
                parameter: "a".into(),
                description: "b".into(),
                score: String::new(),
            }]
        );
    }

    #[test]
    fn test_rows_before_header_are_ignored() {
        let rows = vec![row("x", "y", "9"), header(), row("a", "b", "2")];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert_eq!(outcome.items, vec![item("a", "b", 2)]);
    }

    #[test]
    fn test_missing_header_is_reported() {
        let rows = vec![row("a", "b", "2")];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.warnings, vec![AssessmentWarning::TableHeaderMissing]);
    }

    #[test]
    fn test_header_match_ignores_surrounding_whitespace() {
        let padded = row(" ШКАЛА", "ОПИСАНИЕ ШКАЛЫ ", "Процентиль");
        let rows = vec![padded, row("a", "b", "7")];
        assert_eq!(RowMerger::new(header()).merge(&rows).unwrap().items.len(), 1);
    }

    #[test]
    fn test_score_comes_from_completing_row() {
        let rows = vec![header(), row("a", "b", "n/a"), row("", "", "12.9")];
        let outcome = RowMerger::new(header()).merge(&rows).unwrap();
        assert_eq!(outcome.items, vec![item("a", "b", 12)]);
    }

    #[test]
    fn test_merge_is_repeatable() {
        let rows = vec![
            header(),
            row("a", "b", ""),
            row("", "c", "3"),
            row("d", "e", ""),
        ];
        let merger = RowMerger::new(header());
        assert_eq!(merger.merge(&rows).unwrap(), merger.merge(&rows).unwrap());
    }

    #[test]
    fn test_parse_and_truncate_score() {
        let score = |s: &str| parse_number(s).and_then(truncate_score);
        assert_eq!(score("12.9"), Some(12));
        assert_eq!(score(" 57 "), Some(57));
        assert_eq!(score("-3.7"), Some(-3));
        assert_eq!(score("1e2"), Some(100));
        assert_eq!(score(""), None);
        assert_eq!(score("abc"), None);
        assert_eq!(score("NaN"), None);
    }

    #[test]
    fn test_oversized_score_is_an_error_not_a_continuation() {
        assert!(parse_number("1e20").is_some());
        assert_eq!(truncate_score(parse_number("1e20").unwrap()), None);

        let rows = vec![header(), row("a", "b", "1e20"), row("c", "d", "5")];
        let err = RowMerger::new(header()).merge(&rows).unwrap_err();
        match err {
            PifError::ScoreOutOfRange { parameter, score } => {
                assert_eq!(parameter, "a");
                assert_eq!(score, "1e20");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(is_legit_number("1e40"));
        let rows = vec![header(), row("a", "b", "1e40")];
        assert!(RowMerger::new(header()).merge(&rows).is_err());
        assert!(!is_legit_number("inf"));
        assert!(!is_legit_number("NaN"));
    }
}
