use crate::config::MappingConfig;
use crate::constants::CONCAT_SEPARATOR;
use crate::types::{ColumnSource, InputRow, OutputRow};

/// Compute one output value from an input row.
///
/// Never fails: a missing or null source column yields an empty string, so
/// exports that drop a column from one week to the next still map.
pub fn map_value(row: &InputRow, source: &ColumnSource) -> String {
    match source {
        ColumnSource::Absent => String::new(),
        ColumnSource::Single(column) => row
            .get(column)
            .map(|v| v.trim().to_string())
            .unwrap_or_default(),
        ColumnSource::Concat(columns) => columns
            .iter()
            .filter_map(|column| row.get(column))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(CONCAT_SEPARATOR),
    }
}

/// Maps vendor rows onto the report layout of one profile
pub struct RowMapper<'a> {
    config: &'a MappingConfig,
}

impl<'a> RowMapper<'a> {
    pub fn new(config: &'a MappingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MappingConfig {
        self.config
    }

    /// Map one input row: one value per configured column, in column order,
    /// with recoded columns passed through their lookup table
    pub fn map_row(&self, row: &InputRow) -> OutputRow {
        let columns = self.config.columns();
        let normalizer = self.config.normalizer();
        let mut out = OutputRow::with_capacity(columns.len());
        for spec in columns {
            let raw = map_value(row, &spec.source);
            out.push(spec.name.clone(), normalizer.apply(&spec.name, raw));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CHALLENGE_COLUMN, ID_ON_BETTING_COLUMN};
    use crate::types::ColumnSpec;

    fn row(pairs: &[(&str, &str)]) -> InputRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_absent_is_always_empty() {
        let input = row(&[("blank1", "data")]);
        assert_eq!(map_value(&input, &ColumnSource::Absent), "");
    }

    #[test]
    fn test_single_trims_value() {
        let input = row(&[("Order Number", " 123 ")]);
        let source = ColumnSource::Single("Order Number".to_string());
        assert_eq!(map_value(&input, &source), "123");
    }

    #[test]
    fn test_single_missing_or_null_column_is_empty() {
        let mut input = row(&[("Client Name", "Acme")]);
        input.insert("site_code", None);

        assert_eq!(map_value(&input, &ColumnSource::Single("VISITORSEX".to_string())), "");
        assert_eq!(map_value(&input, &ColumnSource::Single("site_code".to_string())), "");
        let blank = row(&[("x", "   ")]);
        assert_eq!(map_value(&blank, &ColumnSource::Single("x".to_string())), "");
    }

    #[test]
    fn test_concat_skips_blanks_and_keeps_declared_order() {
        let input = row(&[("a", ""), ("b", "Reason A"), ("c", " Reason B ")]);
        let source = ColumnSource::Concat(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(map_value(&input, &source), "Reason A | Reason B");

        let reversed = ColumnSource::Concat(vec!["c".into(), "missing".into(), "b".into()]);
        assert_eq!(map_value(&input, &reversed), "Reason B | Reason A");
    }

    #[test]
    fn test_concat_of_empty_sources_is_empty() {
        let input = row(&[("a", " "), ("b", "")]);
        let source = ColumnSource::Concat(vec!["a".into(), "b".into(), "z".into()]);
        assert_eq!(map_value(&input, &source), "");
    }

    #[test]
    fn test_map_row_has_one_value_per_column() {
        let config = MappingConfig::standard();
        let mapper = RowMapper::new(&config);
        let out = mapper.map_row(&InputRow::new());

        assert_eq!(out.len(), config.columns().len());
        assert!(out.values().all(str::is_empty));
    }

    #[test]
    fn test_map_row_recodes_designated_columns_only() {
        let config = MappingConfig::new(
            "test",
            vec![
                ColumnSpec::single(CHALLENGE_COLUMN, "challenge"),
                ColumnSpec::single(ID_ON_BETTING_COLUMN, "betting"),
                ColumnSpec::single("Machine play", "challenge"),
            ],
        )
        .with_recode(CHALLENGE_COLUMN, [("entry", "On entry/Whilst browsing")].into_iter().collect())
        .with_recode(ID_ON_BETTING_COLUMN, [("counter", "Yes")].into_iter().collect());

        let mapper = RowMapper::new(&config);
        let out = mapper.map_row(&row(&[("challenge", " Entry "), ("betting", "till")]));

        assert_eq!(out.get(CHALLENGE_COLUMN), Some("On entry/Whilst browsing"));
        assert_eq!(out.get(ID_ON_BETTING_COLUMN), Some(""));
        assert_eq!(out.get("Machine play"), Some("Entry"));
    }
}
