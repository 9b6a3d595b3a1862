use std::collections::{BTreeMap, HashMap};

/// Key used for every lookup: surrounding whitespace removed, lower-cased
pub fn normalization_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Closed-vocabulary recode table.
///
/// Keys are stored normalized. A value that is not in the table becomes an
/// empty string; the raw code never passes through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: BTreeMap<String, String>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, display: impl Into<String>) {
        self.entries.insert(normalization_key(code), display.into());
    }

    /// Recode a raw value, blank on miss
    pub fn normalize(&self, raw: &str) -> String {
        self.entries
            .get(&normalization_key(raw))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `value` is one of the display values this table can produce
    pub fn produces(&self, value: &str) -> bool {
        self.entries.values().any(|v| v == value)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LookupTable
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = LookupTable::new();
        for (code, display) in iter {
            table.insert(code.as_ref(), display);
        }
        table
    }
}

/// Post-processing pass that recodes the designated output columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueNormalizer {
    tables: HashMap<String, LookupTable>,
}

impl ValueNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lookup table for an output column
    pub fn register(&mut self, column: impl Into<String>, table: LookupTable) {
        self.tables.insert(column.into(), table);
    }

    /// Get the lookup table registered for an output column
    pub fn table_for(&self, column: &str) -> Option<&LookupTable> {
        self.tables.get(column)
    }

    /// Apply the column's lookup table, or pass the value through when the
    /// column is not recoded
    pub fn apply(&self, column: &str, value: String) -> String {
        match self.table_for(column) {
            Some(table) => table.normalize(&value),
            None => value,
        }
    }

    /// List recoded output columns, sorted
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.tables.keys().map(|k| k.as_str()).collect();
        columns.sort_unstable();
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge_table() -> LookupTable {
        [
            ("entry", "On entry/Whilst browsing"),
            ("machine", "During machine play"),
            ("post_machine", "After machine play/Before reaching the counter"),
            ("not_challenged", "Not challenged here"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_trimmed() {
        let table = challenge_table();
        assert_eq!(table.normalize("ENTRY"), "On entry/Whilst browsing");
        assert_eq!(table.normalize("  Post_Machine \t"), "After machine play/Before reaching the counter");
    }

    #[test]
    fn test_unknown_and_empty_values_become_blank() {
        let table = challenge_table();
        assert_eq!(table.normalize("unknown_code"), "");
        assert_eq!(table.normalize(""), "");
        assert_eq!(table.normalize("   "), "");
    }

    #[test]
    fn test_display_values_do_not_round_trip() {
        // Display values are not keys, so recoding twice blanks them
        let table = challenge_table();
        let once = table.normalize("machine");
        assert_eq!(table.normalize(&once), "");
    }

    #[test]
    fn test_output_stays_inside_vocabulary() {
        let table = challenge_table();
        for raw in ["entry", "MACHINE", "not_challenged ", "counter", "On entry/Whilst browsing", ""] {
            let value = table.normalize(raw);
            assert!(value.is_empty() || table.produces(&value), "leaked {:?}", value);
        }
        assert!(!table.produces("entry"));
    }

    #[test]
    fn test_keys_are_normalized_on_insert() {
        let mut table = LookupTable::new();
        table.insert(" Counter ", "Yes");
        assert_eq!(table.entries().next(), Some(("counter", "Yes")));
        assert_eq!(table.normalize("COUNTER"), "Yes");
    }

    #[test]
    fn test_normalizer_only_touches_registered_columns() {
        let mut normalizer = ValueNormalizer::new();
        normalizer.register("ID'd on betting?", [("counter", "Yes")].into_iter().collect());

        assert_eq!(normalizer.apply("ID'd on betting?", "counter".to_string()), "Yes");
        assert_eq!(normalizer.apply("ID'd on betting?", "teller".to_string()), "");
        assert_eq!(normalizer.apply("Client Name", "counter".to_string()), "counter");
        assert_eq!(normalizer.columns(), vec!["ID'd on betting?"]);
    }
}
