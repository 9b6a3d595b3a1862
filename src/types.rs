use std::collections::HashMap;

/// Where an output column takes its value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// Column exists in the report but never carries data
    Absent,
    /// Copy one input field, trimmed
    Single(String),
    /// Join the non-empty trimmed values of several input fields, in this order
    Concat(Vec<String>),
}

/// One output column of the report and the rule that fills it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub source: ColumnSource,
}

impl ColumnSpec {
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ColumnSource::Absent,
        }
    }

    pub fn single(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ColumnSource::Single(source.into()),
        }
    }

    pub fn concat<I, S>(name: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            source: ColumnSource::Concat(sources.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether this column is a placeholder that is emitted with an empty header
    pub fn is_placeholder(&self, blank_prefix: &str) -> bool {
        self.name.starts_with(blank_prefix)
    }
}

/// One record of the vendor export, keyed by input header.
///
/// A header that is known but has no value in this record (a short, ragged row)
/// is stored as `None`; a header that does not exist at all is simply missing.
/// Both read back as absent through [`InputRow::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRow {
    fields: HashMap<String, Option<String>>,
}

impl InputRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, keeping the first value when a header appears twice
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.fields.entry(column.into()).or_insert(value);
    }

    /// Raw value of a field, `None` when the column is missing or null
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|v| v.as_deref())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for InputRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = InputRow::new();
        for (k, v) in iter {
            row.insert(k, Some(v.into()));
        }
        row
    }
}

/// One record of the report: a value for every configured column, in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRow {
    cells: Vec<(String, String)>,
}

impl OutputRow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.push((column.into(), value.into()));
    }

    /// Value of the first cell with the given column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_row_keeps_first_duplicate_header() {
        let mut row = InputRow::new();
        row.insert("Client Name", Some("Acme".to_string()));
        row.insert("Client Name", Some("Other".to_string()));

        assert_eq!(row.get("Client Name"), Some("Acme"));
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_input_row_null_field_reads_as_absent() {
        let mut row = InputRow::new();
        row.insert("site_code", None);

        assert!(row.contains_column("site_code"));
        assert_eq!(row.get("site_code"), None);
        assert_eq!(row.get("not_there"), None);
    }

    #[test]
    fn test_output_row_preserves_push_order() {
        let mut row = OutputRow::with_capacity(3);
        row.push("b", "2");
        row.push("a", "1");
        row.push("", "");

        let names: Vec<&str> = row.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", ""]);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.value_at(0), Some("2"));
    }

    #[test]
    fn test_placeholder_detection_uses_prefix() {
        assert!(ColumnSpec::absent("blank1").is_placeholder("blank"));
        assert!(!ColumnSpec::absent("Extra Site 2").is_placeholder("blank"));
    }
}
