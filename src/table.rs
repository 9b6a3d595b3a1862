use crate::config::MappingConfig;
use crate::constants::BLANK_INTERNAL_PREFIX;
use crate::error::{MapperError, Result};
use crate::mapper::RowMapper;
use crate::types::{InputRow, OutputRow};

/// One column of the report as held while the table is being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    /// Unique name used while rows are collected
    pub internal_name: String,
    /// Header written to the report
    pub header: String,
}

/// The mapped report, held in memory until it is serialized.
///
/// Placeholder columns get a synthetic `__blank_<position>` name while rows
/// are collected, so that several of them never collide, and are given an
/// empty header only when [`OutputTable::final_headers`] is called for
/// serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
}

impl OutputTable {
    /// Empty table with the column layout of `config`
    pub fn new(config: &MappingConfig) -> Self {
        let columns = config
            .columns()
            .iter()
            .enumerate()
            .map(|(position, spec)| {
                if spec.is_placeholder(config.blank_prefix()) {
                    TableColumn {
                        internal_name: format!("{}{}", BLANK_INTERNAL_PREFIX, position),
                        header: String::new(),
                    }
                } else {
                    TableColumn {
                        internal_name: spec.name.clone(),
                        header: spec.name.clone(),
                    }
                }
            })
            .collect();

        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Map every input row through `config` into a new table
    pub fn build(config: &MappingConfig, rows: &[InputRow]) -> Result<Self> {
        let mapper = RowMapper::new(config);
        let mut table = Self::new(config);
        for row in rows {
            table.push_row(&mapper.map_row(row))?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: &OutputRow) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(MapperError::Config(format!(
                "Row has {} values but the report has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row.values().map(str::to_string).collect());
        Ok(())
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn internal_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.internal_name.as_str()).collect()
    }

    /// Headers as written to the report, placeholders rendered empty
    pub fn final_headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// All values of one column, addressed by internal name
    pub fn column_values(&self, internal_name: &str) -> Option<Vec<&str>> {
        let index = self
            .columns
            .iter()
            .position(|c| c.internal_name == internal_name)?;
        Some(self.rows.iter().map(|r| r[index].as_str()).collect())
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
