use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::constants::{
    BLANK_COLUMN_PREFIX, CHALLENGE_COLUMN, ID_ON_BETTING_COLUMN, LEGACY_PROFILE, STANDARD_PROFILE,
};
use crate::error::{MapperError, Result};
use crate::normalize::{LookupTable, ValueNormalizer};
use crate::types::{ColumnSource, ColumnSpec};

/// A named report layout: the ordered column map plus the lookup tables of
/// the recoded columns. Immutable once built and passed to the mapper by
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConfig {
    name: String,
    blank_prefix: String,
    columns: Vec<ColumnSpec>,
    normalizer: ValueNormalizer,
}

impl MappingConfig {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            blank_prefix: BLANK_COLUMN_PREFIX.to_string(),
            columns,
            normalizer: ValueNormalizer::new(),
        }
    }

    pub fn with_recode(mut self, column: impl Into<String>, table: LookupTable) -> Self {
        self.normalizer.register(column, table);
        self
    }

    pub fn with_blank_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_prefix = prefix.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blank_prefix(&self) -> &str {
        &self.blank_prefix
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn normalizer(&self) -> &ValueNormalizer {
        &self.normalizer
    }

    /// Profile for the current vendor export
    pub fn standard() -> Self {
        let columns = vec![
            ColumnSpec::single("Order Number", "order_internal_id"),
            ColumnSpec::single("Client Name", "client_name"),
            ColumnSpec::single("Visit Code", "internal_id"),
            ColumnSpec::single("Order Deadline", "deadline_date"),
            ColumnSpec::single("Responsibility", "responsibility"),
            ColumnSpec::single("Premises Name", "site_name"),
            ColumnSpec::single("Address1", "site_address_1"),
            ColumnSpec::single("Address2", "site_address_2"),
            ColumnSpec::single("Address3", "site_address_3"),
            ColumnSpec::single("Post Code", "site_post_code"),
            ColumnSpec::single("Submitted", "submitted_date"),
            ColumnSpec::single("Approved", "approval_date"),
            ColumnSpec::single("Item to order", "item_to_order"),
            ColumnSpec::single("Actual Visit Date", "date_of_visit"),
            ColumnSpec::single("Actual Visit Time", "time_of_visit"),
            ColumnSpec::absent("blank1"),
            ColumnSpec::single("Pass-Fail", "primary_result"),
            ColumnSpec::single("Pass-Fail2", "secondary_result"),
            ColumnSpec::single(
                "Abort Reason",
                "Please detail why you were unable to conduct this audit:",
            ),
            ColumnSpec::single("Extra Site 1", "site_code"),
            ColumnSpec::absent("Extra Site 2"),
            ColumnSpec::absent("Extra Site 3"),
            ColumnSpec::absent("Extra Site 4"),
            ColumnSpec::single(
                CHALLENGE_COLUMN,
                "Were you challenged for ID on entry, at the machine or after machine play?",
            ),
            ColumnSpec::absent("Machine play"),
            ColumnSpec::absent("After machine"),
            // Leading space is part of the vendor header
            ColumnSpec::single(
                ID_ON_BETTING_COLUMN,
                " Did the staff member who served you challenge you for ID at the counter while you placed your bet?",
            ),
            ColumnSpec::absent("blank2"),
            ColumnSpec::absent("blank3"),
            ColumnSpec::single("VISITORSEX", "auditor_gender"),
            ColumnSpec::single(
                "Eye contact on On entry/Whilst browsing",
                "As you entered the shop was eye contact made by a member of staff?",
            ),
            ColumnSpec::single(
                "Eye contact on betting",
                "Did the staff member who served you make eye contact with you?",
            ),
            ColumnSpec::absent("T21 cashier badge"),
            ColumnSpec::single(
                "T21 posters shop",
                "Did you see any 'Think 21' posters in the shop?",
            ),
            ColumnSpec::single(
                "T21 posters Yes",
                "Did you see any 'Think 21' posters behind the counter?",
            ),
        ];

        Self::new(STANDARD_PROFILE, columns)
            .with_recode(CHALLENGE_COLUMN, challenge_lookup())
            .with_recode(ID_ON_BETTING_COLUMN, id_on_betting_lookup())
    }

    /// Profile for the older export: no gender or deadline fields, and the
    /// abort reason split over two questions.
    ///
    /// Provisional: the `abort_comments` source has not been seen in a real
    /// export yet. Replace it once a legacy export sample confirms the header.
    pub fn legacy() -> Self {
        let mut config = Self::standard();
        config.name = LEGACY_PROFILE.to_string();
        for spec in &mut config.columns {
            match spec.name.as_str() {
                "VISITORSEX" | "Order Deadline" => spec.source = ColumnSource::Absent,
                "Abort Reason" => {
                    spec.source = ColumnSource::Concat(vec![
                        "Please detail why you were unable to conduct this audit:".to_string(),
                        "abort_comments".to_string(),
                    ])
                }
                _ => {}
            }
        }
        config
    }

    /// Look up a built-in profile by name
    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            STANDARD_PROFILE => Ok(Self::standard()),
            LEGACY_PROFILE => Ok(Self::legacy()),
            other => Err(MapperError::UnknownProfile(other.to_string())),
        }
    }

    /// Load a profile from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MapperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawProfile = toml::from_str(content)?;
        let config = Self::try_from(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Render this profile in the format accepted by [`MappingConfig::load`]
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(&RawProfile::from(self))?)
    }

    /// Reject layouts that cannot produce an unambiguous report
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(MapperError::Config(format!(
                "Profile '{}' has no columns",
                self.name
            )));
        }
        if self.blank_prefix.is_empty() {
            return Err(MapperError::Config(format!(
                "Profile '{}' has an empty blank_prefix",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for spec in &self.columns {
            if spec.is_placeholder(&self.blank_prefix) {
                continue;
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(MapperError::Config(format!(
                    "Duplicate output column '{}' in profile '{}'",
                    spec.name, self.name
                )));
            }
        }

        for column in self.normalizer.columns() {
            if !self.columns.iter().any(|c| c.name == column) {
                warn!(profile = %self.name, column, "Recode table targets a column that is not in the column map; it will be ignored");
            }
        }
        Ok(())
    }
}

fn challenge_lookup() -> LookupTable {
    [
        ("entry", "On entry/Whilst browsing"),
        ("machine", "During machine play"),
        ("post_machine", "After machine play/Before reaching the counter"),
        ("not_challenged", "Not challenged here"),
    ]
    .into_iter()
    .collect()
}

fn id_on_betting_lookup() -> LookupTable {
    [("not_challenged", "No"), ("counter", "Yes")]
        .into_iter()
        .collect()
}

// On-disk profile format

#[derive(Debug, Serialize, Deserialize)]
struct RawProfile {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blank_prefix: Option<String>,
    #[serde(default)]
    columns: Vec<RawColumn>,
    #[serde(default)]
    recode: Vec<RawRecode>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawColumn {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<RawSource>,
}

/// A bare string is a single source column, an array is concatenated
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSource {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Serialize, Deserialize)]
struct RawRecode {
    column: String,
    table: BTreeMap<String, String>,
}

impl From<Option<RawSource>> for ColumnSource {
    fn from(raw: Option<RawSource>) -> Self {
        match raw {
            None => ColumnSource::Absent,
            Some(RawSource::One(column)) => ColumnSource::Single(column),
            Some(RawSource::Many(columns)) if columns.is_empty() => ColumnSource::Absent,
            Some(RawSource::Many(columns)) => ColumnSource::Concat(columns),
        }
    }
}

impl TryFrom<RawProfile> for MappingConfig {
    type Error = MapperError;

    fn try_from(raw: RawProfile) -> Result<Self> {
        let columns = raw
            .columns
            .into_iter()
            .map(|c| ColumnSpec {
                name: c.name,
                source: c.source.into(),
            })
            .collect();

        let mut config = MappingConfig::new(raw.name, columns);
        if let Some(prefix) = raw.blank_prefix {
            config = config.with_blank_prefix(prefix);
        }

        let mut recoded = HashSet::new();
        for recode in raw.recode {
            if !recoded.insert(recode.column.clone()) {
                return Err(MapperError::Config(format!(
                    "Column '{}' has more than one recode table",
                    recode.column
                )));
            }
            let table: LookupTable = recode.table.into_iter().collect();
            config = config.with_recode(recode.column, table);
        }
        Ok(config)
    }
}

impl From<&MappingConfig> for RawProfile {
    fn from(config: &MappingConfig) -> Self {
        let columns = config
            .columns
            .iter()
            .map(|spec| RawColumn {
                name: spec.name.clone(),
                source: match &spec.source {
                    ColumnSource::Absent => None,
                    ColumnSource::Single(column) => Some(RawSource::One(column.clone())),
                    ColumnSource::Concat(columns) => Some(RawSource::Many(columns.clone())),
                },
            })
            .collect();

        let recode = config
            .normalizer
            .columns()
            .into_iter()
            .filter_map(|column| {
                config.normalizer.table_for(column).map(|table| RawRecode {
                    column: column.to_string(),
                    table: table
                        .entries()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                })
            })
            .collect();

        let blank_prefix = (config.blank_prefix != BLANK_COLUMN_PREFIX)
            .then(|| config.blank_prefix.clone());

        RawProfile {
            name: config.name.clone(),
            blank_prefix,
            columns,
            recode,
        }
    }
}
