//! Fixed names shared by the profiles, the table builder and the CLI.

/// File name of the generated report, written into the chosen output directory
pub const OUTPUT_FILE_NAME: &str = "Betfred Report Data.csv";

/// Export file the vendor system produces
pub const EXPECTED_INPUT_FILE_NAME: &str = "audits_basic_data_export.csv";

/// Output columns whose configured name starts with this prefix get an empty header
pub const BLANK_COLUMN_PREFIX: &str = "blank";

/// Internal name family used for placeholder columns while the table is built
pub const BLANK_INTERNAL_PREFIX: &str = "__blank_";

/// Separator between values of a multi-source column
pub const CONCAT_SEPARATOR: &str = " | ";

pub const UTF8_BOM: &str = "\u{feff}";

/// Field values the vendor export uses for "no answer"; read as null.
/// Matched exactly, case-sensitive, like pandas' default `na_values`.
pub const MISSING_VALUE_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// Profile names (used in CLI)
pub const STANDARD_PROFILE: &str = "standard";
pub const LEGACY_PROFILE: &str = "legacy";

// Output columns that are recoded through a lookup table
pub const CHALLENGE_COLUMN: &str =
    "Were you challenged for ID on On entry/Whilst browsing, at the machine or after machine play?";
pub const ID_ON_BETTING_COLUMN: &str = "ID'd on betting?";

/// Get all built-in profile names
pub fn get_builtin_profiles() -> Vec<&'static str> {
    vec![STANDARD_PROFILE, LEGACY_PROFILE]
}
