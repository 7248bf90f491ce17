//! Table identifier normalisation and fully-qualified table names.
//!
//! Output tables in the data platform must have lowercase identifiers made
//! of ASCII letters, digits, and underscores. [`to_valid_table_name`] turns
//! arbitrary user input (model endpoint names, dataset labels) into such an
//! identifier.
//!
//! # Normalisation Rules
//!
//! The steps run in a fixed order, each feeding the next:
//!
//! 1. Missing input is treated as an empty string
//! 2. Lowercase the whole string
//! 3. Replace every character outside `[a-z0-9_]` with `_`
//! 4. Collapse runs of `_` into a single `_`
//! 5. Empty results become [`FALLBACK_TABLE_NAME`]
//! 6. Results starting with a digit gain a `t_` prefix
//! 7. Truncate to the maximum length in characters
//! 8. Strip leading and trailing underscores
//! 9. Empty results become [`FALLBACK_TABLE_NAME`] again
//!
//! Truncation happens before the final fallback, so a maximum length of zero
//! still yields the one-character fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default maximum identifier length in characters.
pub const DEFAULT_MAX_TABLE_NAME_LENGTH: usize = 128;

/// Identifier returned when nothing usable remains of the input.
pub const FALLBACK_TABLE_NAME: &str = "t";

/// Prefix applied to identifiers that would otherwise start with a digit.
const DIGIT_PREFIX: &str = "t_";

/// Normalises a raw string into a valid lowercase table identifier.
///
/// This is a total function: every input, including `None`, produces a
/// non-empty identifier.
///
/// # Examples
///
/// ```
/// use llm_observer_data::{DEFAULT_MAX_TABLE_NAME_LENGTH, to_valid_table_name};
///
/// assert_eq!(
///     to_valid_table_name(Some("Hello---World!!"), DEFAULT_MAX_TABLE_NAME_LENGTH),
///     "hello_world"
/// );
/// assert_eq!(
///     to_valid_table_name(Some("123abc"), DEFAULT_MAX_TABLE_NAME_LENGTH),
///     "t_123abc"
/// );
/// assert_eq!(to_valid_table_name(None, DEFAULT_MAX_TABLE_NAME_LENGTH), "t");
/// ```
#[must_use]
pub fn to_valid_table_name(raw: Option<&str>, max_length: usize) -> String {
    let lowered = raw.unwrap_or_default().to_lowercase();
    let mut name = collapse_underscores(lowered.chars().map(replace_invalid_char));

    if name.is_empty() {
        FALLBACK_TABLE_NAME.clone_into(&mut name);
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, DIGIT_PREFIX);
    }

    let truncated: String = name.chars().take(max_length).collect();
    let trimmed = truncated.trim_matches('_');

    if trimmed.is_empty() {
        FALLBACK_TABLE_NAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Returns `true` if the character may appear in a table identifier.
const fn is_valid_table_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

const fn replace_invalid_char(c: char) -> char {
    if is_valid_table_name_char(c) { c } else { '_' }
}

/// Collects characters, dropping any `_` that directly follows another.
fn collapse_underscores(chars: impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    for c in chars {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

/// A fully-qualified three-part table name (`catalog.schema.table`).
///
/// # Example
///
/// ```
/// use llm_observer_data::TableName;
///
/// let name = TableName::new("llm_observer", "default", "sales_data_100");
/// assert_eq!(name.to_string(), "llm_observer.default.sales_data_100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName {
    catalog: String,
    schema: String,
    table: String,
}

impl TableName {
    /// Creates a table name from its three parts as given.
    #[must_use]
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Creates a table name whose table part is normalised with
    /// [`to_valid_table_name`] using the default maximum length.
    ///
    /// The catalog and schema are kept verbatim.
    ///
    /// # Example
    ///
    /// ```
    /// use llm_observer_data::TableName;
    ///
    /// let name = TableName::sanitized("llm_observer", "default", "Claude Sonnet 4.5");
    /// assert_eq!(name.table(), "claude_sonnet_4_5");
    /// ```
    #[must_use]
    pub fn sanitized(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        raw_table: &str,
    ) -> Self {
        Self::new(
            catalog,
            schema,
            to_valid_table_name(Some(raw_table), DEFAULT_MAX_TABLE_NAME_LENGTH),
        )
    }

    /// Returns the catalog part.
    #[must_use]
    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    /// Returns the schema part.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Returns the table part.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

#[cfg(test)]
mod tests {
    //! Covers identifier normalisation order and three-part name rendering.

    use rstest::rstest;

    use super::*;

    fn sanitize(raw: &str) -> String {
        to_valid_table_name(Some(raw), DEFAULT_MAX_TABLE_NAME_LENGTH)
    }

    fn is_identifier_shape(name: &str) -> bool {
        let mut chars = name.chars();
        chars.next().is_some_and(|c| c.is_ascii_lowercase())
            && chars.all(is_valid_table_name_char)
    }

    #[rstest]
    #[case("Hello---World!!", "hello_world")]
    #[case("123abc", "t_123abc")]
    #[case("already_valid", "already_valid")]
    #[case("Claude Sonnet 4.5", "claude_sonnet_4_5")]
    #[case("databricks-meta-llama-3-3-70b-instruct", "databricks_meta_llama_3_3_70b_instruct")]
    #[case("__edge__", "edge")]
    #[case("a__b___c", "a_b_c")]
    #[case("!!!", "t")]
    #[case("", "t")]
    #[case("Ünïcödé", "n_c_d")]
    fn normalises_raw_names(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitize(raw), expected);
    }

    #[test]
    fn missing_input_matches_empty_input() {
        assert_eq!(to_valid_table_name(None, DEFAULT_MAX_TABLE_NAME_LENGTH), "t");
        assert_eq!(sanitize(""), "t");
    }

    #[rstest]
    #[case("AAAA", 2, "aa")]
    #[case("abc_def", 4, "abc")]
    #[case("123", 2, "t")]
    #[case("123", 3, "t_1")]
    #[case("anything", 0, "t")]
    #[case("_", 0, "t")]
    fn truncation_precedes_final_fallback(
        #[case] raw: &str,
        #[case] max_length: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(to_valid_table_name(Some(raw), max_length), expected);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let raw = "ab".repeat(100);
        let name = to_valid_table_name(Some(raw.as_str()), 7);
        assert_eq!(name, "abababa");
        assert_eq!(name.chars().count(), 7);
    }

    #[test]
    fn leading_separator_is_stripped_after_digit_check() {
        // The digit prefix is applied before stripping, so a stripped leading
        // separator can expose a digit.
        assert_eq!(sanitize("_1abc"), "1abc");
    }

    #[rstest]
    #[case("Model Endpoint #1")]
    #[case("9 lives")]
    #[case("sales data (2024)")]
    #[case("ALL CAPS TABLE")]
    #[case("dots.and.slashes/here")]
    fn normalised_names_have_identifier_shape(#[case] raw: &str) {
        for max_length in [1, 3, 8, DEFAULT_MAX_TABLE_NAME_LENGTH] {
            let name = to_valid_table_name(Some(raw), max_length);
            assert!(is_identifier_shape(&name), "bad identifier: {name}");
            assert!(name.chars().count() <= max_length);
            assert!(!name.contains("__"));
        }
    }

    #[test]
    fn default_maximum_is_enforced() {
        let raw = "x".repeat(500);
        assert_eq!(sanitize(&raw).len(), DEFAULT_MAX_TABLE_NAME_LENGTH);
    }

    #[test]
    fn table_name_renders_three_parts() {
        let name = TableName::new("catalog", "schema", "table");
        assert_eq!(name.to_string(), "catalog.schema.table");
        assert_eq!(name.catalog(), "catalog");
        assert_eq!(name.schema(), "schema");
        assert_eq!(name.table(), "table");
    }

    #[test]
    fn sanitized_table_name_only_normalises_table_part() {
        let name = TableName::sanitized("Main", "Dev-Schema", "123 Results");
        assert_eq!(name.to_string(), "Main.Dev-Schema.t_123_results");
    }
}
