//! The table model produced by a build.
//!
//! All types derive [`Facet`] so any facet format crate can serialize them;
//! the JSON shape is a plain array of column records.

use facet::Facet;
use std::fmt;
use std::ops::Deref;

/// A scalar assigned to a field, or offered as a choice value.
///
/// Serialized untagged: integers as JSON numbers, text as JSON strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Facet)]
#[facet(untagged)]
#[repr(u8)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    /// Coerce a raw declared value to the scalar kind of its column.
    ///
    /// Returns `None` when `integer` is requested and `raw` isn't a whole number.
    pub fn coerce(raw: &str, integer: bool) -> Option<Self> {
        if integer {
            raw.trim().parse::<i64>().ok().map(FieldValue::Integer)
        } else {
            Some(FieldValue::Text(raw.to_string()))
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Where a reference column points.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ReferenceDetail {
    /// Display label of the referenced table
    pub label: String,
    /// Name of the referenced table
    pub target_table: String,
    /// Field used to show a record of the referenced table
    pub display_field: String,
}

/// One valid value of a choice column.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ChoiceEntry {
    /// Rendered display label
    pub label: String,
    /// Value, coerced to the column's scalar kind
    pub value: FieldValue,
    /// 1-based declaration order
    pub order: u32,
}

/// Everything known about one column of the inspected table.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ColumnDescriptor {
    /// Column name, unique within the table
    pub name: String,
    /// Human-readable column label
    pub label: String,
    /// Platform type tag (e.g. `integer`, `string`, `reference`)
    pub internal_type: String,
    /// Declared storage length, 0 for types without one
    pub max_length: u32,
    /// Must be populated before a record is valid
    pub mandatory: bool,
    /// Declared on an ancestor table rather than the inspected one
    pub inherited: bool,
    /// Value supplied by the platform (identity and audit columns)
    pub auto_generated: bool,
    /// Computed rather than stored
    #[facet(rename = "virtual")]
    pub is_virtual: bool,
    /// Present only for reference columns
    #[facet(default)]
    pub reference_detail: Option<ReferenceDetail>,
    /// Present only for choice and class-indicator columns, in declaration order
    #[facet(default)]
    pub choice_entries: Vec<ChoiceEntry>,
}

impl ColumnDescriptor {
    pub fn is_reference(&self) -> bool {
        self.reference_detail.is_some()
    }

    pub fn has_choices(&self) -> bool {
        !self.choice_entries.is_empty()
    }

    /// Find the choice entry for a value.
    pub fn choice(&self, value: &FieldValue) -> Option<&ChoiceEntry> {
        self.choice_entries.iter().find(|c| &c.value == value)
    }
}

/// Columns of one table, sorted by name.
///
/// A read-only snapshot: it is rebuilt from live metadata on every call and
/// has no identity beyond the build that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Facet)]
#[facet(transparent)]
#[repr(transparent)]
pub struct TableModel(Vec<ColumnDescriptor>);

impl TableModel {
    /// Wrap columns, sorting them by name.
    pub fn new(mut columns: Vec<ColumnDescriptor>) -> Self {
        columns.sort_by(|a, b| a.name.cmp(&b.name));
        TableModel(columns)
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.0
    }

    pub fn into_columns(self) -> Vec<ColumnDescriptor> {
        self.0
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.0
            .binary_search_by(|c| c.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.0[idx])
    }

    /// Columns that point at another table.
    pub fn references(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.0.iter().filter(|c| c.is_reference())
    }

    /// Columns with a closed set of choice entries.
    pub fn enumerations(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.0.iter().filter(|c| c.has_choices())
    }

    pub fn to_json(&self) -> String {
        facet_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> String {
        facet_json::to_string_pretty(self)
    }

    /// Check the structural guarantees of a model.
    ///
    /// Returns one message per violation; an empty list means the model is
    /// sorted, has unique names, never mixes reference detail with choice
    /// entries, and numbers every choice list `1..=n`.
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();

        for pair in self.0.windows(2) {
            if pair[0].name >= pair[1].name {
                out.push(format!(
                    "columns `{}` and `{}` are out of order or duplicated",
                    pair[0].name, pair[1].name
                ));
            }
        }

        for col in &self.0 {
            if col.is_reference() && col.has_choices() {
                out.push(format!(
                    "column `{}` has both reference detail and choice entries",
                    col.name
                ));
            }
            if let Some(detail) = &col.reference_detail
                && detail.target_table.is_empty()
            {
                out.push(format!("column `{}` references an empty table name", col.name));
            }
            for (idx, entry) in col.choice_entries.iter().enumerate() {
                let expected = idx as u32 + 1;
                if entry.order != expected {
                    out.push(format!(
                        "column `{}` choice #{} has order {}, expected {}",
                        col.name, idx, entry.order, expected
                    ));
                }
            }
        }

        out
    }
}

impl Deref for TableModel {
    type Target = [ColumnDescriptor];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a TableModel {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
