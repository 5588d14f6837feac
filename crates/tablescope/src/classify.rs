//! Column enumeration and classification.

use crate::{
    ColumnMetadata, DEFAULT_DISCRIMINATOR_COLUMN, InternalType, MetadataError, SchemaService,
    ScratchRecord,
};
use std::fmt;
use std::sync::Arc;

/// How a column's extra detail is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnClass {
    /// No extra detail
    Plain,
    /// Points at a row of `target_table`
    Reference { target_table: String },
    /// Closed set of raw values, in declaration order
    Enumerated { values: Vec<String> },
    /// The table's class indicator; never probed by assignment
    Discriminator,
}

/// Decides which column is a table's class indicator.
///
/// Platforms disagree on how that column is named, so the rule is
/// configurable rather than a fixed string.
#[derive(Clone)]
pub enum DiscriminatorRule {
    /// The column with this exact name
    Named(String),
    /// Any column whose platform type tag parses to the same [`InternalType`]
    /// as this one (`class_name` and `sys_class_name` are the same type)
    InternalType(String),
    /// A custom predicate over the column name and metadata
    Predicate(Arc<dyn Fn(&str, &ColumnMetadata) -> bool + Send + Sync>),
    /// No column is treated as a class indicator
    Disabled,
}

impl DiscriminatorRule {
    pub fn predicate(f: impl Fn(&str, &ColumnMetadata) -> bool + Send + Sync + 'static) -> Self {
        DiscriminatorRule::Predicate(Arc::new(f))
    }

    pub fn matches(&self, name: &str, meta: &ColumnMetadata) -> bool {
        match self {
            DiscriminatorRule::Named(column) => column == name,
            DiscriminatorRule::InternalType(tag) => {
                match (meta.parsed_type(), InternalType::parse(tag)) {
                    (InternalType::Other(a), InternalType::Other(b)) => a.eq_ignore_ascii_case(&b),
                    (a, b) => a == b,
                }
            }
            DiscriminatorRule::Predicate(f) => f(name, meta),
            DiscriminatorRule::Disabled => false,
        }
    }
}

impl Default for DiscriminatorRule {
    fn default() -> Self {
        DiscriminatorRule::Named(DEFAULT_DISCRIMINATOR_COLUMN.to_string())
    }
}

impl fmt::Debug for DiscriminatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscriminatorRule::Named(column) => f.debug_tuple("Named").field(column).finish(),
            DiscriminatorRule::InternalType(tag) => {
                f.debug_tuple("InternalType").field(tag).finish()
            }
            DiscriminatorRule::Predicate(_) => f.write_str("Predicate(..)"),
            DiscriminatorRule::Disabled => f.write_str("Disabled"),
        }
    }
}

/// List every column of the record, own and inherited, sorted by name.
///
/// Names the platform reports twice appear once.
pub fn enumerate_columns<S: SchemaService>(
    record: &ScratchRecord<'_, S>,
) -> Result<Vec<String>, MetadataError> {
    let mut names = record.column_names()?;
    names.sort();
    names.dedup();
    Ok(names)
}

/// Classify a column from its metadata.
///
/// Precedence: reference, then class indicator, then choices. A column that
/// declares both a reference target and choices is treated as a reference.
pub fn classify(
    name: &str,
    meta: &ColumnMetadata,
    rule: &DiscriminatorRule,
) -> Result<ColumnClass, MetadataError> {
    if meta.parsed_type().is_reference() {
        return match meta.reference_target.as_deref().map(str::trim) {
            Some(target) if !target.is_empty() => {
                if !meta.declared_choices.is_empty() {
                    tracing::debug!(
                        column = name,
                        choices = meta.declared_choices.len(),
                        "reference column also declares choices; ignoring them"
                    );
                }
                Ok(ColumnClass::Reference {
                    target_table: target.to_string(),
                })
            }
            _ => Err(MetadataError::Platform(format!(
                "reference column `{name}` has no target table"
            ))),
        };
    }

    if rule.matches(name, meta) {
        return Ok(ColumnClass::Discriminator);
    }

    if !meta.declared_choices.is_empty() {
        return Ok(ColumnClass::Enumerated {
            values: meta.declared_choices.clone(),
        });
    }

    Ok(ColumnClass::Plain)
}
