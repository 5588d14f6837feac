//! Per-column detail resolution.
//!
//! Reference columns get their target's label and display field from a
//! second scratch record; choice columns get one rendered label per declared
//! value; the class indicator gets a single synthetic entry.

use crate::{
    ChoiceEntry, ColumnClass, ColumnMetadata, FieldValue, MetadataError, ReferenceDetail,
    SchemaService, ScratchRecord,
};

/// Extra detail of one column. At most one side is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detail {
    pub reference: Option<ReferenceDetail>,
    pub choices: Vec<ChoiceEntry>,
}

/// Resolve the extra detail of `column` according to its class.
///
/// `record` is the scratch record of the inspected table. Choice probing
/// assigns values to it; the class indicator is never assigned.
pub fn resolve_detail<'s, S: SchemaService>(
    service: &'s S,
    record: &mut ScratchRecord<'s, S>,
    column: &str,
    meta: &ColumnMetadata,
    class: &ColumnClass,
) -> Result<Detail, MetadataError> {
    match class {
        ColumnClass::Plain => Ok(Detail::default()),
        ColumnClass::Reference { target_table } => Ok(Detail {
            reference: Some(resolve_reference(service, target_table)?),
            choices: Vec::new(),
        }),
        ColumnClass::Enumerated { values } => Ok(Detail {
            reference: None,
            choices: resolve_choices(record, column, meta, values)?,
        }),
        ColumnClass::Discriminator => Ok(Detail {
            reference: None,
            choices: vec![ChoiceEntry {
                label: record.class_label()?,
                value: FieldValue::Text(record.table().to_string()),
                order: 1,
            }],
        }),
    }
}

/// Read the label and display field of a referenced table.
pub fn resolve_reference<S: SchemaService>(
    service: &S,
    target_table: &str,
) -> Result<ReferenceDetail, MetadataError> {
    let target = ScratchRecord::provision(service, target_table)?
        .ok_or_else(|| MetadataError::UnknownTable(target_table.to_string()))?;

    Ok(ReferenceDetail {
        label: target.class_label()?,
        target_table: target_table.to_string(),
        display_field: target.display_field()?,
    })
}

/// Render a label for each declared value, keeping declaration order.
pub fn resolve_choices<S: SchemaService>(
    record: &mut ScratchRecord<'_, S>,
    column: &str,
    meta: &ColumnMetadata,
    values: &[String],
) -> Result<Vec<ChoiceEntry>, MetadataError> {
    let integer = meta.parsed_type().is_integer();

    let mut entries = Vec::with_capacity(values.len());
    for (idx, raw) in values.iter().enumerate() {
        let value = match FieldValue::coerce(raw, integer) {
            Some(value) => value,
            None => {
                tracing::warn!(
                    column,
                    value = %raw,
                    "choice value is not an integer; keeping it as text"
                );
                FieldValue::Text(raw.clone())
            }
        };

        let label = record.probe_label(column, &value)?;
        tracing::trace!(column, %value, %label, "rendered choice");

        entries.push(ChoiceEntry {
            label,
            value,
            order: idx as u32 + 1,
        });
    }

    Ok(entries)
}
