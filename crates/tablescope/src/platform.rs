//! The platform's schema and metadata service, as seen by the builder.

use crate::{FieldValue, InternalType, MetadataError};

/// Metadata of one column, as reported for a given table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub label: String,
    /// Platform type tag, kept verbatim for the model
    pub internal_type: String,
    pub max_length: u32,
    pub mandatory: bool,
    pub auto_generated: bool,
    pub is_virtual: bool,
    /// Table that defines the column (may be an ancestor of the inspected table)
    pub declaring_table: String,
    /// Referenced table, for reference columns
    pub reference_target: Option<String>,
    /// Raw choice values, in declaration order
    pub declared_choices: Vec<String>,
}

impl ColumnMetadata {
    pub fn parsed_type(&self) -> InternalType {
        InternalType::parse(&self.internal_type)
    }
}

/// Read access to a platform's table schemas.
///
/// A handle is bound to one table and carries an in-memory template record.
/// Nothing here can write a row: `set_field_value` only changes the handle's
/// in-memory field, and there is deliberately no insert or update.
pub trait SchemaService {
    /// An in-memory, never-persisted record bound to a table.
    type Handle;

    /// Bind to a table's schema. Returns `None` when the name doesn't resolve.
    fn resolve_table(&self, name: &str) -> Result<Option<Self::Handle>, MetadataError>;

    /// Fill the handle's fields with their default values.
    fn initialize_template(&self, handle: &mut Self::Handle) -> Result<(), MetadataError>;

    /// All columns visible on the handle, own and inherited, in platform order.
    fn list_columns(&self, handle: &Self::Handle) -> Result<Vec<String>, MetadataError>;

    fn column_metadata(
        &self,
        handle: &Self::Handle,
        column: &str,
    ) -> Result<ColumnMetadata, MetadataError>;

    /// Assign a value to the handle's in-memory field.
    fn set_field_value(
        &self,
        handle: &mut Self::Handle,
        column: &str,
        value: &FieldValue,
    ) -> Result<(), MetadataError>;

    /// Render the field's current value as its display label.
    fn display_label(&self, handle: &Self::Handle, column: &str) -> Result<String, MetadataError>;

    /// Human label of the handle's effective table.
    fn class_display_label(&self, handle: &Self::Handle) -> Result<String, MetadataError>;

    /// Name of the field conventionally used to show a record of the handle's table.
    fn display_field_name(&self, handle: &Self::Handle) -> Result<String, MetadataError>;

    /// Column the platform itself treats as the class indicator, if it has one.
    ///
    /// Builders default to this column; assigning it rebinds a handle to
    /// another table.
    fn class_indicator(&self) -> Option<&str> {
        None
    }
}
