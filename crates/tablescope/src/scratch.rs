//! Throwaway template records.

use crate::{ColumnMetadata, FieldValue, MetadataError, SchemaService};

/// A non-persisted record bound to one table.
///
/// Used to read metadata and to render labels for hypothetical values.
/// It has no save or commit operation; it is dropped at the end of the build
/// that provisioned it.
pub struct ScratchRecord<'s, S: SchemaService> {
    service: &'s S,
    handle: S::Handle,
    table: String,
}

impl<'s, S: SchemaService> ScratchRecord<'s, S> {
    /// Resolve `table` and initialize a template record for it.
    ///
    /// Returns `Ok(None)` for an empty name or a name that doesn't resolve.
    pub fn provision(service: &'s S, table: &str) -> Result<Option<Self>, MetadataError> {
        if table.trim().is_empty() {
            return Ok(None);
        }

        let Some(mut handle) = service.resolve_table(table)? else {
            tracing::debug!(table, "table does not resolve");
            return Ok(None);
        };
        service.initialize_template(&mut handle)?;

        Ok(Some(Self {
            service,
            handle,
            table: table.to_string(),
        }))
    }

    /// Table this record was provisioned for.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column_names(&self) -> Result<Vec<String>, MetadataError> {
        self.service.list_columns(&self.handle)
    }

    pub fn metadata(&self, column: &str) -> Result<ColumnMetadata, MetadataError> {
        self.service.column_metadata(&self.handle, column)
    }

    pub fn class_label(&self) -> Result<String, MetadataError> {
        self.service.class_display_label(&self.handle)
    }

    pub fn display_field(&self) -> Result<String, MetadataError> {
        self.service.display_field_name(&self.handle)
    }

    /// Assign `value` to `column` on the template, then render its display label.
    pub fn probe_label(
        &mut self,
        column: &str,
        value: &FieldValue,
    ) -> Result<String, MetadataError> {
        self.service.set_field_value(&mut self.handle, column, value)?;
        self.service.display_label(&self.handle, column)
    }
}
