#![allow(dead_code)]

use std::cell::RefCell;
use tablescope::{
    ColumnDef, ColumnMetadata, FieldValue, MemoryCatalog, MemoryRecord, MetadataError,
    SchemaService, TableDef,
};

/// A small service-desk schema: `task` with `incident` and `problem`
/// extending it, and `user` / `cmn_location` as reference targets.
pub fn itsm_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_table(
            TableDef::new("user", "User")
                .display_field("name")
                .column(ColumnDef::new("name", "Name", "string").max_length(151))
                .column(ColumnDef::new("user_name", "User ID", "string").max_length(40))
                .column(ColumnDef::new("sys_id", "Sys ID", "GUID").max_length(32).auto_generated()),
        )
        .with_table(
            TableDef::new("cmn_location", "Location")
                .column(ColumnDef::new("name", "Name", "string").max_length(100)),
        )
        .with_table(
            TableDef::new("task", "Task")
                .display_field("number")
                .column(
                    ColumnDef::new("sys_id", "Sys ID", "GUID")
                        .max_length(32)
                        .auto_generated(),
                )
                .column(
                    ColumnDef::new("number", "Number", "string")
                        .max_length(40)
                        .mandatory(),
                )
                .column(
                    ColumnDef::new("short_description", "Short description", "string")
                        .max_length(160),
                )
                .column(
                    ColumnDef::new("sys_class_name", "Task type", "sys_class_name")
                        .max_length(80)
                        .choice("task", "Task")
                        .choice("incident", "Incident")
                        .choice("problem", "Problem"),
                )
                .column(
                    ColumnDef::new("assigned_to", "Assigned to", "reference")
                        .max_length(32)
                        .reference("user"),
                )
                .column(
                    ColumnDef::new("priority", "Priority", "integer")
                        .default_value("4")
                        .choice("1", "1 - Critical")
                        .choice("2", "2 - High")
                        .choice("3", "3 - Moderate")
                        .choice("4", "4 - Low")
                        .choice("5", "5 - Planning"),
                )
                .column(ColumnDef::new("active", "Active", "boolean").default_value("true"))
                .column(
                    ColumnDef::new("sys_created_on", "Created", "glide_date_time")
                        .auto_generated(),
                )
                .column(ColumnDef::new("work_notes", "Work notes", "journal_input").computed()),
        )
        .with_table(
            TableDef::new("incident", "Incident")
                .extends("task")
                .column(
                    ColumnDef::new("category", "Category", "string")
                        .max_length(40)
                        .default_value("inquiry")
                        .choice("inquiry", "Inquiry / Help")
                        .choice("software", "Software")
                        .choice("hardware", "Hardware")
                        .choice("network", "Network"),
                )
                .column(
                    ColumnDef::new("caller_id", "Caller", "reference")
                        .max_length(32)
                        .mandatory()
                        .reference("user"),
                )
                .column(
                    ColumnDef::new("location", "Location", "reference")
                        .max_length(32)
                        .reference("cmn_location")
                        .choice("hq", "Headquarters"),
                )
                .column(
                    ColumnDef::new("urgency", "Urgency", "integer")
                        .choice("1", "1 - High")
                        .choice("2", "2 - Medium")
                        .choice("3", "3 - Low"),
                ),
        )
        .with_table(
            TableDef::new("problem", "Problem")
                .extends("task")
                .column(ColumnDef::new("known_error", "Known error", "boolean")),
        )
}

/// Wraps a [`MemoryCatalog`] and records every field assignment.
pub struct RecordingService {
    pub inner: MemoryCatalog,
    pub assignments: RefCell<Vec<(String, FieldValue)>>,
}

impl RecordingService {
    pub fn new(inner: MemoryCatalog) -> Self {
        Self {
            inner,
            assignments: RefCell::new(Vec::new()),
        }
    }

    pub fn assigned_columns(&self) -> Vec<String> {
        self.assignments
            .borrow()
            .iter()
            .map(|(column, _)| column.clone())
            .collect()
    }
}

impl SchemaService for RecordingService {
    type Handle = MemoryRecord;

    fn resolve_table(&self, name: &str) -> Result<Option<MemoryRecord>, MetadataError> {
        self.inner.resolve_table(name)
    }

    fn initialize_template(&self, handle: &mut MemoryRecord) -> Result<(), MetadataError> {
        self.inner.initialize_template(handle)
    }

    fn list_columns(&self, handle: &MemoryRecord) -> Result<Vec<String>, MetadataError> {
        self.inner.list_columns(handle)
    }

    fn column_metadata(
        &self,
        handle: &MemoryRecord,
        column: &str,
    ) -> Result<ColumnMetadata, MetadataError> {
        self.inner.column_metadata(handle, column)
    }

    fn set_field_value(
        &self,
        handle: &mut MemoryRecord,
        column: &str,
        value: &FieldValue,
    ) -> Result<(), MetadataError> {
        self.assignments
            .borrow_mut()
            .push((column.to_string(), value.clone()));
        self.inner.set_field_value(handle, column, value)
    }

    fn display_label(&self, handle: &MemoryRecord, column: &str) -> Result<String, MetadataError> {
        self.inner.display_label(handle, column)
    }

    fn class_display_label(&self, handle: &MemoryRecord) -> Result<String, MetadataError> {
        self.inner.class_display_label(handle)
    }

    fn display_field_name(&self, handle: &MemoryRecord) -> Result<String, MetadataError> {
        self.inner.display_field_name(handle)
    }

    fn class_indicator(&self) -> Option<&str> {
        self.inner.class_indicator()
    }
}

/// Fails every display-label render for one column.
pub struct FaultyRenderer {
    pub inner: MemoryCatalog,
    pub column: &'static str,
}

impl SchemaService for FaultyRenderer {
    type Handle = MemoryRecord;

    fn resolve_table(&self, name: &str) -> Result<Option<MemoryRecord>, MetadataError> {
        self.inner.resolve_table(name)
    }

    fn initialize_template(&self, handle: &mut MemoryRecord) -> Result<(), MetadataError> {
        self.inner.initialize_template(handle)
    }

    fn list_columns(&self, handle: &MemoryRecord) -> Result<Vec<String>, MetadataError> {
        self.inner.list_columns(handle)
    }

    fn column_metadata(
        &self,
        handle: &MemoryRecord,
        column: &str,
    ) -> Result<ColumnMetadata, MetadataError> {
        self.inner.column_metadata(handle, column)
    }

    fn set_field_value(
        &self,
        handle: &mut MemoryRecord,
        column: &str,
        value: &FieldValue,
    ) -> Result<(), MetadataError> {
        self.inner.set_field_value(handle, column, value)
    }

    fn display_label(&self, handle: &MemoryRecord, column: &str) -> Result<String, MetadataError> {
        if column == self.column {
            return Err(MetadataError::Platform("renderer unavailable".to_string()));
        }
        self.inner.display_label(handle, column)
    }

    fn class_display_label(&self, handle: &MemoryRecord) -> Result<String, MetadataError> {
        self.inner.class_display_label(handle)
    }

    fn display_field_name(&self, handle: &MemoryRecord) -> Result<String, MetadataError> {
        self.inner.display_field_name(handle)
    }

    fn class_indicator(&self) -> Option<&str> {
        self.inner.class_indicator()
    }
}
