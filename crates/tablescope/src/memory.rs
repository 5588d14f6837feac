//! In-memory schema service.
//!
//! A [`MemoryCatalog`] holds table definitions with single inheritance
//! (`extends`), reference columns and choice columns. It behaves like a
//! real platform where it matters to the builder: template records get
//! default values, choice values render as their labels, and assigning the
//! class column rebinds a record to another table.
//!
//! Catalogs can be assembled in code or loaded from JSON:
//!
//! ```json
//! {"tables": [
//!   {"name": "task", "label": "Task", "display_field": "number", "columns": [
//!     {"name": "number", "label": "Number", "internal_type": "string", "max_length": 40}
//!   ]},
//!   {"name": "incident", "label": "Incident", "extends": "task", "columns": []}
//! ]}
//! ```

use crate::{
    ColumnMetadata, DEFAULT_DISCRIMINATOR_COLUMN, FieldValue, InternalType, MetadataError,
    SchemaService,
};
use facet::Facet;
use indexmap::{IndexMap, IndexSet};

/// A catalog file: a list of table definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Facet)]
pub struct CatalogDef {
    #[facet(default)]
    pub tables: Vec<TableDef>,
}

/// A table definition.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct TableDef {
    /// Table name (singular, e.g. `incident`)
    pub name: String,
    /// Class display label (e.g. `Incident`)
    pub label: String,
    /// Parent table, if this table extends another
    #[facet(default)]
    pub extends: Option<String>,
    /// Field used to show a record of this table; inherited when unset
    #[facet(default)]
    pub display_field: Option<String>,
    /// Columns declared on this table (not the inherited ones)
    #[facet(default)]
    pub columns: Vec<ColumnDef>,
}

/// A column declared on a table.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ColumnDef {
    pub name: String,
    pub label: String,
    /// Platform type tag (`integer`, `string`, `reference`, ...)
    pub internal_type: String,
    #[facet(default)]
    pub max_length: u32,
    #[facet(default)]
    pub mandatory: bool,
    #[facet(default)]
    pub auto_generated: bool,
    #[facet(default, rename = "virtual")]
    pub is_virtual: bool,
    /// Referenced table, for reference columns
    #[facet(default)]
    pub reference: Option<String>,
    /// Template default value
    #[facet(default)]
    pub default: Option<String>,
    /// Valid values, in declaration order
    #[facet(default)]
    pub choices: Vec<ChoiceDef>,
}

/// A declared choice: raw value and display label.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ChoiceDef {
    pub value: String,
    pub label: String,
}

impl TableDef {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            extends: None,
            display_field: None,
            columns: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn display_field(mut self, field: impl Into<String>) -> Self {
        self.display_field = Some(field.into());
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl ColumnDef {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        internal_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            internal_type: internal_type.into(),
            max_length: 0,
            mandatory: false,
            auto_generated: false,
            is_virtual: false,
            reference: None,
            default: None,
            choices: Vec::new(),
        }
    }

    pub fn max_length(mut self, len: u32) -> Self {
        self.max_length = len;
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn auto_generated(mut self) -> Self {
        self.auto_generated = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn reference(mut self, table: impl Into<String>) -> Self {
        self.reference = Some(table.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn choice(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.choices.push(ChoiceDef {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    fn is_integer(&self) -> bool {
        InternalType::parse(&self.internal_type).is_integer()
    }

    /// Coerce a raw string to this column's scalar kind, falling back to text.
    fn value_of(&self, raw: &str) -> FieldValue {
        FieldValue::coerce(raw, self.is_integer())
            .unwrap_or_else(|| FieldValue::Text(raw.to_string()))
    }
}

/// A template record of a [`MemoryCatalog`] table. Never stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRecord {
    table: String,
    values: IndexMap<String, FieldValue>,
    initialized: bool,
}

impl MemoryRecord {
    /// Table the record is currently bound to.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn value(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// A [`SchemaService`] over table definitions held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCatalog {
    tables: IndexMap<String, TableDef>,
    class_column: String,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    /// Create an empty catalog whose class column is `sys_class_name`.
    pub fn new() -> Self {
        Self {
            tables: IndexMap::new(),
            class_column: DEFAULT_DISCRIMINATOR_COLUMN.to_string(),
        }
    }

    /// Build a catalog from definitions, checking that every parent exists
    /// and that inheritance has no cycles.
    pub fn from_def(def: CatalogDef) -> Result<Self, MetadataError> {
        let mut catalog = Self::new();
        for table in def.tables {
            if catalog.tables.contains_key(&table.name) {
                return Err(MetadataError::InvalidCatalog(format!(
                    "table `{}` is defined twice",
                    table.name
                )));
            }
            catalog.tables.insert(table.name.clone(), table);
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a JSON catalog (see the module docs for the shape).
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        let def: CatalogDef =
            facet_json::from_str(json).map_err(|e| MetadataError::InvalidCatalog(e.to_string()))?;
        Self::from_def(def)
    }

    /// Add or replace a table definition.
    pub fn with_table(mut self, table: TableDef) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    /// Use another column as the class indicator.
    pub fn with_class_column(mut self, column: impl Into<String>) -> Self {
        self.class_column = column.into();
        self
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }

    fn validate(&self) -> Result<(), MetadataError> {
        for table in self.tables.values() {
            let mut seen = IndexSet::new();
            let mut current = Some(table);
            while let Some(t) = current {
                if !seen.insert(t.name.as_str()) {
                    return Err(MetadataError::InvalidCatalog(format!(
                        "inheritance cycle through `{}`",
                        t.name
                    )));
                }
                current = match &t.extends {
                    Some(parent) => Some(self.tables.get(parent).ok_or_else(|| {
                        MetadataError::InvalidCatalog(format!(
                            "table `{}` extends unknown table `{}`",
                            t.name, parent
                        ))
                    })?),
                    None => None,
                };
            }
        }
        Ok(())
    }

    /// The table and its ancestors, nearest first.
    fn chain(&self, name: &str) -> Result<Vec<&TableDef>, MetadataError> {
        let mut chain: Vec<&TableDef> = Vec::new();
        let mut next = Some(name);
        while let Some(name) = next {
            let table = self
                .tables
                .get(name)
                .ok_or_else(|| MetadataError::UnknownTable(name.to_string()))?;
            if chain.iter().any(|t| t.name == table.name) {
                break;
            }
            chain.push(table);
            next = table.extends.as_deref();
        }
        Ok(chain)
    }

    /// Find the nearest definition of `column`, with the table declaring it.
    fn find_column(
        &self,
        table: &str,
        column: &str,
    ) -> Result<(&TableDef, &ColumnDef), MetadataError> {
        self.chain(table)?
            .into_iter()
            .find_map(|t| t.get_column(column).map(|c| (t, c)))
            .ok_or_else(|| MetadataError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    fn visible_columns(&self, table: &str) -> Result<Vec<&ColumnDef>, MetadataError> {
        let mut seen = IndexSet::new();
        let mut out = Vec::new();
        for t in self.chain(table)? {
            for column in &t.columns {
                if seen.insert(column.name.as_str()) {
                    out.push(column);
                }
            }
        }
        Ok(out)
    }
}

impl SchemaService for MemoryCatalog {
    type Handle = MemoryRecord;

    fn resolve_table(&self, name: &str) -> Result<Option<MemoryRecord>, MetadataError> {
        Ok(self.tables.contains_key(name).then(|| MemoryRecord {
            table: name.to_string(),
            values: IndexMap::new(),
            initialized: false,
        }))
    }

    fn initialize_template(&self, record: &mut MemoryRecord) -> Result<(), MetadataError> {
        for column in self.visible_columns(&record.table)? {
            if column.name == self.class_column {
                record
                    .values
                    .insert(column.name.clone(), FieldValue::Text(record.table.clone()));
            } else if let Some(default) = &column.default {
                record
                    .values
                    .insert(column.name.clone(), column.value_of(default));
            }
        }
        record.initialized = true;
        Ok(())
    }

    fn list_columns(&self, record: &MemoryRecord) -> Result<Vec<String>, MetadataError> {
        Ok(self
            .visible_columns(&record.table)?
            .into_iter()
            .map(|c| c.name.clone())
            .collect())
    }

    fn column_metadata(
        &self,
        record: &MemoryRecord,
        column: &str,
    ) -> Result<ColumnMetadata, MetadataError> {
        let (declaring, def) = self.find_column(&record.table, column)?;
        Ok(ColumnMetadata {
            label: def.label.clone(),
            internal_type: def.internal_type.clone(),
            max_length: def.max_length,
            mandatory: def.mandatory,
            auto_generated: def.auto_generated,
            is_virtual: def.is_virtual,
            declaring_table: declaring.name.clone(),
            reference_target: def.reference.clone(),
            declared_choices: def.choices.iter().map(|c| c.value.clone()).collect(),
        })
    }

    fn set_field_value(
        &self,
        record: &mut MemoryRecord,
        column: &str,
        value: &FieldValue,
    ) -> Result<(), MetadataError> {
        self.find_column(&record.table, column)?;

        // The class column decides which table the record belongs to.
        if column == self.class_column {
            let target = value.to_string();
            if !self.tables.contains_key(&target) {
                return Err(MetadataError::InvalidValue {
                    column: column.to_string(),
                    value: target,
                    reason: "not a table in this catalog".to_string(),
                });
            }
            tracing::debug!(from = %record.table, to = %target, "record rebound to another table");
            record.table = target;
        }

        record.values.insert(column.to_string(), value.clone());
        Ok(())
    }

    fn display_label(&self, record: &MemoryRecord, column: &str) -> Result<String, MetadataError> {
        let (_, def) = self.find_column(&record.table, column)?;
        let Some(value) = record.values.get(column) else {
            return Ok(String::new());
        };

        if column == self.class_column
            && let Some(table) = self.tables.get(&value.to_string())
        {
            return Ok(table.label.clone());
        }

        let label = def
            .choices
            .iter()
            .find(|c| &def.value_of(&c.value) == value)
            .map(|c| c.label.clone())
            .unwrap_or_else(|| value.to_string());
        Ok(label)
    }

    fn class_display_label(&self, record: &MemoryRecord) -> Result<String, MetadataError> {
        self.tables
            .get(&record.table)
            .map(|t| t.label.clone())
            .ok_or_else(|| MetadataError::UnknownTable(record.table.clone()))
    }

    fn display_field_name(&self, record: &MemoryRecord) -> Result<String, MetadataError> {
        let chain = self.chain(&record.table)?;
        if let Some(field) = chain.iter().find_map(|t| t.display_field.clone()) {
            return Ok(field);
        }
        let has_name = chain.iter().any(|t| t.get_column("name").is_some());
        Ok(if has_name { "name".to_string() } else { String::new() })
    }

    fn class_indicator(&self) -> Option<&str> {
        Some(&self.class_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_table(
                TableDef::new("task", "Task")
                    .display_field("number")
                    .column(ColumnDef::new("number", "Number", "string").max_length(40))
                    .column(
                        ColumnDef::new("state", "State", "integer")
                            .default_value("1")
                            .choice("1", "Open")
                            .choice("7", "Closed"),
                    )
                    .column(ColumnDef::new("sys_class_name", "Class", "sys_class_name"))
                    .column(ColumnDef::new("name", "Name", "string")),
            )
            .with_table(
                TableDef::new("incident", "Incident")
                    .extends("task")
                    .column(
                        ColumnDef::new("state", "Incident state", "integer")
                            .choice("2", "In Progress"),
                    ),
            )
    }

    fn record(catalog: &MemoryCatalog, table: &str) -> MemoryRecord {
        let mut record = catalog.resolve_table(table).unwrap().unwrap();
        catalog.initialize_template(&mut record).unwrap();
        record
    }

    #[test]
    fn test_resolve_unknown_table() {
        assert!(catalog().resolve_table("nope").unwrap().is_none());
    }

    #[test]
    fn test_inherited_columns_and_shadowing() {
        let catalog = catalog();
        let record = record(&catalog, "incident");

        let columns = catalog.list_columns(&record).unwrap();
        assert_eq!(columns, vec!["state", "number", "sys_class_name", "name"]);

        let state = catalog.column_metadata(&record, "state").unwrap();
        assert_eq!(state.declaring_table, "incident");
        assert_eq!(state.label, "Incident state");

        let number = catalog.column_metadata(&record, "number").unwrap();
        assert_eq!(number.declaring_table, "task");
    }

    #[test]
    fn test_template_defaults() {
        let catalog = catalog();
        let record = record(&catalog, "task");
        assert!(record.is_initialized());
        assert_eq!(record.value("state"), Some(&FieldValue::Integer(1)));
        assert_eq!(
            record.value("sys_class_name"),
            Some(&FieldValue::Text("task".to_string()))
        );
        assert_eq!(catalog.display_label(&record, "state").unwrap(), "Open");
        assert_eq!(catalog.display_label(&record, "sys_class_name").unwrap(), "Task");
        assert_eq!(catalog.display_label(&record, "number").unwrap(), "");
    }

    #[test]
    fn test_display_label_of_unknown_value_is_raw() {
        let catalog = catalog();
        let mut record = record(&catalog, "task");
        catalog
            .set_field_value(&mut record, "state", &FieldValue::Integer(99))
            .unwrap();
        assert_eq!(catalog.display_label(&record, "state").unwrap(), "99");
    }

    #[test]
    fn test_assigning_class_column_rebinds_record() {
        let catalog = catalog();
        let mut record = record(&catalog, "task");
        catalog
            .set_field_value(&mut record, "sys_class_name", &FieldValue::from("incident"))
            .unwrap();
        assert_eq!(record.table(), "incident");
        assert_eq!(catalog.class_display_label(&record).unwrap(), "Incident");

        let err = catalog
            .set_field_value(&mut record, "sys_class_name", &FieldValue::from("nope"))
            .unwrap_err();
        assert!(matches!(err, MetadataError::InvalidValue { .. }));
    }

    #[test]
    fn test_display_field_is_inherited() {
        let catalog = catalog();
        let record = record(&catalog, "incident");
        assert_eq!(catalog.display_field_name(&record).unwrap(), "number");
    }

    #[test]
    fn test_display_field_falls_back_to_name_column() {
        let catalog = MemoryCatalog::new()
            .with_table(
                TableDef::new("group", "Group").column(ColumnDef::new("name", "Name", "string")),
            )
            .with_table(TableDef::new("audit", "Audit"));
        assert_eq!(catalog.display_field_name(&record(&catalog, "group")).unwrap(), "name");
        assert_eq!(catalog.display_field_name(&record(&catalog, "audit")).unwrap(), "");
    }

    #[test]
    fn test_unknown_column() {
        let catalog = catalog();
        let record = record(&catalog, "task");
        let err = catalog.column_metadata(&record, "missing").unwrap_err();
        assert_eq!(
            err,
            MetadataError::UnknownColumn {
                table: "task".to_string(),
                column: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_from_def_rejects_unknown_parent_and_cycles() {
        let err = MemoryCatalog::from_def(CatalogDef {
            tables: vec![TableDef::new("incident", "Incident").extends("task")],
        })
        .unwrap_err();
        assert!(matches!(err, MetadataError::InvalidCatalog(_)));

        let err = MemoryCatalog::from_def(CatalogDef {
            tables: vec![
                TableDef::new("a", "A").extends("b"),
                TableDef::new("b", "B").extends("a"),
            ],
        })
        .unwrap_err();
        assert!(err.to_string().contains("cycle"), "{err}");

        let err = MemoryCatalog::from_def(CatalogDef {
            tables: vec![TableDef::new("a", "A"), TableDef::new("a", "A")],
        })
        .unwrap_err();
        assert!(err.to_string().contains("twice"), "{err}");
    }
}
