//! Assemble a [`TableModel`] from live metadata.

use crate::classify::{classify, enumerate_columns};
use crate::resolve::resolve_detail;
use crate::{
    BuildError, ColumnDescriptor, DiscriminatorRule, MetadataError, Result, SchemaService,
    ScratchRecord, TableModel,
};
use tracing::field::Empty;

/// Builds table models against one schema service.
///
/// # Example
///
/// ```ignore
/// let model = TableModelBuilder::new(&catalog)
///     .discriminator(DiscriminatorRule::Named("kind".into()))
///     .build(Some("incident"))?;
/// ```
pub struct TableModelBuilder<'s, S: SchemaService> {
    service: &'s S,
    discriminator: DiscriminatorRule,
}

impl<'s, S: SchemaService> TableModelBuilder<'s, S> {
    /// Start with the service's own class-indicator column, falling back to
    /// `sys_class_name` when the service doesn't name one.
    pub fn new(service: &'s S) -> Self {
        let discriminator = service
            .class_indicator()
            .map(|column| DiscriminatorRule::Named(column.to_string()))
            .unwrap_or_default();
        Self {
            service,
            discriminator,
        }
    }

    /// Set the rule that picks out the class-indicator column.
    pub fn discriminator(mut self, rule: DiscriminatorRule) -> Self {
        self.discriminator = rule;
        self
    }

    /// Build the model of `table`.
    ///
    /// A missing or blank name fails with [`BuildError::InvalidInput`], a
    /// name that doesn't resolve with [`BuildError::UnresolvableTable`].
    /// Any platform error aborts the whole build; no partial model is
    /// returned.
    pub fn build(&self, table: Option<&str>) -> Result<TableModel> {
        let Some(table) = table.filter(|t| !t.trim().is_empty()) else {
            return Err(BuildError::InvalidInput);
        };

        let span = tracing::debug_span!("tablescope.build", table = %table, columns = Empty);
        let _enter = span.enter();

        let mut record = ScratchRecord::provision(self.service, table)
            .map_err(|e| BuildError::fault(table, None, e))?
            .ok_or_else(|| BuildError::UnresolvableTable {
                table: table.to_string(),
            })?;

        let names = enumerate_columns(&record).map_err(|e| BuildError::fault(table, None, e))?;
        span.record("columns", names.len());

        let mut columns = Vec::with_capacity(names.len());
        for name in &names {
            let descriptor = self
                .describe(&mut record, name)
                .map_err(|e| BuildError::fault(table, Some(name), e))?;
            columns.push(descriptor);
        }

        tracing::debug!(columns = columns.len(), "built table model");
        Ok(TableModel::new(columns))
    }

    fn describe(
        &self,
        record: &mut ScratchRecord<'s, S>,
        name: &str,
    ) -> std::result::Result<ColumnDescriptor, MetadataError> {
        let meta = record.metadata(name)?;
        let class = classify(name, &meta, &self.discriminator)?;
        tracing::trace!(column = name, ?class, "classified column");

        let detail = resolve_detail(self.service, record, name, &meta, &class)?;

        Ok(ColumnDescriptor {
            name: name.to_string(),
            inherited: meta.declaring_table != record.table(),
            label: meta.label,
            internal_type: meta.internal_type,
            max_length: meta.max_length,
            mandatory: meta.mandatory,
            auto_generated: meta.auto_generated,
            is_virtual: meta.is_virtual,
            reference_detail: detail.reference,
            choice_entries: detail.choices,
        })
    }
}

/// Build the model of `table` with the default class-indicator rule.
pub fn build_table_model<S: SchemaService>(service: &S, table: Option<&str>) -> Result<TableModel> {
    TableModelBuilder::new(service).build(table)
}

/// Three-way result for hosts that don't branch on failure kinds.
///
/// Bad input and unknown tables collapse into `Absent`; metadata faults
/// become a diagnostic string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Model(TableModel),
    Absent,
    Diagnostic(String),
}

impl From<Result<TableModel>> for Outcome {
    fn from(result: Result<TableModel>) -> Self {
        match result {
            Ok(model) => Outcome::Model(model),
            Err(BuildError::InvalidInput | BuildError::UnresolvableTable { .. }) => Outcome::Absent,
            Err(err @ BuildError::MetadataFault { .. }) => Outcome::Diagnostic(err.to_string()),
        }
    }
}
