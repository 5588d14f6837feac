use thiserror::Error;

/// An error reported by the platform while reading metadata or rendering a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("table `{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },

    #[error("unknown table `{0}`")]
    UnknownTable(String),

    #[error("invalid value `{value}` for column `{column}`: {reason}")]
    InvalidValue {
        column: String,
        value: String,
        reason: String,
    },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("platform error: {0}")]
    Platform(String),
}

/// Why a table model could not be built.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("table name is empty or missing")]
    InvalidInput,

    #[error("table `{table}` does not resolve to a schema")]
    UnresolvableTable { table: String },

    #[error("{}", fault_message(.table, .column.as_deref(), .source))]
    MetadataFault {
        table: String,
        column: Option<String>,
        #[source]
        source: MetadataError,
    },
}

/// Coarse classification of a [`BuildError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    UnresolvableTable,
    MetadataFault,
}

impl BuildError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BuildError::InvalidInput => FailureKind::InvalidInput,
            BuildError::UnresolvableTable { .. } => FailureKind::UnresolvableTable,
            BuildError::MetadataFault { .. } => FailureKind::MetadataFault,
        }
    }

    pub(crate) fn fault(table: &str, column: Option<&str>, source: MetadataError) -> Self {
        BuildError::MetadataFault {
            table: table.to_string(),
            column: column.map(str::to_string),
            source,
        }
    }
}

fn fault_message(table: &str, column: Option<&str>, source: &MetadataError) -> String {
    match column {
        Some(column) => format!("metadata fault on `{table}.{column}`: {source}"),
        None => format!("metadata fault on `{table}`: {source}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_message_names_column() {
        let err = BuildError::fault(
            "incident",
            Some("priority"),
            MetadataError::Platform("renderer crashed".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "metadata fault on `incident.priority`: platform error: renderer crashed"
        );
        assert_eq!(err.kind(), FailureKind::MetadataFault);
    }

    #[test]
    fn test_fault_message_without_column() {
        let err = BuildError::fault("incident", None, MetadataError::UnknownTable("x".into()));
        assert_eq!(
            err.to_string(),
            "metadata fault on `incident`: unknown table `x`"
        );
    }
}
