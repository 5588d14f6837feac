//! Read-only table model introspection.
//!
//! Given the name of a table on a platform that supports table inheritance,
//! reference columns and choice columns, this crate produces a
//! [`TableModel`]: one [`ColumnDescriptor`] per column, sorted by name, with
//! reference targets and choice labels resolved.
//!
//! The platform is reached through the [`SchemaService`] trait. Nothing in
//! that trait can persist a row: labels for hypothetical choice values are
//! rendered on a throwaway [`ScratchRecord`] that is dropped when the build
//! finishes.
//!
//! # Naming Convention
//!
//! **Table names use singular form** (e.g., `user`, `incident`, `task`),
//! matching what the platform reports for a record's class.
//!
//! # Example
//!
//! ```ignore
//! use tablescope::{MemoryCatalog, build_table_model};
//!
//! let catalog = MemoryCatalog::from_json(&std::fs::read_to_string("catalog.json")?)?;
//! let model = build_table_model(&catalog, Some("incident"))?;
//!
//! for column in model.iter() {
//!     println!("{}: {}", column.name, column.internal_type);
//! }
//! ```

mod builder;
pub mod classify;
mod error;
pub mod memory;
mod model;
mod platform;
pub mod resolve;
mod scratch;
mod types;

pub use builder::{Outcome, TableModelBuilder, build_table_model};
pub use classify::{ColumnClass, DiscriminatorRule};
pub use error::{BuildError, FailureKind, MetadataError};
pub use memory::{CatalogDef, ChoiceDef, ColumnDef, MemoryCatalog, MemoryRecord, TableDef};
pub use model::{ChoiceEntry, ColumnDescriptor, FieldValue, ReferenceDetail, TableModel};
pub use platform::{ColumnMetadata, SchemaService};
pub use scratch::ScratchRecord;
pub use types::InternalType;

/// Column name most platforms with table inheritance use for the class indicator.
pub const DEFAULT_DISCRIMINATOR_COLUMN: &str = "sys_class_name";

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
