use std::fmt;

/// Semantic type tag of a column, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InternalType {
    /// Whole numbers
    Integer,
    /// Fixed-point numbers
    Decimal,
    /// Floating point numbers
    Float,
    /// true/false
    Boolean,
    /// Free text
    String,
    /// Calendar date
    Date,
    /// Date and time of day
    DateTime,
    /// Link to a row of another table
    Reference,
    /// Class indicator of a record in a table hierarchy
    ClassName,
    /// Anything the platform reports that isn't listed above
    Other(String),
}

impl InternalType {
    /// Parse a platform type tag. Unknown tags are kept verbatim.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "smallint" | "bigint" | "longint" => InternalType::Integer,
            "decimal" | "numeric" | "currency" => InternalType::Decimal,
            "float" | "double" | "real" => InternalType::Float,
            "boolean" | "bool" => InternalType::Boolean,
            "string" | "text" => InternalType::String,
            "date" | "glide_date" => InternalType::Date,
            "date_time" | "datetime" | "glide_date_time" | "timestamp" => InternalType::DateTime,
            "reference" => InternalType::Reference,
            "sys_class_name" | "class_name" => InternalType::ClassName,
            _ => InternalType::Other(tag.trim().to_string()),
        }
    }

    /// Whether values of this type point at a row of another table.
    pub fn is_reference(&self) -> bool {
        matches!(self, InternalType::Reference)
    }

    /// Whether choice values of this type are coerced to integers before probing.
    pub fn is_integer(&self) -> bool {
        matches!(self, InternalType::Integer)
    }
}

impl fmt::Display for InternalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternalType::Integer => write!(f, "integer"),
            InternalType::Decimal => write!(f, "decimal"),
            InternalType::Float => write!(f, "float"),
            InternalType::Boolean => write!(f, "boolean"),
            InternalType::String => write!(f, "string"),
            InternalType::Date => write!(f, "date"),
            InternalType::DateTime => write!(f, "date_time"),
            InternalType::Reference => write!(f, "reference"),
            InternalType::ClassName => write!(f, "sys_class_name"),
            InternalType::Other(tag) => write!(f, "{}", tag),
        }
    }
}
