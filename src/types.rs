//! Rails column types and their TypeSpec counterparts.

use std::fmt;

/// Column kind as written in `schema.rb` (`t.<kind> "name"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RailsType {
    String,
    Text,
    Citext,
    Integer,
    Bigint,
    Smallint,
    /// Fixed-point DECIMAL
    Decimal,
    /// Fixed-point NUMERIC (PostgreSQL spelling)
    Numeric,
    Float,
    Boolean,
    Datetime,
    Timestamp,
    Timestamptz,
    Date,
    Time,
    Json,
    Jsonb,
    Binary,
    Uuid,
    Inet,
    Cidr,
    Macaddr,
    /// `t.references`
    References,
    /// `t.belongs_to`
    BelongsTo,
    /// Anything else: custom or adapter-specific types.
    Other(String),
}

impl RailsType {
    /// Parse a Rails type name. Unknown names become [`RailsType::Other`].
    pub fn parse(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "text" => Self::Text,
            "citext" => Self::Citext,
            "integer" => Self::Integer,
            "bigint" => Self::Bigint,
            "smallint" => Self::Smallint,
            "decimal" => Self::Decimal,
            "numeric" => Self::Numeric,
            "float" => Self::Float,
            "boolean" => Self::Boolean,
            "datetime" => Self::Datetime,
            "timestamp" => Self::Timestamp,
            "timestamptz" => Self::Timestamptz,
            "date" => Self::Date,
            "time" => Self::Time,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "binary" => Self::Binary,
            "uuid" => Self::Uuid,
            "inet" => Self::Inet,
            "cidr" => Self::Cidr,
            "macaddr" => Self::Macaddr,
            "references" => Self::References,
            "belongs_to" => Self::BelongsTo,
            other => Self::Other(other.to_string()),
        }
    }

    /// Resolve the TypeSpec scalar for this column kind.
    ///
    /// Fixed-point types map to `string` so no precision is lost in transit.
    pub fn tsp_type(&self) -> TspType {
        match self {
            Self::String | Self::Text | Self::Citext => TspType::String,
            Self::Integer | Self::Smallint => TspType::Int32,
            Self::Bigint | Self::References | Self::BelongsTo => TspType::Int64,
            Self::Decimal | Self::Numeric => TspType::String,
            Self::Float => TspType::Float64,
            Self::Boolean => TspType::Boolean,
            Self::Datetime | Self::Timestamp | Self::Timestamptz => TspType::UtcDateTime,
            Self::Date => TspType::PlainDate,
            Self::Time => TspType::PlainTime,
            Self::Json | Self::Jsonb => TspType::Unknown,
            Self::Binary => TspType::Bytes,
            Self::Uuid | Self::Inet | Self::Cidr | Self::Macaddr => TspType::String,
            Self::Other(_) => TspType::String,
        }
    }

    /// True for `references` / `belongs_to`.
    pub const fn is_association(&self) -> bool {
        matches!(self, Self::References | Self::BelongsTo)
    }

    /// True for types that carry precision/scale.
    pub const fn is_fixed_point(&self) -> bool {
        matches!(self, Self::Decimal | Self::Numeric)
    }
}

/// Map a Rails type name straight to its TypeSpec token.
pub fn map_type(name: &str) -> TspType {
    RailsType::parse(name).tsp_type()
}

/// TypeSpec scalar emitted for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TspType {
    #[default]
    String,
    Int32,
    Int64,
    Float64,
    Boolean,
    UtcDateTime,
    PlainDate,
    PlainTime,
    Bytes,
    Unknown,
}

impl TspType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Boolean => "boolean",
            Self::UtcDateTime => "utcDateTime",
            Self::PlainDate => "plainDate",
            Self::PlainTime => "plainTime",
            Self::Bytes => "bytes",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TspType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_mapping() {
        let cases = [
            ("string", "string"),
            ("text", "string"),
            ("integer", "int32"),
            ("bigint", "int64"),
            ("smallint", "int32"),
            ("float", "float64"),
            ("boolean", "boolean"),
            ("datetime", "utcDateTime"),
            ("timestamp", "utcDateTime"),
            ("date", "plainDate"),
            ("time", "plainTime"),
            ("json", "unknown"),
            ("jsonb", "unknown"),
            ("binary", "bytes"),
            ("uuid", "string"),
            ("inet", "string"),
            ("cidr", "string"),
            ("macaddr", "string"),
            ("references", "int64"),
            ("belongs_to", "int64"),
        ];
        for (rails, tsp) in cases {
            assert_eq!(map_type(rails).to_string(), tsp, "mapping {}", rails);
        }
    }

    #[test]
    fn test_decimal_is_textual() {
        assert_eq!(map_type("decimal"), TspType::String);
        assert_eq!(map_type("numeric"), TspType::String);
        assert!(RailsType::parse("decimal").is_fixed_point());
    }

    #[test]
    fn test_unknown_falls_back_to_string() {
        assert_eq!(
            RailsType::parse("hstore"),
            RailsType::Other("hstore".to_string())
        );
        assert_eq!(map_type("hstore"), TspType::String);
        assert_eq!(map_type(""), TspType::String);
    }

    #[test]
    fn test_association_kinds() {
        assert!(RailsType::parse("references").is_association());
        assert!(RailsType::parse("belongs_to").is_association());
        assert!(!RailsType::parse("bigint").is_association());
    }
}
