//! Structured output of the schema parser.

use serde::Serialize;

use crate::types::TspType;

/// One table, ready to be rendered as a TypeSpec model.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    /// Singular PascalCase model name (`CompanyBranch`).
    pub name: String,
    /// Plural snake_case source table (`company_branches`).
    pub table_name: String,
    pub comment: Option<String>,
    /// Primary key field name; `None` for `id: false` and composite keys.
    pub primary_key: Option<String>,
    /// Fields in source column order, implicit primary key first.
    pub fields: Vec<Field>,
}

impl TableModel {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TspType,
    pub nullable: bool,
    /// Human text from the column's `comment:` option.
    pub description: Option<String>,
    /// Composed precision/limit/default/reference annotation.
    pub metadata: Option<String>,
    pub default: Option<DefaultValue>,
}

impl Field {
    /// A field with no annotations.
    pub fn new(name: impl Into<String>, ty: TspType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable,
            description: None,
            metadata: None,
            default: None,
        }
    }
}

/// Literal column default. Expression defaults are never represented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Str(String),
    Bool(bool),
    Integer(i64),
    Decimal(f64),
}

impl DefaultValue {
    /// Parse a numeric literal as written in Ruby.
    pub fn number(literal: &str) -> Option<Self> {
        if let Ok(n) = literal.parse::<i64>() {
            return Some(Self::Integer(n));
        }
        literal.parse::<f64>().ok().map(Self::Decimal)
    }

    /// JSON rendering, used in metadata (`default: "draft"`).
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Builder for a field's metadata annotation.
///
/// Parts always come out in the same order regardless of the order they
/// were written in the source: precision/scale, limit, default, reference.
#[derive(Debug, Default)]
pub struct Metadata<'a> {
    precision: Option<&'a str>,
    scale: Option<&'a str>,
    limit: Option<&'a str>,
    default: Option<&'a DefaultValue>,
    reference: Option<&'a str>,
}

impl<'a> Metadata<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn precision(mut self, precision: Option<&'a str>, scale: Option<&'a str>) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn limit(mut self, limit: Option<&'a str>) -> Self {
        self.limit = limit;
        self
    }

    pub fn default_value(mut self, default: Option<&'a DefaultValue>) -> Self {
        self.default = default;
        self
    }

    pub fn reference(mut self, table: &'a str) -> Self {
        self.reference = Some(table);
        self
    }

    /// Join the present parts with `", "`, or `None` if nothing is present.
    pub fn build(self) -> Option<String> {
        let mut parts = Vec::new();

        if self.precision.is_some() || self.scale.is_some() {
            parts.push(format!(
                "precision: {}, scale: {}",
                self.precision.unwrap_or("10"),
                self.scale.unwrap_or("0")
            ));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit: {}", limit));
        }
        if let Some(default) = self.default {
            parts.push(format!("default: {}", default.to_json()));
        }
        if let Some(table) = self.reference {
            parts.push(format!("ref: {}", table));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
