//! TypeSpec document rendering.

use std::fmt::{Error, Result, Write};

use crate::config::{Config, NullableStyle, ServiceConfig};
use crate::enums::{namespace_for, EnumDefinition};
use crate::schema::{Field, TableModel};


/// Placeholder body when the schema has no tables.
pub const EMPTY_BODY: &str = "  // No tables found in schema.";

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    service: ServiceConfig,
    nullable: NullableStyle,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            service: config.service.clone(),
            nullable: config.output.nullable,
        }
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = service;
        self
    }

    pub fn with_nullable(mut self, nullable: NullableStyle) -> Self {
        self.nullable = nullable;
        self
    }

    /// Render a complete document.
    pub fn render(
        &self,
        models: &[TableModel],
        enums: &[EnumDefinition],
    ) -> std::result::Result<String, Error> {
        let mut buffer = String::new();
        self.write_document(&mut buffer, models, enums)?;
        Ok(buffer)
    }

    /// One `<Model>Enums` namespace per model that has enums, in model order.
    ///
    /// Returns (namespace name, rendered block) pairs.
    pub fn render_enum_namespaces(
        &self,
        models: &[TableModel],
        enums: &[EnumDefinition],
    ) -> std::result::Result<Vec<(String, String)>, Error> {
        let mut namespaces = Vec::new();
        for model in models {
            let owned: Vec<&EnumDefinition> =
                enums.iter().filter(|e| e.model_name == model.name).collect();
            if owned.is_empty() {
                continue;
            }
            let mut buffer = String::new();
            self.write_enum_namespace(&mut buffer, &model.name, &owned)?;
            namespaces.push((namespace_for(&model.name), buffer));
        }
        Ok(namespaces)
    }

    /// Render a single model block (no trailing newline).
    pub fn render_model(
        &self,
        model: &TableModel,
        enums: &[EnumDefinition],
    ) -> std::result::Result<String, Error> {
        let mut buffer = String::new();
        self.write_model(&mut buffer, model, enums)?;
        Ok(buffer)
    }

    fn write_document(
        &self,
        buffer: &mut String,
        models: &[TableModel],
        enums: &[EnumDefinition],
    ) -> Result {
        let service = &self.service;
        writeln!(buffer, "import \"@typespec/http\";")?;
        writeln!(buffer, "import \"@typespec/openapi3\";")?;
        writeln!(buffer, "using TypeSpec.Http;")?;
        writeln!(buffer)?;
        writeln!(buffer, "@service(#{{ title: {} }})", quote(&service.title))?;
        writeln!(
            buffer,
            "@server({}, {})",
            quote(&service.server),
            quote(&service.server_description)
        )?;
        writeln!(buffer, "@route({})", quote(&service.route))?;
        writeln!(buffer, "namespace {} {{", service.namespace)?;

        let namespaces = self.render_enum_namespaces(models, enums)?;
        for (_, block) in &namespaces {
            writeln!(buffer, "{}", block)?;
            writeln!(buffer)?;
        }

        if models.is_empty() {
            writeln!(buffer, "{}", EMPTY_BODY)?;
        } else {
            let blocks = models
                .iter()
                .map(|m| self.render_model(m, enums))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            writeln!(buffer, "{}", blocks.join("\n\n"))?;
        }

        writeln!(buffer, "}}")
    }

    fn write_enum_namespace(
        &self,
        buffer: &mut String,
        model_name: &str,
        enums: &[&EnumDefinition],
    ) -> Result {
        writeln!(buffer, "  namespace {} {{", namespace_for(model_name))?;
        for (idx, def) in enums.iter().enumerate() {
            if idx > 0 {
                writeln!(buffer)?;
            }
            writeln!(buffer, "    enum {} {{", def.type_name())?;
            for value in &def.values {
                writeln!(buffer, "      {},", value)?;
            }
            writeln!(buffer, "    }}")?;
        }
        write!(buffer, "  }}")
    }

    fn write_model(&self, buffer: &mut String, model: &TableModel, enums: &[EnumDefinition]) -> Result {
        if let Some(comment) = &model.comment {
            writeln!(buffer, "  /** {} */", comment)?;
        }
        writeln!(buffer, "  model {} {{", model.name)?;
        for field in &model.fields {
            self.write_field(buffer, model, field, enums)?;
        }
        write!(buffer, "  }}")
    }

    fn write_field(
        &self,
        buffer: &mut String,
        model: &TableModel,
        field: &Field,
        enums: &[EnumDefinition],
    ) -> Result {
        if let Some(description) = &field.description {
            writeln!(buffer, "    /** {} */", description)?;
        }

        let base = enums
            .iter()
            .find(|e| e.model_name == model.name && e.field_name == field.name)
            .map(EnumDefinition::qualified_name)
            .unwrap_or_else(|| field.ty.to_string());

        match (field.nullable, self.nullable) {
            (true, NullableStyle::Union) => write!(buffer, "    {}: {} | null;", field.name, base)?,
            (true, NullableStyle::Optional) => write!(buffer, "    {}?: {};", field.name, base)?,
            (false, _) => write!(buffer, "    {}: {};", field.name, base)?,
        }

        if let Some(metadata) = &field.metadata {
            write!(buffer, " // {}", metadata)?;
        }
        writeln!(buffer)
    }
}

/// TypeSpec string literal.
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
