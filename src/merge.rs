//! Appending newly discovered models to an existing document.
//!
//! Existing text is never rewritten: new declarations are spliced in just
//! before the document's final closing brace, under a dated marker.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::enums::EnumDefinition;
use crate::error::{TspError, TspResult};
use crate::fmt::Formatter;
use crate::schema::TableModel;

static MODEL_DECL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"model\s+(\w+)\s*\{").unwrap());
static FINAL_BRACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\}\s*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every model is already declared; the document stays as it is.
    NothingToAdd,
    Appended { text: String, count: usize },
}

/// Names declared with `model <Name> {` anywhere in the text.
pub fn declared_models(text: &str) -> HashSet<String> {
    MODEL_DECL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn declares_namespace(text: &str, name: &str) -> bool {
    Regex::new(&format!(r"namespace\s+{}\s*\{{", regex::escape(name)))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Merge `models` into `existing`.
///
/// `path` is only used to name the document in errors.
pub fn merge(
    existing: &str,
    models: &[TableModel],
    enums: &[EnumDefinition],
    formatter: &Formatter,
    date: NaiveDate,
    path: &Path,
) -> TspResult<MergeOutcome> {
    let declared = declared_models(existing);
    let fresh: Vec<TableModel> = models
        .iter()
        .filter(|m| !declared.contains(&m.name))
        .cloned()
        .collect();

    if fresh.is_empty() {
        return Ok(MergeOutcome::NothingToAdd);
    }

    let Some(close) = FINAL_BRACE.find(existing) else {
        return Err(TspError::MalformedOutput {
            path: path.to_path_buf(),
        });
    };

    let mut block = format!("\n  // ---- appended at {} ----\n", date.format("%Y-%m-%d"));
    for (name, namespace) in formatter.render_enum_namespaces(&fresh, enums)? {
        if !declares_namespace(existing, &name) {
            block.push_str(&namespace);
            block.push_str("\n\n");
        }
    }
    let rendered = fresh
        .iter()
        .map(|m| formatter.render_model(m, enums))
        .collect::<Result<Vec<_>, _>>()?;
    block.push_str(&rendered.join("\n\n"));
    block.push('\n');

    let mut text = String::with_capacity(existing.len() + block.len());
    text.push_str(&existing[..close.start()]);
    text.push_str(&block);
    text.push_str(&existing[close.start()..]);

    Ok(MergeOutcome::Appended {
        text,
        count: fresh.len(),
    })
}
