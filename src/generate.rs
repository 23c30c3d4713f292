//! The `generate` command: schema.rb in, TypeSpec document out.

use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::discovery::{collect_enums, find_schema, project_root};
use crate::error::{TspError, TspResult};
use crate::fmt::Formatter;
use crate::fs::{file_exists, read_text, write_new, write_replace};
use crate::merge::{merge, MergeOutcome};
use crate::report::Reporter;
use crate::schema::parse_schema;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Directory searches and relative paths start from.
    pub cwd: PathBuf,
    /// Output path override; falls back to `output.path` from config.
    pub out: Option<PathBuf>,
    /// Replace an existing document.
    pub force: bool,
    /// Add new models to an existing document.
    pub append: bool,
    /// Build the document but write nothing.
    pub dry_run: bool,
}

impl GenerateOptions {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }

    /// Absolute (or cwd-relative) output path.
    pub fn target(&self, config: &Config) -> PathBuf {
        let out = self.out.as_deref().unwrap_or(config.output.path.as_path());
        self.cwd.join(out)
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { path: PathBuf },
    Overwritten { path: PathBuf },
    Appended { path: PathBuf, count: usize },
    /// Append requested but every model was already present.
    Skipped { path: PathBuf },
    /// Dry run; the document that would have been written.
    Printed { document: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { path } => write!(f, "Created {} at: {}", file_name(path), path.display()),
            Self::Overwritten { path } => {
                write!(f, "Overwritten {} at: {}", file_name(path), path.display())
            }
            Self::Appended { path, count } => {
                write!(f, "Appended {} model(s) to: {}", count, path.display())
            }
            Self::Skipped { path } => write!(f, "No new models to append to: {}", path.display()),
            Self::Printed { document } => f.write_str(document),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run one generation.
///
/// The existence check runs before any schema work, so a refused run
/// leaves no trace.
pub async fn generate(
    options: &GenerateOptions,
    config: &Config,
    reporter: &dyn Reporter,
) -> TspResult<Outcome> {
    let target = options.target(config);
    let exists = file_exists(&target).await;

    if exists && !options.force && !options.append && !options.dry_run {
        return Err(TspError::OutputExists { path: target });
    }

    let schema_path = find_schema(&options.cwd, config)?;
    reporter.info(&format!("Using schema: {}", schema_path.display()));

    let schema = read_text(&schema_path).await?;
    let mut models = parse_schema(&schema);
    models.sort_by(|a, b| a.name.cmp(&b.name));
    reporter.info(&format!("Parsed {} table(s)", models.len()));

    let root = project_root(&schema_path);
    let enums = collect_enums(&root, &models, config, reporter).await;
    let formatter = Formatter::from_config(config);

    if options.append && exists {
        let existing = read_text(&target).await?;
        let today = Local::now().date_naive();
        return match merge(&existing, &models, &enums, &formatter, today, &target)? {
            MergeOutcome::NothingToAdd => Ok(Outcome::Skipped { path: target }),
            MergeOutcome::Appended { text, .. } if options.dry_run => {
                Ok(Outcome::Printed { document: text })
            }
            MergeOutcome::Appended { text, count } => {
                write_replace(&target, &text).await?;
                Ok(Outcome::Appended {
                    path: target,
                    count,
                })
            }
        };
    }

    let document = formatter.render(&models, &enums)?;
    if options.dry_run {
        return Ok(Outcome::Printed { document });
    }

    if exists && options.force {
        write_replace(&target, &document).await?;
        Ok(Outcome::Overwritten { path: target })
    } else {
        write_new(&target, &document).await?;
        Ok(Outcome::Created { path: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let path = PathBuf::from("/app/rails.tsp");
        assert_eq!(
            Outcome::Created { path: path.clone() }.to_string(),
            "Created rails.tsp at: /app/rails.tsp"
        );
        assert_eq!(
            Outcome::Overwritten { path: path.clone() }.to_string(),
            "Overwritten rails.tsp at: /app/rails.tsp"
        );
        assert_eq!(
            Outcome::Appended {
                path: path.clone(),
                count: 2
            }
            .to_string(),
            "Appended 2 model(s) to: /app/rails.tsp"
        );
        assert_eq!(
            Outcome::Skipped { path }.to_string(),
            "No new models to append to: /app/rails.tsp"
        );
    }

    #[test]
    fn test_target_resolution() {
        let config = Config::default();
        let mut options = GenerateOptions::new("/work");
        assert_eq!(options.target(&config), PathBuf::from("/work/rails.tsp"));

        options.out = Some(PathBuf::from("spec/api.tsp"));
        assert_eq!(options.target(&config), PathBuf::from("/work/spec/api.tsp"));

        options.out = Some(PathBuf::from("/abs/api.tsp"));
        assert_eq!(options.target(&config), PathBuf::from("/abs/api.tsp"));
    }
}
