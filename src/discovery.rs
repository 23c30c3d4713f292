//! Locating `schema.rb` and model files on disk.

use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::enums::{parse_enums, EnumDefinition};
use crate::error::{TspError, TspResult};
use crate::inflect::model_name_for_path;
use crate::report::Reporter;
use crate::schema::TableModel;

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "target",
    "vendor",
    "tmp",
    "log",
];

/// Fallback search for a schema above the working directory.
const SCHEMA_GLOB: &str = "**/db/schema.rb";

/// A glob pattern compiled to an anchored regex.
///
/// Supports `**` (any number of directories), `*` and `?` (within one
/// path segment). Paths are matched with `/` separators.
#[derive(Debug, Clone)]
pub struct Glob {
    regex: Regex,
}

impl Glob {
    pub fn new(pattern: &str) -> Option<Self> {
        let mut re = String::from("^");
        let mut rest = pattern;

        while let Some(c) = rest.chars().next() {
            if let Some(after) = rest.strip_prefix("**/") {
                re.push_str("(?:.*/)?");
                rest = after;
            } else if rest == "/**" {
                re.push_str("(?:/.*)?");
                rest = "";
            } else if let Some(after) = rest.strip_prefix("**") {
                re.push_str(".*");
                rest = after;
            } else {
                match c {
                    '*' => re.push_str("[^/]*"),
                    '?' => re.push_str("[^/]"),
                    other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
                }
                rest = &rest[c.len_utf8()..];
            }
        }
        re.push('$');

        Regex::new(&re).ok().map(|regex| Self { regex })
    }

    /// Match a `/`-separated relative path.
    pub fn is_match(&self, relative: &str) -> bool {
        self.regex.is_match(relative)
    }
}

/// Find files under `root` matching any of `patterns` and none of `excludes`.
///
/// Results are grouped by pattern (first pattern first), then in sorted walk
/// order, with duplicates removed.
pub fn find_files(root: &Path, patterns: &[String], excludes: &[String]) -> Vec<PathBuf> {
    let includes: Vec<Glob> = patterns.iter().filter_map(|p| Glob::new(p)).collect();
    let excludes: Vec<Glob> = excludes.iter().filter_map(|p| Glob::new(p)).collect();

    let mut files = Vec::new();
    let mut visited = HashSet::new();
    walk(root, "", &mut visited, &mut files);

    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for glob in &includes {
        for (relative, path) in &files {
            if glob.is_match(relative)
                && !excludes.iter().any(|ex| ex.is_match(relative))
                && seen.insert(path.clone())
            {
                found.push(path.clone());
            }
        }
    }
    found
}

/// Recursively list files as (relative `/` path, full path), sorted by name.
///
/// Symlinks are followed; `visited` holds canonical directories already
/// walked so a link cycle is entered only once.
fn walk(
    dir: &Path,
    prefix: &str,
    visited: &mut HashSet<PathBuf>,
    out: &mut Vec<(String, PathBuf)>,
) {
    if let Ok(canonical) = fs::canonicalize(dir)
        && !visited.insert(canonical)
    {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    let mut entries: Vec<_> = entries.flatten().collect();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        let relative = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };

        let Ok(mut file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_symlink() {
            // Dangling links are skipped.
            let Ok(target) = fs::metadata(&path) else {
                continue;
            };
            file_type = target.file_type();
        }

        if file_type.is_dir() {
            if !SKIP_DIRS.contains(&name.as_str()) {
                walk(&path, &relative, visited, out);
            }
        } else if file_type.is_file() {
            out.push((relative, path));
        }
    }
}

/// Locate `schema.rb` for a working directory.
///
/// Tries the configured priority paths first, then searches `..` and `../..`.
pub fn find_schema(cwd: &Path, config: &Config) -> TspResult<PathBuf> {
    for candidate in &config.schema.paths {
        let path = cwd.join(candidate);
        if path.is_file() {
            return Ok(tidy(path));
        }
    }

    let pattern = [SCHEMA_GLOB.to_string()];
    for base in [cwd.join(".."), cwd.join("..").join("..")] {
        if let Some(found) = find_files(&base, &pattern, &[]).into_iter().next() {
            return Ok(tidy(found));
        }
    }

    let mut searched: Vec<String> = config
        .schema
        .paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    searched.push(format!("../{}", SCHEMA_GLOB));
    searched.push(format!("../../{}", SCHEMA_GLOB));
    Err(TspError::SchemaNotFound { searched })
}

/// Resolve `..` segments where possible.
fn tidy(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}

/// The Rails application root for a schema at `<root>/db/schema.rb`.
pub fn project_root(schema_path: &Path) -> PathBuf {
    schema_path
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Model source files under the project root.
pub fn find_model_files(project_root: &Path, config: &Config) -> Vec<PathBuf> {
    find_files(project_root, &config.models.patterns, &config.models.exclude)
}

/// Enum declarations for the parsed models.
///
/// Only files whose name maps to a parsed model are opened. The first
/// declaration of a (model, field) pair wins.
pub async fn collect_enums(
    project_root: &Path,
    models: &[TableModel],
    config: &Config,
    reporter: &dyn Reporter,
) -> Vec<EnumDefinition> {
    if !config.models.enums {
        return Vec::new();
    }

    let wanted: HashSet<&str> = models.iter().map(|m| m.name.as_str()).collect();
    let files = find_model_files(project_root, config);
    reporter.info(&format!("Found {} model file(s)", files.len()));

    let mut enums: Vec<EnumDefinition> = Vec::new();
    for path in files {
        let model_name = model_name_for_path(&path);
        if !wanted.contains(model_name.as_str()) {
            continue;
        }

        let text = match crate::fs::read_text(&path).await {
            Ok(text) => text,
            Err(e) => {
                reporter.warn(&format!("Skipping model file: {}", e));
                continue;
            }
        };

        for def in parse_enums(&text, &model_name) {
            let duplicate = enums
                .iter()
                .any(|e| e.model_name == def.model_name && e.field_name == def.field_name);
            if !duplicate {
                enums.push(def);
            }
        }
    }

    reporter.info(&format!("Found {} enum(s)", enums.len()));
    enums
}
