//! Rails model enum declarations.
//!
//! Recognizes every syntax Rails has accepted for `enum`:
//!
//! ```ruby
//! enum :status, { active: 0, archived: 1 }        # hash (may span lines, may take a do block)
//! enum :status, [ :active, :archived ]            # array
//! enum :status, %i(active archived)               # percent literal
//! enum :status, active: 0, archived: 1            # keyword pairs
//! enum status: { active: 0, archived: 1 }         # legacy
//! ```
//!
//! All of them yield the same value list.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1},
    combinator::recognize,
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::inflect::to_pascal_case;
use crate::schema::args::{parse_arguments, parse_identifier, parse_value, Value};

/// One `enum` declaration found in a model file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub model_name: String,
    pub field_name: String,
    /// Distinct values in declaration order.
    pub values: Vec<String>,
}

impl EnumDefinition {
    /// `company_status` → `CompanyStatus`
    pub fn type_name(&self) -> String {
        to_pascal_case(&self.field_name)
    }

    /// `Company` → `CompanyEnums`
    pub fn namespace(&self) -> String {
        namespace_for(&self.model_name)
    }

    /// Reference used as a field type: `CompanyEnums.CompanyStatus`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.type_name())
    }
}

/// Name of the enum namespace generated for a model.
pub fn namespace_for(model_name: &str) -> String {
    format!("{}Enums", model_name)
}

/// Find all enum declarations in a model source file.
pub fn parse_enums(text: &str, model_name: &str) -> Vec<EnumDefinition> {
    let lines: Vec<&str> = text.lines().map(|l| strip_comment(l).trim()).collect();
    let mut enums = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Ok((rest, field)) = enum_marker(line) else {
            continue;
        };

        let values = dedup(extract_values(rest.trim_start(), &lines[idx + 1..]));
        if values.is_empty() {
            continue;
        }

        enums.push(EnumDefinition {
            model_name: model_name.to_string(),
            field_name: field.to_string(),
            values,
        });
    }

    enums
}

/// `enum :field,` / `enum field:` / `enum(:field,` → field name.
fn enum_marker(input: &str) -> IResult<&str, &str> {
    let (input, _) = pair(
        tag("enum"),
        alt((recognize(pair(multispace0, char('('))), multispace1)),
    )(input)?;
    let (input, _) = multispace0(input)?;

    let (rest, field) = alt((
        terminated(preceded(char(':'), parse_identifier), pair(multispace0, char(','))),
        terminated(parse_identifier, char(':')),
    ))(input)?;

    // `enum Foo::Bar` is not a declaration.
    if rest.starts_with(':') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }
    Ok((rest, field))
}

/// Dispatch on the first significant character of the value part.
fn extract_values(rest: &str, following: &[&str]) -> Vec<String> {
    if rest.starts_with('{') {
        let content = gather(rest, following, '{', '}');
        return match parse_value(&content) {
            Ok((_, Value::Hash(entries))) => entries.into_iter().map(|(key, _)| key).collect(),
            _ => Vec::new(),
        };
    }

    if rest.starts_with('[') {
        let content = gather(rest, following, '[', ']');
        return match parse_value(&content) {
            Ok((_, Value::Array(items))) => items.iter().filter_map(bare_name).collect(),
            _ => Vec::new(),
        };
    }

    if let Some(literal) = ["%i", "%I", "%w", "%W"]
        .iter()
        .find_map(|prefix| rest.strip_prefix(prefix))
    {
        return percent_literal(literal, following);
    }

    // Keyword pairs; `_prefix:`-style options are not values.
    parse_arguments(rest)
        .named
        .into_iter()
        .map(|(key, _)| key)
        .filter(|key| !key.starts_with('_'))
        .collect()
}

/// Drop a trailing `# ...` comment that sits outside any string literal.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in line.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '#' => return &line[..idx],
            _ => {}
        }
    }
    line
}

/// Join `first` with following lines until `open`/`close` balance.
fn gather(first: &str, following: &[&str], open: char, close: char) -> String {
    let balance = |s: &str| -> i64 {
        s.chars()
            .map(|c| match c {
                c if c == open => 1,
                c if c == close => -1,
                _ => 0,
            })
            .sum()
    };

    let mut content = first.to_string();
    let mut depth = balance(first);
    for line in following {
        if depth <= 0 {
            break;
        }
        content.push(' ');
        content.push_str(line);
        depth += balance(line);
    }
    content
}

/// `(a b c)` or `[a b c]`, possibly spanning lines.
fn percent_literal(literal: &str, following: &[&str]) -> Vec<String> {
    let close = match literal.chars().next() {
        Some('(') => ')',
        Some('[') => ']',
        _ => return Vec::new(),
    };
    let content = gather(literal, following, if close == ')' { '(' } else { '[' }, close);
    let Some(end) = content.find(close) else {
        return Vec::new();
    };

    content[1..end]
        .split_whitespace()
        .map(|word| word.trim_start_matches(':').to_string())
        .collect()
}

/// Array element as a value name: `:active`, `"active"` or a bare word.
fn bare_name(item: &Value) -> Option<String> {
    match item {
        Value::Expr(word) if word.chars().all(|c| c.is_alphanumeric() || c == '_') => {
            Some(word.clone())
        }
        other => other.as_name().map(String::from),
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
