//! Ruby argument-list tokenizer using nom.
//!
//! Parses the part of a DSL call after the method name:
//!
//! ```text
//! "title", limit: 255, null: false, comment: "Post title"
//! ───┬───  ──────────────────────┬───────────────────────
//!    │                           └── named (keyword) arguments
//!    └── positional arguments
//! ```
//!
//! Values cover the literals `schema.rb` actually emits. Anything else
//! (lambdas, method calls, constants) is kept verbatim as [`Value::Expr`].
//! Parsing never fails: an argument that cannot be read is skipped up to the
//! next top-level comma.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, opt, recognize},
    error::{Error, ErrorKind},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

/// A Ruby literal (or opaque expression) appearing as an argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `"text"` or `'text'`, escapes resolved.
    Str(String),
    /// `:name`
    Symbol(String),
    /// Integer or decimal literal, kept as written.
    Number(String),
    Bool(bool),
    Nil,
    /// `{ key: value, ... }`
    Hash(Vec<(String, Value)>),
    /// `[a, b, ...]`
    Array(Vec<Value>),
    /// Anything else, verbatim.
    Expr(String),
}

impl Value {
    /// String or symbol content, the two ways Rails names things.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Raw text of a numeric literal.
    pub fn as_number(&self) -> Option<&str> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Look up a key when this value is a hash.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Hash(entries) => lookup(entries, key),
            _ => None,
        }
    }
}

/// Parsed argument list of one DSL call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
}

impl Arguments {
    /// Named argument by key. The last occurrence wins, as in Ruby.
    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup(&self.named, key)
    }

    /// Positional argument by index.
    pub fn nth(&self, idx: usize) -> Option<&Value> {
        self.positional.get(idx)
    }
}

fn lookup<'a>(entries: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Parse an argument list, with or without surrounding parentheses.
pub fn parse_arguments(input: &str) -> Arguments {
    let input = strip_call_parens(input.trim());
    let mut args = Arguments::default();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        if let Ok((remaining, (key, val))) = parse_named(rest) {
            args.named.push((key, val));
            rest = remaining;
        } else if let Ok((remaining, val)) = parse_value(rest) {
            args.positional.push(val);
            rest = remaining;
        } else {
            // Stray closer at top level; drop it and keep going.
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }
    }

    args
}

/// `("a", b: 1)` → `"a", b: 1` when the outer parens wrap the whole list.
fn strip_call_parens(input: &str) -> &str {
    if let Some(inner) = input.strip_prefix('(')
        && let Some(close) = matching_close(input)
        && close == input.len() - 1
    {
        return &inner[..inner.len() - 1];
    }
    input
}

/// Byte index of the bracket closing the one at the start of `input`.
fn matching_close(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in input.char_indices() {
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
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse `key: value`, `"key": value`, `:key => value` or `"key" => value`.
fn parse_named(input: &str) -> IResult<&str, (String, Value)> {
    let (input, key) = alt((
        terminated(
            map(parse_identifier, String::from),
            pair(char(':'), not_colon),
        ),
        terminated(parse_quoted, char(':')),
        terminated(
            alt((parse_quoted, preceded(char(':'), map(parse_identifier, String::from)))),
            tuple((multispace0, tag("=>"))),
        ),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, val) = parse_value(input)?;
    Ok((input, (key, val)))
}

/// Succeeds without consuming when the next char is not `:` (so `Foo::Bar` is no key).
fn not_colon(input: &str) -> IResult<&str, ()> {
    if input.starts_with(':') {
        Err(nom::Err::Error(Error::new(input, ErrorKind::Not)))
    } else {
        Ok((input, ()))
    }
}

/// Parse a single value.
pub fn parse_value(input: &str) -> IResult<&str, Value> {
    let (input, _) = multispace0(input)?;
    alt((
        parse_hash,
        parse_array,
        map(parse_quoted, Value::Str),
        parse_symbol,
        parse_number,
        parse_keyword,
        parse_expr,
    ))(input)
}

/// Parse an identifier (key, symbol or method name).
pub fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Parse a double- or single-quoted string, resolving backslash escapes.
pub fn parse_quoted(input: &str) -> IResult<&str, String> {
    let quote = match input.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut out = String::new();
    let mut escaped = false;
    for (idx, c) in input.char_indices().skip(1) {
        if escaped {
            out.push(match c {
                'n' if quote == '"' => '\n',
                't' if quote == '"' => '\t',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&input[idx + c.len_utf8()..], out));
        } else {
            out.push(c);
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

/// Parse `:name` or `:"name"`.
fn parse_symbol(input: &str) -> IResult<&str, Value> {
    map(
        preceded(
            char(':'),
            alt((
                parse_quoted,
                map(
                    recognize(pair(parse_identifier, opt(one_of("?!")))),
                    String::from,
                ),
            )),
        ),
        Value::Symbol,
    )(input)
}

/// Parse an integer or decimal literal that is not followed by more of an expression.
fn parse_number(input: &str) -> IResult<&str, Value> {
    let (rest, num) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)?;

    if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '.') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Digit)));
    }
    Ok((rest, Value::Number(num.to_string())))
}

/// Parse `true`, `false` or `nil`.
fn parse_keyword(input: &str) -> IResult<&str, Value> {
    let (rest, word) = parse_identifier(input)?;
    let val = match word {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "nil" => Value::Nil,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Tag))),
    };
    if rest.starts_with(|c: char| c == '.' || c == '(') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Tag)));
    }
    Ok((rest, val))
}

/// Parse `{ key: value, ... }`.
fn parse_hash(input: &str) -> IResult<&str, Value> {
    let (mut rest, _) = char('{')(input)?;
    let mut entries = Vec::new();

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if let Some(after) = rest.strip_prefix('}') {
            return Ok((after, Value::Hash(entries)));
        }
        if rest.is_empty() {
            return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
        }
        match parse_named(rest) {
            Ok((remaining, entry)) => {
                entries.push(entry);
                rest = remaining;
            }
            // Not a pair (e.g. a `do` block body); skip the element.
            Err(_) => {
                let (remaining, _) = parse_expr(rest)?;
                rest = remaining;
            }
        }
    }
}

/// Parse `[a, b, ...]`.
fn parse_array(input: &str) -> IResult<&str, Value> {
    let (mut rest, _) = char('[')(input)?;
    let mut items = Vec::new();

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if let Some(after) = rest.strip_prefix(']') {
            return Ok((after, Value::Array(items)));
        }
        if rest.is_empty() {
            return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
        }
        let (remaining, item) = parse_value(rest)?;
        items.push(item);
        rest = remaining;
    }
}

/// Capture raw text up to the next top-level `,` or unbalanced closer.
fn parse_expr(input: &str) -> IResult<&str, Value> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut end = input.len();

    for (idx, c) in input.char_indices() {
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
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    end = idx;
                    break;
                }
                depth -= 1;
            }
            ',' if depth == 0 => {
                end = idx;
                break;
            }
            _ => {}
        }
    }

    let text = input[..end].trim_end();
    if text.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeWhile1)));
    }
    Ok((&input[end..], Value::Expr(text.to_string())))
}
