//! `schema.rb` parser.
//!
//! A line-oriented state machine over the `create_table` DSL:
//!
//! ```text
//! create_table "posts", id: :uuid, comment: "Blog posts" do |t|   ← header
//!   t.string "title", limit: 255, null: false                     ← column
//!   t.references "user", type: :uuid, null: false                 ← association
//!   t.timestamps null: false                                      ← sugar
//!   t.index ["title"], name: "index_posts_on_title"               ← ignored
//! end                                                             ← close
//! ```
//!
//! Anything that does not fit is skipped silently; a malformed line never
//! aborts the rest of the file.

use nom::{
    bytes::complete::tag,
    character::complete::{char, multispace0},
    combinator::eof,
    sequence::tuple,
    IResult,
};

use super::args::{parse_arguments, parse_identifier, Arguments, Value};
use super::model::{DefaultValue, Field, Metadata, TableModel};
use crate::inflect::model_name_for_table;
use crate::types::{map_type, RailsType, TspType};

/// Table-body directives that never produce a field.
const NON_COLUMN_DIRECTIVES: &[&str] = &[
    "index",
    "check_constraint",
    "foreign_key",
    "exclusion_constraint",
    "unique_constraint",
];

/// Parse every `create_table` block in source order.
pub fn parse_schema(input: &str) -> Vec<TableModel> {
    let mut models = Vec::new();
    let mut lines = input.lines().peekable();

    while let Some(line) = lines.next() {
        let Some(rest) = strip_create_table(line.trim()) else {
            continue;
        };

        // Header options may wrap onto following lines until `do |t|`.
        let mut header = rest.to_string();
        let opener = loop {
            if let Some(found) = split_block_opener(&header) {
                break Some(found);
            }
            match lines.peek() {
                Some(next)
                    if strip_create_table(next.trim()).is_none() && next.trim() != "end" =>
                {
                    header.push(' ');
                    header.push_str(next.trim());
                    lines.next();
                }
                _ => break None,
            }
        };
        let Some((args_end, block_var)) = opener else {
            continue;
        };

        let args = parse_arguments(&header[..args_end]);
        let mut body = Vec::new();
        for line in lines.by_ref() {
            if line.trim() == "end" {
                break;
            }
            body.push(line.trim());
        }

        if let Some(model) = build_model(&args, &block_var, &body) {
            models.push(model);
        }
    }

    models
}

/// `create_table "users", ...` → `"users", ...`
fn strip_create_table(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("create_table")?;
    rest.starts_with(|c: char| c.is_whitespace() || c == '(')
        .then_some(rest)
}

/// Find a trailing `do |var|` and return (byte offset of `do`, var).
fn split_block_opener(header: &str) -> Option<(usize, String)> {
    header.rmatch_indices("do").find_map(|(idx, _)| {
        let boundary = header[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || c == ')');
        if !boundary {
            return None;
        }
        block_opener(&header[idx..])
            .ok()
            .map(|(_, var)| (idx, var.to_string()))
    })
}

/// Parse `do |t|` through end of input.
fn block_opener(input: &str) -> IResult<&str, &str> {
    let (input, (_, _, _, _, var, _, _, _, _)) = tuple((
        tag("do"),
        multispace0,
        char('|'),
        multispace0,
        parse_identifier,
        multispace0,
        char('|'),
        multispace0,
        eof,
    ))(input)?;
    Ok((input, var))
}

/// `t.string "name", ...` → (`"name", ...`, `string`)
fn column_call<'a>(line: &'a str, block_var: &str) -> IResult<&'a str, &'a str> {
    let (input, (_, _, kind)) = tuple((tag(block_var), char('.'), parse_identifier))(line)?;
    if !input.is_empty() && !input.starts_with(|c: char| c.is_whitespace() || c == '(') {
        return Err(nom::Err::Error(nom::error::Error::new(
            line,
            nom::error::ErrorKind::Space,
        )));
    }
    Ok((input, kind))
}

fn build_model(args: &Arguments, block_var: &str, body: &[&str]) -> Option<TableModel> {
    let table_name = args.nth(0)?.as_name()?.to_string();
    let comment = string_option(args, "comment");

    let mut fields: Vec<Field> = body
        .iter()
        .flat_map(|line| parse_column_line(line, block_var))
        .collect();

    let identity = args.get("id");
    let identity_disabled = matches!(identity, Some(Value::Bool(false)));
    let identity_type = identity.and_then(Value::as_name).unwrap_or("bigint");

    let primary_key = match args.get("primary_key") {
        _ if identity_disabled => None,
        // Composite keys are declared as explicit columns; no single key to track.
        Some(Value::Array(_)) => None,
        custom => {
            let pk = custom.and_then(Value::as_name).unwrap_or("id");
            if !fields.iter().any(|f| f.name == pk) {
                fields.insert(0, Field::new(pk, map_type(identity_type), false));
            }
            Some(pk.to_string())
        }
    };

    Some(TableModel {
        name: model_name_for_table(&table_name),
        table_name,
        comment,
        primary_key,
        fields,
    })
}

/// Turn one body line into zero or more fields.
fn parse_column_line(line: &str, block_var: &str) -> Vec<Field> {
    let Ok((rest, kind)) = column_call(line, block_var) else {
        return Vec::new();
    };
    let args = parse_arguments(rest);

    if kind == "timestamps" {
        return timestamps(&args);
    }
    if NON_COLUMN_DIRECTIVES.contains(&kind) {
        return Vec::new();
    }

    let Some(name) = args.nth(0).and_then(Value::as_name) else {
        return Vec::new();
    };

    let kind = match kind {
        // t.column "name", :type
        "column" => match args.nth(1).and_then(Value::as_name) {
            Some(ty) => RailsType::parse(ty),
            None => return Vec::new(),
        },
        // t.virtual "name", type: :type, as: "..."
        "virtual" => RailsType::parse(args.get("type").and_then(Value::as_name).unwrap_or("string")),
        other => RailsType::parse(other),
    };

    if kind.is_association() {
        vec![association(name, &args)]
    } else {
        vec![column(name, &kind, &args)]
    }
}

/// `t.timestamps` → `created_at` + `updated_at` sharing one null flag.
fn timestamps(args: &Arguments) -> Vec<Field> {
    let nullable = nullable(args);
    vec![
        Field::new("created_at", TspType::UtcDateTime, nullable),
        Field::new("updated_at", TspType::UtcDateTime, nullable),
    ]
}

/// `t.references "user"` → `user_id` pointing at `user` (or `to_table`).
fn association(name: &str, args: &Arguments) -> Field {
    let override_type = args.get("type").and_then(Value::as_name).map(RailsType::parse);
    let ty = override_type
        .as_ref()
        .map(RailsType::tsp_type)
        .unwrap_or(TspType::Int64);

    let ref_table = args
        .get("foreign_key")
        .and_then(|fk| fk.get("to_table"))
        .and_then(Value::as_name)
        .unwrap_or(name);

    let default = literal_default(args);
    let (precision, scale) = match &override_type {
        Some(kind) if kind.is_fixed_point() => (number_option(args, "precision"), number_option(args, "scale")),
        _ => (None, None),
    };
    let metadata = Metadata::new()
        .precision(precision, scale)
        .limit(number_option(args, "limit"))
        .default_value(default.as_ref())
        .reference(ref_table)
        .build();

    Field {
        name: format!("{}_id", name),
        ty,
        nullable: nullable(args),
        description: string_option(args, "comment"),
        metadata,
        default,
    }
}

/// A plain (non-association) column.
fn column(name: &str, kind: &RailsType, args: &Arguments) -> Field {
    let default = literal_default(args);
    let (precision, scale) = if kind.is_fixed_point() {
        (number_option(args, "precision"), number_option(args, "scale"))
    } else {
        (None, None)
    };
    let metadata = Metadata::new()
        .precision(precision, scale)
        .limit(number_option(args, "limit"))
        .default_value(default.as_ref())
        .build();

    Field {
        name: name.to_string(),
        ty: kind.tsp_type(),
        nullable: nullable(args),
        description: string_option(args, "comment"),
        metadata,
        default,
    }
}

/// `null: false` → not nullable; missing or anything else → nullable.
fn nullable(args: &Arguments) -> bool {
    args.get("null").and_then(Value::as_bool).unwrap_or(true)
}

fn string_option(args: &Arguments, key: &str) -> Option<String> {
    match args.get(key) {
        Some(Value::Str(s)) => Some(s.clone()),
        _ => None,
    }
}

fn number_option<'a>(args: &'a Arguments, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_number)
}

/// Only string, boolean and numeric literals survive.
fn literal_default(args: &Arguments) -> Option<DefaultValue> {
    match args.get("default")? {
        Value::Str(s) => Some(DefaultValue::Str(s.clone())),
        Value::Bool(b) => Some(DefaultValue::Bool(*b)),
        Value::Number(n) => DefaultValue::number(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str, ty: TspType, nullable: bool) -> Field {
        Field::new(name, ty, nullable)
    }

    fn annotated(
        name: &str,
        ty: TspType,
        nullable: bool,
        description: Option<&str>,
        metadata: Option<&str>,
    ) -> Field {
        Field {
            description: description.map(String::from),
            metadata: metadata.map(String::from),
            ..Field::new(name, ty, nullable)
        }
    }

    #[test]
    fn test_users_with_implicit_id() {
        let schema = r#"
  create_table "users", force: :cascade do |t|
    t.string "name", null: false
    t.timestamps null: false
  end
"#;
        let models = parse_schema(schema);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "User");
        assert_eq!(models[0].table_name, "users");
        assert_eq!(models[0].comment, None);
        assert_eq!(models[0].primary_key.as_deref(), Some("id"));
        assert_eq!(
            models[0].fields,
            vec![
                field("id", TspType::Int64, false),
                field("name", TspType::String, false),
                field("created_at", TspType::UtcDateTime, false),
                field("updated_at", TspType::UtcDateTime, false),
            ]
        );
    }

    #[test]
    fn test_posts_with_uuid_identity_and_comment() {
        let schema = r#"
  create_table "posts", id: :uuid, comment: "Blog posts" do |t|
    t.string "title", limit: 255, null: false, comment: "Post title"
    t.references "user", type: :uuid, null: false
    t.decimal "price", precision: 10, scale: 2
  end
"#;
        let models = parse_schema(schema);
        assert_eq!(models[0].name, "Post");
        assert_eq!(models[0].comment.as_deref(), Some("Blog posts"));
        assert_eq!(
            models[0].fields,
            vec![
                field("id", TspType::String, false),
                annotated("title", TspType::String, false, Some("Post title"), Some("limit: 255")),
                annotated("user_id", TspType::String, false, None, Some("ref: user")),
                annotated("price", TspType::String, true, None, Some("precision: 10, scale: 2")),
            ]
        );
    }

    #[test]
    fn test_identity_disabled() {
        let schema = r#"
  create_table "logs", id: false do |t|
    t.string "message"
    t.jsonb "data"
  end
"#;
        let models = parse_schema(schema);
        assert_eq!(models[0].primary_key, None);
        assert_eq!(
            models[0].fields,
            vec![
                field("message", TspType::String, true),
                field("data", TspType::Unknown, true),
            ]
        );
    }

    #[test]
    fn test_custom_primary_key() {
        let schema = r#"
  create_table "countries", primary_key: "code", id: :string do |t|
    t.string "name"
  end
  create_table "currencies", primary_key: "iso" do |t|
    t.string "iso", null: false, limit: 3
  end
"#;
        let models = parse_schema(schema);
        assert_eq!(models[0].primary_key.as_deref(), Some("code"));
        assert_eq!(models[0].fields[0], field("code", TspType::String, false));
        assert_eq!(models[0].fields.len(), 2);

        assert_eq!(models[1].primary_key.as_deref(), Some("iso"));
        assert_eq!(models[1].fields.len(), 1);
        assert_eq!(models[1].fields[0].metadata.as_deref(), Some("limit: 3"));
    }

    #[test]
    fn test_explicit_id_column_is_not_duplicated() {
        let schema = r#"
  create_table "things" do |t|
    t.bigint "id", null: false
    t.string "label"
  end
"#;
        let models = parse_schema(schema);
        assert_eq!(models[0].primary_key.as_deref(), Some("id"));
        assert_eq!(
            models[0].fields.iter().filter(|f| f.name == "id").count(),
            1
        );
    }

    #[test]
    fn test_composite_primary_key() {
        let schema = r#"
  create_table "memberships", primary_key: ["team_id", "user_id"], force: :cascade do |t|
    t.bigint "team_id", null: false
    t.bigint "user_id", null: false
  end
"#;
        let models = parse_schema(schema);
        assert_eq!(models[0].primary_key, None);
        assert_eq!(models[0].fields.len(), 2);
    }

    #[test]
    fn test_all_rails_types() {
        let schema = r#"
  create_table "comprehensive_types" do |t|
    t.string "str_field"
    t.text "text_field"
    t.integer "int_field"
    t.bigint "bigint_field"
    t.smallint "smallint_field"
    t.decimal "decimal_field", precision: 8, scale: 2
    t.float "float_field"
    t.boolean "bool_field"
    t.datetime "datetime_field"
    t.timestamp "timestamp_field"
    t.date "date_field"
    t.time "time_field"
    t.json "json_field"
    t.jsonb "jsonb_field"
    t.binary "binary_field"
    t.uuid "uuid_field"
    t.inet "inet_field"
    t.cidr "cidr_field"
    t.macaddr "macaddr_field"
    t.hstore "custom_field"
  end
"#;
        let models = parse_schema(schema);
        let types: Vec<(&str, String)> = models[0]
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.to_string()))
            .collect();
        let expected = [
            ("id", "int64"),
            ("str_field", "string"),
            ("text_field", "string"),
            ("int_field", "int32"),
            ("bigint_field", "int64"),
            ("smallint_field", "int32"),
            ("decimal_field", "string"),
            ("float_field", "float64"),
            ("bool_field", "boolean"),
            ("datetime_field", "utcDateTime"),
            ("timestamp_field", "utcDateTime"),
            ("date_field", "plainDate"),
            ("time_field", "plainTime"),
            ("json_field", "unknown"),
            ("jsonb_field", "unknown"),
            ("binary_field", "bytes"),
            ("uuid_field", "string"),
            ("inet_field", "string"),
            ("cidr_field", "string"),
            ("macaddr_field", "string"),
            ("custom_field", "string"),
        ];
        let expected: Vec<(&str, String)> =
            expected.iter().map(|(n, t)| (*n, t.to_string())).collect();
        assert_eq!(types, expected);
    }

    #[test]
    fn test_references_and_belongs_to() {
        let schema = r#"
  create_table "posts" do |t|
    t.references "user", null: false
    t.references "category", type: :uuid, null: false
    t.belongs_to "author", null: false, comment: "Writer"
    t.belongs_to "organization", type: :string
    t.references "reviewer", foreign_key: { to_table: :users }
  end
"#;
        let fields = &parse_schema(schema)[0].fields;
        assert_eq!(
            fields[1..].to_vec(),
            vec![
                annotated("user_id", TspType::Int64, false, None, Some("ref: user")),
                annotated("category_id", TspType::String, false, None, Some("ref: category")),
                annotated("author_id", TspType::Int64, false, Some("Writer"), Some("ref: author")),
                annotated("organization_id", TspType::String, true, None, Some("ref: organization")),
                annotated("reviewer_id", TspType::Int64, true, None, Some("ref: users")),
            ]
        );
    }

    #[test]
    fn test_nullability_flags() {
        let schema = r#"
  create_table "nullable_test" do |t|
    t.string "required_field", null: false
    t.string "optional_field", null: true
    t.string "default_nullable"
  end
"#;
        let fields = &parse_schema(schema)[0].fields;
        assert!(!fields[1].nullable);
        assert!(fields[2].nullable);
        assert!(fields[3].nullable);
    }

    #[test]
    fn test_timestamps_null_variants() {
        let schema = r#"
  create_table "a" do |t|
    t.timestamps null: false
  end
  create_table "b" do |t|
    t.timestamps null: true
  end
  create_table "c" do |t|
    t.timestamps
  end
"#;
        let models = parse_schema(schema);
        let flags: Vec<(bool, bool)> = models
            .iter()
            .map(|m| {
                (
                    m.field("created_at").unwrap().nullable,
                    m.field("updated_at").unwrap().nullable,
                )
            })
            .collect();
        assert_eq!(flags, vec![(false, false), (true, true), (true, true)]);
    }

    #[test]
    fn test_defaults() {
        let schema = r#"
  create_table "orders" do |t|
    t.string "state", default: "draft", null: false
    t.boolean "paid", default: false
    t.integer "quantity", default: 1
    t.decimal "discount", precision: 5, scale: 2, default: "0.0"
    t.datetime "placed_at", default: -> { "CURRENT_TIMESTAMP" }
    t.string "label", default: "", limit: 40
  end
"#;
        let model = &parse_schema(schema)[0];
        let state = model.field("state").unwrap();
        assert_eq!(state.default, Some(DefaultValue::Str("draft".into())));
        assert_eq!(state.metadata.as_deref(), Some(r#"default: "draft""#));

        assert_eq!(model.field("paid").unwrap().default, Some(DefaultValue::Bool(false)));
        assert_eq!(
            model.field("quantity").unwrap().metadata.as_deref(),
            Some("default: 1")
        );
        assert_eq!(
            model.field("discount").unwrap().metadata.as_deref(),
            Some(r#"precision: 5, scale: 2, default: "0.0""#)
        );

        let placed = model.field("placed_at").unwrap();
        assert_eq!(placed.default, None);
        assert_eq!(placed.metadata, None);

        assert_eq!(
            model.field("label").unwrap().metadata.as_deref(),
            Some(r#"limit: 40, default: """#)
        );
    }

    #[test]
    fn test_precision_ignored_on_non_decimal() {
        let schema = r#"
  create_table "events" do |t|
    t.datetime "happened_at", precision: 6, null: false
  end
"#;
        let model = &parse_schema(schema)[0];
        assert_eq!(model.field("happened_at").unwrap().metadata, None);
    }

    #[test]
    fn test_ignores_indexes_and_constraints() {
        let schema = r#"
  create_table "users" do |t|
    t.string "email", null: false
    t.string "name"
    t.index ["email"], name: "index_users_on_email", unique: true
    t.index ["name", "email"], name: "index_users_on_name_and_email"
    t.check_constraint "char_length(name) > 0", name: "name_present"
    t.timestamps
  end
"#;
        let names: Vec<String> = parse_schema(schema)[0]
            .fields
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(names, vec!["id", "email", "name", "created_at", "updated_at"]);
    }

    #[test]
    fn test_model_names() {
        let schema = r#"
  create_table "company_branches" do |t|
  end
  create_table "addresses" do |t|
  end
  create_table "analyses" do |t|
  end
  create_table "indices" do |t|
  end
  create_table "buses" do |t|
  end
  create_table "api_keys" do |t|
  end
"#;
        let names: Vec<String> = parse_schema(schema).into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec!["CompanyBranch", "Address", "Analysis", "Index", "Bus", "ApiKey"]
        );
    }

    #[test]
    fn test_column_named_end_does_not_close_block() {
        let schema = r#"
  create_table "shifts" do |t|
    t.datetime "end_at"
    t.string "append_mode"
  end
"#;
        let model = &parse_schema(schema)[0];
        assert!(model.field("end_at").is_some());
        assert!(model.field("append_mode").is_some());
    }

    #[test]
    fn test_multiline_header_and_block_var() {
        let schema = r#"
  create_table "reports",
    comment: "Monthly reports",
    force: :cascade do |table|
    table.string "title"
  end
"#;
        let model = &parse_schema(schema)[0];
        assert_eq!(model.comment.as_deref(), Some("Monthly reports"));
        assert_eq!(model.fields.len(), 2);
        assert_eq!(model.fields[1].name, "title");
    }

    #[test]
    fn test_generic_and_virtual_columns() {
        let schema = r#"
  create_table "people" do |t|
    t.column "nickname", :citext, null: false
    t.virtual "full_name", type: :string, as: "first || ' ' || last", stored: true
    t.column "broken"
  end
"#;
        let model = &parse_schema(schema)[0];
        assert_eq!(model.name, "Person");
        assert_eq!(model.field("nickname").unwrap().ty, TspType::String);
        assert!(!model.field("nickname").unwrap().nullable);
        assert_eq!(model.field("full_name").unwrap().ty, TspType::String);
        assert!(model.field("broken").is_none());
    }

    #[test]
    fn test_garbage_is_ignored() {
        let schema = r#"
ActiveRecord::Schema[7.1].define(version: 2024_01_01_000000) do
  enable_extension "plpgsql"

  create_table "widgets" do |t|
    t.string "name"
    something odd here
    t.
  end

  add_foreign_key "widgets", "users"
end
"#;
        let models = parse_schema(schema);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].fields.len(), 2);
    }
}
