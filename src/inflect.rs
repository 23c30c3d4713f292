//! Rails-compatible inflection.
//!
//! Table names in `schema.rb` are plural snake_case (`company_branches`);
//! model names are singular PascalCase (`CompanyBranch`). The rule table
//! mirrors ActiveSupport's default English inflections, listed in the order
//! they are tried.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Words with no distinct singular form.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

/// Plural → singular pairs that no suffix rule covers.
const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("children", "child"),
    ("sexes", "sex"),
    ("moves", "move"),
    ("zombies", "zombie"),
];

/// Singular rules, first match wins.
static SINGULAR_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)(database)s$", "${1}"),
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)^(ox)en", "${1}"),
        (r"(?i)(alias|status)(es)?$", "${1}"),
        (r"(?i)(octop|vir)(us|i)$", "${1}us"),
        (r"(?i)^(a)x[ie]s$", "${1}xis"),
        (r"(?i)(cris|test)(is|es)$", "${1}is"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"(?i)(bus)(es)?$", "${1}"),
        (r"(?i)^(m|l)ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)(s)eries$", "${1}eries"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive)s$", "${1}"),
        (r"(?i)(hive)s$", "${1}"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(^analy)(sis|ses)$", "${1}sis"),
        (
            r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
            "${1}sis",
        ),
        (r"(?i)([ti])a$", "${1}um"),
        (r"(?i)(n)ews$", "${1}ews"),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Singularize an English word the way Rails does.
///
/// Compound snake_case names only change in their last segment, so
/// `sales_people` becomes `sales_person`. Unknown shapes pass through.
pub fn singularize(word: &str) -> String {
    let (prefix, last) = match word.rfind('_') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    };
    let lower = last.to_lowercase();

    if last.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return format!("{}{}", prefix, match_leading_case(last, singular));
    }

    for (rule, replacement) in SINGULAR_RULES.iter() {
        if rule.is_match(word) {
            return rule.replace(word, *replacement).into_owned();
        }
    }

    word.to_string()
}

/// Keep the capitalisation of the original word's first letter.
fn match_leading_case(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    if !upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert `snake_case` (or space separated) identifiers to `PascalCase`.
///
/// Only the first character of each segment is touched; the rest keeps its
/// original case.
pub fn to_pascal_case(ident: &str) -> String {
    ident
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Model name for a plural table name: `company_branches` → `CompanyBranch`.
pub fn model_name_for_table(table: &str) -> String {
    to_pascal_case(&singularize(table))
}

/// Model name for a model source file: `app/models/blog_post.rb` → `BlogPost`.
pub fn model_name_for_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(to_pascal_case)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("dishes"), "dish");
        assert_eq!(singularize("addresses"), "address");
    }

    #[test]
    fn test_latin_and_greek_plurals() {
        assert_eq!(singularize("analyses"), "analysis");
        assert_eq!(singularize("bases"), "basis");
        assert_eq!(singularize("indices"), "index");
        assert_eq!(singularize("matrices"), "matrix");
        assert_eq!(singularize("media"), "medium");
        assert_eq!(singularize("octopi"), "octopus");
    }

    #[test]
    fn test_ves_plurals() {
        assert_eq!(singularize("knives"), "knife");
        assert_eq!(singularize("wolves"), "wolf");
        assert_eq!(singularize("halves"), "half");
        assert_eq!(singularize("objectives"), "objective");
    }

    #[test]
    fn test_bus_quiz_status() {
        assert_eq!(singularize("buses"), "bus");
        assert_eq!(singularize("quizzes"), "quiz");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("status"), "status");
    }

    #[test]
    fn test_uncountable_and_irregular() {
        assert_eq!(singularize("equipment"), "equipment");
        assert_eq!(singularize("series"), "series");
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("People"), "Person");
        assert_eq!(singularize("sales_people"), "sales_person");
        assert_eq!(singularize("mining_equipment"), "mining_equipment");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("data"), "datum");
        assert_eq!(singularize(""), "");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("user_profile"), "UserProfile");
        assert_eq!(to_pascal_case("api__key"), "ApiKey");
        assert_eq!(to_pascal_case("blog post"), "BlogPost");
        assert_eq!(to_pascal_case("_leading"), "Leading");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_model_name_for_table() {
        assert_eq!(model_name_for_table("company_branches"), "CompanyBranch");
        assert_eq!(model_name_for_table("addresses"), "Address");
        assert_eq!(model_name_for_table("analyses"), "Analysis");
        assert_eq!(model_name_for_table("indices"), "Index");
        assert_eq!(model_name_for_table("buses"), "Bus");
        assert_eq!(model_name_for_table("api_keys"), "ApiKey");
        assert_eq!(model_name_for_table("user_profiles"), "UserProfile");
    }

    #[test]
    fn test_model_name_for_path() {
        assert_eq!(model_name_for_path(Path::new("app/models/company.rb")), "Company");
        assert_eq!(
            model_name_for_path(Path::new("app/models/user_profile.rb")),
            "UserProfile"
        );
        assert_eq!(
            model_name_for_path(Path::new("/full/path/app/models/blog_post.rb")),
            "BlogPost"
        );
    }
}
