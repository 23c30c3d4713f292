//! # rails-tsp
//!
//! Generate a TypeSpec document from a Rails `db/schema.rb`.
//!
//! ## Quick Example
//!
//! ```rust
//! use rails_tsp::prelude::*;
//!
//! let models = parse_schema(r#"
//!   create_table "company_branches", comment: "Branches" do |t|
//!     t.string "name", null: false
//!     t.timestamps
//!   end
//! "#);
//! assert_eq!(models[0].name, "CompanyBranch");
//!
//! let tsp = Formatter::new().render(&models, &[]).unwrap();
//! assert!(tsp.contains("  model CompanyBranch {"));
//! assert!(tsp.contains("    created_at: utcDateTime | null;"));
//! ```
//!
//! ## Pipeline
//!
//! | Stage     | Module        | Produces              |
//! |-----------|---------------|-----------------------|
//! | Locate    | [`discovery`] | schema + model paths  |
//! | Parse     | [`schema`]    | [`TableModel`]s       |
//! | Enums     | [`enums`]     | [`EnumDefinition`]s   |
//! | Render    | [`fmt`]       | TypeSpec text         |
//! | Merge     | [`merge`]     | appended TypeSpec     |
//!
//! [`TableModel`]: schema::TableModel
//! [`EnumDefinition`]: enums::EnumDefinition

pub mod config;
pub mod discovery;
pub mod enums;
pub mod error;
pub mod fmt;
pub mod fs;
pub mod generate;
pub mod inflect;
pub mod merge;
pub mod report;
pub mod schema;
pub mod types;

pub mod prelude {
    pub use crate::config::{Config, NullableStyle, ServiceConfig};
    pub use crate::enums::{parse_enums, EnumDefinition};
    pub use crate::error::*;
    pub use crate::fmt::Formatter;
    pub use crate::generate::{generate, GenerateOptions, Outcome};
    pub use crate::merge::{merge, MergeOutcome};
    pub use crate::report::{ConsoleReporter, MemoryReporter, Reporter};
    pub use crate::schema::{parse_schema, Field, TableModel};
    pub use crate::types::TspType;
}

pub use schema::parse_schema;
