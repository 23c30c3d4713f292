//! Rails `db/schema.rb` reading.
//!
//! - [`args`]: nom tokenizer for DSL call arguments
//! - [`parser`]: `create_table` block state machine
//! - [`model`]: parsed tables and fields

pub mod args;
pub mod model;
pub mod parser;

pub use model::{DefaultValue, Field, Metadata, TableModel};
pub use parser::parse_schema;
