//! # rql
//!
//! Compiles MongoDB-style JSON queries into parameterized SQL fragments for a typed resource.
//!
//! A [`Parser`] is built once per model. Building it walks the model's fields and records which of
//! them can be filtered, sorted or searched, along with the operators each one accepts. Every request
//! is then parsed into [`Params`]: a `WHERE` expression with its arguments, an `ORDER BY` list, a
//! select list, and a limit and offset. Nothing is executed; the caller passes the fragments to
//! whatever SQL layer it uses.
//!
//! ## Example
//!
//! ```rust
//! use rql::{Parser, Queryable, Value};
//!
//! #[derive(Queryable)]
//! pub struct User {
//!     #[rql(filter, sort)]
//!     age: i32,
//!     #[rql(filter, search)]
//!     name: String,
//!     password: String,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parser = Parser::for_model::<User>()?;
//! let params = parser.parse(br#"{
//!     "filter": {"name": "foo", "$or": [{"age": {"$lt": 18}}, {"age": {"$gte": 65}}]},
//!     "sort": ["-age"]
//! }"#)?;
//!
//! assert_eq!(params.filter_exp, "name = ? AND (age < ? OR age >= ?)");
//! assert_eq!(params.filter_args, vec![Value::from("foo"), Value::Int(18), Value::Int(65)]);
//! assert_eq!(params.sort, "age desc");
//! assert_eq!(params.limit, 25);
//! # Ok(())
//! # }
//! ```
//!
//! ## Filters
//!
//! - `{"field": value}` is shorthand for `{"field": {"$eq": value}}`.
//! - `{"field": {"$gt": 1, "$lt": 9}}` applies several operators to one field.
//! - Sibling keys are joined with `AND`, in document order.
//! - `{"$or": [doc, ...]}` and `{"$and": [doc, ...]}` combine whole documents.
//!
//! Which operators a field accepts depends on its type, see [`DefaultResolver`]. Operator rendering
//! and placeholder syntax are configured through [`OperatorCatalog`] and [`Dialect`].

pub mod column;
pub mod compiler;
pub mod config;
pub mod dialect;
pub mod error;
pub mod field;
pub mod layout;
pub mod model;
pub mod operator;
pub mod parser;
pub mod query;
pub mod schema;
pub mod value;

pub use column::column;
pub use compiler::CompiledExpression;
pub use config::Config;
pub use dialect::{Dialect, Direction, Generic, Postgres};
pub use error::{ParseError, SchemaError, ValueError};
pub use field::{DefaultResolver, Field, FieldMeta, FieldTypeResolver};
pub use layout::Layout;
pub use model::{FieldDescriptor, IntWidth, Queryable, Record, Shape, TypeTag};
pub use operator::{DefaultCatalog, Operator, OperatorCatalog, OperatorTable, Rendering, Template};
pub use parser::Parser;
pub use query::{Params, Query, Search};
pub use schema::Schema;
pub use value::Value;

// Re-export the derive macro. It shares its name with the trait, as serde does.
#[cfg(feature = "derive")]
pub use rql_derive::Queryable;
