use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::column::column;
use crate::dialect::{Dialect, Generic};
use crate::error::SchemaError;
use crate::field::{DefaultResolver, FieldTypeResolver};
use crate::model::{Queryable, Shape};
use crate::operator::{DefaultCatalog, Operator, OperatorCatalog};

pub const DEFAULT_TAG_NAME: &str = "rql";
pub const DEFAULT_OP_PREFIX: &str = "$";
pub const DEFAULT_FIELD_SEPARATOR: &str = "_";
pub const DEFAULT_LIMIT: usize = 25;
pub const DEFAULT_MAX_LIMIT: usize = 100;

pub type ColumnFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Rewrites a raw operand before validation, given the logical field name.
pub type ValueFn = Arc<dyn Fn(&str, &JsonValue) -> JsonValue + Send + Sync>;

/// Parser configuration. Everything but `model` has a usable default.
#[derive(Clone)]
pub struct Config {
    pub model: Option<Shape>,
    /// Name of the field tag that marks a field as queryable.
    pub tag_name: String,
    /// Prefix that marks operator keys, as in `$eq`.
    pub op_prefix: String,
    /// Joins the names of nested record fields, as in `address_name`.
    pub field_separator: String,
    /// Maps a field name to its SQL column. Query keys are not affected.
    pub column_fn: ColumnFn,
    pub value_fn: Option<ValueFn>,
    pub default_limit: usize,
    pub max_limit: usize,
    /// Applied when a request has no sort, e.g. `["-created_at"]`.
    pub default_sort: Vec<String>,
    pub dialect: Arc<dyn Dialect>,
    pub operators: Arc<dyn OperatorCatalog>,
    pub resolver: Arc<dyn FieldTypeResolver>,
}

impl Config {
    pub fn for_model<T: Queryable>() -> Self { Self { model: Some(T::shape()), ..Self::default() } }

    pub fn column_name(&self, name: &str) -> String { (self.column_fn)(name) }

    /// The key for `op` in a filter document.
    pub fn op(&self, op: &Operator) -> String { format!("{}{}", self.op_prefix, op.name()) }

    pub(crate) fn validate(&self) -> Result<(), SchemaError> {
        if self.op_prefix.is_empty() {
            return Err(SchemaError::InvalidConfig("operator prefix can not be empty".to_owned()));
        }
        if self.field_separator.is_empty() {
            return Err(SchemaError::InvalidConfig("field separator can not be empty".to_owned()));
        }
        if self.max_limit == 0 {
            return Err(SchemaError::InvalidConfig("max limit must be greater than 0".to_owned()));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(SchemaError::InvalidConfig(format!(
                "default limit must be between 1 and {}, got {}",
                self.max_limit, self.default_limit
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: None,
            tag_name: DEFAULT_TAG_NAME.to_owned(),
            op_prefix: DEFAULT_OP_PREFIX.to_owned(),
            field_separator: DEFAULT_FIELD_SEPARATOR.to_owned(),
            column_fn: Arc::new(column),
            value_fn: None,
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            default_sort: Vec::new(),
            dialect: Arc::new(Generic),
            operators: Arc::new(DefaultCatalog),
            resolver: Arc::new(DefaultResolver),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("model", &self.model.as_ref().map(Shape::type_name))
            .field("tag_name", &self.tag_name)
            .field("op_prefix", &self.op_prefix)
            .field("field_separator", &self.field_separator)
            .field("value_fn", &self.value_fn.is_some())
            .field("default_limit", &self.default_limit)
            .field("max_limit", &self.max_limit)
            .field("default_sort", &self.default_sort)
            .field("dialect", &self.dialect)
            .field("operators", &self.operators)
            .field("resolver", &self.resolver)
            .finish()
    }
}
