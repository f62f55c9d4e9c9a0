use thiserror::Error;

/// Errors raised while building a parser. These point at a model or configuration that needs fixing,
/// not at a bad request.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("'model' is a required field")]
    MissingModel,
    #[error("model must be a record type, got <{0}>")]
    NotRecord(String),
    #[error("field type for {field:?} is not supported (<{type_name}>)")]
    UnsupportedType { field: String, type_name: String },
    #[error("layout {layout:?} is not parsable: {reason}")]
    InvalidLayout { layout: String, reason: String },
    #[error("field {0:?} is declared more than once")]
    DuplicateField(String),
    #[error("field {field:?} of type <{type_name}> can not be searched")]
    NotSearchable { field: String, type_name: String },
    #[error("field {field:?} recursively contains model {model}")]
    RecursiveModel { field: String, model: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid default sort: {0}")]
    DefaultSort(#[source] ParseError),
}

/// Errors raised while parsing a request. The message is meant to be shown to the caller as is.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("decoding buffer to query: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("decoding base64 query: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("offset must be greater than or equal to 0, got {0}")]
    InvalidOffset(i64),
    #[error("limit must be greater than 0 and less than or equal to {max}, got {limit}")]
    InvalidLimit { limit: i64, max: usize },
    #[error("unrecognized key {0:?} for filtering")]
    UnrecognizedFilterKey(String),
    #[error("field {0:?} is not filterable")]
    NotFilterable(String),
    #[error("can not apply op {op:?} on field {field:?}")]
    UnsupportedOp { op: String, field: String },
    #[error("invalid datatype or format for field {field:?}: {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: ValueError,
    },
    #[error("{0} must be a non-empty array")]
    ExpectedArray(String),
    #[error("expressions for {0} operator must be non-empty objects")]
    ExpectedObject(String),
    #[error("operator object for field {0:?} must not be empty")]
    EmptyOperatorObject(String),
    #[error("sort field can not be empty")]
    EmptySortField,
    #[error("unrecognized key {0:?} for sorting")]
    UnrecognizedSortKey(String),
    #[error("field {0:?} is not sortable")]
    NotSortable(String),
    #[error("search is not supported: no searchable fields")]
    NoSearchableFields,
}

/// Errors returned by field validators and converters.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("expect <{expected}>, got <{actual}>")]
    Type { expected: &'static str, actual: &'static str },
    #[error("not an integer")]
    NotInteger,
    #[error("not an unsigned integer")]
    NotUnsigned,
    #[error("{value} is out of range for <{type_name}>")]
    OutOfRange { value: String, type_name: String },
    #[error("expect a non-empty array")]
    EmptyList,
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ValueError>,
    },
    #[error(transparent)]
    Time(#[from] chrono::ParseError),
    #[error(transparent)]
    Uuid(#[from] uuid::Error),
    #[error("{0}")]
    Custom(String),
}

impl ValueError {
    /// A type mismatch between the expected kind and the decoded JSON value.
    pub fn mismatch(expected: &'static str, actual: &serde_json::Value) -> Self {
        ValueError::Type { expected, actual: json_kind(actual) }
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
