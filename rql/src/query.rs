use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::value::Value;

/// A decoded request.
///
/// ```json
/// {
///     "limit": 25,
///     "offset": 0,
///     "select": ["name", "age"],
///     "sort": ["-age", "+name"],
///     "filter": {"name": "foo", "$or": [{"age": {"$gt": 18}}, {"admin": true}]},
///     "search": {"query": "foo"}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Query {
    /// `0` means the configured default.
    pub limit: i64,
    pub offset: i64,
    pub select: Vec<String>,
    pub sort: Vec<String>,
    pub filter: Map<String, JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<Search>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Search {
    pub query: String,
}

/// Output of a parse, ready to be spliced into a statement. `filter_exp` is empty when there is no
/// filter, and `filter_args` holds one argument per placeholder in `filter_exp`, in order. The same
/// holds for `search_exp` and `search_args`, whose placeholders are numbered after the filter's.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Params {
    pub limit: usize,
    pub offset: usize,
    pub select: String,
    pub sort: String,
    pub filter_exp: String,
    pub filter_args: Vec<Value>,
    pub search_exp: String,
    pub search_args: Vec<Value>,
}

impl Params {
    /// Filter and search combined with `AND`, along with all their arguments.
    pub fn condition(&self) -> (String, Vec<Value>) {
        let mut args = self.filter_args.clone();
        args.extend(self.search_args.iter().cloned());
        let exp = match (self.filter_exp.is_empty(), self.search_exp.is_empty()) {
            (_, true) => self.filter_exp.clone(),
            (true, false) => self.search_exp.clone(),
            (false, false) => format!("({}) AND ({})", self.filter_exp, self.search_exp),
        };
        (exp, args)
    }
}
