use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::field::FieldMeta;

/// A filter operator, named without the configured prefix (`eq` rather than `$eq`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,   // =
    Neq,  // <>
    Lt,   // <
    Lte,  // <=
    Gt,   // >
    Gte,  // >=
    Like, // LIKE
    In,   // IN (...)
    Nin,  // NOT IN (...)
    And,  // conjunction
    Or,   // disjunction
    Custom(String),
}

impl Operator {
    pub fn from_name(name: &str) -> Self {
        match name {
            "eq" => Operator::Eq,
            "neq" => Operator::Neq,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "like" => Operator::Like,
            "in" => Operator::In,
            "nin" => Operator::Nin,
            "and" => Operator::And,
            "or" => Operator::Or,
            other => Operator::Custom(other.to_owned()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Like => "like",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Custom(name) => name,
        }
    }

    /// The default SQL text for this operator. Custom operators render as their upper-cased name
    /// unless a catalog says otherwise.
    pub fn sql(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            Operator::Eq => "=",
            Operator::Neq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::Nin => "NOT IN",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Custom(name) => return Cow::Owned(name.to_uppercase()),
        })
    }

    /// Operators whose operand is a list of values rather than a single one.
    pub fn is_multi(&self) -> bool { matches!(self, Operator::In | Operator::Nin) }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Shape of a rendered predicate. `{column}`, `{op}` and `{arg}` are substituted; anything else is
/// copied verbatim, so `{column} = ANY({arg})` is a valid template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(Cow<'static, str>);

impl Template {
    pub const DEFAULT: Template = Template(Cow::Borrowed("{column} {op} {arg}"));
    pub const LIST: Template = Template(Cow::Borrowed("{column} {op} ({arg})"));

    pub fn new(template: impl Into<Cow<'static, str>>) -> Self { Self(template.into()) }

    pub fn render(&self, column: &str, op: &str, arg: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + column.len() + op.len() + arg.len());
        let mut rest: &str = &self.0;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let (text, consumed) = if tail.starts_with("{column}") {
                (column, "{column}".len())
            } else if tail.starts_with("{op}") {
                (op, "{op}".len())
            } else if tail.starts_with("{arg}") {
                (arg, "{arg}".len())
            } else {
                ("{", 1)
            };
            out.push_str(text);
            rest = &tail[consumed..];
        }
        out.push_str(rest);
        out
    }
}

impl Default for Template {
    fn default() -> Self { Self::DEFAULT }
}

/// How an operator is written for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub sql: Cow<'static, str>,
    pub template: Template,
    /// Bind each element of a list operand to its own placeholder instead of binding the list once.
    pub expand: bool,
}

impl Rendering {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self { Self { sql: sql.into(), template: Template::DEFAULT, expand: false } }

    pub fn template(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.template = Template::new(template);
        self
    }

    pub fn expand(mut self) -> Self {
        self.expand = true;
        self
    }
}

/// Maps operators to their SQL rendering.
pub trait OperatorCatalog: Send + Sync + fmt::Debug {
    fn render(&self, op: &Operator, field: &FieldMeta) -> Rendering;

    /// Keyword joining the terms of a `$and` / `$or` group.
    fn keyword(&self, op: &Operator) -> Cow<'static, str> { op.sql() }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCatalog;

impl OperatorCatalog for DefaultCatalog {
    fn render(&self, op: &Operator, _field: &FieldMeta) -> Rendering {
        let rendering = Rendering::new(op.sql());
        if op.is_multi() {
            Rendering { template: Template::LIST, ..rendering }.expand()
        } else {
            rendering
        }
    }
}

/// Per-operator overrides on top of [`DefaultCatalog`].
#[derive(Debug, Default, Clone)]
pub struct OperatorTable {
    overrides: HashMap<Operator, Rendering>,
}

impl OperatorTable {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, op: Operator, rendering: Rendering) -> Self {
        self.overrides.insert(op, rendering);
        self
    }
}

impl OperatorCatalog for OperatorTable {
    fn render(&self, op: &Operator, field: &FieldMeta) -> Rendering {
        match self.overrides.get(op) {
            Some(rendering) => rendering.clone(),
            None => DefaultCatalog.render(op, field),
        }
    }

    fn keyword(&self, op: &Operator) -> Cow<'static, str> {
        match self.overrides.get(op) {
            Some(rendering) => rendering.sql.clone(),
            None => op.sql(),
        }
    }
}
