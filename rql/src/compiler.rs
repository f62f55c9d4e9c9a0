//! Turns filter documents, search queries and sort lists into SQL fragments.
//!
//! Expressions are appended to a single buffer while the document is walked, and every operand is
//! pushed to the argument list at the moment its placeholder is written, so the two always line up.

use std::borrow::Cow;

use serde_json::{Map, Value as JsonValue};

use crate::config::Config;
use crate::dialect::Direction;
use crate::error::{ParseError, ValueError};
use crate::field::Field;
use crate::operator::Operator;
use crate::schema::Schema;
use crate::value::Value;

/// SQL text and the arguments for its placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledExpression {
    pub sql: String,
    pub args: Vec<Value>,
}

pub struct Compiler<'a> {
    config: &'a Config,
    schema: &'a Schema,
    out: CompiledExpression,
    arg_offset: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(config: &'a Config, schema: &'a Schema) -> Self { Self { config, schema, out: CompiledExpression::default(), arg_offset: 0 } }

    /// Number placeholders as if `count` arguments were already bound.
    pub fn after(mut self, count: usize) -> Self {
        self.arg_offset = count;
        self
    }

    /// Compile a filter document. An empty document gives an empty expression.
    pub fn filter(mut self, document: &Map<String, JsonValue>) -> Result<CompiledExpression, ParseError> {
        self.and(document)?;
        Ok(self.out)
    }

    /// Case-insensitive substring match of `query` against every searchable field, joined with `OR`.
    pub fn search(mut self, query: &str) -> Result<CompiledExpression, ParseError> {
        if query.is_empty() {
            return Ok(self.out);
        }
        let schema = self.schema;
        let mut fields = schema.searchable().peekable();
        if fields.peek().is_none() {
            return Err(ParseError::NoSearchableFields);
        }
        for (i, field) in fields.enumerate() {
            if i > 0 {
                self.out.sql.push_str(" OR ");
            }
            let placeholder = self.config.dialect.placeholder(self.next_index());
            self.out.sql.push_str(&format!("LOWER({}) LIKE LOWER('%' || {} || '%')", field.column, placeholder));
            self.out.args.push(Value::String(query.to_owned()));
        }
        Ok(self.out)
    }

    fn next_index(&self) -> usize { self.arg_offset + self.out.args.len() }

    fn and(&mut self, document: &Map<String, JsonValue>) -> Result<(), ParseError> {
        let or = self.config.op(&Operator::Or);
        let and = self.config.op(&Operator::And);
        for (i, (key, value)) in document.iter().enumerate() {
            if i > 0 {
                self.out.sql.push_str(" AND ");
            }
            if *key == or {
                self.group(key, &Operator::Or, value)?;
            } else if *key == and {
                self.group(key, &Operator::And, value)?;
            } else {
                let schema = self.schema;
                match schema.get(key) {
                    Some(field) if field.filterable => self.field(field, value)?,
                    Some(_) => return Err(ParseError::NotFilterable(key.clone())),
                    None => return Err(ParseError::UnrecognizedFilterKey(key.clone())),
                }
            }
        }
        Ok(())
    }

    /// `$or` / `$and` over an array of documents. Parenthesized when it has more than one term.
    fn group(&mut self, key: &str, op: &Operator, value: &JsonValue) -> Result<(), ParseError> {
        let terms = match value.as_array() {
            Some(terms) if !terms.is_empty() => terms,
            _ => return Err(ParseError::ExpectedArray(key.to_owned())),
        };
        let keyword = self.config.operators.keyword(op);
        let wrap = terms.len() > 1;
        if wrap {
            self.out.sql.push('(');
        }
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                self.out.sql.push_str(&format!(" {keyword} "));
            }
            match term.as_object() {
                Some(document) if !document.is_empty() => self.and(document)?,
                _ => return Err(ParseError::ExpectedObject(key.to_owned())),
            }
        }
        if wrap {
            self.out.sql.push(')');
        }
        Ok(())
    }

    /// A bare value is shorthand for `$eq`; an object maps operators to operands.
    fn field(&mut self, field: &Field, value: &JsonValue) -> Result<(), ParseError> {
        let Some(ops) = value.as_object() else {
            if !field.supports(&Operator::Eq) {
                return Err(ParseError::UnsupportedOp { op: self.config.op(&Operator::Eq), field: field.name.clone() });
            }
            return self.predicate(field, &Operator::Eq, value);
        };
        if ops.is_empty() {
            return Err(ParseError::EmptyOperatorObject(field.name.clone()));
        }

        let wrap = ops.len() > 1;
        if wrap {
            self.out.sql.push('(');
        }
        for (i, (key, operand)) in ops.iter().enumerate() {
            if i > 0 {
                self.out.sql.push_str(" AND ");
            }
            let op = key.strip_prefix(self.config.op_prefix.as_str()).map(Operator::from_name);
            match op {
                Some(op) if field.supports(&op) => self.predicate(field, &op, operand)?,
                _ => return Err(ParseError::UnsupportedOp { op: key.clone(), field: field.name.clone() }),
            }
        }
        if wrap {
            self.out.sql.push(')');
        }
        Ok(())
    }

    fn predicate(&mut self, field: &Field, op: &Operator, raw: &JsonValue) -> Result<(), ParseError> {
        let raw = match &self.config.value_fn {
            Some(value_fn) => Cow::Owned(value_fn(&field.name, raw)),
            None => Cow::Borrowed(raw),
        };
        let invalid = |source: ValueError| ParseError::InvalidValue { field: field.name.clone(), source };
        field.validate(op, &raw).map_err(invalid)?;
        let value = field.convert(op, &raw).map_err(invalid)?;

        let rendering = self.config.operators.render(op, &field.meta);
        let first = self.next_index();
        match value {
            Value::List(items) if rendering.expand => {
                let sql = self.config.dialect.format_op(&field.column, &rendering, first, items.len());
                self.out.sql.push_str(&sql);
                self.out.args.extend(items);
            }
            value => {
                let sql = self.config.dialect.format_op(&field.column, &rendering, first, 1);
                self.out.sql.push_str(&sql);
                self.out.args.push(value);
            }
        }
        Ok(())
    }
}

/// Build an `ORDER BY` list. Each entry is a field name, optionally prefixed with `+` or `-`.
pub fn sort(config: &Config, schema: &Schema, fields: &[String]) -> Result<String, ParseError> {
    let mut terms = Vec::with_capacity(fields.len());
    for entry in fields {
        let mut chars = entry.chars();
        let (direction, name) = match chars.next().and_then(Direction::from_prefix) {
            Some(direction) => (Some(direction), chars.as_str()),
            None => (None, entry.as_str()),
        };
        if name.is_empty() {
            return Err(ParseError::EmptySortField);
        }
        let field = schema.get(name).ok_or_else(|| ParseError::UnrecognizedSortKey(name.to_owned()))?;
        if !field.sortable {
            return Err(ParseError::NotSortable(name.to_owned()));
        }
        terms.push(match direction {
            Some(direction) => format!("{} {}", field.column, config.dialect.direction(direction)),
            None => field.column.clone(),
        });
    }
    Ok(terms.join(", "))
}

pub fn select(fields: &[String]) -> String { fields.join(", ") }
