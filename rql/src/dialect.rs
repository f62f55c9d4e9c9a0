//! Placeholder and sort-direction syntax of the target SQL engine.

use std::borrow::Cow;
use std::fmt;

use crate::operator::Rendering;

/// Sort direction, written as a `+` or `-` prefix on a sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            '+' => Some(Direction::Asc),
            '-' => Some(Direction::Desc),
            _ => None,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

pub trait Dialect: Send + Sync + fmt::Debug {
    /// Placeholder for the argument at zero-based position `index` of the argument list.
    fn placeholder(&self, index: usize) -> Cow<'static, str>;

    fn direction(&self, direction: Direction) -> &'static str { direction.sql() }

    /// Render `column <op> <placeholders>` for `arity` arguments starting at `first_arg`.
    fn format_op(&self, column: &str, rendering: &Rendering, first_arg: usize, arity: usize) -> String {
        let arg = match arity {
            1 => self.placeholder(first_arg).into_owned(),
            _ => (first_arg..first_arg + arity).map(|index| self.placeholder(index)).collect::<Vec<_>>().join(", "),
        };
        rendering.template.render(column, &rendering.sql, &arg)
    }
}

/// Unordered `?` placeholders, as used by SQLite and MySQL drivers.
#[derive(Debug, Default, Clone, Copy)]
pub struct Generic;

impl Dialect for Generic {
    fn placeholder(&self, _index: usize) -> Cow<'static, str> { Cow::Borrowed("?") }
}

/// Ordinal `$N` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct Postgres;

impl Dialect for Postgres {
    fn placeholder(&self, index: usize) -> Cow<'static, str> { Cow::Owned(format!("${}", index + 1)) }
}
