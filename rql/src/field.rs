//! Per-field metadata and the validate/convert functions attached to it.

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;

use serde_json::Value as JsonValue;

use crate::error::ValueError;
use crate::layout::Layout;
use crate::model::TypeTag;
use crate::operator::Operator;
use crate::value::Value;

/// Checks a raw operand before it is converted.
pub type Validator = fn(&Operator, &FieldMeta, &JsonValue) -> Result<(), ValueError>;
/// Turns a validated raw operand into the argument that gets bound.
pub type Converter = fn(&Operator, &FieldMeta, &JsonValue) -> Result<Value, ValueError>;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMeta {
    /// Key used for this field in filter and sort documents.
    pub name: String,
    /// Column name, with the field separator normalized to `_`.
    pub column: String,
    pub type_tag: TypeTag,
    /// Only set for time fields.
    pub layout: Option<Layout>,
    pub sortable: bool,
    pub filterable: bool,
    pub searchable: bool,
    /// Empty unless the field is filterable.
    pub operators: HashSet<Operator>,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            type_tag,
            layout: None,
            sortable: false,
            filterable: false,
            searchable: false,
            operators: HashSet::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        const DEFAULT: &Layout = &Layout::Rfc3339;
        self.layout.as_ref().unwrap_or(DEFAULT)
    }

    pub fn supports(&self, op: &Operator) -> bool { self.operators.contains(op) }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub meta: FieldMeta,
    pub validate: Option<Validator>,
    pub convert: Converter,
}

impl Field {
    pub fn validate(&self, op: &Operator, raw: &JsonValue) -> Result<(), ValueError> {
        match self.validate {
            Some(validate) => validate(op, &self.meta, raw),
            None => Ok(()),
        }
    }

    pub fn convert(&self, op: &Operator, raw: &JsonValue) -> Result<Value, ValueError> { (self.convert)(op, &self.meta, raw) }
}

impl Deref for Field {
    type Target = FieldMeta;
    fn deref(&self) -> &FieldMeta { &self.meta }
}

/// Decides, once per field, which operators it supports and how its operands are checked and
/// converted.
pub trait FieldTypeResolver: Send + Sync + fmt::Debug {
    fn operators(&self, meta: &FieldMeta) -> Vec<Operator>;
    fn validator(&self, meta: &FieldMeta) -> Option<Validator>;
    fn converter(&self, meta: &FieldMeta) -> Converter;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResolver;

impl FieldTypeResolver for DefaultResolver {
    fn operators(&self, meta: &FieldMeta) -> Vec<Operator> {
        use Operator::*;
        match meta.type_tag.base() {
            TypeTag::Bool => vec![Eq, Neq],
            TypeTag::String => vec![Eq, Neq, Lt, Lte, Gt, Gte, Like, In, Nin],
            TypeTag::Int(_) | TypeTag::UInt(_) | TypeTag::Float => vec![Eq, Neq, Lt, Lte, Gt, Gte, In, Nin],
            TypeTag::Time => vec![Eq, Neq, Lt, Lte, Gt, Gte],
            TypeTag::Uuid => vec![Eq, Neq, In, Nin],
            _ => Vec::new(),
        }
    }

    fn validator(&self, meta: &FieldMeta) -> Option<Validator> {
        Some(match meta.type_tag.base() {
            TypeTag::Bool => validate_bool,
            TypeTag::String => validate_string,
            TypeTag::Int(_) => validate_int,
            TypeTag::UInt(_) => validate_uint,
            TypeTag::Float => validate_float,
            TypeTag::Time => validate_time,
            TypeTag::Uuid => validate_uuid,
            _ => return None,
        })
    }

    fn converter(&self, meta: &FieldMeta) -> Converter {
        match meta.type_tag.base() {
            TypeTag::Int(_) | TypeTag::UInt(_) => convert_int,
            TypeTag::Float => convert_float,
            TypeTag::Time => convert_time,
            TypeTag::Uuid => convert_uuid,
            _ => convert_identity,
        }
    }
}

// --------------------------------------------------------
// Validators and converters.
//
// Multi-value operators (`in`, `nin`) take a non-empty array, and every element is checked or
// converted the way a single operand would be.

type Check = fn(&FieldMeta, &JsonValue) -> Result<(), ValueError>;
type Convert = fn(&FieldMeta, &JsonValue) -> Result<Value, ValueError>;

fn for_each(op: &Operator, meta: &FieldMeta, raw: &JsonValue, check: Check) -> Result<(), ValueError> {
    if !op.is_multi() {
        return check(meta, raw);
    }
    let items = raw.as_array().ok_or_else(|| ValueError::mismatch("array", raw))?;
    if items.is_empty() {
        return Err(ValueError::EmptyList);
    }
    for (index, item) in items.iter().enumerate() {
        check(meta, item).map_err(|source| ValueError::Element { index, source: Box::new(source) })?;
    }
    Ok(())
}

fn map_each(op: &Operator, meta: &FieldMeta, raw: &JsonValue, convert: Convert) -> Result<Value, ValueError> {
    if !op.is_multi() {
        return convert(meta, raw);
    }
    let items = raw.as_array().ok_or_else(|| ValueError::mismatch("array", raw))?;
    items.iter().map(|item| convert(meta, item)).collect::<Result<Vec<_>, _>>().map(Value::List)
}

pub fn validate_bool(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { for_each(op, meta, raw, check_bool) }

pub fn validate_string(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> {
    for_each(op, meta, raw, check_string)
}

pub fn validate_int(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { for_each(op, meta, raw, check_int) }

pub fn validate_uint(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { for_each(op, meta, raw, check_uint) }

pub fn validate_float(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> {
    for_each(op, meta, raw, check_float)
}

pub fn validate_time(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { for_each(op, meta, raw, check_time) }

pub fn validate_uuid(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { for_each(op, meta, raw, check_uuid) }

/// Converts JSON to the closest [`Value`] without looking at the field type.
pub fn convert_identity(_op: &Operator, _meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> { Ok(Value::from(raw.clone())) }

pub fn convert_int(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> { map_each(op, meta, raw, to_int) }

pub fn convert_float(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> { map_each(op, meta, raw, to_float) }

pub fn convert_time(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> { map_each(op, meta, raw, to_time) }

pub fn convert_uuid(op: &Operator, meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> { map_each(op, meta, raw, to_uuid) }

fn check_bool(_meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> {
    match raw {
        JsonValue::Bool(_) => Ok(()),
        other => Err(ValueError::mismatch("bool", other)),
    }
}

fn check_string(_meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> {
    match raw {
        JsonValue::String(_) => Ok(()),
        other => Err(ValueError::mismatch("string", other)),
    }
}

fn check_float(_meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> {
    match raw {
        JsonValue::Number(_) => Ok(()),
        other => Err(ValueError::mismatch("float64", other)),
    }
}

fn check_int(meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { integer(meta, raw).map(|_| ()) }

fn check_uint(meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { integer(meta, raw).map(|_| ()) }

fn check_time(meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { to_time(meta, raw).map(|_| ()) }

fn check_uuid(meta: &FieldMeta, raw: &JsonValue) -> Result<(), ValueError> { to_uuid(meta, raw).map(|_| ()) }

/// Reads an integral JSON number and checks it against the width and signedness of the field.
/// `2.0` is accepted as `2`; `1.5` is not.
fn integer(meta: &FieldMeta, raw: &JsonValue) -> Result<i128, ValueError> {
    let JsonValue::Number(number) = raw else { return Err(ValueError::mismatch("int", raw)) };
    let n = if let Some(i) = number.as_i64() {
        i as i128
    } else if let Some(u) = number.as_u64() {
        u as i128
    } else {
        let f = number.as_f64().ok_or(ValueError::NotInteger)?;
        if !f.is_finite() || f.trunc() != f {
            return Err(ValueError::NotInteger);
        }
        if f.abs() >= 1e38 {
            return Err(ValueError::OutOfRange { value: f.to_string(), type_name: meta.type_tag.to_string() });
        }
        f as i128
    };

    let (min, max) = match meta.type_tag.base() {
        TypeTag::Int(width) => width.signed_bounds(),
        TypeTag::UInt(width) => {
            if n < 0 {
                return Err(ValueError::NotUnsigned);
            }
            (0, width.unsigned_max())
        }
        _ => (i64::MIN as i128, u64::MAX as i128),
    };
    if n < min || n > max {
        return Err(ValueError::OutOfRange { value: n.to_string(), type_name: meta.type_tag.to_string() });
    }
    Ok(n)
}

fn to_int(meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> {
    let n = integer(meta, raw)?;
    match i64::try_from(n) {
        Ok(i) => Ok(Value::Int(i)),
        Err(_) => u64::try_from(n)
            .map(Value::UInt)
            .map_err(|_| ValueError::OutOfRange { value: n.to_string(), type_name: meta.type_tag.to_string() }),
    }
}

fn to_float(_meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> {
    raw.as_f64().map(Value::Float).ok_or_else(|| ValueError::mismatch("float64", raw))
}

fn to_time(meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> {
    let JsonValue::String(s) = raw else { return Err(ValueError::mismatch("string", raw)) };
    Ok(Value::Time(meta.layout().parse_time(s)?))
}

fn to_uuid(_meta: &FieldMeta, raw: &JsonValue) -> Result<Value, ValueError> {
    let JsonValue::String(s) = raw else { return Err(ValueError::mismatch("string", raw)) };
    Ok(Value::Uuid(uuid::Uuid::parse_str(s)?))
}
