//! The field table of a model and the builder that derives it.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::column::column;
use crate::config::{Config, DEFAULT_FIELD_SEPARATOR};
use crate::error::SchemaError;
use crate::field::{Field, FieldMeta};
use crate::layout::Layout;
use crate::model::{FieldDescriptor, Record, Shape, TypeTag};

/// Queryable fields of a model, in breadth-first declaration order. Built once and then only read.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    columns: HashSet<String>,
}

impl Schema {
    pub fn get(&self, name: &str) -> Option<&Field> { self.index.get(name).map(|&i| &self.fields[i]) }

    pub fn fields(&self) -> &[Field] { &self.fields }

    pub fn iter(&self) -> impl Iterator<Item = &Field> { self.fields.iter() }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn searchable(&self) -> impl Iterator<Item = &Field> { self.fields.iter().filter(|f| f.searchable) }

    /// Both the key and the column of a field have to be unique.
    fn insert(&mut self, field: Field) -> Result<(), SchemaError> {
        if self.index.contains_key(&field.name) || self.columns.contains(&field.column) {
            return Err(SchemaError::DuplicateField(field.name.clone()));
        }
        self.columns.insert(field.column.clone());
        self.index.insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }
}

/// A record waiting to be scanned, with the raw name its sub-fields are prefixed with and the chain
/// of records it was reached through.
struct Pending {
    prefix: Option<String>,
    record: Record,
    ancestry: Vec<&'static str>,
}

pub struct SchemaBuilder<'a> {
    config: &'a Config,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(config: &'a Config) -> Self { Self { config } }

    pub fn build(&self) -> Result<Schema, SchemaError> {
        let record = match &self.config.model {
            None => return Err(SchemaError::MissingModel),
            Some(Shape::Record(record)) => *record,
            Some(shape) => return Err(SchemaError::NotRecord(shape.type_name())),
        };

        let mut schema = Schema::default();
        let mut queue = VecDeque::from([Pending { prefix: None, record, ancestry: vec![record.name()] }]);
        while let Some(pending) = queue.pop_front() {
            for descriptor in pending.record.fields() {
                let name = match &pending.prefix {
                    Some(prefix) => format!("{}{}{}", prefix, self.config.field_separator, descriptor.name),
                    None => descriptor.name.clone(),
                };

                // a tagged field is resolved whatever its type
                if let Some(options) = descriptor.lookup(&self.config.tag_name) {
                    schema.insert(self.parse_field(&name, &descriptor, options)?)?;
                    continue;
                }

                match &descriptor.shape {
                    Shape::Record(nested) => {
                        if pending.ancestry.contains(&nested.name()) {
                            return Err(SchemaError::RecursiveModel { field: name, model: nested.name().to_owned() });
                        }
                        let mut ancestry = pending.ancestry.clone();
                        ancestry.push(nested.name());
                        let prefix = if descriptor.embedded { pending.prefix.clone() } else { Some(name) };
                        queue.push_back(Pending { prefix, record: *nested, ancestry });
                    }
                    Shape::Scalar(_) if descriptor.embedded => {
                        tracing::warn!("ignore embedded field {:?} that is not a record type", descriptor.name);
                    }
                    Shape::Scalar(_) => {}
                }
            }
        }
        Ok(schema)
    }

    fn parse_field(&self, raw_name: &str, descriptor: &FieldDescriptor, options: &str) -> Result<Field, SchemaError> {
        let type_tag = match &descriptor.shape {
            Shape::Scalar(tag) => tag.clone(),
            Shape::Record(record) => {
                return Err(SchemaError::UnsupportedType { field: raw_name.to_owned(), type_name: record.name().to_owned() });
            }
        };

        let mut name = column(raw_name);
        let mut column_override = None;
        let mut meta = FieldMeta::new(name.clone(), type_tag);
        let mut layout = None;
        for option in options.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            match option {
                "sort" => meta.sortable = true,
                "filter" => meta.filterable = true,
                "search" => meta.searchable = true,
                _ => {
                    if let Some(column) = option.strip_prefix("column=") {
                        name = column.trim().to_owned();
                        column_override = Some(name.clone());
                    } else if let Some(layout_name) = option.strip_prefix("layout=") {
                        layout = Some(Layout::parse(layout_name.trim())?);
                    } else {
                        tracing::warn!("ignoring unknown option {:?} in tag of field {:?}", option, raw_name);
                    }
                }
            }
        }

        // an explicit column is used as is, everything else goes through column_fn
        meta.column = match column_override {
            Some(column) => self.normalize(&column),
            None => self.config.column_name(&self.normalize(raw_name)),
        };
        meta.name = name;

        if matches!(meta.type_tag.base(), TypeTag::Time) {
            meta.layout = Some(layout.unwrap_or_default());
        }
        if meta.searchable && !matches!(meta.type_tag.base(), TypeTag::String) {
            return Err(SchemaError::NotSearchable { field: meta.name, type_name: meta.type_tag.to_string() });
        }

        let resolver = &self.config.resolver;
        let operators = resolver.operators(&meta);
        if operators.is_empty() {
            return Err(SchemaError::UnsupportedType { field: raw_name.to_owned(), type_name: meta.type_tag.to_string() });
        }
        if meta.filterable {
            meta.operators.extend(operators);
        }

        tracing::debug!(
            "field {:?} (column {:?}, <{}>): sort={} filter={} search={}",
            meta.name,
            meta.column,
            meta.type_tag,
            meta.sortable,
            meta.filterable,
            meta.searchable
        );
        Ok(Field { validate: resolver.validator(&meta), convert: resolver.converter(&meta), meta })
    }

    /// Replace a custom field separator with `_`.
    fn normalize(&self, name: &str) -> String {
        match self.config.field_separator.as_str() {
            DEFAULT_FIELD_SEPARATOR => name.to_owned(),
            separator => name.replace(separator, DEFAULT_FIELD_SEPARATOR),
        }
    }
}
