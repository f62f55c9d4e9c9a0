use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::compiler::{self, Compiler};
use crate::config::Config;
use crate::error::{ParseError, SchemaError};
use crate::model::Queryable;
use crate::query::{Params, Query};
use crate::schema::{Schema, SchemaBuilder};

/// Parses requests against one model. Build it once per resource and share it; parsing only reads it.
#[derive(Debug)]
pub struct Parser {
    config: Config,
    schema: Schema,
    default_sort: String,
}

impl Parser {
    pub fn new(config: Config) -> Result<Self, SchemaError> {
        config.validate()?;
        let schema = SchemaBuilder::new(&config).build()?;
        let default_sort = compiler::sort(&config, &schema, &config.default_sort).map_err(SchemaError::DefaultSort)?;
        tracing::debug!("parser ready with {} fields", schema.len());
        Ok(Self { config, schema, default_sort })
    }

    pub fn for_model<T: Queryable>() -> Result<Self, SchemaError> { Self::new(Config::for_model::<T>()) }

    pub fn config(&self) -> &Config { &self.config }

    pub fn schema(&self) -> &Schema { &self.schema }

    /// Parse a JSON encoded query.
    pub fn parse(&self, buf: &[u8]) -> Result<Params, ParseError> {
        let query: Query = serde_json::from_slice(buf)?;
        self.parse_query(&query)
    }

    /// Parse a base64 encoded JSON query, as sent in a query string.
    pub fn parse_base64(&self, encoded: &str) -> Result<Params, ParseError> {
        let buf = STANDARD.decode(encoded.trim())?;
        self.parse(&buf)
    }

    pub fn parse_query(&self, query: &Query) -> Result<Params, ParseError> {
        if query.offset < 0 {
            return Err(ParseError::InvalidOffset(query.offset));
        }
        let limit = match query.limit {
            0 => self.config.default_limit,
            limit if limit < 0 || limit as u64 > self.config.max_limit as u64 => {
                return Err(ParseError::InvalidLimit { limit, max: self.config.max_limit })
            }
            limit => limit as usize,
        };

        let filter = Compiler::new(&self.config, &self.schema).filter(&query.filter)?;
        let search = match &query.search {
            Some(search) => Compiler::new(&self.config, &self.schema).after(filter.args.len()).search(&search.query)?,
            None => Default::default(),
        };
        let sort = match query.sort.is_empty() {
            true => self.default_sort.clone(),
            false => compiler::sort(&self.config, &self.schema, &query.sort)?,
        };

        tracing::debug!("filter: {:?} {:?}", filter.sql, filter.args);
        Ok(Params {
            limit,
            offset: query.offset as usize,
            select: compiler::select(&query.select),
            sort,
            filter_exp: filter.sql,
            filter_args: filter.args,
            search_exp: search.sql,
            search_args: search.args,
        })
    }
}
