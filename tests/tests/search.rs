
use std::sync::Arc;

use anyhow::Result;
use common::*;
use rql::{Config, ParseError, Parser, Postgres, Queryable, Value};
use serde_json::json;

#[test]
fn test_search_all_searchable_fields() -> Result<()> {
    let parser = user_parser()?;
    let params = parse(&parser, json!({"search": {"query": "Bob"}}))?;
    assert_eq!(params.search_exp, "LOWER(name) LIKE LOWER('%' || ? || '%') OR LOWER(bio) LIKE LOWER('%' || ? || '%')");
    assert_eq!(params.search_args, vec![Value::from("Bob"), Value::from("Bob")]);
    assert_eq!(params.filter_exp, "");
    Ok(())
}

#[test]
fn test_search_numbers_after_filter() -> Result<()> {
    let parser = Parser::new(Config { dialect: Arc::new(Postgres), ..Config::for_model::<User>() })?;
    let params = parse(&parser, json!({"filter": {"age": {"$gt": 20}, "admin": true}, "search": {"query": "ann"}}))?;
    assert_eq!(params.filter_exp, "age > $1 AND admin = $2");
    assert_eq!(params.search_exp, "LOWER(name) LIKE LOWER('%' || $3 || '%') OR LOWER(bio) LIKE LOWER('%' || $4 || '%')");

    let (condition, args) = params.condition();
    assert_eq!(condition, format!("({}) AND ({})", params.filter_exp, params.search_exp));
    assert_eq!(args.len(), 4);
    Ok(())
}

#[test]
fn test_empty_search() -> Result<()> {
    let parser = user_parser()?;
    let params = parse(&parser, json!({"search": {"query": ""}}))?;
    assert_eq!(params.search_exp, "");
    assert!(params.search_args.is_empty());
    let params = parse(&parser, json!({"search": {}}))?;
    assert_eq!(params.search_exp, "");
    Ok(())
}

#[derive(Queryable)]
pub struct Counter {
    #[rql(filter)]
    pub hits: i64,
}

#[test]
fn test_search_without_searchable_fields() -> Result<()> {
    let parser = Parser::for_model::<Counter>()?;
    assert!(matches!(parse(&parser, json!({"search": {"query": "x"}})), Err(ParseError::NoSearchableFields)));
    assert_eq!(parse(&parser, json!({"search": {"query": ""}}))?.search_exp, "");
    Ok(())
}
