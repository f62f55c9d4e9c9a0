
use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::*;
use rql::{Config, ParseError, Parser, Query, Value};
use serde_json::json;

#[test]
fn test_limit_and_offset() -> Result<()> {
    let parser = user_parser()?;
    let params = parse(&parser, json!({"limit": 10, "offset": 40}))?;
    assert_eq!((params.limit, params.offset), (10, 40));

    assert_eq!(parse(&parser, json!({"limit": 0}))?.limit, 25);
    assert_eq!(parse(&parser, json!({"limit": 100}))?.limit, 100);

    let err = parse(&parser, json!({"limit": 101})).unwrap_err();
    assert_eq!(err.to_string(), "limit must be greater than 0 and less than or equal to 100, got 101");
    let err = parse(&parser, json!({"offset": -1})).unwrap_err();
    assert_eq!(err.to_string(), "offset must be greater than or equal to 0, got -1");
    assert!(matches!(parse(&parser, json!({"limit": -5})), Err(ParseError::InvalidLimit { .. })));
    Ok(())
}

#[test]
fn test_configured_limits() -> Result<()> {
    let parser = Parser::new(Config { default_limit: 5, max_limit: 10, ..Config::for_model::<User>() })?;
    assert_eq!(parse(&parser, json!({}))?.limit, 5);
    assert!(parse(&parser, json!({"limit": 11})).is_err());
    Ok(())
}

#[test]
fn test_decode_errors() -> Result<()> {
    let parser = user_parser()?;
    assert!(matches!(parser.parse(b"not json"), Err(ParseError::Decode(_))));
    assert!(matches!(parser.parse(br#"{"filters": {}}"#), Err(ParseError::Decode(_))));
    assert!(matches!(parser.parse(br#"{"sort": "name"}"#), Err(ParseError::Decode(_))));
    Ok(())
}

#[test]
fn test_parse_query_struct() -> Result<()> {
    let parser = user_parser()?;
    let query = Query {
        limit: 3,
        sort: vec!["-id".to_owned()],
        filter: json!({"admin": true}).as_object().cloned().unwrap_or_default(),
        ..Query::default()
    };
    let params = parser.parse_query(&query)?;
    assert_eq!(params.filter_exp, "admin = ?");
    assert_eq!(params.filter_args, vec![Value::Bool(true)]);
    assert_eq!(params.sort, "id desc");
    assert_eq!(params.limit, 3);
    Ok(())
}

#[test]
fn test_base64_query_string() -> Result<()> {
    let parser = user_parser()?;
    let encoded = STANDARD.encode(json!({"filter": {"name": {"$like": "a%"}}, "sort": ["-age"]}).to_string());
    let params = parser.parse_base64(&encoded)?;
    assert_eq!(params.filter_exp, "name LIKE ?");
    assert_eq!(params.sort, "age desc");
    assert!(matches!(parser.parse_base64("**"), Err(ParseError::Base64(_))));
    Ok(())
}

#[test]
fn test_params_serialize() -> Result<()> {
    let parser = user_parser()?;
    let params = parse(&parser, json!({"filter": {"id": {"$in": [1, 2]}}, "limit": 2}))?;
    let value = serde_json::to_value(&params)?;
    assert_eq!(value["filter_exp"], json!("id IN (?, ?)"));
    assert_eq!(value["filter_args"], json!([1, 2]));
    assert_eq!(value["limit"], json!(2));
    Ok(())
}
