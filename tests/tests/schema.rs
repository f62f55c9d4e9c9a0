
use std::collections::HashMap;

use anyhow::Result;
use common::*;
use rql::{Config, IntWidth, Layout, Operator, Parser, Queryable, SchemaError, Shape, TypeTag};

#[test]
fn test_derived_schema() -> Result<()> {
    let parser = user_parser()?;
    let names: Vec<&str> = parser.schema().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "name",
            "age",
            "admin",
            "score",
            "bio",
            "created_at",
            "birthday",
            "uuid",
            "address_name",
            "address_zip",
            "updated_by",
            "updated_at"
        ]
    );

    let schema = parser.schema();
    assert_eq!(schema.get("age").map(|f| f.type_tag.clone()), Some(TypeTag::Int(IntWidth::W32)));
    assert_eq!(schema.get("score").map(|f| f.type_tag.to_string()), Some("nullable<float>".to_owned()));
    assert_eq!(schema.get("birthday").and_then(|f| f.layout.clone()), Some(Layout::Pattern("%Y-%m-%d".to_owned())));
    assert_eq!(schema.get("created_at").and_then(|f| f.layout.clone()), Some(Layout::Rfc3339));

    let bio = schema.get("bio").expect("bio");
    assert!(bio.searchable && !bio.filterable && bio.operators.is_empty());
    let admin = schema.get("admin").expect("admin");
    assert!(admin.supports(&Operator::Neq) && !admin.supports(&Operator::Lt));
    Ok(())
}

#[derive(Queryable)]
pub struct Node {
    #[rql(filter)]
    pub value: i32,
    pub next: Option<Box<Node>>,
}

#[test]
fn test_recursive_model() {
    let err = Parser::for_model::<Node>().unwrap_err();
    assert!(matches!(err, SchemaError::RecursiveModel { ref field, .. } if field == "next"));
}

#[derive(Queryable)]
pub struct Tagged {
    #[rql(filter)]
    pub labels: HashMap<String, String>,
}

#[test]
fn test_unsupported_type() {
    let err = Parser::for_model::<Tagged>().unwrap_err();
    assert_eq!(err.to_string(), r#"field type for "labels" is not supported (<map>)"#);
}

#[derive(Queryable)]
pub struct Renamed {
    #[rql(filter, column = "name")]
    pub full_name: String,
    #[rql(filter)]
    pub name: String,
}

#[test]
fn test_duplicate_names() {
    assert!(matches!(Parser::for_model::<Renamed>(), Err(SchemaError::DuplicateField(ref name)) if name == "name"));
}

#[derive(Queryable)]
pub struct Layouts {
    #[rql(filter, layout = "%d/%m/%Y %H:%M")]
    pub at: chrono::NaiveDateTime,
}

#[test]
fn test_custom_layout() -> Result<()> {
    let parser = Parser::for_model::<Layouts>()?;
    let params = parse(&parser, serde_json::json!({"filter": {"at": {"$gt": "17/05/1990 10:30"}}}))?;
    let [rql::Value::Time(at)] = params.filter_args.as_slice() else { panic!("expected one time argument") };
    assert_eq!(at.to_rfc3339(), "1990-05-17T10:30:00+00:00");
    Ok(())
}

#[derive(Queryable)]
pub struct BadLayout {
    #[rql(filter, layout = "%d/%m/%Y %K")]
    pub at: chrono::NaiveDateTime,
}

#[test]
fn test_bad_layout() {
    assert!(matches!(Parser::for_model::<BadLayout>(), Err(SchemaError::InvalidLayout { .. })));
}

#[derive(Queryable)]
pub struct Email(pub String);

#[derive(Queryable)]
pub struct Contact {
    #[rql(filter, sort)]
    pub email: Email,
    #[tag(api = "filter")]
    #[rql(sort)]
    pub rank: u16,
}

#[test]
fn test_newtype_and_tag_names() -> Result<()> {
    assert!(matches!(shape_of::<Email>(), Shape::Scalar(TypeTag::String)));

    let parser = Parser::for_model::<Contact>()?;
    assert!(parser.schema().get("email").expect("email").supports(&Operator::Like));
    assert!(!parser.schema().get("rank").expect("rank").filterable);

    let parser = Parser::new(Config { tag_name: "api".to_owned(), ..Config::for_model::<Contact>() })?;
    assert_eq!(parser.schema().len(), 1);
    assert!(parser.schema().get("rank").expect("rank").filterable);
    Ok(())
}

#[test]
fn test_construction_errors() {
    assert!(matches!(Parser::new(Config::default()), Err(SchemaError::MissingModel)));
    assert!(matches!(Parser::new(Config { model: Some(shape_of::<i64>()), ..Config::default() }), Err(SchemaError::NotRecord(_))));
    assert!(matches!(
        Parser::new(Config { max_limit: 10, default_limit: 20, ..Config::for_model::<User>() }),
        Err(SchemaError::InvalidConfig(_))
    ));
}

#[derive(Queryable)]
pub struct Page<T> {
    #[rql(filter, sort)]
    pub inner: T,
    #[rql(filter)]
    pub page: u32,
}

#[test]
fn test_generic_model() -> Result<()> {
    let parser = Parser::for_model::<Page<String>>()?;
    assert_eq!(parser.schema().get("inner").map(|f| f.type_tag.clone()), Some(TypeTag::String));
    let parser = Parser::for_model::<Page<i64>>()?;
    assert!(!parser.schema().get("inner").expect("inner").supports(&Operator::Like));
    Ok(())
}
