use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Expr, ExprLit, Fields, Generics, Ident, Lit, LitStr, Meta, Type};

/// Tag key used for `#[rql(...)]` options.
pub const RQL_TAG: &str = "rql";

/// Everything the derive needs to know about the input type.
pub struct QueryableDescription {
    name: Ident,
    generics: Generics,
    kind: Kind,
}

pub enum Kind {
    Record(Vec<FieldDescription>),
    /// `struct Email(String)`
    Newtype(Type),
}

pub struct FieldDescription {
    pub name: String,
    pub ty: Type,
    pub tags: Vec<(String, String)>,
    pub embedded: bool,
}

impl QueryableDescription {
    pub fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let name = input.ident.clone();
        let kind = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(fields) => {
                    let mut described = Vec::with_capacity(fields.named.len());
                    for field in &fields.named {
                        if let Some(field) = FieldDescription::parse(field)? {
                            described.push(field);
                        }
                    }
                    Kind::Record(described)
                }
                Fields::Unnamed(fields) if fields.unnamed.len() == 1 => Kind::Newtype(fields.unnamed[0].ty.clone()),
                fields => return Err(syn::Error::new_spanned(fields, "Only structs with named fields or a single unnamed field are supported")),
            },
            _ => return Err(syn::Error::new_spanned(&name, "Only structs are supported")),
        };
        Ok(Self { name, generics: input.generics.clone(), kind })
    }

    pub fn name(&self) -> &Ident { &self.name }
    pub fn generics(&self) -> &Generics { &self.generics }
    pub fn kind(&self) -> &Kind { &self.kind }
}

impl FieldDescription {
    /// `None` for fields marked `#[rql(skip)]`.
    fn parse(field: &syn::Field) -> syn::Result<Option<Self>> {
        let Some(ident) = &field.ident else { return Err(syn::Error::new_spanned(field, "expected a named field")) };

        let mut options: Vec<String> = Vec::new();
        let mut tagged = false;
        let mut embedded = false;
        let mut skip = false;
        let mut tags = Vec::new();

        for attr in &field.attrs {
            if attr.path().is_ident(RQL_TAG) {
                match &attr.meta {
                    Meta::Path(_) => tagged = true,
                    Meta::NameValue(nv) => {
                        let Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) = &nv.value else {
                            return Err(syn::Error::new_spanned(&nv.value, "expected a string literal, as in #[rql = \"filter,sort\"]"));
                        };
                        tagged = true;
                        options.push(value.value());
                    }
                    Meta::List(_) => attr.parse_nested_meta(|meta| {
                        let Some(option) = meta.path.get_ident().map(|i| i.to_string()) else {
                            return Err(meta.error("expected an option name"));
                        };
                        match option.as_str() {
                            "filter" | "sort" | "search" => {
                                tagged = true;
                                options.push(option);
                            }
                            "column" | "layout" => {
                                let value: LitStr = meta.value()?.parse()?;
                                tagged = true;
                                options.push(format!("{}={}", option, value.value()));
                            }
                            "flatten" => embedded = true,
                            "skip" => skip = true,
                            other => return Err(meta.error(format!("unknown rql option `{}`", other))),
                        }
                        Ok(())
                    })?,
                }
            } else if attr.path().is_ident("tag") {
                attr.parse_nested_meta(|meta| {
                    let Some(key) = meta.path.get_ident().map(|i| i.to_string()) else {
                        return Err(meta.error("expected a tag name"));
                    };
                    let value: LitStr = meta.value()?.parse()?;
                    tags.push((key, value.value()));
                    Ok(())
                })?;
            }
        }

        if skip {
            return Ok(None);
        }
        if embedded && tagged {
            return Err(syn::Error::new_spanned(ident, "flatten can not be combined with filter, sort or search options"));
        }
        if tagged {
            tags.insert(0, (RQL_TAG.to_owned(), options.join(",")));
        }
        Ok(Some(Self { name: ident.unraw().to_string(), ty: field.ty.clone(), tags, embedded }))
    }
}
