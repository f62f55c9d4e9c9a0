use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, DeriveInput, Generics};

use crate::description::{Kind, QueryableDescription};

pub fn derive_queryable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let description = match QueryableDescription::parse(&input) {
        Ok(description) => description,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = description.name();
    let generics = bounded(description.generics());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match description.kind() {
        Kind::Newtype(inner) => quote! { <#inner as ::rql::Queryable>::shape() },
        Kind::Record(fields) => {
            let descriptors = fields.iter().map(|field| {
                let field_name = &field.name;
                let ty = &field.ty;
                let tags = field.tags.iter().map(|(key, options)| quote! { .tag(#key, #options) });
                let embedded = field.embedded.then(|| quote! { .embedded() });
                quote! {
                    ::rql::FieldDescriptor::new(#field_name, <#ty as ::rql::Queryable>::shape()) #(#tags)* #embedded
                }
            });
            // Fields are listed lazily so a model may refer to itself.
            quote! {
                ::rql::Shape::Record(::rql::Record::new(::std::any::type_name::<Self>(), || ::std::vec![#(#descriptors),*]))
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics ::rql::Queryable for #name #ty_generics #where_clause {
            fn shape() -> ::rql::Shape { #body }
        }
    };
    expanded.into()
}

/// Every type parameter has to be queryable itself.
fn bounded(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<_> = generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote! { #param: ::rql::Queryable });
    }
    generics
}
