mod description;
mod queryable;

use proc_macro::TokenStream;

/// Derive `rql::Queryable` for a struct.
///
/// Field attributes:
/// - `#[rql(filter, sort, search, column = "name", layout = "DateOnly")]` marks a field as queryable.
/// - `#[rql = "filter,sort"]` gives the same options as a raw string.
/// - `#[rql(flatten)]` promotes the fields of a nested record without a name prefix.
/// - `#[rql(skip)]` leaves the field out of the model.
/// - `#[tag(api = "filter")]` attaches options under another tag name, for parsers configured with
///   a different `tag_name`.
///
/// A newtype tuple struct takes the shape of its inner type.
#[proc_macro_derive(Queryable, attributes(rql, tag))]
pub fn derive_queryable(input: TokenStream) -> TokenStream { queryable::derive_queryable_impl(input) }
