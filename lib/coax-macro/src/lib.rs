//! Procedural macros for coax response models.
//!
//! This crate provides `#[derive(Model)]`, which implements `coax::Model` for
//! structs with named fields by reading each field through its default
//! transform (or an explicit one).
//!
//! # Example
//!
//! ```ignore
//! use coax::prelude::*;
//!
//! #[derive(Model)]
//! #[model(rename_all = "camelCase")]
//! pub struct Post {
//!     id: i64,
//!     title: Option<String>,
//!     #[model(with = PictureList)]
//!     cover_images: Vec<Url>,
//!     #[model(nested)]
//!     author: Option<User>,
//! }
//! ```

mod model_derive;

use proc_macro::TokenStream;

/// Derive `Model` for a struct with named fields.
///
/// Each field is read from the JSON key of the same name. `Option<T>` fields
/// are optional; any other field is required, and construction fails if it is
/// absent or cannot be decoded. `Vec<T>` fields collect the elements that
/// decode and are never required.
///
/// # Struct Attributes
///
/// - `#[model(rename_all = "...")]` - Rename all keys using a case convention
/// - `#[model(crate = "path")]` - Path of the crate exposing `Model` (default `::coax`)
///
/// Supported case conventions:
/// - `lowercase`, `UPPERCASE`
/// - `camelCase`, `PascalCase`
/// - `snake_case`, `SCREAMING_SNAKE_CASE`
/// - `kebab-case`, `SCREAMING-KEBAB-CASE`
///
/// # Field Attributes
///
/// - `#[model(rename = "key")]` - Read from another key (overrides `rename_all`)
/// - `#[model(with = Transform)]` - Use a transform built with `FromConfig`
/// - `#[model(nested)]` - The field (or its elements) is itself a `Model`
/// - `#[model(default)]` - Fall back to `Default::default()` instead of failing
/// - `#[model(skip)]` - Not read nor written; always `Default::default()`
///
/// # Example
///
/// ```ignore
/// #[derive(Model)]
/// struct User {
///     #[model(rename = "userId")]
///     id: u64,
///     #[model(with = PictureUrl)]
///     avatar: Option<Url>,
///     #[model(default)]
///     active: bool,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model_derive::expand_model_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
