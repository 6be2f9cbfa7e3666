//! Model derive macro implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Fields, GenericArgument, PathArguments, Type, parse_quote, parse2};

/// Struct-level options parsed from `#[model(...)]` attributes.
#[derive(Debug, Clone)]
struct ModelStructOptions {
    /// Rename all keys using the given case convention.
    rename_all: Option<RenameRule>,
    /// Path of the crate exposing `Model`.
    krate: syn::Path,
}

impl Default for ModelStructOptions {
    fn default() -> Self {
        Self {
            rename_all: None,
            krate: parse_quote!(::coax),
        }
    }
}

/// Case conversion rules for `rename_all`.
#[derive(Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
enum RenameRule {
    LowerCase,
    UpperCase,
    CamelCase,
    PascalCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    fn parse(s: &str) -> Option<Self> {
        let rule = match s {
            "lowercase" => Self::LowerCase,
            "UPPERCASE" => Self::UpperCase,
            "camelCase" => Self::CamelCase,
            "PascalCase" => Self::PascalCase,
            "snake_case" => Self::SnakeCase,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnakeCase,
            "kebab-case" => Self::KebabCase,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebabCase,
            _ => return None,
        };
        Some(rule)
    }

    /// Apply the rule to a `snake_case` field name.
    fn apply(self, name: &str) -> String {
        let words = name.split('_').filter(|word| !word.is_empty());
        match self {
            Self::LowerCase => name.replace('_', "").to_lowercase(),
            Self::UpperCase => name.replace('_', "").to_uppercase(),
            Self::SnakeCase => name.to_string(),
            Self::ScreamingSnakeCase => name.to_uppercase(),
            Self::KebabCase => name.replace('_', "-"),
            Self::ScreamingKebabCase => name.replace('_', "-").to_uppercase(),
            Self::PascalCase => words.map(capitalize).collect(),
            Self::CamelCase => words
                .enumerate()
                .map(|(i, word)| if i == 0 { word.to_string() } else { capitalize(word) })
                .collect(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Field options parsed from `#[model(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct ModelFieldOptions {
    /// Explicit JSON key.
    rename: Option<String>,
    /// Explicit transform type.
    with: Option<syn::Path>,
    /// The field holds nested models.
    nested: bool,
    /// Use `Default::default()` when a required field is missing.
    default: bool,
    /// Neither read nor written.
    skip: bool,
}

/// How a field's value relates to its JSON entry.
enum FieldShape<'a> {
    /// `Option<T>`: absent is fine.
    Optional(&'a Type),
    /// `Vec<T>`: collect the elements that decode.
    List(&'a Type),
    /// Anything else: required.
    Required,
}

impl<'a> FieldShape<'a> {
    fn of(ty: &'a Type) -> Self {
        if let Some(inner) = generic_argument(ty, "Option") {
            Self::Optional(inner)
        } else if let Some(inner) = generic_argument(ty, "Vec") {
            Self::List(inner)
        } else {
            Self::Required
        }
    }
}

/// Expand the `#[derive(Model)]` macro.
pub fn expand_model_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_options = parse_model_struct_options(&input.attrs)?;
    let krate = &struct_options.krate;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model derive only supports structs",
            ));
        }
    };

    let mut decoders = Vec::new();
    let mut encoders = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_model_field_options(&field.attrs)?;
        if options.nested && options.with.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "`nested` and `with` cannot be combined",
            ));
        }

        if options.skip {
            decoders.push(quote! { #field_name: ::std::default::Default::default() });
            continue;
        }

        let key = options.rename.clone().unwrap_or_else(|| {
            let raw_name = field_name.unraw().to_string();
            struct_options
                .rename_all
                .map_or_else(|| raw_name.clone(), |rule| rule.apply(&raw_name))
        });

        let decode = generate_field_decoder(krate, &field.ty, &key, &options);
        decoders.push(quote! { #field_name: #decode });

        let encode = generate_field_encoder(krate, field_name, &field.ty, &options);
        encoders.push(quote! {
            if let ::std::option::Option::Some(value) = #encode {
                map.insert(::std::string::String::from(#key), value);
            }
        });
    }

    Ok(quote! {
        impl #impl_generics #krate::Model for #name #ty_generics #where_clause {
            fn from_json(
                json: &#krate::serde_json::Value,
                config: &#krate::UrlConfig,
            ) -> ::std::option::Option<Self> {
                let _ = config;
                if !json.is_object() {
                    return ::std::option::Option::None;
                }
                ::std::option::Option::Some(Self {
                    #(#decoders,)*
                })
            }

            fn to_json(&self, config: &#krate::UrlConfig) -> #krate::serde_json::Value {
                let _ = config;
                let mut map = #krate::serde_json::Map::new();
                #(#encoders)*
                #krate::serde_json::Value::Object(map)
            }
        }
    })
}

/// Parse struct-level options from `#[model(...)]` attributes.
fn parse_model_struct_options(attrs: &[syn::Attribute]) -> syn::Result<ModelStructOptions> {
    let mut options = ModelStructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &value,
                        format!(
                            "unknown rename_all value: \"{}\". Expected one of: \
                             lowercase, UPPERCASE, camelCase, PascalCase, \
                             snake_case, SCREAMING_SNAKE_CASE, kebab-case, SCREAMING-KEBAB-CASE",
                            value.value()
                        ),
                    )
                })?;
                options.rename_all = Some(rule);
            } else if meta.path.is_ident("crate") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.krate = value.parse()?;
            } else {
                return Err(meta.error("unsupported model attribute"));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

/// Parse field options from `#[model(...)]` attributes.
fn parse_model_field_options(attrs: &[syn::Attribute]) -> syn::Result<ModelFieldOptions> {
    let mut options = ModelFieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
            } else if meta.path.is_ident("with") {
                options.with = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("nested") {
                options.nested = true;
            } else if meta.path.is_ident("default") {
                options.default = true;
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else {
                return Err(meta.error("unsupported model field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

/// Generate the expression building one field from `json`.
fn generate_field_decoder(
    krate: &syn::Path,
    ty: &Type,
    key: &str,
    options: &ModelFieldOptions,
) -> TokenStream {
    let raw = quote! { json.get(#key) };
    let shape = FieldShape::of(ty);

    let decoded = if let Some(with) = &options.with {
        quote! {
            #krate::transform::Transform::decode(
                &<#with as #krate::transform::FromConfig>::from_config(config),
                #raw,
            )
        }
    } else {
        match shape {
            FieldShape::Optional(inner) if options.nested => {
                quote! { #krate::model::nested::<#inner>(#raw, config) }
            }
            FieldShape::Optional(inner) => {
                quote! { #krate::transform::coerce::<#inner>(#raw) }
            }
            FieldShape::List(inner) if options.nested => {
                return quote! { #krate::model::nested_list::<#inner>(#raw, config) };
            }
            FieldShape::List(inner) => {
                return quote! { #krate::model::coerce_list::<#inner>(#raw) };
            }
            FieldShape::Required if options.nested => {
                quote! { #krate::model::nested::<#ty>(#raw, config) }
            }
            FieldShape::Required => {
                quote! { #krate::transform::coerce::<#ty>(#raw) }
            }
        }
    };

    if matches!(FieldShape::of(ty), FieldShape::Optional(_)) {
        decoded
    } else if options.default {
        quote! { #decoded.unwrap_or_default() }
    } else {
        quote! { #decoded? }
    }
}

/// Generate the expression encoding one field to an `Option<Value>`.
fn generate_field_encoder(
    krate: &syn::Path,
    field_name: &syn::Ident,
    ty: &Type,
    options: &ModelFieldOptions,
) -> TokenStream {
    let value = quote! { self.#field_name };

    if let Some(with) = &options.with {
        let encoded = match FieldShape::of(ty) {
            FieldShape::Optional(_) => quote! { #value.as_ref() },
            _ => quote! { ::std::option::Option::Some(&#value) },
        };
        return quote! {
            #krate::transform::Transform::encode(
                &<#with as #krate::transform::FromConfig>::from_config(config),
                #encoded,
            )
        };
    }

    match FieldShape::of(ty) {
        FieldShape::Optional(_) if options.nested => quote! {
            #value.as_ref().map(|value| #krate::Model::to_json(value, config))
        },
        FieldShape::Optional(_) => quote! {
            #value.as_ref().and_then(#krate::transform::uncoerce)
        },
        FieldShape::List(_) if options.nested => quote! {
            ::std::option::Option::Some(#krate::model::nested_list_to_json(&#value, config))
        },
        FieldShape::List(_) => quote! {
            ::std::option::Option::Some(#krate::model::uncoerce_list(&#value))
        },
        FieldShape::Required if options.nested => quote! {
            ::std::option::Option::Some(#krate::Model::to_json(&#value, config))
        },
        FieldShape::Required => quote! {
            #krate::transform::uncoerce(&#value)
        },
    }
}

/// The type argument of `Wrapper<T>`, if `ty` is one.
fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_rules() {
        let name = "cover_image_url";
        let cases = [
            ("lowercase", "coverimageurl"),
            ("UPPERCASE", "COVERIMAGEURL"),
            ("camelCase", "coverImageUrl"),
            ("PascalCase", "CoverImageUrl"),
            ("snake_case", "cover_image_url"),
            ("SCREAMING_SNAKE_CASE", "COVER_IMAGE_URL"),
            ("kebab-case", "cover-image-url"),
            ("SCREAMING-KEBAB-CASE", "COVER-IMAGE-URL"),
        ];
        for (rule, expected) in cases {
            let rule = RenameRule::parse(rule).expect("known rule");
            assert_eq!(rule.apply(name), expected);
        }
        assert!(RenameRule::parse("Title Case").is_none());
    }

    #[test]
    fn detects_wrappers() {
        let ty: Type = parse_quote!(Option<String>);
        assert!(matches!(FieldShape::of(&ty), FieldShape::Optional(_)));

        let ty: Type = parse_quote!(std::vec::Vec<u32>);
        assert!(matches!(FieldShape::of(&ty), FieldShape::List(_)));

        let ty: Type = parse_quote!(i64);
        assert!(matches!(FieldShape::of(&ty), FieldShape::Required));
    }

    #[test]
    fn expands_impl() {
        let input = quote! {
            #[model(rename_all = "camelCase", crate = "coax_core")]
            struct Post {
                post_id: i64,
                title: Option<String>,
                #[model(nested)]
                tags: Vec<Tag>,
            }
        };
        let output = expand_model_derive(input).expect("valid input").to_string();
        assert!(output.contains("impl coax_core :: Model for Post"));
        assert!(output.contains("\"postId\""));
        assert!(output.contains("nested_list"));
    }

    #[test]
    fn rejects_enums_and_tuple_structs() {
        assert!(expand_model_derive(quote! { enum E { A } }).is_err());
        assert!(expand_model_derive(quote! { struct T(i64); }).is_err());
    }

    #[test]
    fn rejects_unknown_attributes() {
        let input = quote! {
            struct S {
                #[model(flatten)]
                a: i64,
            }
        };
        assert!(expand_model_derive(input).is_err());

        let input = quote! {
            #[model(rename_all = "Title Case")]
            struct S { a: i64 }
        };
        assert!(expand_model_derive(input).is_err());
    }

    #[test]
    fn rejects_nested_with_transform() {
        let input = quote! {
            struct S {
                #[model(nested, with = PictureUrl)]
                a: Option<Url>,
            }
        };
        assert!(expand_model_derive(input).is_err());
    }
}
