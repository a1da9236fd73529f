//! Proc-macros for statewise.
//!
//! Currently provided:
//! - `#[derive(WithSetters)]`: generates `with_<field>(...)` builder-style methods
//!   for each named field of a style or configuration record.
//!
//! `Option<T>` fields get a setter taking `impl Into<T>` that stores `Some(..)`,
//! so sparse records read naturally:
//!
//! ```ignore
//! use statewise_macros::WithSetters;
//!
//! #[derive(Clone, Debug, Default, WithSetters)]
//! pub struct Style {
//!     pub border_width: Option<i32>,
//!     #[setters(skip)]
//!     pub fg_rect: Option<Rect>,
//! }
//!
//! let s = Style::default().with_border_width(3);
//! assert_eq!(s.border_width, Some(3));
//! // .with_fg_rect(...) is NOT generated.
//! ```
//!
//! Any other field gets a setter taking `impl Into<FieldType>`.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields, GenericArgument,
    PathArguments, Type,
};

/// Derive that generates `with_<field>` builder methods for structs with named fields.
///
/// Generated methods take `self` by value and return `Self`.
///
/// Field attributes:
/// - `#[setters(skip)]`: do not generate a builder method for this field.
#[proc_macro_derive(WithSetters, attributes(setters))]
pub fn derive_with_setters(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let ident = &input.ident;
    let generics = &input.generics;

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "#[derive(WithSetters)] only supports structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields_named) = &data_struct.fields else {
        return syn::Error::new(
            data_struct.fields.span(),
            "#[derive(WithSetters)] only supports structs with named fields",
        )
        .to_compile_error()
        .into();
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut methods = Vec::with_capacity(fields_named.named.len());
    for field in &fields_named.named {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };

        if has_skip(field) {
            continue;
        }

        let method_ident = format_ident!("with_{}", field_ident);
        let doc = format!("Set `{}`.", field_ident);

        let method = match option_inner(&field.ty) {
            Some(inner) => quote! {
                #[doc = #doc]
                #[inline]
                #[must_use]
                pub fn #method_ident(mut self, value: impl Into<#inner>) -> Self {
                    self.#field_ident = Some(value.into());
                    self
                }
            },
            None => {
                let field_ty = &field.ty;
                quote! {
                    #[doc = #doc]
                    #[inline]
                    #[must_use]
                    pub fn #method_ident(mut self, value: impl Into<#field_ty>) -> Self {
                        self.#field_ident = value.into();
                        self
                    }
                }
            }
        };
        methods.push(method);
    }

    quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#methods)*
        }
    }
    .into()
}

/// Returns `T` when `ty` is spelled `Option<T>` (or a path ending in `Option<T>`).
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn has_skip(field: &syn::Field) -> bool {
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("setters") {
            continue;
        }
        // Unknown nested items are ignored.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
            }
            Ok(())
        });
    }
    skip
}
