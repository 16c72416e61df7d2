//! `#[derive(Error)]` implementation.
//!
//! ```ignore
//! use intcode_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum VMError {
//!     #[error("invalid instruction {opcode} at offset {offset}")]
//!     InvalidInstruction { opcode: i64, offset: usize },
//!
//!     #[error("io error: {0}")]
//!     Io(String),
//!
//!     #[error("empty program")]
//!     EmptyProgram,
//! }
//! ```
//!
//! Messages are ordinary format strings. Tuple fields are referenced as
//! `{0}`, `{1}`, ...; named fields by name. Every field must appear in the
//! message, since unused named format arguments are rejected by `write!`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Lit, Meta, parse_macro_input};

pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.data {
        Data::Enum(data) => {
            let arms = data
                .variants
                .iter()
                .map(|variant| {
                    let message = message_of(
                        &variant.attrs,
                        &variant.ident,
                        &format!("variant `{}`", variant.ident),
                    )?;
                    Ok(variant_arm(&variant.ident, &variant.fields, &message))
                })
                .collect::<syn::Result<Vec<_>>>()?;

            quote! {
                match self {
                    #(#arms)*
                }
            }
        }
        Data::Struct(data) => {
            let message = message_of(&input.attrs, name, &format!("type `{}`", name))?;
            struct_body(&data.fields, &message)
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Error derive does not support unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                #body
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
    })
}

/// One `match` arm writing the message of a single enum variant.
fn variant_arm(ident: &syn::Ident, fields: &Fields, message: &str) -> TokenStream2 {
    match fields {
        Fields::Unit => quote! {
            Self::#ident => write!(f, #message),
        },
        Fields::Unnamed(unnamed) => {
            let bindings = positional_bindings(unnamed.unnamed.len());
            let format = rename_positional(message, unnamed.unnamed.len());
            quote! {
                Self::#ident(#(#bindings),*) => write!(f, #format, #(#bindings = #bindings),*),
            }
        }
        Fields::Named(named) => {
            let names: Vec<_> = named.named.iter().map(|field| &field.ident).collect();
            quote! {
                Self::#ident { #(#names),* } => write!(f, #message, #(#names = #names),*),
            }
        }
    }
}

/// The `fmt` body for a struct, reading fields through `self`.
fn struct_body(fields: &Fields, message: &str) -> TokenStream2 {
    match fields {
        Fields::Unit => quote! { write!(f, #message) },
        Fields::Named(named) => {
            let names: Vec<_> = named.named.iter().map(|field| &field.ident).collect();
            quote! { write!(f, #message, #(#names = self.#names),*) }
        }
        Fields::Unnamed(unnamed) => {
            let count = unnamed.unnamed.len();
            let bindings = positional_bindings(count);
            let indices = (0..count).map(syn::Index::from);
            let format = rename_positional(message, count);
            quote! { write!(f, #format, #(#bindings = self.#indices),*) }
        }
    }
}

fn positional_bindings(count: usize) -> Vec<syn::Ident> {
    (0..count).map(|i| format_ident!("f{}", i)).collect()
}

/// Finds the `#[error("...")]` string among `attrs`.
fn message_of<T: ToTokens>(attrs: &[Attribute], target: &T, describe: &str) -> syn::Result<String> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("error")) else {
        return Err(syn::Error::new_spanned(
            target,
            format!("missing #[error(\"...\")] attribute on {describe}"),
        ));
    };

    let Meta::List(list) = &attr.meta else {
        return Err(syn::Error::new_spanned(
            &attr.meta,
            "expected #[error(\"message\")]",
        ));
    };

    match syn::parse2::<Lit>(list.tokens.clone()) {
        Ok(Lit::Str(text)) => Ok(text.value()),
        _ => Err(syn::Error::new_spanned(
            &attr.meta,
            "#[error] takes a single string literal, e.g. #[error(\"negative address {address}\")]",
        )),
    }
}

/// Rewrites `{0}`, `{1}`, ... to `{f0}`, `{f1}`, ... so tuple fields can be
/// passed as named format arguments. Format specs such as `{0:?}` are kept.
fn rename_positional(message: &str, count: usize) -> String {
    (0..count).rev().fold(message.to_string(), |acc, i| {
        acc.replace(&format!("{{{i}}}"), &format!("{{f{i}}}"))
            .replace(&format!("{{{i}:"), &format!("{{f{i}:"))
    })
}
