use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derives the `Choice` trait for enums.
///
/// Each variant becomes one allowed flag value, written in kebab-case
/// (`JsonLines` becomes `json-lines`).
///
/// # Example
///
/// ```ignore
/// use shellkit::Choice;
///
/// #[derive(Debug, Copy, Clone, PartialEq, Eq, Choice)]
/// pub enum Format {
///     Json,
///     Text,
///     JsonLines,
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl ::shellkit::flags::Choice for Format {
///     const CHOICES: &'static [&'static str] = &["json", "text", "json-lines"];
///
///     fn from_choice(s: &str) -> Option<Self> {
///         match s {
///             "json" => Some(Self::Json),
///             "text" => Some(Self::Text),
///             "json-lines" => Some(Self::JsonLines),
///             _ => None,
///         }
///     }
///
///     fn as_choice(&self) -> &'static str {
///         match self {
///             Self::Json => "json",
///             Self::Text => "text",
///             Self::JsonLines => "json-lines",
///         }
///     }
/// }
/// ```
///
/// # Requirements
///
/// - The type must be an enum with at least one variant
/// - All variants must be unit variants (no fields)
#[proc_macro_derive(Choice)]
pub fn derive_choice(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    // Extract enum variants
    let variants = match &input.data {
        Data::Enum(data_enum) => &data_enum.variants,
        _ => {
            return syn::Error::new_spanned(&input, "Choice can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    if variants.is_empty() {
        return syn::Error::new_spanned(&input, "Choice needs at least one variant")
            .to_compile_error()
            .into();
    }

    // Validate that all variants are unit variants (no fields)
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(
                variant,
                "Choice can only be derived for enums with unit variants (no fields)",
            )
            .to_compile_error()
            .into();
        }
    }

    let idents: Vec<_> = variants.iter().map(|variant| &variant.ident).collect();
    let values: Vec<String> = idents
        .iter()
        .map(|ident| kebab_case(&ident.to_string()))
        .collect();

    let expanded = quote! {
        impl ::shellkit::flags::Choice for #name {
            const CHOICES: &'static [&'static str] = &[#(#values),*];

            fn from_choice(s: &str) -> Option<Self> {
                match s {
                    #(#values => Some(Self::#idents),)*
                    _ => None,
                }
            }

            fn as_choice(&self) -> &'static str {
                match self {
                    #(Self::#idents => #values,)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// `JsonLines` -> `json-lines`, `Utf8Text` -> `utf8-text`.
fn kebab_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in ident.chars() {
        if c == '_' {
            out.push('-');
            prev_lower_or_digit = false;
            continue;
        }
        if c.is_uppercase() {
            if prev_lower_or_digit {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(c);
            prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}
