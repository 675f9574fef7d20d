//! # Feature Table Derive
//!
//! This crate provides a derive macro that turns a fieldless enum of CPU
//! features into a lookup table: every variant names the snapshot word and bit
//! that reports it.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Fields, Ident, LitInt, LitStr, parse_macro_input,
    spanned::Spanned,
};

/// Derive `ALL`, `name()`, `location()` and `from_name()` for a feature enum.
///
/// Each variant carries a `#[cpuid(...)]` attribute:
///
/// - `word = Ident` (required): the `FeatureWord` variant holding the bit,
/// - `bit = 0..=31` (required): bit position inside that word,
/// - `name = "..."` (optional): display name, defaults to the upper-cased variant name,
/// - `alias = "..."` (optional, repeatable): extra names accepted by `from_name`.
///
/// The generated code refers to `FeatureWord` and `FeatureBit` unqualified, so
/// both must be in scope where the derive is used.
///
/// # Example
///
/// ```
/// use cpuinfo_derive::FeatureTable;
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// enum FeatureWord { Leaf01Ecx }
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// struct FeatureBit { word: FeatureWord, bit: u8 }
///
/// impl FeatureBit {
///     const fn new(word: FeatureWord, bit: u8) -> Self { Self { word, bit } }
/// }
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, FeatureTable)]
/// enum Feature {
///     #[cpuid(word = Leaf01Ecx, bit = 0)]
///     Sse3,
///     #[cpuid(word = Leaf01Ecx, bit = 3, alias = "MWAIT")]
///     Monitor,
/// }
///
/// assert_eq!(Feature::ALL.len(), 2);
/// assert_eq!(Feature::Sse3.name(), "SSE3");
/// assert_eq!(Feature::from_name("mwait"), Some(Feature::Monitor));
/// assert_eq!(Feature::Monitor.location(), FeatureBit::new(FeatureWord::Leaf01Ecx, 3));
/// ```
#[proc_macro_derive(FeatureTable, attributes(cpuid))]
pub fn derive_feature_table(input: TokenStream) -> TokenStream {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = parse_macro_input!(input as DeriveInput);

    let Data::Enum(data) = data else {
        return syn::Error::new(ident.span(), "FeatureTable can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let mut variants = Vec::new();
    let mut names = Vec::new();
    let mut locations = Vec::new();
    let mut lookups = Vec::new();

    for variant in data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(variant.span(), "FeatureTable variants must be fieldless")
                .to_compile_error()
                .into();
        }

        let entry = match FeatureAttr::parse(&variant.ident, &variant.attrs) {
            Ok(entry) => entry,
            Err(e) => return e.to_compile_error().into(),
        };

        let vident = &variant.ident;
        let name = &entry.name;
        let word = &entry.word;
        let bit = entry.bit;
        let accepted: Vec<&LitStr> = core::iter::once(&entry.name).chain(&entry.aliases).collect();

        variants.push(quote! { Self::#vident });
        names.push(quote! { Self::#vident => #name });
        locations.push(quote! { Self::#vident => FeatureBit::new(FeatureWord::#word, #bit) });
        lookups.push(quote! {
            if [#(#accepted),*].iter().any(|n| name.eq_ignore_ascii_case(n)) {
                return Some(Self::#vident);
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            /// Every feature, in declaration order.
            pub const ALL: &'static [Self] = &[#(#variants),*];

            /// Canonical display name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    #(#names),*
                }
            }

            /// Snapshot word and bit reporting this feature.
            #[must_use]
            pub const fn location(self) -> FeatureBit {
                match self {
                    #(#locations),*
                }
            }

            /// Look a feature up by its name or one of its aliases, ignoring ASCII case.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                #(#lookups)*
                None
            }
        }
    };

    TokenStream::from(expanded)
}

struct FeatureAttr {
    word: Ident,
    bit: u8,
    name: LitStr,
    aliases: Vec<LitStr>,
}

impl FeatureAttr {
    fn parse(variant: &Ident, attrs: &[Attribute]) -> syn::Result<Self> {
        let mut word = None;
        let mut bit = None;
        let mut name = None;
        let mut aliases = Vec::new();
        let mut seen = false;

        for attr in attrs {
            if !attr.path().is_ident("cpuid") {
                continue;
            }
            seen = true;

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("word") {
                    word = Some(meta.value()?.parse::<Ident>()?);
                } else if meta.path.is_ident("bit") {
                    let lit = meta.value()?.parse::<LitInt>()?;
                    let value = lit.base10_parse::<u8>()?;
                    if value > 31 {
                        return Err(syn::Error::new(lit.span(), "bit must be in 0..=31"));
                    }
                    bit = Some(value);
                } else if meta.path.is_ident("name") {
                    name = Some(meta.value()?.parse::<LitStr>()?);
                } else if meta.path.is_ident("alias") {
                    aliases.push(meta.value()?.parse::<LitStr>()?);
                } else {
                    return Err(meta.error("expected `word`, `bit`, `name` or `alias`"));
                }
                Ok(())
            })?;
        }

        if !seen {
            return Err(syn::Error::new(
                variant.span(),
                "missing #[cpuid(word = .., bit = ..)] attribute",
            ));
        }

        let Some(word) = word else {
            return Err(syn::Error::new(variant.span(), "missing `word = ..`"));
        };
        let Some(bit) = bit else {
            return Err(syn::Error::new(variant.span(), "missing `bit = ..`"));
        };
        let name = name.unwrap_or_else(|| {
            LitStr::new(&variant.to_string().to_ascii_uppercase(), variant.span())
        });

        Ok(Self {
            word,
            bit,
            name,
            aliases,
        })
    }
}
