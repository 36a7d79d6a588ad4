use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta};

/// Column storage for a row of `f64` readings, such as one stage and its
/// region levels per flow rate on a rating curve.
///
/// `#[derive(Series)]` on `Row` emits `RowSeries` (or the name given by
/// `#[series(name = "...")]`) holding one `Vec<f64>` per field, so each
/// quantity can be handed out as a contiguous array. Rows go in with `push`
/// and come back out with `row(i)`. `Row::field_names()` lists the columns
/// in declaration order.
#[proc_macro_derive(Series, attributes(series))]
pub fn derive_series(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let series_name =
        extract_series_name(&input).unwrap_or_else(|| format_ident!("{}Series", name));

    let field_idents = match f64_fields(&input) {
        Ok(idents) => idents,
        Err(err) => return err.into_compile_error().into(),
    };
    let field_names: Vec<String> = field_idents.iter().map(|f| f.to_string()).collect();
    let first_field = field_idents[0];

    let series_fields = field_idents.iter().map(|f| {
        quote! { pub #f: Vec<f64> }
    });

    let with_cap_fields = field_idents.iter().map(|f| {
        quote! { #f: Vec::with_capacity(n) }
    });

    let push_fields = field_idents.iter().map(|f| {
        quote! { self.#f.push(row.#f); }
    });

    let get_fields = field_idents.iter().map(|f| {
        quote! { #f: *self.#f.get(i)? }
    });

    let expanded = quote! {
        /// One column per field of the row type.
        #[derive(Debug, Clone, Default)]
        pub struct #series_name {
            #(#series_fields,)*
        }

        impl #series_name {
            /// Empty columns with room for `n` rows.
            pub fn with_capacity(n: usize) -> Self {
                Self {
                    #(#with_cap_fields,)*
                }
            }

            pub fn push(&mut self, row: &#name) {
                #(#push_fields)*
            }

            /// Reassemble row `i`, or `None` when out of range.
            pub fn row(&self, i: usize) -> Option<#name> {
                Some(#name {
                    #(#get_fields,)*
                })
            }

            pub fn len(&self) -> usize {
                self.#first_field.len()
            }

            pub fn is_empty(&self) -> bool {
                self.#first_field.is_empty()
            }
        }

        impl #name {
            /// Column names in declaration order.
            pub fn field_names() -> &'static [&'static str] {
                &[#(#field_names),*]
            }
        }
    };

    expanded.into()
}

/// Named fields of a struct, all of them `f64`, in declaration order.
fn f64_fields(input: &DeriveInput) -> syn::Result<Vec<&syn::Ident>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Series can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Series needs named fields",
        ));
    };
    if named.named.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Series needs at least one field",
        ));
    }
    named
        .named
        .iter()
        .map(|field| {
            if !is_f64_type(&field.ty) {
                return Err(syn::Error::new_spanned(&field.ty, "Series fields must be f64"));
            }
            field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "Series needs named fields"))
        })
        .collect()
}

fn extract_series_name(input: &DeriveInput) -> Option<proc_macro2::Ident> {
    for attr in &input.attrs {
        if attr.path().is_ident("series") {
            let nested = attr
                .parse_args_with(
                    syn::punctuated::Punctuated::<syn::Meta, syn::Token![,]>::parse_terminated,
                )
                .ok()?;
            for meta in nested {
                if let Meta::NameValue(nv) = meta {
                    if nv.path.is_ident("name") {
                        if let syn::Expr::Lit(expr_lit) = &nv.value {
                            if let Lit::Str(lit_str) = &expr_lit.lit {
                                return Some(format_ident!("{}", lit_str.value()));
                            }
                        }
                    }
                }
            }
        }
    }
    None
}

fn is_f64_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        type_path.path.is_ident("f64")
    } else {
        false
    }
}
