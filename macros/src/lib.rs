use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Type, parse_macro_input};

/// Derive macro for binding a struct's fields from file and environment
///
/// Only structs with named fields can derive `Bindable`:
///
/// ```compile_fail
/// #[derive(config_bindr_macros::Bindable)]
/// enum Mode {
///     File,
///     Env,
/// }
/// ```
///
/// ```compile_fail
/// #[derive(config_bindr_macros::Bindable)]
/// struct Endpoint(String, u16);
/// ```
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_bindable(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_bindable(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    // Extract fields from the struct
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Bindable only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Bindable only supports structs",
            ));
        }
    };

    let mut merge_keys = Vec::new();
    let mut overlay_binds = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let field_type = &field.ty;

        let config = parse_bind_config(&field.attrs)?;
        if config.skip {
            continue;
        }

        // External name: the declared identifier unless renamed
        let bind_name = config
            .rename
            .unwrap_or_else(|| field_name.to_string());

        // Extract cfg attributes for feature gating
        let cfg_attrs: Vec<&Attribute> = field
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("cfg"))
            .collect();

        merge_keys.push(quote! {
            #(#cfg_attrs)*
            if let Some(value) = doc.remove(#bind_name) {
                match ::config_bindr::serde_json::from_value(value) {
                    Ok(decoded) => self.#field_name = decoded,
                    Err(err) => {
                        if first_failure.is_none() {
                            first_failure = Some(err);
                        }
                    }
                }
            }
        });

        // String fields take the raw environment value, everything else
        // goes through the generic JSON-literal decoder
        let bind_call = if is_string_type(field_type) {
            quote! {
                #(#cfg_attrs)*
                overlay.bind_text(#bind_name, &mut self.#field_name);
            }
        } else {
            quote! {
                #(#cfg_attrs)*
                overlay.bind_decoded(#bind_name, &mut self.#field_name);
            }
        };
        overlay_binds.push(bind_call);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::config_bindr::Bindable for #struct_name #ty_generics #where_clause {
            fn merge_document(
                &mut self,
                mut doc: ::config_bindr::serde_json::Map<
                    ::std::string::String,
                    ::config_bindr::serde_json::Value,
                >,
            ) -> ::std::result::Result<(), ::config_bindr::serde_json::Error> {
                let _ = &mut doc;
                let mut first_failure: ::std::option::Option<::config_bindr::serde_json::Error> =
                    ::std::option::Option::None;

                #(#merge_keys)*

                match first_failure {
                    ::std::option::Option::Some(err) => ::std::result::Result::Err(err),
                    ::std::option::Option::None => ::std::result::Result::Ok(()),
                }
            }

            fn overlay_env(&mut self, overlay: &mut ::config_bindr::EnvOverlay<'_>) {
                #(#overlay_binds)*
            }
        }
    })
}

#[derive(Debug, Default)]
struct BindConfig {
    skip: bool,
    rename: Option<String>,
}

/// Parse #[bind(skip)] / #[bind(rename = "Name")] field attributes
fn parse_bind_config(attrs: &[Attribute]) -> syn::Result<BindConfig> {
    let mut config = BindConfig::default();

    for attr in attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                config.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                config.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }

    Ok(config)
}

/// Syntactic check for a `String` field, matching the last path segment
fn is_string_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "String" && segment.arguments.is_none();
        }
    }
    false
}
