extern crate proc_macro;

mod shape;

use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Visibility};

use shape::{classify, display_type, FieldShape, Mismatch};

#[derive(Default)]
struct FieldAttrs {
    selector: String,
    attr: String,
    skip: bool,
}

fn field_attrs(field: &Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("html")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("selector") {
                attrs.selector = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("attr") {
                attrs.attr = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else {
                return Err(meta.error("expected `selector`, `attr` or `skip`"));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

fn settable(field: &Field, attrs: &FieldAttrs) -> bool {
    !attrs.skip && !matches!(field.vis, Visibility::Inherited)
}

fn shape_tokens(shape: &FieldShape) -> proc_macro2::TokenStream {
    match shape {
        FieldShape::Text => quote!(::htmlbind_lib::Shape::Text),
        FieldShape::TextSequence => quote!(::htmlbind_lib::Shape::TextSequence),
        FieldShape::Record => quote!(::htmlbind_lib::Shape::Record),
        FieldShape::Reference(_) => quote!(::htmlbind_lib::Shape::RecordRef),
        FieldShape::Unsupported(mismatch) => {
            let mismatch = match mismatch {
                Mismatch::Field => quote!(Field),
                Mismatch::SequenceElement => quote!(SequenceElement),
                Mismatch::ReferenceTarget => quote!(ReferenceTarget),
            };
            quote!(::htmlbind_lib::Shape::Unsupported(::htmlbind_lib::Unsupported::#mismatch))
        }
    }
}

struct FieldTokens {
    descriptor: proc_macro2::TokenStream,
    step: proc_macro2::TokenStream,
    check: proc_macro2::TokenStream,
}

/// Descriptor literal, decoding statement and shape check for one settable
/// field.
fn field_tokens(field: &Field, attrs: &FieldAttrs, index: usize) -> FieldTokens {
    let Field { ident, ty, .. } = field;
    let name = ident
        .as_ref()
        .map(|ident| ident.unraw().to_string())
        .unwrap_or_default();
    let ty_name = display_type(ty);
    let FieldAttrs { selector, attr, .. } = attrs;

    let field_shape = classify(ty);
    let shape = shape_tokens(&field_shape);
    let descriptor = quote! {
        ::htmlbind_lib::FieldDescriptor {
            name: #name,
            ty: #ty_name,
            shape: #shape,
            selector: #selector,
            attr: #attr,
        }
    };

    // Trait bound failures on nested records point at the field's type.
    let span = ty.span();
    let check = match &field_shape {
        FieldShape::Text | FieldShape::TextSequence => quote!(),
        FieldShape::Record => {
            let check_shapes =
                quote_spanned!(span=> <#ty as ::htmlbind_lib::Decode>::check_shapes);
            quote!(#check_shapes(seen)?;)
        }
        FieldShape::Reference(target) => {
            let check_shapes =
                quote_spanned!(span=> <#target as ::htmlbind_lib::Decode>::check_shapes);
            quote!(#check_shapes(seen)?;)
        }
        FieldShape::Unsupported(_) => quote! {
            ::htmlbind_lib::field::reject(&fields[#index])?;
        },
    };

    let step = match field_shape {
        FieldShape::Text => quote! {
            ::htmlbind_lib::field::decode_text(&mut self.#ident, scope, &fields[#index])?;
        },
        FieldShape::TextSequence => quote! {
            ::htmlbind_lib::field::decode_sequence(&mut self.#ident, scope, &fields[#index])?;
        },
        FieldShape::Record => {
            let decode_record = quote_spanned!(span=> ::htmlbind_lib::field::decode_record::<#ty>);
            quote! {
                #decode_record(&mut self.#ident, scope, &fields[#index])?;
            }
        }
        FieldShape::Reference(target) => {
            let decode_reference =
                quote_spanned!(span=> ::htmlbind_lib::field::decode_reference::<#target, _>);
            quote! {
                #decode_reference(&mut self.#ident, scope, &fields[#index])?;
            }
        }
        FieldShape::Unsupported(_) => quote! {
            ::htmlbind_lib::field::reject(&fields[#index])?;
        },
    };
    FieldTokens {
        descriptor,
        step,
        check,
    }
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    let named = match data {
        Data::Struct(s) => match s.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &ident,
                    "invalid decode target: Decode needs a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &ident,
                "invalid decode target: Decode can only be derived for structs",
            ))
        }
    };

    let mut descriptors = vec![];
    let mut steps = vec![];
    let mut checks = vec![];
    for field in named.iter() {
        let attrs = field_attrs(field)?;
        if !settable(field, &attrs) {
            continue;
        }
        let tokens = field_tokens(field, &attrs, descriptors.len());
        descriptors.push(tokens.descriptor);
        steps.push(tokens.step);
        checks.push(tokens.check);
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::htmlbind_lib::Decode for #ident #ty_generics #where_clause {
            const FIELDS: &'static [::htmlbind_lib::FieldDescriptor] = &[
                #(#descriptors),*
            ];

            fn decode(
                &mut self,
                scope: &::htmlbind_lib::Scope<'_>,
            ) -> ::htmlbind_lib::Result<()> {
                let fields = <Self as ::htmlbind_lib::Decode>::FIELDS;
                let _ = (scope, fields);
                #(#steps)*
                ::std::result::Result::Ok(())
            }

            fn check_shapes(
                seen: &mut ::std::vec::Vec<&'static str>,
            ) -> ::htmlbind_lib::Result<()> {
                let name = ::std::any::type_name::<Self>();
                if seen.contains(&name) {
                    return ::std::result::Result::Ok(());
                }
                seen.push(name);
                let fields = <Self as ::htmlbind_lib::Decode>::FIELDS;
                let _ = fields;
                #(#checks)*
                ::std::result::Result::Ok(())
            }
        }
    })
}

/// Derives `htmlbind_lib::Decode` for a struct with named fields.
///
/// Field attributes: `#[html(selector = "css", attr = "name")]` and
/// `#[html(skip)]`. Fields without `pub` visibility are skipped.
#[proc_macro_derive(Decode, attributes(html))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
