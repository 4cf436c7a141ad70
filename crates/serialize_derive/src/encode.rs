use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DataEnum, DataStruct, DeriveInput, Fields, Index};

use crate::{
    add_bounds,
    attributes::{Container, Form, index_variants, is_skipped},
};

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    if let Data::Union(_) = input.data {
        return Err(syn::Error::new_spanned(
            input,
            "Encode cannot be derived for unions",
        ));
    }

    let form = Container::parse(&input.attrs)?.encode_form();

    let mut generics = input.generics.clone();
    if form == Form::Shape {
        add_bounds(&mut generics, &quote!(::burrow_serialize::Encode));
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut shape = TokenStream::new();
    let (kind, body, extra) = match form {
        Form::Method => (
            quote!(Custom(::burrow_serialize::capability::Form::Method)),
            quote!(::burrow_serialize::SerializeMethod::serialize(self, writer)),
            TokenStream::new(),
        ),
        Form::Associated => (
            quote!(Custom(::burrow_serialize::capability::Form::Associated)),
            quote! {
                <Self as ::burrow_serialize::Strategy<Self>>::serialize(
                    writer, self,
                )
            },
            TokenStream::new(),
        ),
        Form::Strategy => (
            quote!(Custom(::burrow_serialize::capability::Form::Strategy)),
            quote! {
                <<Self as ::burrow_serialize::DeclaresStrategy>::Strategy
                    as ::burrow_serialize::Strategy<Self>>::serialize(
                    writer, self,
                )
            },
            TokenStream::new(),
        ),
        Form::Trivial => (
            quote!(Trivial),
            quote! {
                ::burrow_serialize::strategy::trivial::encode(writer, self);
                ::std::result::Result::Ok(())
            },
            quote! {
                fn raw_bytes(items: &[Self]) -> ::std::option::Option<&[u8]> {
                    ::std::option::Option::Some(
                        ::burrow_serialize::strategy::trivial::raw_bytes(items),
                    )
                }
            },
        ),
        Form::Shape | Form::FromReader => {
            let (kind, body, shape_body) = match &input.data {
                Data::Struct(data) => (
                    quote!(Aggregate),
                    quote! {
                        ::burrow_serialize::strategy::aggregate::encode(
                            writer, self,
                        )
                    },
                    members(data)?,
                ),
                Data::Enum(data) => (
                    quote!(Sum),
                    quote! {
                        ::burrow_serialize::strategy::sum::encode(writer, self)
                    },
                    sum_type(data)?,
                ),
                Data::Union(_) => unreachable!("unions are rejected above"),
            };

            let shape_trait = match &input.data {
                Data::Enum(_) => quote!(SumType),
                _ => quote!(Members),
            };

            shape = quote! {
                #[allow(clippy::trait_duplication_in_bounds)]
                impl #impl_generics ::burrow_serialize::capability::#shape_trait
                    for #name #ty_generics
                #where_clause
                {
                    #shape_body
                }
            };

            (kind, body, TokenStream::new())
        }
    };

    Ok(quote! {
        #[allow(clippy::trait_duplication_in_bounds)]
        impl #impl_generics ::burrow_serialize::Encode for #name #ty_generics
        #where_clause
        {
            const KIND: ::burrow_serialize::capability::Kind =
                ::burrow_serialize::capability::Kind::#kind;

            fn encode(
                &self,
                writer: &mut ::burrow_serialize::BitWriter,
            ) -> ::burrow_serialize::Result<()> {
                #body
            }

            #extra
        }

        #shape
    })
}

/// Body of the `Members` impl for a struct.
fn members(data: &DataStruct) -> syn::Result<TokenStream> {
    let mut visits = Vec::new();

    for (i, field) in data.fields.iter().enumerate() {
        if is_skipped(field)? {
            continue;
        }

        visits.push(match &field.ident {
            Some(ident) => {
                let label = ident.to_string();
                quote! {
                    visitor.visit(
                        ::std::option::Option::Some(#label),
                        &self.#ident,
                    )?;
                }
            }
            None => {
                let index = Index::from(i);
                quote! {
                    visitor.visit(::std::option::Option::None, &self.#index)?;
                }
            }
        });
    }

    let count = visits.len();

    Ok(quote! {
        const COUNT: usize = #count;

        fn visit_members<__V: ::burrow_serialize::capability::MemberVisitor>(
            &self,
            visitor: &mut __V,
        ) -> ::burrow_serialize::Result<()> {
            let _ = &visitor;
            #(#visits)*
            ::std::result::Result::Ok(())
        }
    })
}

/// Body of the `SumType` impl for an enum.
fn sum_type(data: &DataEnum) -> syn::Result<TokenStream> {
    let variants = index_variants(data)?;
    let alternatives = variants.iter().filter(|v| v.index.is_some()).count();

    let mut index_arms = Vec::new();
    let mut payload_arms = Vec::new();

    for indexed in &variants {
        let variant = indexed.variant;
        let ident = &variant.ident;

        let index = match indexed.index {
            Some(index) => quote!(::std::option::Option::Some(#index)),
            None => quote!(::std::option::Option::None),
        };
        index_arms.push(quote! { Self::#ident { .. } => #index, });

        let mut bindings = Vec::new();
        let mut writes = Vec::new();

        for (i, field) in variant.fields.iter().enumerate() {
            let binding = format_ident!("__field_{i}");
            let member = match &field.ident {
                Some(ident) => quote!(#ident),
                None => {
                    let index = Index::from(i);
                    quote!(#index)
                }
            };

            if is_skipped(field)? {
                bindings.push(quote!(#member: _));
            } else {
                bindings.push(quote!(#member: #binding));
                writes.push(quote!(writer.encode(#binding)?;));
            }
        }

        let pattern = match variant.fields {
            Fields::Unit => quote!(Self::#ident),
            _ => quote!(Self::#ident { #(#bindings),* }),
        };

        payload_arms.push(quote! {
            #pattern => {
                #(#writes)*
            }
        });
    }

    let (index_match, payload_match) = if variants.is_empty() {
        (quote!(match *self {}), quote!(match *self {}))
    } else {
        (
            quote!(match self { #(#index_arms)* }),
            quote! {
                match self { #(#payload_arms)* }
                ::std::result::Result::Ok(())
            },
        )
    };

    Ok(quote! {
        const ALTERNATIVES: usize = #alternatives;

        fn active_index(&self) -> ::std::option::Option<usize> {
            #index_match
        }

        fn encode_active(
            &self,
            writer: &mut ::burrow_serialize::BitWriter,
        ) -> ::burrow_serialize::Result<()> {
            let _ = &writer;
            #payload_match
        }
    })
}
