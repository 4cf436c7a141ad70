use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DataEnum, DataStruct, DeriveInput, Fields, Index};

use crate::{
    add_bounds,
    attributes::{Container, Form, index_variants, is_skipped},
};

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    if let Data::Union(_) = input.data {
        return Err(syn::Error::new_spanned(
            input,
            "Decode cannot be derived for unions",
        ));
    }

    let form = Container::parse(&input.attrs)?.decode_form();

    let mut generics = input.generics.clone();
    if form == Form::Shape {
        // Decoded values are resolved by type identity, which needs `'static`.
        add_bounds(
            &mut generics,
            &quote!(::burrow_serialize::Decode + 'static),
        );
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut shape = TokenStream::new();
    let (kind, body) = match form {
        Form::FromReader => (
            quote!(Custom(::burrow_serialize::capability::Form::FromReader)),
            quote! {
                fn decode(
                    reader: &mut ::burrow_serialize::BitReader,
                ) -> ::burrow_serialize::Result<Self> {
                    <Self as ::burrow_serialize::FromReader>::from_reader(reader)
                }
            },
        ),
        Form::Method => (
            quote!(Custom(::burrow_serialize::capability::Form::Method)),
            in_place(&quote! {
                ::burrow_serialize::DeserializeMethod::deserialize(
                    value, reader,
                )
            }),
        ),
        Form::Associated => (
            quote!(Custom(::burrow_serialize::capability::Form::Associated)),
            in_place(&quote! {
                <Self as ::burrow_serialize::Strategy<Self>>::deserialize(
                    reader, value,
                )
            }),
        ),
        Form::Strategy => (
            quote!(Custom(::burrow_serialize::capability::Form::Strategy)),
            in_place(&quote! {
                <<Self as ::burrow_serialize::DeclaresStrategy>::Strategy
                    as ::burrow_serialize::Strategy<Self>>::deserialize(
                    reader, value,
                )
            }),
        ),
        Form::Trivial => (quote!(Trivial), trivial()),
        Form::Shape => match &input.data {
            Data::Struct(data) => {
                let (members, decode) = aggregate(data)?;
                shape = quote! {
                    #[allow(clippy::trait_duplication_in_bounds)]
                    impl #impl_generics
                        ::burrow_serialize::capability::MembersMut
                        for #name #ty_generics
                    #where_clause
                    {
                        #members
                    }
                };
                (quote!(Aggregate), decode)
            }
            Data::Enum(data) => {
                let rebuild = rebuild_sum(data)?;
                shape = quote! {
                    #[allow(clippy::trait_duplication_in_bounds)]
                    impl #impl_generics
                        ::burrow_serialize::capability::RebuildSum
                        for #name #ty_generics
                    #where_clause
                    {
                        #rebuild
                    }
                };
                (
                    quote!(Sum),
                    quote! {
                        fn decode(
                            reader: &mut ::burrow_serialize::BitReader,
                        ) -> ::burrow_serialize::Result<Self> {
                            ::burrow_serialize::strategy::sum::decode(reader)
                        }
                    },
                )
            }
            Data::Union(_) => unreachable!("unions are rejected above"),
        },
    };

    Ok(quote! {
        #[allow(clippy::trait_duplication_in_bounds)]
        impl #impl_generics ::burrow_serialize::Decode for #name #ty_generics
        #where_clause
        {
            const KIND: ::burrow_serialize::capability::Kind =
                ::burrow_serialize::capability::Kind::#kind;

            #body
        }

        #shape
    })
}

/// `decode` and `decode_into` for the forms that fill a default value in
/// place. `call` sees `value: &mut Self` and `reader`.
fn in_place(call: &TokenStream) -> TokenStream {
    quote! {
        fn decode(
            reader: &mut ::burrow_serialize::BitReader,
        ) -> ::burrow_serialize::Result<Self> {
            let mut value = <Self as ::std::default::Default>::default();
            {
                let value = &mut value;
                #call?;
            }
            ::std::result::Result::Ok(value)
        }

        fn decode_into(
            &mut self,
            reader: &mut ::burrow_serialize::BitReader,
        ) -> ::burrow_serialize::Result<()> {
            let value = self;
            #call
        }
    }
}

fn trivial() -> TokenStream {
    quote! {
        fn decode(
            reader: &mut ::burrow_serialize::BitReader,
        ) -> ::burrow_serialize::Result<Self> {
            ::burrow_serialize::strategy::trivial::decode(reader)
        }

        fn decode_raw_vec(
            reader: &mut ::burrow_serialize::BitReader,
            len: usize,
        ) -> ::std::option::Option<
            ::burrow_serialize::Result<::std::vec::Vec<Self>>,
        > {
            ::std::option::Option::Some(
                ::burrow_serialize::strategy::trivial::decode_vec(reader, len),
            )
        }

        fn decode_raw_into(
            items: &mut [Self],
            reader: &mut ::burrow_serialize::BitReader,
        ) -> ::std::option::Option<::burrow_serialize::Result<()>> {
            ::std::option::Option::Some(
                ::burrow_serialize::strategy::trivial::decode_slice_into(
                    items, reader,
                ),
            )
        }
    }
}

/// Builds the fields of a struct or variant from the reader, in order.
/// Skipped fields take their default.
fn construct(fields: &Fields) -> syn::Result<TokenStream> {
    let mut values = Vec::new();

    for (i, field) in fields.iter().enumerate() {
        let ty = &field.ty;
        let member = match &field.ident {
            Some(ident) => quote!(#ident),
            None => {
                let index = Index::from(i);
                quote!(#index)
            }
        };

        values.push(if is_skipped(field)? {
            quote!(#member: <#ty as ::std::default::Default>::default())
        } else {
            quote!(#member: reader.decode::<#ty>()?)
        });
    }

    Ok(quote!({ #(#values),* }))
}

/// `MembersMut` body plus `decode`/`decode_into` for a struct.
fn aggregate(data: &DataStruct) -> syn::Result<(TokenStream, TokenStream)> {
    let mut visits = Vec::new();
    let mut resets = Vec::new();

    for (i, field) in data.fields.iter().enumerate() {
        let ty = &field.ty;
        let (member, label) = match &field.ident {
            Some(ident) => {
                let label = ident.to_string();
                (quote!(#ident), quote!(::std::option::Option::Some(#label)))
            }
            None => {
                let index = Index::from(i);
                (quote!(#index), quote!(::std::option::Option::None))
            }
        };

        if is_skipped(field)? {
            resets.push(quote! {
                self.#member = <#ty as ::std::default::Default>::default();
            });
        } else {
            visits.push(quote! {
                visitor.visit(#label, &mut self.#member)?;
            });
        }
    }

    let construct = construct(&data.fields)?;

    let members = quote! {
        fn visit_members_mut<
            __V: ::burrow_serialize::capability::MemberVisitorMut,
        >(
            &mut self,
            visitor: &mut __V,
        ) -> ::burrow_serialize::Result<()> {
            let _ = &visitor;
            #(#visits)*
            ::std::result::Result::Ok(())
        }
    };

    let decode = quote! {
        fn decode(
            reader: &mut ::burrow_serialize::BitReader,
        ) -> ::burrow_serialize::Result<Self> {
            let _ = &reader;
            ::std::result::Result::Ok(Self #construct)
        }

        fn decode_into(
            &mut self,
            reader: &mut ::burrow_serialize::BitReader,
        ) -> ::burrow_serialize::Result<()> {
            ::burrow_serialize::strategy::aggregate::decode_into(reader, self)?;
            #(#resets)*
            ::std::result::Result::Ok(())
        }
    };

    Ok((members, decode))
}

/// `RebuildSum` body for an enum.
fn rebuild_sum(data: &DataEnum) -> syn::Result<TokenStream> {
    let variants = index_variants(data)?;
    let alternatives = variants.iter().filter(|v| v.index.is_some()).count();

    let mut arms = Vec::new();
    let mut valueless = quote!(::std::option::Option::None);

    for indexed in &variants {
        let ident = &indexed.variant.ident;

        match indexed.index {
            Some(index) => {
                let construct = construct(&indexed.variant.fields)?;
                arms.push(quote! {
                    #index => ::std::result::Result::Ok(Self::#ident #construct),
                });
            }
            None => valueless = quote!(::std::option::Option::Some(Self::#ident)),
        }
    }

    Ok(quote! {
        const ALTERNATIVES: usize = #alternatives;

        fn decode_alternative(
            index: usize,
            reader: &mut ::burrow_serialize::BitReader,
        ) -> ::burrow_serialize::Result<Self> {
            let _ = &reader;
            match index {
                #(#arms)*
                _ => ::std::result::Result::Err(
                    ::burrow_serialize::Error::InvalidIndex {
                        index: index as u64,
                        alternatives: #alternatives,
                    },
                ),
            }
        }

        fn valueless() -> ::std::option::Option<Self> {
            #valueless
        }
    })
}
