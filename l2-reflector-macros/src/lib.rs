//! `#[frame]` turns a field list into a zero-copy reader/writer.
//!
//! Every field becomes a getter on `T: AsRef<[u8]>` and a `set_<field>`
//! setter on `T: AsRef<[u8]> + AsMut<[u8]>`. Fields are `u8` or `u16`, laid
//! out back to back; `u16` is little endian.

use proc_macro::TokenStream;
use quote::{format_ident, quote, ToTokens};
use syn::{parse_macro_input, ItemStruct};

#[proc_macro_attribute]
pub fn frame(attr: TokenStream, item: TokenStream) -> TokenStream {
    let no_constructor = attr.to_string().contains("no_constructor");
    let input = parse_macro_input!(item as ItemStruct);

    let item_attr = input.attrs;
    let vis = input.vis;
    let name = input.ident;

    let mut f = quote! {
        #(#item_attr)*
        #vis struct #name<T: AsRef<[u8]>> {
            buffer: T,
        }
    };

    let mut getters = vec![];
    let mut setters = vec![];

    if !no_constructor {
        getters.push(quote! {
            /// Create a new reader/writer without checking the buffer length.
            pub fn new(buffer: T) -> Self {
                Self { buffer }
            }
        });
    }

    let mut offset = 0usize;

    for field in input.fields {
        let Some(fnname) = field.ident else {
            panic!("#[frame] only supports named fields");
        };
        let ty = field.ty;
        let doc = field.attrs.iter().find(|attr| attr.path().is_ident("doc"));

        let (width, getter, setter) = match ty.to_token_stream().to_string().as_str() {
            "u8" => (
                1,
                quote! {
                    self.buffer.as_ref()[#offset]
                },
                quote! {
                    self.buffer.as_mut()[#offset] = value;
                },
            ),
            "u16" => (
                2,
                quote! {
                    let buffer = &self.buffer.as_ref()[#offset..];
                    u16::from_le_bytes([buffer[0], buffer[1]])
                },
                quote! {
                    self.buffer.as_mut()[#offset..][..2].copy_from_slice(&value.to_le_bytes());
                },
            ),
            other => panic!("#[frame] does not support fields of type `{other}`"),
        };

        getters.push(quote! {
            #doc
            pub fn #fnname(&self) -> #ty {
                #getter
            }
        });

        let setter_name = format_ident!("set_{}", fnname);
        let setter_doc = format!("Set the `{fnname}` field.");
        setters.push(quote! {
            #[doc = #setter_doc]
            pub fn #setter_name(&mut self, value: #ty) {
                #setter
            }
        });

        offset += width;
    }

    f.extend(quote! {
        impl<T: AsRef<[u8]>> #name<T> {
            #(#getters)*

            /// Returns the size of this structure in bytes.
            pub const fn size() -> usize {
                #offset
            }
        }

        impl<T: AsRef<[u8]> + AsMut<[u8]>> #name<T> {
            #(#setters)*
        }
    });

    f.into()
}
