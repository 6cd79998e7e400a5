use std::borrow::Cow;
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, FieldsNamed, FieldsUnnamed, Type};

/// Count type from a `#[list(..)]` attribute, if present.
fn list_count_type(field: &syn::Field) -> syn::Result<Option<Type>> {
	let mut count_type = None;
	for attr in &field.attrs {
		if attr.path().is_ident("list") {
			if count_type.is_some() {
				return Err(syn::Error::new_spanned(attr, "`list` used more than once"));
			}
			count_type = Some(attr.parse_args::<Type>()?);
		}
	}
	Ok(count_type)
}

fn read_derive_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
	let (fields, tuple) = match &input.data {
		Data::Struct(DataStruct { fields: Fields::Named(FieldsNamed { named, .. }), .. }) => (named, false),
		Data::Struct(DataStruct { fields: Fields::Unnamed(FieldsUnnamed { unnamed, .. }), .. }) => (unnamed, true),
		_ => return Err(syn::Error::new_spanned(input, "only tuple structs or structs with named fields supported")),
	};
	let mut body = quote! {};
	let mut initializer = quote! {};
	let mut tuple_field_num = 0u8..;
	for field in fields {
		let field_expr = match list_count_type(field)? {
			//read a count, then that many items
			Some(count_type) => quote! { phd_reader::read_list::<_, _, #count_type>(reader)? },
			None => quote! { phd_reader::Readable::read(reader)? },
		};
		let field_ident = match &field.ident {
			Some(field_ident) => Cow::Borrowed(field_ident),
			None => Cow::Owned(Ident::new(&format!("field{}", tuple_field_num.next().unwrap()), Span::call_site())),
		};
		body = quote! {
			#body
			let #field_ident = #field_expr;
		};
		initializer = quote! { #initializer #field_ident, };
	}
	initializer = if tuple { quote! { (#initializer) } } else { quote! { {#initializer} } };
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let type_name = &input.ident;
	Ok(quote! {
		impl #impl_generics phd_reader::Readable for #type_name #ty_generics #where_clause {
			fn read<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
				#body
				Ok(#type_name #initializer)
			}
		}
	})
}

/// Reads each field in declaration order. `#[list(u16)]` or `#[list(u32)]` on a `Box<[T]>` field
/// reads a little-endian count of that width first.
#[proc_macro_derive(Readable, attributes(list))]
pub fn read_derive(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(tokens as DeriveInput);
	read_derive_impl(&input).unwrap_or_else(syn::Error::into_compile_error).into()
}
