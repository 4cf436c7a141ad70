//! The member-list strategy generator.

/// Declares a zero-sized [`Strategy`](crate::Strategy) that encodes an owner
/// type as an explicit, ordered list of its fields.
///
/// Fields are named by identifier, or by position for tuple structs. They
/// are written and read in the listed order through the resolver, so each
/// listed field's type must implement [`Encode`](crate::Encode) and
/// [`Decode`](crate::Decode). Fields left out of the list are not encoded
/// and keep their value when decoding in place.
///
/// The generated type can back the `associated` form (implement
/// `Strategy<Self>` by delegating) or the `strategy` form (name it in
/// [`DeclaresStrategy`](crate::DeclaresStrategy)).
///
/// # Example
///
/// ```ignore
/// use burrow_serialize::{DeclaresStrategy, Decode, Encode, members};
///
/// #[derive(Default, Encode, Decode)]
/// #[serialize(strategy)]
/// struct Account {
///     id: u64,
///     name: String,
///     session_cache: Vec<u8>,
/// }
///
/// members! {
///     /// Persists the account without its cache.
///     pub struct AccountFields for Account { id, name }
/// }
///
/// impl DeclaresStrategy for Account {
///     type Strategy = AccountFields;
/// }
///
/// members! {
///     struct PairFields for (u8, String) { 1, 0 }
/// }
/// ```
#[macro_export]
macro_rules! members {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident for $owner:ty { $($field:tt),* $(,)? }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::Strategy<$owner> for $name {
            fn serialize(
                writer: &mut $crate::BitWriter,
                value: &$owner,
            ) -> $crate::Result<()> {
                $(writer.encode(&value.$field)?;)*
                let _ = (writer, value);
                Ok(())
            }

            fn deserialize(
                reader: &mut $crate::BitReader,
                value: &mut $owner,
            ) -> $crate::Result<()> {
                $(reader.decode_into(&mut value.$field)?;)*
                let _ = (reader, value);
                Ok(())
            }
        }
    };
}
