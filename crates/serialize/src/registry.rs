//! External strategy table.
//!
//! A [`Registry`] maps a type to a strategy supplied from outside the type.
//! This is the highest-priority customization form: it applies to foreign
//! types you cannot add trait impls to, and it overrides every static form a
//! type might already have.
//!
//! Attach a registry to a writer or reader with `with_registry`. The
//! resolver consults it for every value it dispatches, before looking at the
//! type's own [`Encode`](crate::Encode) / [`Decode`](crate::Decode) impl.
//!
//! Types are matched with their lifetimes erased, so a serializer registered
//! for `Label<'static>` also encodes a `Label<'a>` borrowed from local data.
//! Such a serializer only sees the value for the duration of the call and
//! must not keep references taken from it.
//!
//! Maps are written entry by entry as a key then a value, so strategies
//! registered for the key and value types apply to map entries. A strategy
//! registered for the `(K, V)` tuple does not.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use burrow_serialize::{BitWriter, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register_fn::<u32, _, _>(
//!     |writer, value| writer.encode(&u64::from(*value)),
//!     |reader| {
//!         let wide: u64 = reader.decode()?;
//!         u32::try_from(wide).map_err(burrow_serialize::Error::custom)
//!     },
//! );
//!
//! let mut writer = BitWriter::new().with_registry(Arc::new(registry));
//! writer.encode(&7u32)?; // written as eight bytes
//! ```

use std::{
    any::{Any, TypeId, type_name},
    sync::Arc,
};

use fxhash::FxHashMap;

use crate::{BitReader, BitWriter, Result};

/// An externally supplied encoder for values of type `T`.
pub trait SerializeWith<T: ?Sized>: Send + Sync {
    /// Writes `value`.
    ///
    /// # Errors
    ///
    /// Returns any error the strategy wants to report.
    fn serialize(&self, writer: &mut BitWriter, value: &T) -> Result<()>;
}

/// An externally supplied decoder for values of type `T`.
pub trait DeserializeWith<T>: Send + Sync {
    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Returns any error the strategy wants to report, including read
    /// errors from `reader`.
    fn deserialize(&self, reader: &mut BitReader) -> Result<T>;
}

/// A serializer with its value type erased, keyed by the lifetime-erased
/// identity of that type.
pub(crate) trait ErasedSerializer: Send + Sync {
    /// # Safety
    ///
    /// `value` must point to a live `&T`, where `T` is the registered type
    /// up to lifetimes.
    unsafe fn serialize_erased(
        &self,
        writer: &mut BitWriter,
        value: *const (),
    ) -> Result<()>;
}

struct Erased<T: ?Sized> {
    strategy: Arc<dyn SerializeWith<T>>,
}

impl<T: ?Sized + 'static> ErasedSerializer for Erased<T> {
    unsafe fn serialize_erased(
        &self,
        writer: &mut BitWriter,
        value: *const (),
    ) -> Result<()> {
        // SAFETY: the caller passes a pointer to a `&T` that outlives this
        // call, and the reference is not retained past it.
        let value = unsafe { *value.cast::<&T>() };
        self.strategy.serialize(writer, value)
    }
}

struct FnStrategy<S, D> {
    serialize: S,
    deserialize: D,
}

impl<T, S, D> SerializeWith<T> for FnStrategy<S, D>
where
    S: Fn(&mut BitWriter, &T) -> Result<()> + Send + Sync,
    D: Send + Sync,
{
    fn serialize(&self, writer: &mut BitWriter, value: &T) -> Result<()> {
        (self.serialize)(writer, value)
    }
}

impl<T, S, D> DeserializeWith<T> for FnStrategy<S, D>
where
    S: Send + Sync,
    D: Fn(&mut BitReader) -> Result<T> + Send + Sync,
{
    fn deserialize(&self, reader: &mut BitReader) -> Result<T> {
        (self.deserialize)(reader)
    }
}

/// A table of external strategies keyed by the type they handle.
///
/// Serializers and deserializers are stored separately, so a type can be
/// overridden in one direction only.
#[derive(Default)]
pub struct Registry {
    serializers: FxHashMap<TypeId, Arc<dyn ErasedSerializer>>,
    deserializers: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers `strategy` for both directions of `T`, replacing any
    /// previous entries.
    pub fn register<T, S>(&mut self, strategy: S)
    where
        T: 'static,
        S: SerializeWith<T> + DeserializeWith<T> + 'static,
    {
        let strategy = Arc::new(strategy);
        self.insert_serializer::<T>(strategy.clone());
        self.insert_deserializer::<T>(strategy);
    }

    /// Registers a pair of closures for `T`.
    pub fn register_fn<T, S, D>(&mut self, serialize: S, deserialize: D)
    where
        T: 'static,
        S: Fn(&mut BitWriter, &T) -> Result<()> + Send + Sync + 'static,
        D: Fn(&mut BitReader) -> Result<T> + Send + Sync + 'static,
    {
        self.register::<T, _>(FnStrategy { serialize, deserialize });
    }

    /// Registers an encode-only strategy for `T`.
    pub fn register_serializer<T, S>(&mut self, strategy: S)
    where
        T: ?Sized + 'static,
        S: SerializeWith<T> + 'static,
    {
        self.insert_serializer::<T>(Arc::new(strategy));
    }

    /// Registers a decode-only strategy for `T`.
    pub fn register_deserializer<T, S>(&mut self, strategy: S)
    where
        T: 'static,
        S: DeserializeWith<T> + 'static,
    {
        self.insert_deserializer::<T>(Arc::new(strategy));
    }

    fn insert_serializer<T: ?Sized + 'static>(
        &mut self,
        strategy: Arc<dyn SerializeWith<T>>,
    ) {
        tracing::trace!(
            ty = type_name::<T>(),
            "registered external serializer"
        );
        self.serializers
            .insert(typeid::of::<T>(), Arc::new(Erased { strategy }));
    }

    fn insert_deserializer<T: 'static>(
        &mut self,
        strategy: Arc<dyn DeserializeWith<T>>,
    ) {
        tracing::trace!(
            ty = type_name::<T>(),
            "registered external deserializer"
        );
        self.deserializers.insert(typeid::of::<T>(), Box::new(strategy));
    }

    /// Returns the serializer registered for `T`, with the value type
    /// erased.
    pub(crate) fn serializer<T: ?Sized>(
        &self,
    ) -> Option<Arc<dyn ErasedSerializer>> {
        self.serializers.get(&typeid::of::<T>()).cloned()
    }

    /// Returns the deserializer registered for `T`.
    #[must_use]
    pub fn deserializer<T: 'static>(
        &self,
    ) -> Option<Arc<dyn DeserializeWith<T>>> {
        self.deserializers
            .get(&typeid::of::<T>())
            .and_then(|boxed| {
                boxed.downcast_ref::<Arc<dyn DeserializeWith<T>>>()
            })
            .cloned()
    }

    /// Returns `true` if an encode strategy is registered for `T`.
    #[must_use]
    pub fn has_serializer<T: ?Sized>(&self) -> bool {
        self.serializers.contains_key(&typeid::of::<T>())
    }

    /// Returns `true` if a decode strategy is registered for `T`.
    #[must_use]
    pub fn has_deserializer<T: ?Sized>(&self) -> bool {
        self.deserializers.contains_key(&typeid::of::<T>())
    }

    /// Removes both strategies registered for `T`. Returns `true` if either
    /// existed.
    pub fn remove<T: ?Sized>(&mut self) -> bool {
        let key = typeid::of::<T>();
        let serializer = self.serializers.remove(&key).is_some();
        let deserializer = self.deserializers.remove(&key).is_some();
        serializer || deserializer
    }

    /// Number of types with at least one registered strategy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.serializers.len()
            + self
                .deserializers
                .keys()
                .filter(|key| !self.serializers.contains_key(key))
                .count()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty() && self.deserializers.is_empty()
    }

    /// Removes every strategy.
    pub fn clear(&mut self) {
        self.serializers.clear();
        self.deserializers.clear();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("serializers", &self.serializers.len())
            .field("deserializers", &self.deserializers.len())
            .finish()
    }
}

#[cfg(test)]
mod test;
