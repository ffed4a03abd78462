//! Runtime-type keyed registry of type proxies

use super::primitive::{
    BoolTypeProxy, CharTypeProxy, DateTimeOffsetTypeProxy, DecimalTypeProxy, FloatTypeProxy,
    IntegerTypeProxy, NaiveDateTimeTypeProxy, StringTypeProxy,
};
use super::TypeProxy;
use crate::errors::{CommandError, Result};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

/// Maps a value type to its proxy
///
/// Entries are stored type-erased as `Rc<dyn TypeProxy<T>>` boxed in `Any`
/// and recovered by downcasting on lookup.
#[derive(Default)]
pub struct TypeProxyRegistry {
    proxies: HashMap<TypeId, Box<dyn Any>>,
}

impl TypeProxyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in proxies
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert::<bool>(Rc::new(BoolTypeProxy));
        registry.insert::<char>(Rc::new(CharTypeProxy));
        registry.insert::<i8>(Rc::new(IntegerTypeProxy::<i8>::default()));
        registry.insert::<i16>(Rc::new(IntegerTypeProxy::<i16>::default()));
        registry.insert::<i32>(Rc::new(IntegerTypeProxy::<i32>::default()));
        registry.insert::<i64>(Rc::new(IntegerTypeProxy::<i64>::default()));
        registry.insert::<u8>(Rc::new(IntegerTypeProxy::<u8>::default()));
        registry.insert::<u16>(Rc::new(IntegerTypeProxy::<u16>::default()));
        registry.insert::<u32>(Rc::new(IntegerTypeProxy::<u32>::default()));
        registry.insert::<u64>(Rc::new(IntegerTypeProxy::<u64>::default()));
        registry.insert::<f32>(Rc::new(FloatTypeProxy::<f32>::default()));
        registry.insert::<f64>(Rc::new(FloatTypeProxy::<f64>::default()));
        registry.insert::<rust_decimal::Decimal>(Rc::new(DecimalTypeProxy));
        registry.insert::<String>(Rc::new(StringTypeProxy));
        registry.insert::<chrono::NaiveDateTime>(Rc::new(NaiveDateTimeTypeProxy));
        registry.insert::<chrono::DateTime<chrono::FixedOffset>>(Rc::new(DateTimeOffsetTypeProxy));
        registry
    }

    fn insert<T: 'static>(&mut self, proxy: Rc<dyn TypeProxy<T>>) {
        self.proxies.insert(TypeId::of::<T>(), Box::new(proxy));
    }

    /// Register the proxy for `T`
    ///
    /// # Errors
    ///
    /// Returns `CommandError::DuplicateTypeProxy` if `T` already has one.
    pub fn add<T: 'static>(&mut self, proxy: Rc<dyn TypeProxy<T>>) -> Result<()> {
        if self.contains::<T>() {
            return Err(CommandError::DuplicateTypeProxy {
                type_name: type_name::<T>(),
            });
        }
        self.insert(proxy);
        Ok(())
    }

    /// Look up the proxy for `T`
    ///
    /// # Errors
    ///
    /// Returns `CommandError::MissingTypeProxy` if none is registered.
    pub fn get<T: 'static>(&self) -> Result<Rc<dyn TypeProxy<T>>> {
        self.proxies
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Rc<dyn TypeProxy<T>>>())
            .cloned()
            .ok_or(CommandError::MissingTypeProxy {
                type_name: type_name::<T>(),
            })
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.proxies.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}
