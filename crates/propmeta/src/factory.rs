//! Reflector Factory
//!
//! Hands out one shared [`Reflector`] per type. Reflectors are built lazily
//! on the first request for a type and never mutated afterwards; they live
//! until the factory is dropped.
//!
//! Concurrent first requests for the same type are single-flight: each
//! type owns a `OnceCell`, so one caller builds while the others wait for
//! its result. A failed build leaves the cell empty, so the next request
//! builds again (and fails the same way, since builds are deterministic).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::ReflectorConfig;
use crate::error::ReflectionError;
use crate::reflector::{Reflector, ReflectorBuilder};
use crate::registry::TypeRegistry;

/// Source of per-type reflectors
pub trait ReflectorFactory: Send + Sync {
    /// Check if built reflectors are kept
    fn is_class_cache_enabled(&self) -> bool;

    /// Turn caching on or off; already cached reflectors stay cached
    fn set_class_cache_enabled(&self, enabled: bool);

    /// The reflector for `type_name`
    fn find_for_type(&self, type_name: &str) -> Result<Arc<Reflector>, ReflectionError>;
}

/// Concurrent, lazily filled reflector cache
pub struct DefaultReflectorFactory {
    builder: ReflectorBuilder,
    class_cache_enabled: AtomicBool,
    reflectors: DashMap<String, Arc<OnceCell<Arc<Reflector>>>>,
}

impl DefaultReflectorFactory {
    /// Factory with default configuration
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, &ReflectorConfig::default())
    }

    /// Factory configured by `config`
    pub fn with_config(registry: Arc<TypeRegistry>, config: &ReflectorConfig) -> Self {
        let factory = Self::with_builder(config.builder(registry));
        factory.set_class_cache_enabled(config.class_cache_enabled);
        factory
    }

    /// Factory building with a custom builder
    pub fn with_builder(builder: ReflectorBuilder) -> Self {
        Self {
            builder,
            class_cache_enabled: AtomicBool::new(true),
            reflectors: DashMap::new(),
        }
    }

    /// The registry reflectors are built from
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.builder.registry()
    }

    /// Number of types with a published reflector
    pub fn cached_count(&self) -> usize {
        self.reflectors
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    fn build(&self, type_name: &str) -> Result<Arc<Reflector>, ReflectionError> {
        self.builder.build(type_name).map(Arc::new)
    }
}

impl ReflectorFactory for DefaultReflectorFactory {
    fn is_class_cache_enabled(&self) -> bool {
        self.class_cache_enabled.load(Ordering::Acquire)
    }

    fn set_class_cache_enabled(&self, enabled: bool) {
        self.class_cache_enabled.store(enabled, Ordering::Release);
    }

    fn find_for_type(&self, type_name: &str) -> Result<Arc<Reflector>, ReflectionError> {
        if !self.is_class_cache_enabled() {
            return self.build(type_name);
        }

        // Clone the cell out so the shard lock is released before building.
        let cell = match self.reflectors.get(type_name) {
            Some(cell) => cell.value().clone(),
            None => self
                .reflectors
                .entry(type_name.to_string())
                .or_default()
                .value()
                .clone(),
        };

        cell.get_or_try_init(|| {
            debug!(type_name, "reflector cache miss");
            self.build(type_name)
        })
        .cloned()
    }
}

impl std::fmt::Debug for DefaultReflectorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultReflectorFactory")
            .field("class_cache_enabled", &self.is_class_cache_enabled())
            .field("cached", &self.cached_count())
            .finish()
    }
}
