//! Reflector configuration
//!
//! Meant to be embedded in the host application's own configuration:
//!
//! ```json
//! { "class_cache_enabled": true, "permissions": "PUBLIC_ONLY" }
//! ```
//!
//! Every field is optional.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::permissions::ReflectionPermission;
use crate::reflector::ReflectorBuilder;
use crate::registry::TypeRegistry;

/// Settings for a [`DefaultReflectorFactory`](crate::DefaultReflectorFactory)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectorConfig {
    /// Keep built reflectors and hand out the same instance per type
    pub class_cache_enabled: bool,
    /// Permissions captured by every accessor
    pub permissions: ReflectionPermission,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            class_cache_enabled: true,
            permissions: ReflectionPermission::ALL,
        }
    }
}

impl ReflectorConfig {
    /// A builder over `registry` with these permissions
    pub fn builder(&self, registry: Arc<TypeRegistry>) -> ReflectorBuilder {
        ReflectorBuilder::new(registry).with_permissions(self.permissions)
    }
}
