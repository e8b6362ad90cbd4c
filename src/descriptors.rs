//! Service descriptors for introspection and diagnostics.

use std::fmt;

use crate::key::TypeKey;

/// One entry of the implementation mapping as seen from outside.
///
/// Useful for startup logs, health checks and tests that assert on the
/// container's configuration.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::{contracts, Component, ComponentCatalog, Contract, Injector, InjectorConfig, TypeKey};
///
/// pub trait Cache: Send + Sync {}
///
/// #[derive(Default)]
/// pub struct MemoryCache;
/// impl Cache for MemoryCache {}
/// impl Component for MemoryCache {
///     fn contracts() -> Vec<Contract> { contracts![dyn Cache] }
/// }
///
/// let injector = Injector::builder()
///     .scanner(ComponentCatalog::new().with::<MemoryCache>())
///     .config(InjectorConfig::default().with_eager(false))
///     .start()
///     .unwrap();
///
/// let before = injector.describe();
/// assert_eq!(before.len(), 1);
/// assert_eq!(before[0].contract, TypeKey::of::<dyn Cache>());
/// assert!(!before[0].instantiated);
///
/// injector.get_service::<dyn Cache>().unwrap();
/// assert!(injector.describe()[0].instantiated);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Implementation type
    pub component: TypeKey,
    /// Abstract type it is registered under
    pub contract: TypeKey,
    /// Whether the singleton exists yet
    pub instantiated: bool,
}

impl ServiceDescriptor {
    /// True for components registered under their own type.
    pub fn is_self_registered(&self) -> bool {
        self.component == self.contract
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}{}",
            self.contract.simple_name(),
            self.component.simple_name(),
            if self.instantiated { " (live)" } else { "" }
        )
    }
}
