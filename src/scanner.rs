//! Component discovery.
//!
//! Components are found through a [`TypeScanner`]. Two scanners ship with
//! the crate:
//!
//! - [`LinkedScanner`] reads the compile-time registry filled by the
//!   [`component!`](crate::component!) macro (a `linkme` distributed slice);
//! - [`ComponentCatalog`] is an explicit registration list built in code.
//!
//! Both filter by namespace, drop duplicates and return components sorted by
//! type name so startup order does not depend on link order.

use std::collections::HashSet;

use crate::component::{Component, ComponentType, Contract};
use crate::error::{DiError, DiResult};

/// Discovers component types and their declared contracts.
pub trait TypeScanner: Send + Sync {
    /// Components declared in `namespace` or below it.
    fn find_marked_types(&self, namespace: &str) -> DiResult<Vec<ComponentType>>;

    /// Contracts `component` is registered under.
    fn declared_contracts(&self, component: &ComponentType) -> DiResult<Vec<Contract>> {
        Ok(component.declared_contracts())
    }
}

/// Entry of the compile-time component registry.
pub struct ComponentEntry {
    pub describe: fn() -> ComponentType,
}

/// Every type registered with [`component!`](crate::component!), across all linked crates.
#[linkme::distributed_slice]
pub static COMPONENTS: [ComponentEntry] = [..];

/// Registers a type in the compile-time component registry.
///
/// The type must implement [`Component`](crate::Component). Registration
/// happens at link time; [`LinkedScanner`] picks it up.
///
/// ```rust
/// use ioc_wire::{component, Component};
///
/// #[derive(Default)]
/// pub struct HealthCheck;
/// impl Component for HealthCheck {}
///
/// component!(HealthCheck);
/// ```
#[macro_export]
macro_rules! component {
    ($($ty:ty),+ $(,)?) => {
        $(
            const _: () = {
                #[$crate::__linkme::distributed_slice($crate::COMPONENTS)]
                #[linkme(crate = $crate::__linkme)]
                static ENTRY: $crate::ComponentEntry = $crate::ComponentEntry {
                    describe: $crate::ComponentType::of::<$ty>,
                };
            };
        )+
    };
}

/// Scanner over the compile-time component registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedScanner;

impl TypeScanner for LinkedScanner {
    fn find_marked_types(&self, namespace: &str) -> DiResult<Vec<ComponentType>> {
        validate_namespace(namespace)?;
        Ok(select(COMPONENTS.iter().map(|entry| (entry.describe)()), namespace))
    }
}

/// Explicit component registration.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::{Component, ComponentCatalog, TypeScanner};
///
/// #[derive(Default)]
/// pub struct Mailer;
/// impl Component for Mailer {}
///
/// let catalog = ComponentCatalog::new().with::<Mailer>();
/// let found = catalog.find_marked_types("").unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ComponentCatalog {
    components: Vec<ComponentType>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `C`; registering the same type twice keeps one entry.
    pub fn register<C: Component>(&mut self) -> &mut Self {
        self.register_type(ComponentType::of::<C>())
    }

    pub fn with<C: Component>(mut self) -> Self {
        self.register::<C>();
        self
    }

    /// Adds an already described component type, unless already present.
    pub fn register_type(&mut self, component: ComponentType) -> &mut Self {
        if !self.components.iter().any(|c| c.key() == component.key()) {
            self.components.push(component);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl TypeScanner for ComponentCatalog {
    fn find_marked_types(&self, namespace: &str) -> DiResult<Vec<ComponentType>> {
        validate_namespace(namespace)?;
        Ok(select(self.components.iter().cloned(), namespace))
    }
}

fn select(components: impl Iterator<Item = ComponentType>, namespace: &str) -> Vec<ComponentType> {
    let mut seen = HashSet::new();
    let mut selected: Vec<ComponentType> = components
        .filter(|c| c.key().in_namespace(namespace))
        .filter(|c| seen.insert(c.key()))
        .collect();
    selected.sort_by(|a, b| a.key().cmp(&b.key()));
    selected
}

/// Checks that `namespace` is empty or a `::`-separated path of identifiers.
pub(crate) fn validate_namespace(namespace: &str) -> DiResult<()> {
    if namespace.is_empty() {
        return Ok(());
    }
    for segment in namespace.split("::") {
        let mut chars = segment.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_alphabetic() || first == '_')
                    && chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            None => false,
        };
        if !valid {
            return Err(DiError::ScanFailure(format!(
                "invalid namespace '{}': bad segment '{}'",
                namespace, segment
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::TypeKey;

    mod billing {
        use crate::Component;

        #[derive(Default)]
        pub struct Invoices;
        impl Component for Invoices {}

        #[derive(Default)]
        pub struct Alpha;
        impl Component for Alpha {}
    }

    mod shipping {
        use crate::Component;

        #[derive(Default)]
        pub struct Parcels;
        impl Component for Parcels {}
    }

    crate::component!(billing::Invoices, shipping::Parcels);

    fn billing_namespace() -> &'static str {
        TypeKey::of::<billing::Invoices>().namespace()
    }

    #[test]
    fn test_catalog_filters_by_namespace() {
        let catalog = ComponentCatalog::new()
            .with::<billing::Invoices>()
            .with::<shipping::Parcels>();

        let found = catalog.find_marked_types(billing_namespace()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key(), TypeKey::of::<billing::Invoices>());
    }

    #[test]
    fn test_catalog_deduplicates_and_sorts() {
        let catalog = ComponentCatalog::new()
            .with::<billing::Invoices>()
            .with::<billing::Alpha>()
            .with::<billing::Invoices>();

        assert_eq!(catalog.len(), 2);

        let found = catalog.find_marked_types("").unwrap();
        let names: Vec<_> = found.iter().map(|c| c.key().simple_name()).collect();
        assert_eq!(names, vec!["Alpha", "Invoices"]);
    }

    #[test]
    fn test_linked_scanner_sees_macro_registrations() {
        let found = LinkedScanner.find_marked_types(billing_namespace()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key(), TypeKey::of::<billing::Invoices>());

        let parent = billing_namespace().trim_end_matches("::billing");
        let both = LinkedScanner.find_marked_types(parent).unwrap();
        assert!(both.iter().any(|c| c.key() == TypeKey::of::<shipping::Parcels>()));
    }

    #[test]
    fn test_invalid_namespace_is_scan_failure() {
        for bad in ["app::::svc", "app::", "::app", "app svc", "9app"] {
            let result = ComponentCatalog::new().find_marked_types(bad);
            assert!(matches!(result, Err(DiError::ScanFailure(_))), "accepted {bad}");
        }
    }
}
