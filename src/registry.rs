//! Implementation mapping: which component implements which contract.

use std::collections::HashMap;

use tracing::debug;

use crate::component::{ComponentType, Contract};
use crate::error::DiResult;
use crate::key::TypeKey;
use crate::scanner::TypeScanner;

/// One (component, contract) pair of the mapping.
#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub component: TypeKey,
    pub contract: Contract,
}

/// Component-to-contract mapping built once at startup.
///
/// A component declaring two contracts contributes two entries; a component
/// declaring none is registered under its own type. The mapping is read-only
/// after [`build`](ImplementationMapping::build) and is queried by filtering
/// entries on the contract.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::{contracts, Component, ComponentCatalog, Contract, ImplementationMapping, TypeKey, TypeScanner};
///
/// pub trait Sink: Send + Sync {}
///
/// #[derive(Default)]
/// pub struct FileSink;
/// impl Sink for FileSink {}
/// impl Component for FileSink {
///     fn contracts() -> Vec<Contract> { contracts![dyn Sink] }
/// }
///
/// #[derive(Default)]
/// pub struct Exporter;
/// impl Component for Exporter {}
///
/// let catalog = ComponentCatalog::new().with::<FileSink>().with::<Exporter>();
/// let types = catalog.find_marked_types("").unwrap();
/// let mapping = ImplementationMapping::build(&types, &catalog).unwrap();
///
/// assert_eq!(mapping.candidates(TypeKey::of::<dyn Sink>()).len(), 1);
/// assert_eq!(mapping.candidates(TypeKey::of::<Exporter>()).len(), 1);
/// assert!(mapping.candidates(TypeKey::of::<FileSink>()).is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ImplementationMapping {
    entries: Vec<MappingEntry>,
    components: HashMap<TypeKey, ComponentType>,
}

impl ImplementationMapping {
    /// Builds the mapping for `candidates`, asking `scanner` for each one's contracts.
    pub fn build(candidates: &[ComponentType], scanner: &dyn TypeScanner) -> DiResult<Self> {
        let mut mapping = Self::default();

        for component in candidates {
            let contracts = scanner.declared_contracts(component)?;
            if contracts.is_empty() {
                mapping.insert(component, component.self_contract());
            } else {
                for contract in contracts {
                    mapping.insert(component, contract);
                }
            }
            mapping
                .components
                .insert(component.key(), component.clone());
        }

        Ok(mapping)
    }

    fn insert(&mut self, component: &ComponentType, contract: Contract) {
        let duplicate = self
            .entries
            .iter()
            .any(|e| e.component == component.key() && e.contract.key() == contract.key());
        if duplicate {
            return;
        }
        debug!(
            component = component.name(),
            contract = contract.key().name(),
            "registered implementation"
        );
        self.entries.push(MappingEntry {
            component: component.key(),
            contract,
        });
    }

    /// Entries whose contract is `contract`.
    pub fn candidates(&self, contract: TypeKey) -> Vec<&MappingEntry> {
        self.entries
            .iter()
            .filter(|e| e.contract.key() == contract)
            .collect()
    }

    /// Descriptor of a registered component.
    pub fn component(&self, key: TypeKey) -> Option<&ComponentType> {
        self.components.get(&key)
    }

    /// Registered components, sorted by type name.
    pub fn components(&self) -> Vec<&ComponentType> {
        let mut components: Vec<_> = self.components.values().collect();
        components.sort_by(|a, b| a.key().cmp(&b.key()));
        components
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
