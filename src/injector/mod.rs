//! The injector: resolution, singleton creation and autowiring.
//!
//! An [`Injector`] is built once by [`InjectorBuilder::start`], which scans
//! the namespace, builds the [`ImplementationMapping`] and, in eager mode,
//! instantiates and wires every discovered component. After that the
//! mapping is read-only and the only shared mutable state is the singleton
//! scope.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::component::AnyArc;
use crate::config::InjectorConfig;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::fields::{DescriptorAccessor, FieldAccessor};
use crate::key::TypeKey;
use crate::registry::{ImplementationMapping, MappingEntry};
use crate::scanner::{LinkedScanner, TypeScanner};

mod scope;
mod wiring;

use scope::ApplicationScope;
use wiring::WiringStack;

/// Dependency injection container.
///
/// Cloning is cheap; clones share the mapping and the singleton scope.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::{contracts, Component, ComponentCatalog, Contract, Fields, Inject, Injector};
/// use std::sync::Arc;
///
/// pub trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// pub struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
/// impl Component for English {
///     fn contracts() -> Vec<Contract> { contracts![dyn Greeter] }
/// }
///
/// #[derive(Default)]
/// pub struct FrontDesk {
///     greeter: Inject<dyn Greeter>,
/// }
/// impl Component for FrontDesk {
///     fn injection_points() -> Fields<Self> {
///         Fields::new().field("greeter", |d| &d.greeter)
///     }
/// }
///
/// let injector = Injector::builder()
///     .scanner(ComponentCatalog::new().with::<English>().with::<FrontDesk>())
///     .start()
///     .unwrap();
///
/// let desk = injector.get_service::<FrontDesk>().unwrap();
/// assert_eq!(desk.greeter.greet(), "hello");
///
/// let greeter = injector.get_service::<dyn Greeter>().unwrap();
/// assert!(Arc::ptr_eq(desk.greeter.get().unwrap(), &greeter));
/// ```
#[derive(Clone)]
pub struct Injector {
    inner: Arc<InjectorInner>,
}

pub(crate) struct InjectorInner {
    pub(crate) mapping: ImplementationMapping,
    scope: ApplicationScope,
    pub(crate) accessor: Arc<dyn FieldAccessor>,
    pub(crate) config: InjectorConfig,
    // Serializes top-level autowiring so a half-wired graph is never observed
    wiring: Mutex<()>,
    // Components whose whole wiring subtree succeeded
    wired: RwLock<HashSet<TypeKey>>,
}

impl Injector {
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    #[inline]
    pub(crate) fn inner(&self) -> &InjectorInner {
        &self.inner
    }

    /// Picks the component that implements `contract`.
    ///
    /// With one candidate it is returned regardless of the names. With
    /// several, the qualifier (or the field name when the qualifier is
    /// absent or blank) must match exactly one candidate's simple type
    /// name, ignoring case and underscores.
    pub fn resolve(
        &self,
        contract: TypeKey,
        field_name: Option<&str>,
        qualifier: Option<&str>,
    ) -> DiResult<TypeKey> {
        self.resolve_entry(contract, field_name, qualifier)
            .map(|entry| entry.component)
    }

    pub(crate) fn resolve_entry(
        &self,
        contract: TypeKey,
        field_name: Option<&str>,
        qualifier: Option<&str>,
    ) -> DiResult<&MappingEntry> {
        let candidates = self.inner.mapping.candidates(contract);
        match candidates.len() {
            0 => Err(DiError::NoImplementationFound {
                contract: contract.name(),
            }),
            1 => Ok(candidates[0]),
            count => {
                let tie_break = qualifier
                    .filter(|q| !q.trim().is_empty())
                    .or(field_name);
                let matching: Vec<&MappingEntry> = match tie_break {
                    Some(wanted) => candidates
                        .into_iter()
                        .filter(|e| names_match(e.component.simple_name(), wanted))
                        .collect(),
                    None => Vec::new(),
                };
                match matching.as_slice() {
                    [chosen] => {
                        debug!(
                            contract = contract.name(),
                            tie_break = tie_break.unwrap_or_default(),
                            component = chosen.component.name(),
                            "resolved ambiguous contract by name"
                        );
                        Ok(*chosen)
                    }
                    _ => Err(DiError::AmbiguousImplementation {
                        contract: contract.name(),
                        count,
                    }),
                }
            }
        }
    }

    /// Returns the singleton of `component`, constructing it on first use.
    ///
    /// The returned instance is not autowired by this call.
    pub fn get_or_create(&self, component: TypeKey) -> DiResult<AnyArc> {
        let ty = self
            .inner
            .mapping
            .component(component)
            .ok_or(DiError::UnknownComponent(component.name()))?;
        self.inner.scope.get_or_create(ty)
    }

    /// Fills every injectable field of `instance`, recursively.
    ///
    /// Fields that already hold a value are left alone. Dependencies are
    /// wired unless already fully wired. Components are recorded as fully
    /// wired only when the whole call succeeds, so a failed call can be
    /// retried and fails again the same way.
    pub fn autowire(&self, component: TypeKey, instance: &AnyArc) -> DiResult<()> {
        let _wiring = self.inner.wiring.lock();
        let mut stack = WiringStack::new(self.inner.config.max_depth);
        self.wire(&mut stack, component, instance)?;
        self.inner.wired.write().extend(stack.into_completed());
        Ok(())
    }

    /// True once `component` and everything it depends on have been wired.
    pub fn is_wired(&self, component: TypeKey) -> bool {
        self.inner.wired.read().contains(&component)
    }

    /// The singleton implementing `T`.
    ///
    /// `T` is either a component type registered under itself or a contract
    /// such as `dyn Trait`.
    pub fn get_service<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lookup::<T>(None)
    }

    /// Like [`get_service`](Self::get_service), choosing among several
    /// implementations by `qualifier`.
    pub fn get_qualified<T>(&self, qualifier: &str) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lookup::<T>(Some(qualifier))
    }

    fn lookup<T>(&self, qualifier: Option<&str>) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let entry = self.resolve_entry(TypeKey::of::<T>(), None, qualifier)?;
        let instance = self.get_or_create(entry.component)?;
        if !self.is_wired(entry.component) {
            self.autowire(entry.component, &instance)?;
        }
        entry
            .contract
            .view(instance)?
            .downcast::<Arc<T>>()
            .map(|view| (*view).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    pub fn mapping(&self) -> &ImplementationMapping {
        &self.inner.mapping
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.inner.config
    }

    /// Number of singletons created so far.
    pub fn instance_count(&self) -> usize {
        self.inner.scope.len()
    }

    /// One descriptor per mapping entry.
    pub fn describe(&self) -> Vec<ServiceDescriptor> {
        self.inner
            .mapping
            .entries()
            .iter()
            .map(|entry| ServiceDescriptor {
                component: entry.component,
                contract: entry.contract.key(),
                instantiated: self.inner.scope.contains(entry.component),
            })
            .collect()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("entries", &self.inner.mapping.len())
            .field("instances", &self.inner.scope.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

// Case- and underscore-insensitive, so `foo_impl` matches `FooImpl`.
fn names_match(type_name: &str, wanted: &str) -> bool {
    fn normalize(s: &str) -> impl Iterator<Item = char> + '_ {
        s.trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
    }
    normalize(type_name).eq(normalize(wanted))
}

/// Configures and starts an [`Injector`].
pub struct InjectorBuilder {
    namespace: String,
    scanner: Box<dyn TypeScanner>,
    accessor: Arc<dyn FieldAccessor>,
    config: InjectorConfig,
}

impl InjectorBuilder {
    /// Empty namespace, [`LinkedScanner`], [`DescriptorAccessor`], default config.
    pub fn new() -> Self {
        Self {
            namespace: String::new(),
            scanner: Box::new(LinkedScanner),
            accessor: Arc::new(DescriptorAccessor),
            config: InjectorConfig::default(),
        }
    }

    /// Only components in this module path (or below) are registered.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn scanner(mut self, scanner: impl TypeScanner + 'static) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    pub fn field_accessor(mut self, accessor: impl FieldAccessor + 'static) -> Self {
        self.accessor = Arc::new(accessor);
        self
    }

    pub fn config(mut self, config: InjectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Scans, builds the mapping and, in eager mode, instantiates and wires
    /// every component. Any failure aborts startup.
    pub fn start(self) -> DiResult<Injector> {
        let started = Instant::now();
        let components = self.scanner.find_marked_types(&self.namespace)?;
        let mapping = ImplementationMapping::build(&components, self.scanner.as_ref())?;

        let injector = Injector {
            inner: Arc::new(InjectorInner {
                mapping,
                scope: ApplicationScope::new(),
                accessor: self.accessor,
                config: self.config,
                wiring: Mutex::new(()),
                wired: RwLock::new(HashSet::new()),
            }),
        };

        if injector.inner.config.eager {
            for component in &components {
                let instance = injector.get_or_create(component.key())?;
                injector.autowire(component.key(), &instance)?;
            }
        }

        info!(
            namespace = %self.namespace,
            components = components.len(),
            entries = injector.inner.mapping.len(),
            instances = injector.instance_count(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "injector started"
        );
        Ok(injector)
    }
}

impl Default for InjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
