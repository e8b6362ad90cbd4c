//! Component types and the contracts they declare.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::fields::{FieldDescriptor, Fields};
use crate::key::TypeKey;

/// Type-erased `Arc` used for stored instances and contract views.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Error a fallible [`Component::construct`] may return.
pub type ConstructError = Box<dyn Error + Send + Sync>;

/// A type the container may instantiate and wire.
///
/// `Default` is the zero-argument constructor. Components declare the
/// abstract types they implement through [`contracts`](Component::contracts)
/// and their injectable fields through
/// [`injection_points`](Component::injection_points).
///
/// # Examples
///
/// ```rust
/// use ioc_wire::{contracts, Component, Contract, Fields, Inject};
///
/// pub trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// #[derive(Default)]
/// pub struct FixedClock;
///
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 42 }
/// }
///
/// impl Component for FixedClock {
///     fn contracts() -> Vec<Contract> {
///         contracts![dyn Clock]
///     }
/// }
///
/// #[derive(Default)]
/// pub struct Scheduler {
///     clock: Inject<dyn Clock>,
/// }
///
/// impl Component for Scheduler {
///     fn injection_points() -> Fields<Self> {
///         Fields::new().field("clock", |s| &s.clock)
///     }
/// }
/// ```
pub trait Component: Default + Send + Sync + 'static {
    /// Builds a fresh instance; defaults to `Default::default`.
    fn construct() -> Result<Self, ConstructError> {
        Ok(Self::default())
    }

    /// Abstract types this component is registered under.
    ///
    /// An empty list registers the component under its own type.
    fn contracts() -> Vec<Contract> {
        Vec::new()
    }

    /// Fields the container fills after construction.
    fn injection_points() -> Fields<Self> {
        Fields::new()
    }
}

type Upcast = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

/// An abstract service type together with the conversion into it.
///
/// The conversion turns the stored concrete instance into the contract
/// view, an `Arc<Arc<T>>` erased to [`AnyArc`]. Storing `Arc<T>` inside the
/// `Any` lets trait objects travel through the same path as sized types.
#[derive(Clone)]
pub struct Contract {
    key: TypeKey,
    upcast: Upcast,
}

impl Contract {
    /// Contract `T` implemented by component `C`.
    ///
    /// `cast` is the unsizing coercion, usually written `|it| it`.
    pub fn of<T, C>(cast: fn(Arc<C>) -> Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        C: Component,
    {
        let upcast = move |instance: AnyArc| -> DiResult<AnyArc> {
            let concrete = instance
                .downcast::<C>()
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<C>()))?;
            Ok(Arc::new(cast(concrete)) as AnyArc)
        };
        Self {
            key: TypeKey::of::<T>(),
            upcast: Arc::new(upcast),
        }
    }

    /// The component registered under its own type.
    pub fn itself<C: Component>() -> Self {
        Self::of::<C, C>(|it| it)
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Converts a stored instance into the contract view.
    pub(crate) fn view(&self, instance: AnyArc) -> DiResult<AnyArc> {
        (self.upcast)(instance)
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Contract").field(&self.key.name()).finish()
    }
}

/// Builds a `Vec<Contract>` for the implementing component.
///
/// Must be used inside `impl Component for ...`, it relies on `Self`.
///
/// ```rust
/// use ioc_wire::{contracts, Component, Contract};
///
/// pub trait Reader: Send + Sync {}
/// pub trait Writer: Send + Sync {}
///
/// #[derive(Default)]
/// pub struct Pipe;
/// impl Reader for Pipe {}
/// impl Writer for Pipe {}
///
/// impl Component for Pipe {
///     fn contracts() -> Vec<Contract> {
///         contracts![dyn Reader, dyn Writer]
///     }
/// }
///
/// assert_eq!(Pipe::contracts().len(), 2);
/// ```
#[macro_export]
macro_rules! contracts {
    ($($contract:ty),* $(,)?) => {
        ::std::vec![$($crate::Contract::of::<$contract, Self>(|it| it)),*]
    };
}

/// Runtime descriptor of a component type.
///
/// Produced by [`ComponentType::of`]; this is what type scanners hand to
/// the registry builder.
#[derive(Clone)]
pub struct ComponentType {
    key: TypeKey,
    construct: fn() -> DiResult<AnyArc>,
    contracts: fn() -> Vec<Contract>,
    itself: fn() -> Contract,
    fields: fn() -> Vec<FieldDescriptor>,
}

impl ComponentType {
    pub fn of<C: Component>() -> Self {
        Self {
            key: TypeKey::of::<C>(),
            construct: construct_erased::<C>,
            contracts: C::contracts,
            itself: Contract::itself::<C>,
            fields: fields_of::<C>,
        }
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// Contracts as declared by the component itself.
    pub fn declared_contracts(&self) -> Vec<Contract> {
        (self.contracts)()
    }

    /// Contract for registering the component under its own type.
    pub fn self_contract(&self) -> Contract {
        (self.itself)()
    }

    /// Injectable fields as declared by the component itself.
    pub fn declared_fields(&self) -> Vec<FieldDescriptor> {
        (self.fields)()
    }

    /// Runs the zero-argument constructor.
    ///
    /// Panics inside the constructor are caught and reported as
    /// `InstantiationFailed`, the same as an `Err` from `construct`.
    pub fn instantiate(&self) -> DiResult<AnyArc> {
        match panic::catch_unwind(AssertUnwindSafe(self.construct)) {
            Ok(result) => result,
            Err(payload) => Err(DiError::InstantiationFailed {
                component: self.name(),
                cause: panic_message(payload.as_ref()),
            }),
        }
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentType").field(&self.key.name()).finish()
    }
}

fn construct_erased<C: Component>() -> DiResult<AnyArc> {
    C::construct()
        .map(|instance| Arc::new(instance) as AnyArc)
        .map_err(|cause| DiError::InstantiationFailed {
            component: std::any::type_name::<C>(),
            cause: cause.to_string(),
        })
}

fn fields_of<C: Component>() -> Vec<FieldDescriptor> {
    C::injection_points().into_descriptors()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "constructor panicked".to_string()
    }
}
