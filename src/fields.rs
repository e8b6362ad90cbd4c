//! Injectable field descriptors and the field-accessor capability.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::component::{AnyArc, ComponentType};
use crate::error::{DiError, DiResult};
use crate::inject::Inject;
use crate::key::TypeKey;

type FieldWriter = Arc<dyn Fn(&(dyn Any + Send + Sync), &AnyArc) -> DiResult<bool> + Send + Sync>;

/// One injectable field of a component.
///
/// Carries the owning component, the field name, the declared contract and
/// an optional qualifier. The name and qualifier feed the tie-break when
/// several components implement the contract.
#[derive(Clone)]
pub struct FieldDescriptor {
    owner: TypeKey,
    name: &'static str,
    contract: TypeKey,
    qualifier: Option<&'static str>,
    writer: FieldWriter,
}

impl FieldDescriptor {
    #[inline]
    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared abstract type of the field.
    #[inline]
    pub fn contract(&self) -> TypeKey {
        self.contract
    }

    #[inline]
    pub fn qualifier(&self) -> Option<&'static str> {
        self.qualifier
    }

    /// Writes a contract view into the field of `owner`.
    ///
    /// Returns `false` when the slot was already filled.
    pub fn write(&self, owner: &(dyn Any + Send + Sync), value: &AnyArc) -> DiResult<bool> {
        (self.writer)(owner, value)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("owner", &self.owner.name())
            .field("name", &self.name)
            .field("contract", &self.contract.name())
            .field("qualifier", &self.qualifier)
            .finish()
    }
}

/// Builder for the injectable fields of component `O`.
///
/// Each field is named and mapped to its [`Inject`] slot with a plain
/// projection function.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::{Component, Fields, Inject};
///
/// pub trait Store: Send + Sync {}
///
/// #[derive(Default)]
/// pub struct Audited {
///     audit_store: Inject<dyn Store>,
/// }
///
/// impl Component for Audited {
///     fn injection_points() -> Fields<Self> {
///         Fields::new().field("audit_store", |s| &s.audit_store)
///     }
/// }
///
/// #[derive(Default)]
/// pub struct Orders {
///     audit: Audited,
///     primary: Inject<dyn Store>,
/// }
///
/// impl Component for Orders {
///     fn injection_points() -> Fields<Self> {
///         Fields::new()
///             .qualified("primary", "postgresStore", |s: &Self| &s.primary)
///             .embed(|s| &s.audit)
///     }
/// }
///
/// let fields = Orders::injection_points().into_descriptors();
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields[0].qualifier(), Some("postgresStore"));
/// assert_eq!(fields[1].name(), "audit_store");
/// ```
pub struct Fields<O> {
    descriptors: Vec<FieldDescriptor>,
    _owner: PhantomData<fn(&O)>,
}

impl<O: Send + Sync + 'static> Fields<O> {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Declares field `name` resolved by its contract `T`.
    pub fn field<T>(self, name: &'static str, project: fn(&O) -> &Inject<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.push(name, None, project)
    }

    /// Declares field `name` with an explicit qualifier for the tie-break.
    pub fn qualified<T>(
        self,
        name: &'static str,
        qualifier: &'static str,
        project: fn(&O) -> &Inject<T>,
    ) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.push(name, Some(qualifier), project)
    }

    /// Lifts the injectable fields of an embedded component into `O`.
    pub fn embed<B>(mut self, project: fn(&O) -> &B) -> Self
    where
        B: crate::Component,
    {
        for inner in B::injection_points().descriptors {
            let writer = inner.writer.clone();
            let lifted = move |owner: &(dyn Any + Send + Sync), value: &AnyArc| -> DiResult<bool> {
                let owner = owner
                    .downcast_ref::<O>()
                    .ok_or(DiError::TypeMismatch(std::any::type_name::<O>()))?;
                let embedded: &(dyn Any + Send + Sync) = project(owner);
                writer(embedded, value)
            };
            self.descriptors.push(FieldDescriptor {
                owner: TypeKey::of::<O>(),
                writer: Arc::new(lifted),
                ..inner
            });
        }
        self
    }

    pub fn into_descriptors(self) -> Vec<FieldDescriptor> {
        self.descriptors
    }

    fn push<T>(
        mut self,
        name: &'static str,
        qualifier: Option<&'static str>,
        project: fn(&O) -> &Inject<T>,
    ) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let writer = move |owner: &(dyn Any + Send + Sync), value: &AnyArc| -> DiResult<bool> {
            let owner = owner
                .downcast_ref::<O>()
                .ok_or(DiError::TypeMismatch(std::any::type_name::<O>()))?;
            let value = value
                .downcast_ref::<Arc<T>>()
                .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))?;
            Ok(project(owner).fill(value.clone()))
        };
        self.descriptors.push(FieldDescriptor {
            owner: TypeKey::of::<O>(),
            name,
            contract: TypeKey::of::<T>(),
            qualifier,
            writer: Arc::new(writer),
        });
        self
    }
}

impl<O: Send + Sync + 'static> Default for Fields<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads and writes injectable fields.
///
/// The default [`DescriptorAccessor`] uses what components declare in
/// [`Component::injection_points`](crate::Component::injection_points).
/// A custom accessor can filter, rename or audit field writes.
pub trait FieldAccessor: Send + Sync {
    /// Injectable fields of `component`, including embedded ones.
    fn injectable_fields(&self, component: &ComponentType) -> Vec<FieldDescriptor>;

    /// Writes `value` (a contract view) into `field` of `instance`.
    ///
    /// Returns `false` when the field already held a value.
    fn write_field(
        &self,
        instance: &AnyArc,
        field: &FieldDescriptor,
        value: &AnyArc,
    ) -> DiResult<bool>;
}

/// Field accessor backed by the component's own field declarations.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptorAccessor;

impl FieldAccessor for DescriptorAccessor {
    fn injectable_fields(&self, component: &ComponentType) -> Vec<FieldDescriptor> {
        component.declared_fields()
    }

    fn write_field(
        &self,
        instance: &AnyArc,
        field: &FieldDescriptor,
        value: &AnyArc,
    ) -> DiResult<bool> {
        field.write(instance.as_ref(), value)
    }
}
