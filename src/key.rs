//! Type identity for components and contracts.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a component type or an abstract service type.
///
/// Wraps the `TypeId` used for lookups together with the `type_name` used
/// for diagnostics and for the name-based tie-break during resolution.
/// Trait objects get keys too: `TypeKey::of::<dyn Logger>()` is the key of
/// the `Logger` contract.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::TypeKey;
///
/// trait Logger: Send + Sync {}
/// struct ConsoleLogger;
///
/// let contract = TypeKey::of::<dyn Logger>();
/// let component = TypeKey::of::<ConsoleLogger>();
///
/// assert_eq!(contract.simple_name(), "Logger");
/// assert_eq!(component.simple_name(), "ConsoleLogger");
/// assert_ne!(contract, component);
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`, sized or not.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name as reported by `std::any::type_name`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Unqualified name without path, generic arguments or `dyn`.
    ///
    /// ```rust
    /// use ioc_wire::TypeKey;
    ///
    /// struct Wrapper<T>(T);
    /// assert_eq!(TypeKey::of::<Wrapper<u8>>().simple_name(), "Wrapper");
    /// assert_eq!(TypeKey::of::<String>().simple_name(), "String");
    /// ```
    pub fn simple_name(&self) -> &'static str {
        let path = self.path();
        path.rsplit("::").next().unwrap_or(path)
    }

    /// Module path the type is declared in (empty for primitives).
    ///
    /// ```rust
    /// use ioc_wire::TypeKey;
    ///
    /// assert_eq!(TypeKey::of::<String>().namespace(), "alloc::string");
    /// assert_eq!(TypeKey::of::<u32>().namespace(), "");
    /// ```
    pub fn namespace(&self) -> &'static str {
        let path = self.path();
        match path.rfind("::") {
            Some(pos) => &path[..pos],
            None => "",
        }
    }

    /// True when the type lives in `namespace` or one of its sub-modules.
    ///
    /// The empty namespace contains every type.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        if namespace.is_empty() {
            return true;
        }
        let own = self.namespace();
        own == namespace
            || (own.starts_with(namespace) && own[namespace.len()..].starts_with("::"))
    }

    // Name with `dyn `, auto-trait bounds and generic arguments removed.
    fn path(&self) -> &'static str {
        let name = self.name.strip_prefix("dyn ").unwrap_or(self.name);
        let end = name
            .find(|c| c == '<' || c == ' ')
            .unwrap_or(name.len());
        &name[..end]
    }
}

// TypeId-only comparison, the name is diagnostic
impl PartialEq for TypeKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod nested {
        pub trait Greeter: Send + Sync {}
        pub struct Hello;
    }

    #[test]
    fn test_namespace_of_nested_types() {
        let key = TypeKey::of::<nested::Hello>();
        assert!(key.namespace().ends_with("key::tests::nested"));
        assert!(key.in_namespace(""));
        assert!(key.in_namespace(key.namespace()));

        let parent = key.namespace().trim_end_matches("::nested");
        assert!(key.in_namespace(parent));
    }

    #[test]
    fn test_namespace_prefix_must_end_on_segment() {
        let key = TypeKey::of::<nested::Hello>();
        let partial = key.namespace().trim_end_matches("ed");
        assert!(!key.in_namespace(partial));
    }

    #[test]
    fn test_trait_object_simple_name() {
        let key = TypeKey::of::<dyn nested::Greeter>();
        assert_eq!(key.simple_name(), "Greeter");
        assert!(key.namespace().ends_with("nested"));

        let with_bounds = TypeKey::of::<dyn nested::Greeter + Send>();
        assert_eq!(with_bounds.simple_name(), "Greeter");
    }
}
