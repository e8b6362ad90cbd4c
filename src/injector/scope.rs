//! Process-lifetime singleton cache.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::component::{AnyArc, ComponentType};
use crate::error::DiResult;
use crate::key::TypeKey;

/// One live instance per component type, created on first demand.
///
/// Reads take a shared lock only. Creation runs under a single creation
/// mutex and re-checks the cache inside it, so each component is
/// constructed exactly once even when several threads race for it.
/// Constructors run while the creation mutex is held and must not call
/// back into the container.
#[derive(Default)]
pub(crate) struct ApplicationScope {
    instances: RwLock<HashMap<TypeKey, AnyArc>>,
    creation: Mutex<()>,
}

impl ApplicationScope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn get(&self, key: TypeKey) -> Option<AnyArc> {
        self.instances.read().get(&key).cloned()
    }

    pub(crate) fn get_or_create(&self, component: &ComponentType) -> DiResult<AnyArc> {
        let key = component.key();

        // Fast path: already built
        if let Some(instance) = self.get(key) {
            return Ok(instance);
        }

        let _creating = self.creation.lock();
        if let Some(instance) = self.get(key) {
            return Ok(instance);
        }

        let instance = component.instantiate()?;
        self.instances.write().insert(key, instance.clone());
        debug!(component = component.name(), "instantiated singleton");
        Ok(instance)
    }

    pub(crate) fn contains(&self, key: TypeKey) -> bool {
        self.instances.read().contains_key(&key)
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;
    use crate::Component;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    #[derive(Default)]
    struct Plain;

    impl Component for Plain {}

    static RACED: AtomicUsize = AtomicUsize::new(0);

    struct Raced;

    impl Default for Raced {
        fn default() -> Self {
            RACED.fetch_add(1, Ordering::SeqCst);
            Raced
        }
    }

    impl Component for Raced {}

    #[derive(Default)]
    struct Broken;

    impl Component for Broken {
        fn construct() -> Result<Self, crate::ConstructError> {
            Err("no connection".into())
        }
    }

    #[test]
    fn test_same_instance_returned() {
        let scope = ApplicationScope::new();
        let ty = ComponentType::of::<Plain>();

        let a = scope.get_or_create(&ty).unwrap();
        let b = scope.get_or_create(&ty).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(scope.contains(ty.key()));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_concurrent_creation_constructs_once() {
        let scope = ApplicationScope::new();
        let ty = ComponentType::of::<Raced>();
        let barrier = Barrier::new(8);

        let instances: Vec<AnyArc> = crossbeam_utils::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|_| {
                        barrier.wait();
                        scope.get_or_create(&ty).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        })
        .unwrap();

        assert_eq!(RACED.load(Ordering::SeqCst), 1);
        assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
    }

    #[test]
    fn test_failed_construction_is_not_cached() {
        let scope = ApplicationScope::new();
        let ty = ComponentType::of::<Broken>();

        assert!(matches!(
            scope.get_or_create(&ty),
            Err(DiError::InstantiationFailed { .. })
        ));
        assert!(!scope.contains(ty.key()));
    }
}
