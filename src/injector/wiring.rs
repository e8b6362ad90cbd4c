//! Recursive field autowiring.

use std::collections::HashSet;

use tracing::{trace, warn};

use super::Injector;
use crate::component::AnyArc;
use crate::config::CyclePolicy;
use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

/// Components currently being wired on this call path, plus those whose
/// subtree finished during the current top-level autowire.
pub(crate) struct WiringStack {
    path: Vec<TypeKey>,
    completed: HashSet<TypeKey>,
    max_depth: usize,
}

impl WiringStack {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            path: Vec::new(),
            completed: HashSet::new(),
            max_depth,
        }
    }

    /// Components to publish as fully wired once the top-level call succeeds.
    pub(crate) fn into_completed(self) -> HashSet<TypeKey> {
        self.completed
    }

    fn enter(&mut self, key: TypeKey) -> DiResult<()> {
        if self.path.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.max_depth));
        }
        self.path.push(key);
        Ok(())
    }

    fn leave(&mut self) {
        self.path.pop();
    }

    fn contains(&self, key: TypeKey) -> bool {
        self.path.contains(&key)
    }

    // Current path plus the repeated component.
    fn cycle_with(&self, key: TypeKey) -> Vec<&'static str> {
        self.path
            .iter()
            .chain(std::iter::once(&key))
            .map(|k| k.name())
            .collect()
    }
}

impl Injector {
    pub(crate) fn wire(
        &self,
        stack: &mut WiringStack,
        component: TypeKey,
        instance: &AnyArc,
    ) -> DiResult<()> {
        stack.enter(component)?;
        let result = self.wire_fields(stack, component, instance);
        stack.leave();
        if result.is_ok() {
            stack.completed.insert(component);
        }
        result
    }

    fn wire_fields(
        &self,
        stack: &mut WiringStack,
        component: TypeKey,
        instance: &AnyArc,
    ) -> DiResult<()> {
        let inner = self.inner();
        let ty = inner
            .mapping
            .component(component)
            .ok_or(DiError::UnknownComponent(component.name()))?;

        for field in inner.accessor.injectable_fields(ty) {
            let entry = self.resolve_entry(field.contract(), Some(field.name()), field.qualifier())?;

            let repeated = stack.contains(entry.component);
            if repeated {
                match inner.config.cycle_policy {
                    CyclePolicy::Reject => {
                        return Err(DiError::Circular(stack.cycle_with(entry.component)));
                    }
                    CyclePolicy::Tolerate => {
                        warn!(
                            owner = component.name(),
                            field = field.name(),
                            dependency = entry.component.name(),
                            "tolerating dependency cycle"
                        );
                    }
                }
            }

            let dependency = self.get_or_create(entry.component)?;
            let view = entry.contract.view(dependency.clone())?;
            let written = inner.accessor.write_field(instance, &field, &view)?;
            trace!(
                owner = component.name(),
                field = field.name(),
                dependency = entry.component.name(),
                written,
                "field injected"
            );

            // A slot filled by an earlier, failed autowire still needs its subtree
            let finished =
                stack.completed.contains(&entry.component) || self.is_wired(entry.component);
            if !repeated && !finished {
                self.wire(stack, entry.component, &dependency)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn test_cycle_path_includes_repeated_component() {
        let mut stack = WiringStack::new(8);
        stack.enter(TypeKey::of::<A>()).unwrap();
        stack.enter(TypeKey::of::<B>()).unwrap();

        assert!(stack.contains(TypeKey::of::<A>()));
        let path = stack.cycle_with(TypeKey::of::<A>());
        assert_eq!(path.len(), 3);
        assert!(path[0].ends_with("::A"));
        assert!(path[1].ends_with("::B"));
        assert!(path[2].ends_with("::A"));
    }

    #[test]
    fn test_depth_limit() {
        let mut stack = WiringStack::new(1);
        stack.enter(TypeKey::of::<A>()).unwrap();
        assert_eq!(stack.enter(TypeKey::of::<B>()), Err(DiError::DepthExceeded(1)));

        stack.leave();
        assert!(stack.enter(TypeKey::of::<B>()).is_ok());
    }
}
