//! Tie-break tests for contracts with several implementations.
//!
//! The qualifier wins over the field name; both are matched against the
//! implementation's simple type name ignoring case and underscores.

use ioc_wire::{
    contracts, Component, ComponentCatalog, Contract, DiError, Fields, Inject, Injector, TypeKey,
};

pub trait Baz: Send + Sync {
    fn name(&self) -> &'static str;
}

#[derive(Default)]
pub struct FooImpl;

impl Baz for FooImpl {
    fn name(&self) -> &'static str {
        "foo"
    }
}

impl Component for FooImpl {
    fn contracts() -> Vec<Contract> {
        contracts![dyn Baz]
    }
}

#[derive(Default)]
pub struct BarImpl;

impl Baz for BarImpl {
    fn name(&self) -> &'static str {
        "bar"
    }
}

impl Component for BarImpl {
    fn contracts() -> Vec<Contract> {
        contracts![dyn Baz]
    }
}

fn injector() -> Injector {
    Injector::builder()
        .scanner(ComponentCatalog::new().with::<FooImpl>().with::<BarImpl>())
        .start()
        .unwrap()
}

#[test]
fn test_field_name_picks_implementation() {
    let injector = injector();
    let chosen = injector
        .resolve(TypeKey::of::<dyn Baz>(), Some("fooImpl"), None)
        .unwrap();
    assert_eq!(chosen, TypeKey::of::<FooImpl>());
}

#[test]
fn test_qualifier_picks_implementation() {
    let injector = injector();
    let chosen = injector
        .resolve(TypeKey::of::<dyn Baz>(), None, Some("barImpl"))
        .unwrap();
    assert_eq!(chosen, TypeKey::of::<BarImpl>());
}

#[test]
fn test_qualifier_overrides_field_name() {
    let injector = injector();
    let chosen = injector
        .resolve(TypeKey::of::<dyn Baz>(), Some("fooImpl"), Some("BARIMPL"))
        .unwrap();
    assert_eq!(chosen, TypeKey::of::<BarImpl>());
}

#[test]
fn test_blank_qualifier_falls_back_to_field_name() {
    let injector = injector();
    let chosen = injector
        .resolve(TypeKey::of::<dyn Baz>(), Some("foo_impl"), Some("   "))
        .unwrap();
    assert_eq!(chosen, TypeKey::of::<FooImpl>());
}

#[test]
fn test_unmatched_name_is_ambiguous() {
    let injector = injector();

    for (field, qualifier) in [(Some("qux"), None), (None, None), (None, Some("bazImpl"))] {
        match injector.resolve(TypeKey::of::<dyn Baz>(), field, qualifier) {
            Err(DiError::AmbiguousImplementation { contract, count }) => {
                assert!(contract.contains("Baz"));
                assert_eq!(count, 2);
            }
            other => panic!("Expected AmbiguousImplementation, got {:?}", other),
        }
    }
}

#[test]
fn test_get_qualified_service() {
    let injector = injector();

    assert_eq!(injector.get_qualified::<dyn Baz>("fooImpl").unwrap().name(), "foo");
    assert_eq!(injector.get_qualified::<dyn Baz>("bar_impl").unwrap().name(), "bar");
    assert!(matches!(
        injector.get_service::<dyn Baz>(),
        Err(DiError::AmbiguousImplementation { count: 2, .. })
    ));
}

// ===== Field wiring through the tie-break =====

#[derive(Default)]
pub struct Consumer {
    foo_impl: Inject<dyn Baz>,
    preferred: Inject<dyn Baz>,
}

impl Component for Consumer {
    fn injection_points() -> Fields<Self> {
        Fields::new()
            .field("foo_impl", |c: &Self| &c.foo_impl)
            .qualified("preferred", "barImpl", |c| &c.preferred)
    }
}

#[test]
fn test_fields_wired_by_name_and_qualifier() {
    let injector = Injector::builder()
        .scanner(
            ComponentCatalog::new()
                .with::<FooImpl>()
                .with::<BarImpl>()
                .with::<Consumer>(),
        )
        .start()
        .unwrap();

    let consumer = injector.get_service::<Consumer>().unwrap();
    assert_eq!(consumer.foo_impl.name(), "foo");
    assert_eq!(consumer.preferred.name(), "bar");
}

#[derive(Default)]
pub struct Confused {
    baz: Inject<dyn Baz>,
}

impl Component for Confused {
    fn injection_points() -> Fields<Self> {
        Fields::new().field("baz", |c| &c.baz)
    }
}

#[test]
fn test_unmatched_field_aborts_startup() {
    let result = Injector::builder()
        .scanner(
            ComponentCatalog::new()
                .with::<FooImpl>()
                .with::<BarImpl>()
                .with::<Confused>(),
        )
        .start();
    assert!(matches!(
        result,
        Err(DiError::AmbiguousImplementation { count: 2, .. })
    ));
}

mod lookalike {
    use super::Baz;
    use ioc_wire::{contracts, Component, Contract};

    // Same simple name as the outer FooImpl, different module
    #[derive(Default)]
    pub struct FooImpl;

    impl Baz for FooImpl {
        fn name(&self) -> &'static str {
            "other foo"
        }
    }

    impl Component for FooImpl {
        fn contracts() -> Vec<Contract> {
            contracts![dyn Baz]
        }
    }
}

#[test]
fn test_name_matching_several_candidates_is_ambiguous() {
    let injector = Injector::builder()
        .scanner(
            ComponentCatalog::new()
                .with::<FooImpl>()
                .with::<lookalike::FooImpl>()
                .with::<BarImpl>(),
        )
        .start()
        .unwrap();

    assert!(matches!(
        injector.resolve(TypeKey::of::<dyn Baz>(), Some("fooImpl"), None),
        Err(DiError::AmbiguousImplementation { count: 3, .. })
    ));
}
