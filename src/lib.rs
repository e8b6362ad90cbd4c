//! # ioc-wire
//!
//! Minimal inversion-of-control container: components are discovered at
//! startup, mapped to the abstract types they implement, instantiated once
//! and wired field by field.
//!
//! ## Features
//!
//! - **Registry-based resolution**: one implementation per contract, with a
//!   qualifier or field-name tie-break when several exist
//! - **Process-wide singletons**: each component is constructed exactly once,
//!   even under concurrent first access
//! - **Recursive autowiring**: `Inject<dyn Trait>` fields are filled after
//!   construction, dependencies first wired in turn
//! - **Cycle detection**: cyclic graphs fail fast with the full path, or are
//!   tolerated on request
//! - **Compile-time registration**: `component!` registers types at link time,
//!   `ComponentCatalog` registers them explicitly
//!
//! ## Quick Start
//!
//! ```rust
//! use ioc_wire::{contracts, Component, ComponentCatalog, Contract, Fields, Inject, Injector};
//!
//! pub trait UserAccountService: Send + Sync {
//!     fn account_name(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! pub struct UserAccountServiceImpl;
//!
//! impl UserAccountService for UserAccountServiceImpl {
//!     fn account_name(&self) -> String {
//!         "john".to_string()
//!     }
//! }
//!
//! impl Component for UserAccountServiceImpl {
//!     fn contracts() -> Vec<Contract> {
//!         contracts![dyn UserAccountService]
//!     }
//! }
//!
//! #[derive(Default)]
//! pub struct UserAccountClient {
//!     account_service: Inject<dyn UserAccountService>,
//! }
//!
//! impl Component for UserAccountClient {
//!     fn injection_points() -> Fields<Self> {
//!         Fields::new().field("account_service", |c| &c.account_service)
//!     }
//! }
//!
//! let injector = Injector::builder()
//!     .scanner(
//!         ComponentCatalog::new()
//!             .with::<UserAccountServiceImpl>()
//!             .with::<UserAccountClient>(),
//!     )
//!     .start()
//!     .unwrap();
//!
//! let client = injector.get_service::<UserAccountClient>().unwrap();
//! assert_eq!(client.account_service.account_name(), "john");
//! ```
//!
//! ## Choosing among implementations
//!
//! When several components implement the same contract, a field's qualifier
//! (or, without one, the field name) must match the simple type name of one
//! of them. Matching ignores case and underscores, so a field named
//! `smtp_mailer` picks `SmtpMailer`.
//!
//! ## Singleton creation
//!
//! Instances are built under a single creation lock. Constructors run while
//! that lock is held and must not call back into the container.

// Module declarations
pub mod component;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod fields;
pub mod global;
pub mod inject;
pub mod injector;
pub mod key;
pub mod registry;
pub mod scanner;

// Re-export core types
pub use component::{AnyArc, Component, ComponentType, ConstructError, Contract};
pub use config::{CyclePolicy, InjectorConfig};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use fields::{DescriptorAccessor, FieldAccessor, FieldDescriptor, Fields};
pub use inject::Inject;
pub use injector::{Injector, InjectorBuilder};
pub use key::TypeKey;
pub use registry::{ImplementationMapping, MappingEntry};
pub use scanner::{ComponentCatalog, ComponentEntry, LinkedScanner, TypeScanner, COMPONENTS};

#[doc(hidden)]
pub use linkme as __linkme;
