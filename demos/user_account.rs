//! Example: a small user-account application wired by the process-wide injector
//!
//! Components register themselves with `component!`; the application module
//! is scanned at startup and every field is wired before `main` continues.
//!
//! Run with `RUST_LOG=ioc_wire=debug cargo run --example user_account` to
//! see resolution and instantiation events.

use ioc_wire::{global, Injector, InjectorConfig, TypeKey};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod useraccount {
    use ioc_wire::{component, contracts, Component, Contract, Fields, Inject};

    pub struct UserAccountApplication;

    // ===== Repositories =====

    pub trait AccountRepository: Send + Sync {
        fn find_name(&self, id: u32) -> Option<String>;
    }

    #[derive(Default)]
    pub struct InMemoryAccountRepository;

    impl AccountRepository for InMemoryAccountRepository {
        fn find_name(&self, id: u32) -> Option<String> {
            match id {
                1 => Some("ada".to_string()),
                2 => Some("grace".to_string()),
                _ => None,
            }
        }
    }

    impl Component for InMemoryAccountRepository {
        fn contracts() -> Vec<Contract> {
            contracts![dyn AccountRepository]
        }
    }

    // ===== Formatters: two implementations, picked by name =====

    pub trait NameFormatter: Send + Sync {
        fn format(&self, name: &str) -> String;
    }

    #[derive(Default)]
    pub struct PlainFormatter;

    impl NameFormatter for PlainFormatter {
        fn format(&self, name: &str) -> String {
            name.to_string()
        }
    }

    impl Component for PlainFormatter {
        fn contracts() -> Vec<Contract> {
            contracts![dyn NameFormatter]
        }
    }

    #[derive(Default)]
    pub struct ShoutingFormatter;

    impl NameFormatter for ShoutingFormatter {
        fn format(&self, name: &str) -> String {
            format!("{}!", name.to_uppercase())
        }
    }

    impl Component for ShoutingFormatter {
        fn contracts() -> Vec<Contract> {
            contracts![dyn NameFormatter]
        }
    }

    // ===== Service and client =====

    pub trait UserAccountService: Send + Sync {
        fn display_name(&self, id: u32) -> String;
    }

    #[derive(Default)]
    pub struct UserAccountServiceImpl {
        repository: Inject<dyn AccountRepository>,
        plain_formatter: Inject<dyn NameFormatter>,
    }

    impl UserAccountService for UserAccountServiceImpl {
        fn display_name(&self, id: u32) -> String {
            let name = self
                .repository
                .find_name(id)
                .unwrap_or_else(|| "unknown".to_string());
            self.plain_formatter.format(&name)
        }
    }

    impl Component for UserAccountServiceImpl {
        fn contracts() -> Vec<Contract> {
            contracts![dyn UserAccountService]
        }

        fn injection_points() -> Fields<Self> {
            Fields::new()
                .field("repository", |s: &Self| &s.repository)
                .field("plain_formatter", |s| &s.plain_formatter)
        }
    }

    #[derive(Default)]
    pub struct UserAccountClientComponent {
        pub account_service: Inject<dyn UserAccountService>,
        pub banner: Inject<dyn NameFormatter>,
    }

    impl Component for UserAccountClientComponent {
        fn injection_points() -> Fields<Self> {
            Fields::new()
                .field("account_service", |c: &Self| &c.account_service)
                .qualified("banner", "shoutingFormatter", |c| &c.banner)
        }
    }

    component!(
        InMemoryAccountRepository,
        PlainFormatter,
        ShoutingFormatter,
        UserAccountServiceImpl,
        UserAccountClientComponent,
    );
}

use useraccount::{
    NameFormatter, UserAccountApplication, UserAccountClientComponent, UserAccountService,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== User account demo ===\n");

    // IOC_CYCLE_POLICY / IOC_MAX_DEPTH / IOC_EAGER override the defaults
    let config = InjectorConfig::from_env()?;
    let namespace = TypeKey::of::<UserAccountApplication>().namespace();
    global::start_application_with(Injector::builder().namespace(namespace).config(config))?;

    let client = global::get_service::<UserAccountClientComponent>()
        .ok_or("user account client not available")?;
    for id in 1..=3 {
        let name = client.account_service.display_name(id);
        println!("account {}: {} / {}", id, name, client.banner.format(&name));
    }

    let service = global::get_service::<dyn UserAccountService>()
        .ok_or("user account service not available")?;
    let wired = client.account_service.get().ok_or("account service not wired")?;
    println!("\nshared service instance: {}", Arc::ptr_eq(wired, &service));

    if let Some(injector) = global::injector() {
        println!("\nRegistered services:");
        for descriptor in injector.describe() {
            println!("  {}", descriptor);
        }
    }

    Ok(())
}
