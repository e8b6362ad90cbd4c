//! Process-wide injector.
//!
//! Most applications should create an [`Injector`] and pass it around. This
//! module is for code that wants one container per process, reached through
//! free functions:
//!
//! ```rust,no_run
//! use ioc_wire::global;
//!
//! pub struct App;
//!
//! fn main() {
//!     global::start_application::<App>().expect("container failed to start");
//!     // global::get_service::<SomeComponent>() ...
//! }
//! ```
//!
//! Startup is double-checked under a global lock and runs at most once
//! successfully. A failed startup installs nothing and may be retried.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::{const_mutex, Mutex};
use tracing::{debug, error};

use crate::error::DiResult;
use crate::injector::{Injector, InjectorBuilder};
use crate::key::TypeKey;

static INJECTOR: OnceCell<Injector> = OnceCell::new();
static STARTUP: Mutex<()> = const_mutex(());

/// Starts the process-wide injector for the module `Entry` is declared in.
///
/// Components registered with [`component!`](crate::component!) in that
/// module or its sub-modules are instantiated and wired. Later calls are
/// no-ops once an injector is installed.
pub fn start_application<Entry: ?Sized + 'static>() -> DiResult<()> {
    let namespace = TypeKey::of::<Entry>().namespace();
    start_application_with(Injector::builder().namespace(namespace))
}

/// Starts the process-wide injector from a configured builder.
pub fn start_application_with(builder: InjectorBuilder) -> DiResult<()> {
    if INJECTOR.get().is_some() {
        return Ok(());
    }

    let _startup = STARTUP.lock();
    if INJECTOR.get().is_some() {
        debug!("process-wide injector already started");
        return Ok(());
    }

    match builder.start() {
        Ok(injector) => {
            // Only this thread sets the cell while STARTUP is held
            let _ = INJECTOR.set(injector);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "application startup failed");
            Err(e)
        }
    }
}

/// The process-wide injector, if started.
pub fn injector() -> Option<&'static Injector> {
    INJECTOR.get()
}

/// The process-wide singleton implementing `T`.
///
/// Failures are logged and reported as `None`: callers must handle a
/// missing service even when the component is expected to exist.
pub fn get_service<T>() -> Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    let Some(injector) = INJECTOR.get() else {
        error!(
            service = std::any::type_name::<T>(),
            "service requested before application startup"
        );
        return None;
    };
    match injector.get_service::<T>() {
        Ok(service) => Some(service),
        Err(e) => {
            error!(service = std::any::type_name::<T>(), error = %e, "service lookup failed");
            None
        }
    }
}
