//! Application layer for Solaris.
//!
//! The coordinator owns the client snapshot and turns view intents into gateway
//! calls and snapshot updates; the shell wires it to the auth-state subscription.

pub mod coordinator;
pub mod credentials;
pub mod shell;

pub use coordinator::{AppCoordinator, CoordinatorSettings, SubmitOutcome};
pub use credentials::{AuthMode, Credentials};
pub use shell::AppShell;
