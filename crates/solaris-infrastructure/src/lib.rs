//! Infrastructure layer for Solaris.
//!
//! Configuration loading and the REST gateway to the hosted backend.

pub mod config_service;
pub mod dto;
pub mod paths;
pub mod supabase_gateway;

pub use crate::config_service::ConfigService;
pub use crate::paths::SolarisPaths;
pub use crate::supabase_gateway::SupabaseGateway;
