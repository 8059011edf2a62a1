//! Service settings read from the environment
//!
//! Store settings live in [`common::database::DatabaseConfig`]; this module
//! covers what only the HTTP service needs.

use argon2::Params;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::models::CredentialHasher;

#[derive(Debug, Clone, Deserialize)]
struct RoutingSettings {
    port: u16,
}

/// Argon2 cost parameters
///
/// # Environment Variables
/// - `HASH_MEMORY_KIB`: memory cost in KiB (default: argon2's default)
/// - `HASH_ITERATIONS`: time cost (default: argon2's default)
/// - `HASH_PARALLELISM`: lanes (default: argon2's default)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HashSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashSettings {
    /// Build the credential hasher; out-of-range costs are a configuration error
    pub fn hasher(&self) -> Result<CredentialHasher, ConfigError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| ConfigError::Message(format!("Invalid hash parameters: {}", e)))?;
        Ok(CredentialHasher::new(params))
    }
}

/// HTTP service settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Port the router listens on (`ROUTING_PORT`, default 8080)
    pub routing_port: u16,
    pub hash: HashSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let routing: RoutingSettings = Config::builder()
            .set_default("port", 8080)?
            .add_source(Environment::with_prefix("ROUTING"))
            .build()?
            .try_deserialize()?;

        let hash: HashSettings = Config::builder()
            .set_default("memory_kib", i64::from(Params::DEFAULT_M_COST))?
            .set_default("iterations", i64::from(Params::DEFAULT_T_COST))?
            .set_default("parallelism", i64::from(Params::DEFAULT_P_COST))?
            .add_source(Environment::with_prefix("HASH"))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            routing_port: routing.port,
            hash,
        })
    }
}
