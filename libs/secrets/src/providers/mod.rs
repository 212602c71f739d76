//! Configuration sources

mod local;
mod vault;

pub use local::LocalSecrets;
pub use vault::VaultClient;
