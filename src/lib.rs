//! # CDMI Client Config
//!
//! Configuration for CDMI HTTP clients: timeouts, retry counts, connection pool
//! sizing, proxy settings, default headers and protocol selection.
//!
//! A [`ClientConfiguration`](client::ClientConfiguration) starts out holding every
//! documented default. It is configured in place (or through a builder), then handed
//! to the components that consume it. The transport layer reads a resolved
//! [`TransportSettings`](transport::TransportSettings) view in which sentinel values
//! such as `-1` ("wait forever") become typed `Option<Duration>`s.
//!
//! ## Features
//!
//! - **Defaults**: every field is valid from construction onwards
//! - **Validation**: a non-positive proxy port is rejected when it is set
//! - **Ordered Headers**: default headers keep insertion order, last write wins
//! - **Serde**: load and store configurations as JSON
//! - **Reqwest**: build a `reqwest::Client` from a configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use cdmi_client_config::prelude::*;
//!
//! fn main() -> Result<(), ClientError> {
//!     let config = ClientConfiguration::builder()
//!         .with_protocol(Protocol::Https)
//!         .with_max_connections(64)
//!         .with_proxy("proxy.internal", 3128)
//!         .with_default_header("User-Agent", "cdmi-client")
//!         .build()?;
//!
//!     let transport = HttpTransport::from_configuration("storage.example.com", &config)?;
//!     println!("Configured for: {}", transport.base_url());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod protocol;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{ClientConfiguration, ClientConfigurationBuilder, DefaultHeaders, ProxySettings},
        protocol::{ClientError, ClientResult, Protocol},
        transport::{HttpTransport, TransportSettings},
    };
}
