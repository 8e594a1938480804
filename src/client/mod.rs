//! Client configuration API

pub mod builder;
pub mod config;
pub mod headers;
pub mod proxy;

pub use builder::ClientConfigurationBuilder;
pub use config::ClientConfiguration;
pub use headers::DefaultHeaders;
pub use proxy::ProxySettings;
