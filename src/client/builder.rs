//! Builder for constructing client configurations

use crate::{
    client::{ClientConfiguration, DefaultHeaders},
    protocol::{ClientResult, Protocol},
};

/// Builder for [`ClientConfiguration`]
///
/// Each method consumes the builder and returns it, so a configuration can be
/// described in one expression. Anything not set keeps its default. Proxy port
/// validation happens in [`build`](ClientConfigurationBuilder::build).
///
/// # Example
///
/// ```rust
/// use cdmi_client_config::prelude::*;
///
/// # fn example() -> Result<(), ClientError> {
/// let config = ClientConfiguration::builder()
///     .with_protocol(Protocol::Https)
///     .with_max_error_retry(3)
///     .with_proxy("proxy.internal", 3128)
///     .with_default_header("User-Agent", "cdmi-client")
///     .build()?;
///
/// assert_eq!(config.proxy_port(), 3128);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientConfigurationBuilder {
    config: ClientConfiguration,
    proxy_port: Option<i32>,
}

impl ClientConfigurationBuilder {
    /// Create a builder seeded with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_configuration(config: ClientConfiguration) -> Self {
        Self {
            config,
            proxy_port: None,
        }
    }

    /// Set the maximum number of retries (default: 0)
    pub fn with_max_error_retry(mut self, max_error_retry: i32) -> Self {
        self.config.set_max_error_retry(max_error_retry);
        self
    }

    /// Set the pool checkout timeout in milliseconds (default: -1, wait forever)
    pub fn with_connection_request_timeout(mut self, timeout: i32) -> Self {
        self.config.set_connection_request_timeout(timeout);
        self
    }

    /// Set the connect timeout in milliseconds (default: 50000)
    pub fn with_connection_timeout(mut self, timeout: i32) -> Self {
        self.config.set_connection_timeout(timeout);
        self
    }

    /// Set the socket timeout in milliseconds (default: 50000)
    pub fn with_socket_timeout(mut self, timeout: i32) -> Self {
        self.config.set_socket_timeout(timeout);
        self
    }

    /// Set the connection pool size (default: 1024)
    pub fn with_max_connections(mut self, max_connections: i32) -> Self {
        self.config.set_max_connections(max_connections);
        self
    }

    /// Set the pooled connection lifetime in milliseconds (default: -1, unlimited)
    pub fn with_connection_ttl(mut self, ttl: i64) -> Self {
        self.config.set_connection_ttl(ttl);
        self
    }

    /// Enable or disable reaping of idle connections (default: true)
    pub fn with_use_reaper(mut self, use_reaper: bool) -> Self {
        self.config.set_use_reaper(use_reaper);
        self
    }

    /// Set the idle time in milliseconds before a connection is reaped (default: 60000)
    pub fn with_idle_connection_time(mut self, idle: i64) -> Self {
        self.config.set_idle_connection_time(idle);
        self
    }

    /// Set the protocol (default: HTTP)
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.config.set_protocol(protocol);
        self
    }

    /// Route requests through a proxy
    ///
    /// # Arguments
    ///
    /// * `host` - Proxy host name or address
    /// * `port` - Proxy port, must be positive
    pub fn with_proxy(mut self, host: impl Into<String>, port: i32) -> Self {
        self.config.set_proxy_host(Some(host.into()));
        self.proxy_port = Some(port);
        self
    }

    /// Set proxy credentials for Basic authentication
    pub fn with_proxy_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config
            .set_proxy_username(Some(username.into()))
            .set_proxy_password(Some(password.into()));
        self
    }

    /// Set the NTLM domain and workstation used for proxy authentication
    pub fn with_proxy_ntlm(
        mut self,
        domain: impl Into<String>,
        workstation: impl Into<String>,
    ) -> Self {
        self.config
            .set_proxy_domain(Some(domain.into()))
            .set_proxy_workstation(Some(workstation.into()));
        self
    }

    /// Enable or disable CNAME endpoints (default: true)
    pub fn with_support_cname(mut self, support_cname: bool) -> Self {
        self.config.set_support_cname(support_cname);
        self
    }

    /// Enable or disable second-level-domain addressing (default: false)
    pub fn with_sld_enabled(mut self, enabled: bool) -> Self {
        self.config.set_sld_enabled(enabled);
        self
    }

    /// Enable the whole-request timeout with the given value in milliseconds
    pub fn with_request_timeout(mut self, timeout: i32) -> Self {
        self.config
            .set_request_timeout(timeout)
            .set_request_timeout_enabled(true);
        self
    }

    /// Enable or disable the whole-request timeout (default: false)
    pub fn with_request_timeout_enabled(mut self, enabled: bool) -> Self {
        self.config.set_request_timeout_enabled(enabled);
        self
    }

    /// Set the slow request threshold in milliseconds (default: 300000)
    pub fn with_slow_requests_threshold(mut self, threshold: i64) -> Self {
        self.config.set_slow_requests_threshold(threshold);
        self
    }

    /// Add a default header, replacing any earlier value for the same key
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.add_default_header(key, value);
        self
    }

    /// Replace all default headers
    pub fn with_default_headers(mut self, headers: DefaultHeaders) -> Self {
        self.config.set_default_headers(headers);
        self
    }

    /// Enable or disable CRC checks on payloads (default: true)
    pub fn with_crc_check(mut self, enabled: bool) -> Self {
        self.config.set_crc_check_enabled(enabled);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`](crate::protocol::ClientError::InvalidParameter)
    /// if a proxy port was given that is zero or negative.
    pub fn build(self) -> ClientResult<ClientConfiguration> {
        let mut config = self.config;

        if let Some(port) = self.proxy_port {
            config.set_proxy_port(port)?;
        }

        tracing::debug!(
            protocol = %config.protocol(),
            max_connections = config.max_connections(),
            max_error_retry = config.max_error_retry(),
            proxy = config.proxy_host().unwrap_or("none"),
            "built client configuration"
        );

        Ok(config)
    }
}
