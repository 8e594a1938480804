//! Client configuration

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use crate::{
    client::{ClientConfigurationBuilder, DefaultHeaders, ProxySettings},
    protocol::{ClientError, ClientResult, Protocol},
    transport::TransportSettings,
};

pub const DEFAULT_MAX_RETRIES: i32 = 0;
/// Negative means wait indefinitely for a pooled connection
pub const DEFAULT_CONNECTION_REQUEST_TIMEOUT: i32 = -1;
pub const DEFAULT_CONNECTION_TIMEOUT: i32 = 50 * 1000;
pub const DEFAULT_SOCKET_TIMEOUT: i32 = 50 * 1000;
pub const DEFAULT_MAX_CONNECTIONS: i32 = 1024;
/// Negative means pooled connections live forever
pub const DEFAULT_CONNECTION_TTL: i64 = -1;
pub const DEFAULT_IDLE_CONNECTION_TIME: i64 = 60 * 1000;
pub const DEFAULT_VALIDATE_AFTER_INACTIVITY: i32 = 2 * 1000;
pub const DEFAULT_THREAD_POOL_WAIT_TIME: i32 = 60 * 1000;
pub const DEFAULT_REQUEST_TIMEOUT: i32 = 5 * 60 * 1000;
pub const DEFAULT_SLOW_REQUESTS_THRESHOLD: i64 = 5 * 60 * 1000;
pub const DEFAULT_USE_REAPER: bool = true;

const UNSET_PROXY_PORT: i32 = -1;

/// Configuration for accessing a target service over HTTP
///
/// Every field holds a valid value from construction onwards. Setters take `&mut self`
/// and return the same instance so calls can be chained:
///
/// ```rust
/// use cdmi_client_config::prelude::*;
///
/// let mut config = ClientConfiguration::new();
/// config
///     .set_support_cname(false)
///     .set_sld_enabled(true)
///     .add_default_header("X-Client", "cdmi");
///
/// assert!(!config.is_support_cname());
/// assert!(config.is_sld_enabled());
/// ```
///
/// Durations are kept in milliseconds with the sentinel values the transport layer
/// understands. Use [`ClientConfiguration::transport_settings`] for a resolved view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfiguration {
    max_error_retry: i32,
    connection_request_timeout: i32,
    connection_timeout: i32,
    socket_timeout: i32,
    max_connections: i32,
    #[serde(rename = "connectionTTL")]
    connection_ttl: i64,
    use_reaper: bool,
    idle_connection_time: i64,

    protocol: Protocol,

    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_host: Option<String>,
    #[serde(
        skip_serializing_if = "is_unset_port",
        deserialize_with = "deserialize_proxy_port"
    )]
    proxy_port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_workstation: Option<String>,

    support_cname: bool,
    sld_enabled: bool,

    request_timeout: i32,
    request_timeout_enabled: bool,
    slow_requests_threshold: i64,

    default_headers: DefaultHeaders,

    crc_check_enabled: bool,
}

fn is_unset_port(port: &i32) -> bool {
    *port <= 0
}

fn deserialize_proxy_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let port = i32::deserialize(deserializer)?;
    check_proxy_port(port).map_err(D::Error::custom)?;
    Ok(port)
}

pub(crate) fn check_proxy_port(port: i32) -> ClientResult<i32> {
    if port <= 0 {
        return Err(ClientError::invalid_parameter(
            "proxyPort",
            format!("must be a positive port number, got {port}"),
        ));
    }
    Ok(port)
}

impl ClientConfiguration {
    /// Create a configuration holding every documented default
    pub fn new() -> Self {
        Self {
            max_error_retry: DEFAULT_MAX_RETRIES,
            connection_request_timeout: DEFAULT_CONNECTION_REQUEST_TIMEOUT,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            socket_timeout: DEFAULT_SOCKET_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_ttl: DEFAULT_CONNECTION_TTL,
            use_reaper: DEFAULT_USE_REAPER,
            idle_connection_time: DEFAULT_IDLE_CONNECTION_TIME,
            protocol: Protocol::Http,
            proxy_host: None,
            proxy_port: UNSET_PROXY_PORT,
            proxy_username: None,
            proxy_password: None,
            proxy_domain: None,
            proxy_workstation: None,
            support_cname: true,
            sld_enabled: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            request_timeout_enabled: false,
            slow_requests_threshold: DEFAULT_SLOW_REQUESTS_THRESHOLD,
            default_headers: DefaultHeaders::new(),
            crc_check_enabled: true,
        }
    }

    /// Start a consuming builder
    pub fn builder() -> ClientConfigurationBuilder {
        ClientConfigurationBuilder::new()
    }

    /// Load a configuration from JSON; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or carries a non-positive `proxyPort`.
    pub fn from_json(json: &str) -> ClientResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the configuration as pretty-printed JSON
    pub fn to_json(&self) -> ClientResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Proxy settings, if a proxy host is configured
    pub fn proxy(&self) -> Option<ProxySettings<'_>> {
        ProxySettings::from_configuration(self)
    }

    /// Resolve sentinel values into the settings a transport reads
    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings::resolve(self)
    }

    /// Maximum retry count for failed requests
    pub fn max_error_retry(&self) -> i32 {
        self.max_error_retry
    }

    /// Set the maximum number of retries
    pub fn set_max_error_retry(&mut self, max_error_retry: i32) -> &mut Self {
        self.max_error_retry = max_error_retry;
        self
    }

    /// Milliseconds to wait for a connection from the pool; `0` or negative waits forever
    pub fn connection_request_timeout(&self) -> i32 {
        self.connection_request_timeout
    }

    /// Set the pool checkout timeout in milliseconds
    pub fn set_connection_request_timeout(&mut self, timeout: i32) -> &mut Self {
        self.connection_request_timeout = timeout;
        self
    }

    /// Milliseconds allowed to establish a connection
    pub fn connection_timeout(&self) -> i32 {
        self.connection_timeout
    }

    /// Set the connect timeout in milliseconds
    pub fn set_connection_timeout(&mut self, timeout: i32) -> &mut Self {
        self.connection_timeout = timeout;
        self
    }

    /// Milliseconds a socket may sit without data; `0` means no limit
    pub fn socket_timeout(&self) -> i32 {
        self.socket_timeout
    }

    /// Set the socket timeout in milliseconds
    pub fn set_socket_timeout(&mut self, timeout: i32) -> &mut Self {
        self.socket_timeout = timeout;
        self
    }

    /// Maximum number of pooled HTTP connections
    pub fn max_connections(&self) -> i32 {
        self.max_connections
    }

    /// Set the maximum number of pooled connections
    pub fn set_max_connections(&mut self, max_connections: i32) -> &mut Self {
        self.max_connections = max_connections;
        self
    }

    /// Lifetime of a pooled connection in milliseconds; negative means unlimited
    pub fn connection_ttl(&self) -> i64 {
        self.connection_ttl
    }

    /// Set the pooled connection lifetime in milliseconds
    pub fn set_connection_ttl(&mut self, ttl: i64) -> &mut Self {
        self.connection_ttl = ttl;
        self
    }

    /// Whether idle pooled connections are reaped
    pub fn is_use_reaper(&self) -> bool {
        self.use_reaper
    }

    /// Enable or disable reaping of idle connections
    pub fn set_use_reaper(&mut self, use_reaper: bool) -> &mut Self {
        self.use_reaper = use_reaper;
        self
    }

    /// Milliseconds an idle connection is kept before the reaper closes it
    pub fn idle_connection_time(&self) -> i64 {
        self.idle_connection_time
    }

    /// Set the idle time in milliseconds before a connection is reaped
    pub fn set_idle_connection_time(&mut self, idle: i64) -> &mut Self {
        self.idle_connection_time = idle;
        self
    }

    /// Protocol used to reach the target service
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Set the protocol (HTTP or HTTPS)
    pub fn set_protocol(&mut self, protocol: Protocol) -> &mut Self {
        self.protocol = protocol;
        self
    }

    /// Proxy host, if any
    pub fn proxy_host(&self) -> Option<&str> {
        self.proxy_host.as_deref()
    }

    /// Set or clear the proxy host
    pub fn set_proxy_host(&mut self, host: Option<String>) -> &mut Self {
        self.proxy_host = host;
        self
    }

    /// Proxy port, `-1` when never set
    pub fn proxy_port(&self) -> i32 {
        self.proxy_port
    }

    /// Set the proxy port
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] when `port` is zero or negative. The
    /// stored port is left untouched in that case.
    pub fn set_proxy_port(&mut self, port: i32) -> ClientResult<&mut Self> {
        match check_proxy_port(port) {
            Ok(port) => {
                self.proxy_port = port;
                Ok(self)
            }
            Err(err) => {
                tracing::warn!(port, "rejected proxy port");
                Err(err)
            }
        }
    }

    /// Username for proxy authentication
    pub fn proxy_username(&self) -> Option<&str> {
        self.proxy_username.as_deref()
    }

    /// Set or clear the proxy username
    pub fn set_proxy_username(&mut self, username: Option<String>) -> &mut Self {
        self.proxy_username = username;
        self
    }

    /// Password for proxy authentication
    pub fn proxy_password(&self) -> Option<&str> {
        self.proxy_password.as_deref()
    }

    /// Set or clear the proxy password
    pub fn set_proxy_password(&mut self, password: Option<String>) -> &mut Self {
        self.proxy_password = password;
        self
    }

    /// Windows domain for NTLM proxy authentication
    pub fn proxy_domain(&self) -> Option<&str> {
        self.proxy_domain.as_deref()
    }

    /// Set or clear the NTLM proxy domain
    pub fn set_proxy_domain(&mut self, domain: Option<String>) -> &mut Self {
        self.proxy_domain = domain;
        self
    }

    /// Windows workstation for NTLM proxy authentication
    pub fn proxy_workstation(&self) -> Option<&str> {
        self.proxy_workstation.as_deref()
    }

    /// Set or clear the NTLM proxy workstation
    pub fn set_proxy_workstation(&mut self, workstation: Option<String>) -> &mut Self {
        self.proxy_workstation = workstation;
        self
    }

    /// Whether CNAME endpoints are accepted
    pub fn is_support_cname(&self) -> bool {
        self.support_cname
    }

    /// Enable or disable CNAME endpoints
    pub fn set_support_cname(&mut self, support_cname: bool) -> &mut Self {
        self.support_cname = support_cname;
        self
    }

    /// Whether second-level-domain style addressing is used
    pub fn is_sld_enabled(&self) -> bool {
        self.sld_enabled
    }

    /// Enable or disable second-level-domain addressing
    pub fn set_sld_enabled(&mut self, enabled: bool) -> &mut Self {
        self.sld_enabled = enabled;
        self
    }

    /// Interval after which an idle pooled connection is revalidated before reuse
    ///
    /// Fixed at [`DEFAULT_VALIDATE_AFTER_INACTIVITY`]; not configurable.
    pub fn validate_after_inactivity(&self) -> i32 {
        DEFAULT_VALIDATE_AFTER_INACTIVITY
    }

    /// Milliseconds to wait for a worker to become available; not configurable
    pub fn thread_pool_wait_time(&self) -> i32 {
        DEFAULT_THREAD_POOL_WAIT_TIME
    }

    /// Whether the whole-request timeout is applied
    pub fn is_request_timeout_enabled(&self) -> bool {
        self.request_timeout_enabled
    }

    /// Enable or disable the whole-request timeout
    pub fn set_request_timeout_enabled(&mut self, enabled: bool) -> &mut Self {
        self.request_timeout_enabled = enabled;
        self
    }

    /// Whole-request timeout in milliseconds, applied only when enabled
    pub fn request_timeout(&self) -> i32 {
        self.request_timeout
    }

    /// Set the whole-request timeout in milliseconds
    pub fn set_request_timeout(&mut self, timeout: i32) -> &mut Self {
        self.request_timeout = timeout;
        self
    }

    /// Requests taking at least this many milliseconds are reported as slow
    pub fn slow_requests_threshold(&self) -> i64 {
        self.slow_requests_threshold
    }

    /// Set the slow request threshold in milliseconds
    pub fn set_slow_requests_threshold(&mut self, threshold: i64) -> &mut Self {
        self.slow_requests_threshold = threshold;
        self
    }

    /// Headers sent with every request, in insertion order
    pub fn default_headers(&self) -> &DefaultHeaders {
        &self.default_headers
    }

    /// Replace all default headers
    pub fn set_default_headers(&mut self, headers: DefaultHeaders) -> &mut Self {
        self.default_headers = headers;
        self
    }

    /// Add a header sent with every request, replacing any previous value for `key`
    pub fn add_default_header(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.default_headers.insert(key, value);
        self
    }

    /// Whether transferred payloads are CRC-checked
    pub fn is_crc_check_enabled(&self) -> bool {
        self.crc_check_enabled
    }

    /// Enable or disable CRC checks on payloads
    pub fn set_crc_check_enabled(&mut self, enabled: bool) -> &mut Self {
        self.crc_check_enabled = enabled;
        self
    }
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfiguration::default();

        assert_eq!(config.max_error_retry(), 0);
        assert_eq!(config.connection_request_timeout(), -1);
        assert_eq!(config.connection_timeout(), 50_000);
        assert_eq!(config.socket_timeout(), 50_000);
        assert_eq!(config.max_connections(), 1024);
        assert_eq!(config.connection_ttl(), -1);
        assert!(config.is_use_reaper());
        assert_eq!(config.idle_connection_time(), 60_000);
        assert_eq!(config.protocol(), Protocol::Http);
        assert_eq!(config.proxy_host(), None);
        assert_eq!(config.proxy_port(), -1);
        assert_eq!(config.proxy_username(), None);
        assert_eq!(config.proxy_password(), None);
        assert_eq!(config.proxy_domain(), None);
        assert_eq!(config.proxy_workstation(), None);
        assert!(config.is_support_cname());
        assert!(!config.is_sld_enabled());
        assert_eq!(config.request_timeout(), 300_000);
        assert!(!config.is_request_timeout_enabled());
        assert_eq!(config.slow_requests_threshold(), 300_000);
        assert!(config.default_headers().is_empty());
        assert!(config.is_crc_check_enabled());
        assert_eq!(config.validate_after_inactivity(), 2_000);
        assert_eq!(config.thread_pool_wait_time(), 60_000);
    }

    #[test]
    fn test_proxy_port_rejects_non_positive() {
        let mut config = ClientConfiguration::new();

        for port in [0, -1, i32::MIN] {
            let err = config.set_proxy_port(port).unwrap_err();
            assert!(err.is_invalid_parameter());
            assert_eq!(config.proxy_port(), -1);
        }

        config.set_proxy_port(8080).unwrap();
        assert!(config.set_proxy_port(0).is_err());
        assert_eq!(config.proxy_port(), 8080);
    }

    #[test]
    fn test_chained_setters_mutate_same_instance() {
        let mut config = ClientConfiguration::new();
        config
            .set_support_cname(false)
            .set_sld_enabled(true)
            .set_max_error_retry(3);

        assert!(!config.is_support_cname());
        assert!(config.is_sld_enabled());
        assert_eq!(config.max_error_retry(), 3);
    }

    #[test]
    fn test_proxy_port_chains_on_success() {
        let mut config = ClientConfiguration::new();
        config
            .set_proxy_port(3128)
            .unwrap()
            .set_proxy_host(Some("proxy.local".to_string()));

        assert_eq!(config.proxy_port(), 3128);
        assert_eq!(config.proxy_host(), Some("proxy.local"));
    }

    #[test]
    fn test_default_header_overwrite() {
        let mut config = ClientConfiguration::new();
        config
            .add_default_header("X-Foo", "1")
            .add_default_header("X-Foo", "2");

        assert_eq!(config.default_headers().len(), 1);
        assert_eq!(config.default_headers().get("X-Foo"), Some("2"));
    }

    #[test]
    fn test_json_omits_unset_proxy() {
        let json = serde_json::to_value(ClientConfiguration::new()).unwrap();

        assert!(json.get("proxyPort").is_none());
        assert!(json.get("proxyHost").is_none());
        assert_eq!(json["connectionTTL"], -1);
        assert_eq!(json["sldEnabled"], false);
        assert_eq!(json["protocol"], "http");
    }

    #[test]
    fn test_from_json_rejects_bad_proxy_port() {
        let err = ClientConfiguration::from_json(r#"{"proxyPort": 0}"#).unwrap_err();

        assert!(matches!(err, ClientError::Serialization(_)));
        assert!(err.to_string().contains("proxyPort"));
    }
}
