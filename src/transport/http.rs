//! HTTP client construction from a client configuration

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::{
    client::{ClientConfiguration, DefaultHeaders},
    protocol::{ClientError, ClientResult},
};

use super::TransportSettings;

/// HTTP transport handle backed by reqwest
///
/// Holds a `reqwest::Client` whose pool, timeouts, proxy and default headers come
/// from a [`ClientConfiguration`], together with the base URL of the target service.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    settings: TransportSettings,
}

impl HttpTransport {
    /// Create a transport for `host` using the given configuration
    ///
    /// The base URL scheme follows the configured protocol.
    ///
    /// # Arguments
    ///
    /// * `host` - Host (and optional port) of the target service, e.g. "storage.example.com"
    /// * `config` - The configuration to read
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not form a valid URL, a default header is not a
    /// valid HTTP header, the proxy settings are unusable, or reqwest fails to build.
    pub fn from_configuration(host: &str, config: &ClientConfiguration) -> ClientResult<Self> {
        let base_url = config
            .protocol()
            .url_for(host)
            .map_err(|e| ClientError::invalid_parameter("endpoint", format!("{host}: {e}")))?;

        let client = build_client(config)?;

        Ok(Self {
            client,
            base_url,
            settings: config.transport_settings(),
        })
    }

    /// Create a new HTTP transport with a custom reqwest client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url,
            settings: ClientConfiguration::new().transport_settings(),
        }
    }

    /// The underlying reqwest client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Root URL of the target service
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolved settings this transport was built from
    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }
}

/// Build a reqwest client sized and configured from `config`
///
/// Connection TTL, pool checkout timeout and validate-after-inactivity have no reqwest
/// counterpart; they remain available through [`TransportSettings`].
///
/// `max_connections` maps onto `pool_max_idle_per_host`, which caps idle connections kept
/// per host rather than the total number of open connections. A value of `0` (negative
/// values resolve to `0`) keeps no idle connections, so every request opens a new one.
///
/// Default header names differing only in case are all sent, in insertion order.
pub fn build_client(config: &ClientConfiguration) -> ClientResult<reqwest::Client> {
    let settings = config.transport_settings();

    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(settings.max_connections)
        .pool_idle_timeout(settings.idle_connection_timeout)
        .default_headers(header_map(config.default_headers())?);

    if let Some(timeout) = settings.connection_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = settings.socket_timeout {
        builder = builder.read_timeout(timeout);
    }
    if let Some(timeout) = settings.request_timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy) = config.proxy() {
        let mut reqwest_proxy = reqwest::Proxy::all(proxy.url()?)?;
        if let Some(username) = proxy.username() {
            reqwest_proxy =
                reqwest_proxy.basic_auth(username, proxy.password().unwrap_or_default());
        }
        if proxy.is_ntlm() {
            tracing::warn!(
                proxy = proxy.host(),
                "NTLM proxy parameters are set but only Basic proxy authentication is applied"
            );
        }
        builder = builder.proxy(reqwest_proxy);
    }

    tracing::debug!(
        protocol = %config.protocol(),
        max_connections = settings.max_connections,
        default_headers = config.default_headers().len(),
        "building HTTP client"
    );

    Ok(builder.build()?)
}

fn header_map(headers: &DefaultHeaders) -> ClientResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers.iter() {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ClientError::InvalidHeader(format!("{key}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::InvalidHeader(format!("{key}: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}
