//! Proxy settings view

use base64::{engine::general_purpose, Engine as _};
use url::Url;

use crate::{
    client::ClientConfiguration,
    protocol::{ClientError, ClientResult, Protocol},
};

/// Header carrying proxy credentials
pub const PROXY_AUTHORIZATION: &str = "Proxy-Authorization";

/// Borrowed view over the proxy fields of a [`ClientConfiguration`]
#[derive(Debug, Clone, Copy)]
pub struct ProxySettings<'a> {
    host: &'a str,
    port: i32,
    username: Option<&'a str>,
    password: Option<&'a str>,
    domain: Option<&'a str>,
    workstation: Option<&'a str>,
}

impl<'a> ProxySettings<'a> {
    /// Returns `None` when no proxy host is configured
    pub(crate) fn from_configuration(config: &'a ClientConfiguration) -> Option<Self> {
        let host = config.proxy_host()?;
        Some(Self {
            host,
            port: config.proxy_port(),
            username: config.proxy_username(),
            password: config.proxy_password(),
            domain: config.proxy_domain(),
            workstation: config.proxy_workstation(),
        })
    }

    /// Proxy host name or address
    pub fn host(&self) -> &'a str {
        self.host
    }

    /// Proxy port, `None` when unset or outside the TCP port range
    pub fn port(&self) -> Option<u16> {
        u16::try_from(self.port).ok().filter(|port| *port > 0)
    }

    /// Username for proxy authentication
    pub fn username(&self) -> Option<&'a str> {
        self.username
    }

    /// Password for proxy authentication
    pub fn password(&self) -> Option<&'a str> {
        self.password
    }

    /// NTLM domain
    pub fn domain(&self) -> Option<&'a str> {
        self.domain
    }

    /// NTLM workstation
    pub fn workstation(&self) -> Option<&'a str> {
        self.workstation
    }

    /// Whether a proxy username is configured
    pub fn has_credentials(&self) -> bool {
        self.username.is_some()
    }

    /// Whether NTLM parameters are present
    pub fn is_ntlm(&self) -> bool {
        self.domain.is_some() || self.workstation.is_some()
    }

    /// Proxy URL in the form `http://host[:port]`
    ///
    /// IPv6 literals may be given bare (`::1`) or bracketed (`[::1]`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameter`] if the host does not form a valid URL
    /// or the configured port does not fit a TCP port.
    pub fn url(&self) -> ClientResult<Url> {
        let mut url = Protocol::Http.url_for(self.host).map_err(|e| {
            ClientError::invalid_parameter("proxyHost", format!("{}: {e}", self.host))
        })?;

        if self.port > 0 {
            let port = self.port().ok_or_else(|| {
                ClientError::invalid_parameter(
                    "proxyPort",
                    format!("{} is outside the TCP port range", self.port),
                )
            })?;
            url.set_port(Some(port)).map_err(|()| {
                ClientError::invalid_parameter("proxyHost", "host cannot carry a port")
            })?;
        }

        Ok(url)
    }

    /// Get the `Proxy-Authorization` header for Basic authentication
    ///
    /// Returns `None` when no username is configured. A missing password is sent empty.
    pub fn authorization_header(&self) -> Option<(String, String)> {
        let username = self.username?;
        let credentials = format!("{}:{}", username, self.password.unwrap_or_default());
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        Some((PROXY_AUTHORIZATION.to_string(), format!("Basic {}", encoded)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxied(host: &str, port: i32) -> ClientConfiguration {
        let mut config = ClientConfiguration::new();
        config.set_proxy_host(Some(host.to_string()));
        config.set_proxy_port(port).unwrap();
        config
    }

    #[test]
    fn test_no_proxy_without_host() {
        let mut config = ClientConfiguration::new();
        config.set_proxy_port(8080).unwrap();

        assert!(config.proxy().is_none());
    }

    #[test]
    fn test_proxy_url() {
        let config = proxied("proxy.local", 3128);
        let proxy = config.proxy().unwrap();

        assert_eq!(proxy.port(), Some(3128));
        assert_eq!(proxy.url().unwrap().as_str(), "http://proxy.local:3128/");
    }

    #[test]
    fn test_proxy_url_without_port() {
        let mut config = ClientConfiguration::new();
        config.set_proxy_host(Some("proxy.local".to_string()));
        let proxy = config.proxy().unwrap();

        assert_eq!(proxy.port(), None);
        assert_eq!(proxy.url().unwrap().as_str(), "http://proxy.local/");
    }

    #[test]
    fn test_proxy_url_ipv6_literal() {
        let config = proxied("::1", 3128);

        let url = config.proxy().unwrap().url().unwrap();
        assert_eq!(url.as_str(), "http://[::1]:3128/");

        let config = proxied("[fe80::1]", 8080);
        let url = config.proxy().unwrap().url().unwrap();
        assert_eq!(url.as_str(), "http://[fe80::1]:8080/");
    }

    #[test]
    fn test_proxy_port_out_of_range() {
        let config = proxied("proxy.local", 70_000);
        let proxy = config.proxy().unwrap();

        assert_eq!(proxy.port(), None);
        assert!(proxy.url().unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_basic_authorization_header() {
        let mut config = proxied("proxy.local", 3128);
        config
            .set_proxy_username(Some("user".to_string()))
            .set_proxy_password(Some("pass".to_string()));

        let (name, value) = config.proxy().unwrap().authorization_header().unwrap();
        assert_eq!(name, "Proxy-Authorization");
        assert_eq!(value, "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_ntlm_detection() {
        let mut config = proxied("proxy.local", 3128);
        assert!(!config.proxy().unwrap().is_ntlm());
        assert!(config.proxy().unwrap().authorization_header().is_none());

        config.set_proxy_domain(Some("CORP".to_string()));
        assert!(config.proxy().unwrap().is_ntlm());
    }
}
