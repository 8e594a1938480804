//! Wire protocol selection and error definitions

use std::{fmt, net::Ipv6Addr, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

pub mod error;

pub use error::{ClientError, ClientResult};

/// Protocol used to reach the target service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP
    #[default]
    Http,

    /// HTTP over TLS
    Https,
}

impl Protocol {
    /// URL scheme for this protocol
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Well-known port for this protocol
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }

    /// Whether this protocol runs over TLS
    pub fn is_secure(&self) -> bool {
        matches!(self, Protocol::Https)
    }

    /// Build the root URL for `host` (optionally `host:port`)
    ///
    /// A bare IPv6 literal such as `::1` is bracketed before parsing.
    pub fn url_for(&self, host: &str) -> Result<Url, url::ParseError> {
        if host.parse::<Ipv6Addr>().is_ok() {
            Url::parse(&format!("{}://[{}]", self.scheme(), host))
        } else {
            Url::parse(&format!("{}://{}", self.scheme(), host))
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl FromStr for Protocol {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("http") {
            Ok(Protocol::Http)
        } else if s.eq_ignore_ascii_case("https") {
            Ok(Protocol::Https)
        } else {
            Err(ClientError::invalid_parameter(
                "protocol",
                format!("unknown protocol: {s}"),
            ))
        }
    }
}
