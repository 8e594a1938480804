//! Resolved settings consumed by the transport layer
//!
//! A [`ClientConfiguration`] stores raw millisecond values with sentinels
//! (`-1` for "wait forever", a disabled flag next to a timeout, ...). The transport,
//! connection pool, reaper and retry executor read the typed [`TransportSettings`]
//! resolved from it instead.

pub mod http;

use std::time::Duration;

pub use http::HttpTransport;

use crate::client::ClientConfiguration;

/// Typed snapshot of a configuration as a transport sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    /// Time to wait for a pooled connection, `None` waits indefinitely
    pub connection_request_timeout: Option<Duration>,

    /// Time allowed to establish a connection, `None` means no limit
    pub connection_timeout: Option<Duration>,

    /// Time a socket may stay silent, `None` means no limit
    pub socket_timeout: Option<Duration>,

    /// Whole-request timeout, present only when enabled
    pub request_timeout: Option<Duration>,

    /// Lifetime of a pooled connection, `None` means unlimited
    pub connection_ttl: Option<Duration>,

    /// Idle time after which the reaper closes a connection, `None` disables reaping
    pub idle_connection_timeout: Option<Duration>,

    /// Idle time after which a pooled connection is revalidated
    pub validate_after_inactivity: Duration,

    /// Requests lasting at least this long are reported as slow
    pub slow_requests_threshold: Duration,

    /// Connection pool size
    pub max_connections: usize,

    /// Retry attempts after the first failure
    pub max_error_retry: u32,
}

fn positive_millis(millis: i64) -> Option<Duration> {
    u64::try_from(millis)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

impl TransportSettings {
    /// Resolve the raw values of a configuration
    pub fn resolve(config: &ClientConfiguration) -> Self {
        let request_timeout = if config.is_request_timeout_enabled() {
            positive_millis(config.request_timeout().into())
        } else {
            None
        };

        let idle_connection_timeout = if config.is_use_reaper() {
            positive_millis(config.idle_connection_time())
        } else {
            None
        };

        Self {
            connection_request_timeout: positive_millis(
                config.connection_request_timeout().into(),
            ),
            connection_timeout: positive_millis(config.connection_timeout().into()),
            socket_timeout: positive_millis(config.socket_timeout().into()),
            request_timeout,
            connection_ttl: positive_millis(config.connection_ttl()),
            idle_connection_timeout,
            validate_after_inactivity: positive_millis(config.validate_after_inactivity().into())
                .unwrap_or_default(),
            slow_requests_threshold: positive_millis(config.slow_requests_threshold())
                .unwrap_or_default(),
            max_connections: usize::try_from(config.max_connections()).unwrap_or(0),
            max_error_retry: u32::try_from(config.max_error_retry()).unwrap_or(0),
        }
    }

    /// Check whether a request that took `elapsed` counts as slow
    pub fn is_slow_request(&self, elapsed: Duration) -> bool {
        elapsed >= self.slow_requests_threshold
    }

    /// Report a finished request, logging a warning when it was slow
    ///
    /// Returns whether the request was slow.
    pub fn record_request_duration(&self, target: &str, elapsed: Duration) -> bool {
        let slow = self.is_slow_request(elapsed);
        if slow {
            tracing::warn!(
                target_url = target,
                elapsed = ?elapsed,
                threshold = ?self.slow_requests_threshold,
                "slow request"
            );
        } else {
            tracing::trace!(target_url = target, elapsed = ?elapsed, "request finished");
        }
        slow
    }
}

impl From<&ClientConfiguration> for TransportSettings {
    fn from(config: &ClientConfiguration) -> Self {
        Self::resolve(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let settings = ClientConfiguration::new().transport_settings();

        assert_eq!(settings.connection_request_timeout, None);
        assert_eq!(settings.connection_timeout, Some(Duration::from_secs(50)));
        assert_eq!(settings.socket_timeout, Some(Duration::from_secs(50)));
        assert_eq!(settings.request_timeout, None);
        assert_eq!(settings.connection_ttl, None);
        assert_eq!(settings.idle_connection_timeout, Some(Duration::from_secs(60)));
        assert_eq!(settings.validate_after_inactivity, Duration::from_secs(2));
        assert_eq!(settings.slow_requests_threshold, Duration::from_secs(300));
        assert_eq!(settings.max_connections, 1024);
        assert_eq!(settings.max_error_retry, 0);
    }

    #[test]
    fn test_zero_timeouts_mean_no_limit() {
        let mut config = ClientConfiguration::new();
        config
            .set_connection_timeout(0)
            .set_socket_timeout(0)
            .set_connection_request_timeout(0);

        let settings = TransportSettings::from(&config);
        assert_eq!(settings.connection_timeout, None);
        assert_eq!(settings.socket_timeout, None);
        assert_eq!(settings.connection_request_timeout, None);
    }

    #[test]
    fn test_request_timeout_requires_flag() {
        let mut config = ClientConfiguration::new();
        config.set_request_timeout(5_000);
        assert_eq!(config.transport_settings().request_timeout, None);

        config.set_request_timeout_enabled(true);
        assert_eq!(
            config.transport_settings().request_timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_reaper_disabled() {
        let mut config = ClientConfiguration::new();
        config.set_use_reaper(false);

        assert_eq!(config.transport_settings().idle_connection_timeout, None);
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        let mut config = ClientConfiguration::new();
        config
            .set_max_connections(-5)
            .set_max_error_retry(-1)
            .set_connection_ttl(90_000);

        let settings = config.transport_settings();
        assert_eq!(settings.max_connections, 0);
        assert_eq!(settings.max_error_retry, 0);
        assert_eq!(settings.connection_ttl, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_slow_request_detection() {
        let mut config = ClientConfiguration::new();
        config.set_slow_requests_threshold(1_000);
        let settings = config.transport_settings();

        assert!(!settings.is_slow_request(Duration::from_millis(999)));
        assert!(settings.is_slow_request(Duration::from_millis(1_000)));
        assert!(settings.record_request_duration("http://example.com/", Duration::from_secs(2)));
        assert!(
            !settings.record_request_duration("http://example.com/", Duration::from_millis(10))
        );
        assert!(settings.record_request_duration("http://example.com/", Duration::MAX));
    }
}
