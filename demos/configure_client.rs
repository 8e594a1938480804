use std::time::Duration;

use cdmi_client_config::prelude::*;
use tracing_subscriber::EnvFilter;

// Configuration - update these to match your environment
const STORAGE_HOST: &str = "storage.example.com";
const PROXY_HOST: &str = "proxy.example.com";

fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging, e.g. RUST_LOG=cdmi_client_config=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("CDMI Client Configuration Example\n");

    // Step 1: Describe the configuration with the builder
    let config = ClientConfiguration::builder()
        .with_protocol(Protocol::Https)
        .with_max_error_retry(3)
        .with_max_connections(128)
        .with_request_timeout(30_000)
        .with_proxy(PROXY_HOST, 3128)
        .with_proxy_credentials("svc-storage", "change-me")
        .with_default_header("User-Agent", "cdmi-client/0.1")
        .build()?;

    // Step 2: Adjust it in place before handing it over
    let mut config = config;
    config
        .set_sld_enabled(true)
        .add_default_header("X-Request-Source", "demo");

    // A non-positive proxy port is rejected and leaves the configuration untouched
    if let Err(e) = config.set_proxy_port(0) {
        println!("Rejected: {e}");
    }

    // Step 3: Inspect the resolved settings
    let settings = config.transport_settings();
    println!("Resolved settings:");
    println!("  - Connect timeout: {:?}", settings.connection_timeout);
    println!("  - Request timeout: {:?}", settings.request_timeout);
    println!("  - Pool checkout:   {:?}", settings.connection_request_timeout);
    println!("  - Pool size:       {}", settings.max_connections);
    println!("  - Retries:         {}", settings.max_error_retry);

    if let Some(proxy) = config.proxy() {
        println!("  - Proxy:           {}", proxy.url()?);
    }

    // Step 4: Build the HTTP client
    let transport = HttpTransport::from_configuration(STORAGE_HOST, &config)?;
    println!("\nClient ready for: {}", transport.base_url());

    settings.record_request_duration(transport.base_url().as_str(), Duration::from_millis(120));

    // Step 5: Persist the configuration
    println!("\n{}", config.to_json()?);

    Ok(())
}
