//! Connection configuration and client construction.

use std::time::Duration;

use hyper_util::{client::legacy::Client as HyperClient, rt::TokioExecutor};
use kube::{
    client::ConfigExt,
    config::KubeConfigOptions,
    Client, Config,
};
use tower::{limit::RateLimitLayer, BoxError, ServiceBuilder};
use tracing::debug;

/// Request-rate cap applied to the connection.
const REQUESTS_PER_SECOND: u64 = 100;

/// If KUBECONFIG is set we are running locally, use that.
/// Otherwise assume in-cluster credentials.
pub async fn load_config() -> anyhow::Result<Config> {
    let config = if std::env::var_os("KUBECONFIG").is_some() {
        Config::from_kubeconfig(&KubeConfigOptions::default()).await?
    } else {
        Config::incluster()?
    };
    debug!(cluster = %config.cluster_url, "loaded connection config");
    Ok(config)
}

/// Builds a client with the rate cap layered into the service stack.
pub fn build_client(config: Config) -> anyhow::Result<Client> {
    let connector = config.rustls_https_connector()?;
    // rate limiter sits outside the auth filter: AsyncFilter requires a Clone
    // inner service, and RateLimit is not Clone
    let service = ServiceBuilder::new()
        .layer(config.base_uri_layer())
        .layer(RateLimitLayer::new(REQUESTS_PER_SECOND, Duration::from_secs(1)))
        .option_layer(config.auth_layer()?)
        .map_err(BoxError::from)
        .service(HyperClient::builder(TokioExecutor::new()).build(connector));
    Ok(Client::new(service, config.default_namespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_client_from_bare_config() {
        // may already be installed by another test binary in the same process
        let _ = rustls::crypto::ring::default_provider().install_default();
        let config = Config::new("http://localhost:8080".parse().unwrap());
        build_client(config).expect("client construction should not fail");
    }
}
