//! Serve commands for the two services

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::ServeArgs;
use crate::api::router::{create_product_router, create_user_router, PRODUCT_SERVICE, USER_SERVICE};
use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Run the user-account service
pub async fn run_users(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    logging::init_logging(&config.logging, USER_SERVICE);

    let state = crate::create_user_state(&config).await?;
    let addr = build_socket_addr(&config, &args, config.server.port)?;

    serve(create_user_router(state), addr, USER_SERVICE).await
}

/// Run the product catalog service
pub async fn run_products(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    logging::init_logging(&config.logging, PRODUCT_SERVICE);

    let state = crate::create_product_state(&config).await?;
    let addr = build_socket_addr(&config, &args, config.server.products_port)?;

    serve(create_product_router(state), addr, PRODUCT_SERVICE).await
}

fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    Ok(AppConfig::load()?)
}

fn build_socket_addr(
    config: &AppConfig,
    args: &ServeArgs,
    default_port: u16,
) -> anyhow::Result<SocketAddr> {
    let host = args.host.as_deref().unwrap_or(&config.server.host);

    Ok(SocketAddr::from((
        host.parse::<std::net::IpAddr>()?,
        args.port.unwrap_or(default_port),
    )))
}

async fn serve(app: Router, addr: SocketAddr, service: &'static str) -> anyhow::Result<()> {
    info!(service, %addr, "Starting server");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(service, "Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr_overrides() {
        let config = AppConfig::default();

        let addr = build_socket_addr(&config, &ServeArgs::default(), config.server.products_port)
            .unwrap();
        assert_eq!(addr.port(), 8001);

        let args = ServeArgs {
            port: Some(9100),
            host: Some("127.0.0.1".to_string()),
        };
        let addr = build_socket_addr(&config, &args, config.server.port).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:9100");
    }

    #[test]
    fn test_invalid_host() {
        let args = ServeArgs {
            port: None,
            host: Some("not an ip".to_string()),
        };

        assert!(build_socket_addr(&AppConfig::default(), &args, 8000).is_err());
    }
}
