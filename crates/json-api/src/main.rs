//! Shipments JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info, warn};

use shipments_app::{context::AppContext, domain::tenants::TenantId};

use crate::{
    config::ServerConfig,
    state::{State, Tenancy},
};

mod config;
mod extensions;
mod healthcheck;
mod observability;
mod router;
mod shipments;
mod shutdown;
mod state;
mod tenancy;
#[cfg(test)]
mod test_helpers;

/// Shipments JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "the subscriber failed to install, so tracing output would be lost"
        )]
        {
            eprintln!("Observability error: {init_error}");
        }

        process::exit(1);
    }

    let default_tenant = match TenantId::new(config.tenancy.default_tenant.as_str()) {
        Ok(tenant) => tenant,
        Err(tenant_error) => {
            error!("invalid default tenant: {tenant_error}");

            process::exit(1);
        }
    };

    let tenancy = Tenancy {
        header: config.tenancy.tenant_header.to_ascii_lowercase(),
        default_tenant,
    };

    let app = match config.database.database_url.as_deref() {
        Some(url) => {
            match AppContext::from_database_url(url, config.database.run_migrations).await {
                Ok(app) => app,
                Err(init_error) => {
                    error!("failed to initialize app context: {init_error}");

                    process::exit(1);
                }
            }
        }
        None => {
            warn!("DATABASE_URL is not set, shipments are kept in memory only");

            AppContext::in_memory()
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(observability::request_logging)
        .hoop(inject(State::from_app_context(app, tenancy)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(router::app_router());

    let doc = OpenApi::new("Shipments API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();
    let grace_period = config.server.shutdown_grace_period();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace_period).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
