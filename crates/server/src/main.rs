mod accounts;
mod auth;
mod birth_date;
mod handlers;
mod pagination;
mod schema;
mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use aide::{
    axum::ApiRouter,
    openapi::{Info, OpenApi},
};
use axum::{Extension, Router, Server};
use common::{config::Config, logging};
use db::{Database, DatabaseConnection};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::new()?;

    logging::init(&config);

    let Some(server_config) = config.server.as_ref() else {
        return Err(anyhow::Error::msg("unable to load server config"));
    };

    info!("connecting to database");
    let database = Arc::new(Database::connect(&config.database.url).await?);
    let server = Server::bind(&server_config.address);
    let config = Arc::new(config);

    info!("listening for requests");
    server
        .serve(app_router(database, config).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");

    Ok(())
}

/// Resolve once the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(%err, "unable to listen for shutdown signal");
    }
}

fn app_router(database: Arc<DatabaseConnection>, config: Arc<Config>) -> Router {
    let mut api = OpenApi {
        info: Info {
            title: String::from("Class booking API"),
            version: String::from(env!("CARGO_PKG_VERSION")),
            ..Info::default()
        },
        ..OpenApi::default()
    };

    ApiRouter::new()
        .merge(handlers::health::routes())
        .nest("/auth", handlers::auth::routes(database.clone()))
        .nest("/users", handlers::users::routes(database.clone()))
        .nest("/admin", handlers::admin::routes(database.clone()))
        .nest("/classes", handlers::classes::routes())
        .nest("/docs", handlers::docs::routes())
        .finish_api(&mut api)
        .layer(Extension(Arc::new(api)))
        .layer(Extension(config))
        .with_state(database)
}
