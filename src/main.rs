use actix_web::{middleware::Condition, web, App, HttpServer};
use contacts_backend::{data, middlewares, routes, Config, ContactStore};
use log::*;

#[actix_rt::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    info!("starting contacts server");

    let config = Config::from_env()?;

    let pool = data::connect(&config.database).await?;
    data::init_schema(&pool).await?;
    if !data::ping(&pool).await {
        return Err(format!("couldn't reach database at {}", config.database.url).into());
    }
    info!(
        "database {} is ready ({} pooled connections)",
        config.database.url, config.database.pool_size
    );

    let store = web::Data::new(ContactStore::new(pool.clone(), config.search_case));
    let development = config.development;
    let cors_origins = config.cors_origins.clone();
    info!("allowing browser origins {}", cors_origins.join(", "));

    let server = HttpServer::new(move || {
        App::new()
            .configure(contacts_backend::configure(store.clone()))
            .default_service(web::to(routes::route_not_found))
            .wrap(Condition::new(development, middlewares::reveal_internal_errors()))
            .wrap(middlewares::cors(&cors_origins))
            .wrap(middlewares::request_logger())
    })
    .bind((config.host.as_str(), config.port))?;

    info!("listening on http://{}:{}", config.host, config.port);
    for endpoint in &[
        "GET    /api/health",
        "GET    /api/contacts",
        "GET    /api/contacts/{id}",
        "POST   /api/contacts/create",
        "PUT    /api/contacts/edit/{id}",
        "DELETE /api/contacts/{id}",
        "GET    /api/contacts/search/{query}",
    ] {
        info!("  {}", endpoint);
    }

    // actix stops gracefully on SIGINT/SIGTERM; only then do we let go of the pool
    server.run().await?;
    info!("shutting down, closing database pool");
    pool.close().await;

    Ok(())
}
