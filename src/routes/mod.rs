use crate::{ContactStore, Envelope};
use actix_web::{get, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// `Connected` or `Disconnected`, from a live ping.
    pub database: String,
}

#[get("/health")]
/// Always answers 200 while the process is up; whether the database is reachable is reported in
/// the body.
pub async fn health(store: web::Data<ContactStore>) -> HttpResponse {
    log::debug!("servicing health request");

    let database = if store.ping().await {
        "Connected"
    } else {
        "Disconnected"
    };

    HttpResponse::Ok().json(Health {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        database: database.to_string(),
    })
}

/// Fallback for anything no route matched.
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(Envelope::<()>::failure("Route not found"))
}
