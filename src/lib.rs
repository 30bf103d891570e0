//! # API Flow
//! The contacts backend serves a single table of contact records over a small JSON REST API.
//!
//! ## Servicing a request
//! Every route lives under `/api`. Handlers in [`contact::routes`] hand the request body to the
//! [`ContactStore`], which validates it with [`contact::validate`] and runs exactly one SQL
//! statement against the pool. Whatever comes back is wrapped in an [`Envelope`]; failures are
//! turned into one by [`ServiceError`]'s `ResponseError` implementation.
//!
//! ## Keeping a client in sync
//! [`client::SyncState`] mirrors the record set on the client side and reloads all of it after
//! every write.

#![deny(clippy::pedantic)]
#![allow(clippy::enum_glob_use)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![forbid(unsafe_code)]
#![forbid(rustdoc::broken_intra_doc_links)]
use actix_web::{error::ResponseError, http::StatusCode, web, HttpResponse};
use log::*;
use std::fmt;

pub mod client;
pub mod config;
pub mod contact;
pub mod data;
pub mod envelope;
pub mod middlewares;
pub mod routes;

pub use config::Config;
pub use contact::{store::ContactStore, validate::FieldErrors, Contact, ContactInput};
pub use envelope::Envelope;

/// What every 5xx response tells the caller when internal detail is hidden.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug)]
/// The contacts API was unable to service you, for any of these reasons.
pub enum ServiceError {
    /// One or more fields of the submitted contact failed validation.
    Invalid(FieldErrors),
    /// The request you sent us couldn't be read at all.
    BadRequest(String),
    /// There's no contact with that id.
    NotFound,
    /// The write would duplicate a uniquely constrained field.
    Conflict(String),
    /// We couldn't reach the database. `message` names what we were trying to do.
    Unavailable { message: &'static str, detail: String },
    /// Something went wrong on our end.
    InternalServerError { message: &'static str, detail: String },
}
impl ServiceError {
    /// A shortcut for making a `ServiceError::BadRequest`.
    /// ```
    /// use contacts_backend::ServiceError;
    ///
    /// let br = ServiceError::bad_request("you're bad and you should feel bad");
    /// let is_br = matches!(br, ServiceError::BadRequest(_));
    /// assert!(is_br, "ServiceError::bad_request() should always return a BadRequest variant");
    /// ```
    pub fn bad_request<T: ToString + ?Sized>(t: &T) -> Self {
        Self::BadRequest(t.to_string())
    }

    /// Whether the failure is ours rather than the caller's.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::InternalServerError { .. }
        )
    }

    /// Names the operation a server-side failure interrupted, so the caller is told what didn't
    /// happen. Caller errors are passed through untouched.
    /// ```
    /// use contacts_backend::ServiceError;
    ///
    /// let down = ServiceError::Unavailable {
    ///     message: "Database unavailable",
    ///     detail: "pool closed".into(),
    /// };
    /// let env = down.context("Failed to fetch contacts").envelope(false);
    /// assert_eq!(env.message.as_deref(), Some("Failed to fetch contacts"));
    ///
    /// let missing = ServiceError::NotFound.context("Failed to fetch contact");
    /// assert!(matches!(missing, ServiceError::NotFound));
    /// ```
    pub fn context(self, message: &'static str) -> Self {
        use ServiceError::*;

        match self {
            Unavailable { detail, .. } => Unavailable { message, detail },
            InternalServerError { detail, .. } => InternalServerError { message, detail },
            other => other,
        }
    }

    /// The envelope sent back for this error. Diagnostic detail for server-side failures is only
    /// included when `reveal` is set.
    pub fn envelope(&self, reveal: bool) -> Envelope<()> {
        use ServiceError::*;

        match self {
            Invalid(errors) => Envelope::failure(errors.to_string()).with_errors(errors),
            BadRequest(s) | Conflict(s) => Envelope::failure(s),
            NotFound => Envelope::failure("Contact not found"),
            Unavailable { message, detail } | InternalServerError { message, detail } => {
                Envelope::failure(*message)
                    .with_error(if reveal { detail.as_str() } else { GENERIC_FAILURE })
            }
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ServiceError::*;

        match self {
            Invalid(errors) => write!(f, "Invalid contact: {}", errors),
            BadRequest(s) => write!(f, "Bad Request: {}", s),
            NotFound => write!(f, "Contact not found"),
            Conflict(s) => write!(f, "Conflict: {}", s),
            Unavailable { message, detail } => {
                write!(f, "{} (database unavailable): {}", message, detail)
            }
            InternalServerError { message, detail } => {
                write!(f, "{} (internal server error): {}", message, detail)
            }
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        use ServiceError::*;

        match self {
            Invalid(_) | BadRequest(_) => StatusCode::BAD_REQUEST,
            NotFound => StatusCode::NOT_FOUND,
            Conflict(_) => StatusCode::CONFLICT,
            Unavailable { .. } | InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_server_error() {
            error!("{}", self);
        } else {
            info!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(self.envelope(false))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> ServiceError {
        match e {
            sqlx::Error::RowNotFound => ServiceError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ServiceError::Conflict("Email already exists".to_string())
            }
            down @ (sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)) => {
                error!("database unreachable: {}", down);
                ServiceError::Unavailable {
                    message: "Database unavailable",
                    detail: down.to_string(),
                }
            }
            other => {
                error!("sqlx error: {}", other);
                ServiceError::InternalServerError {
                    message: "Internal server error",
                    detail: other.to_string(),
                }
            }
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> ServiceError {
        error!("serde json error: {}", e);
        ServiceError::InternalServerError {
            message: "Internal server error",
            detail: e.to_string(),
        }
    }
}

/// Registers every `/api` route, the shared [`ContactStore`], and the extractor configuration
/// on an actix-web `App`.
/// ```no_run
/// # async fn run(store: contacts_backend::ContactStore) -> std::io::Result<()> {
/// use actix_web::{web, App, HttpServer};
///
/// let store = web::Data::new(store);
/// HttpServer::new(move || {
///     App::new()
///         .configure(contacts_backend::configure(store.clone()))
///         .default_service(web::to(contacts_backend::routes::route_not_found))
/// })
/// .bind(("127.0.0.1", 7777))?
/// .run()
/// .await
/// # }
/// ```
pub fn configure(store: web::Data<ContactStore>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(store)
            .app_data(middlewares::json_config())
            .app_data(middlewares::path_config())
            .service(
                web::scope("/api")
                    // health
                    .service(routes::health)
                    // contacts
                    .service(contact::routes::search_contacts)
                    .service(contact::routes::create_contact)
                    .service(contact::routes::edit_contact)
                    .service(contact::routes::list_contacts)
                    .service(contact::routes::get_contact)
                    .service(contact::routes::delete_contact),
            );
    }
}
