use crate::ServiceError;
use actix_cors::Cors;
use actix_web::{
    dev::ServiceResponse,
    http::{header, StatusCode},
    middleware::{ErrorHandlerResponse, ErrorHandlers, Logger},
    web, HttpResponse,
};

/// One line per request: method and path, status, and how long it took.
pub fn request_logger() -> Logger {
    Logger::new("%r %s %Dms")
}

/// Lets the browser UI at `origins` call the API, cookies and `Authorization` included.
pub fn cors<S: AsRef<str>>(origins: &[S]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin.as_ref()))
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600)
}

/// Bodies that aren't JSON, or aren't shaped like a contact, become a 400 envelope instead of
/// actix's plain-text error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ServiceError::bad_request(&format!("Invalid request body: {}", err)).into()
    })
}

/// An id that doesn't parse as an integer can't name a contact.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("unusable path segment: {}", err);
        ServiceError::NotFound.into()
    })
}

/// Swaps the generic failure text of every 500 for the error's own detail. Only wrapped around
/// the app in development.
pub fn reveal_internal_errors<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, reveal_detail)
}

fn reveal_detail<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let revealed = res
        .response()
        .error()
        .and_then(|e| e.as_error::<ServiceError>())
        .map(|e| e.envelope(true));

    let envelope = match revealed {
        Some(envelope) => envelope,
        None => return Ok(ErrorHandlerResponse::Response(res.map_into_left_body())),
    };

    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, HttpResponse::InternalServerError().json(envelope));
    Ok(ErrorHandlerResponse::Response(res.map_into_right_body()))
}
