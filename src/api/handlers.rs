// Hero handlers module
// One handler per endpoint; each maps a request onto a single store operation

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{Request, Response, StatusCode};

use super::error::ApiError;
use super::response::json_response;
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::store::Hero;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// GET /api/
pub fn list_heroes(state: &AppState) -> Result<Response<Full<Bytes>>, ApiError> {
    let heroes = state.store.list();
    logger::log_hero(&format!("Served all {} heroes", heroes.len()));
    json_response(found_status(state), &heroes)
}

/// GET /api/{hero-name}
pub fn get_hero(state: &AppState, name: &str) -> Result<Response<Full<Bytes>>, ApiError> {
    match state.store.get(name) {
        Some(hero) => {
            logger::log_hero(&format!("Hero {name} found and served"));
            json_response(found_status(state), &hero)
        }
        None => {
            logger::log_hero(&format!("No hero named {name}"));
            Ok(http::build_empty_json_response(StatusCode::NOT_FOUND))
        }
    }
}

/// POST /api/create
pub async fn create_hero<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let hero = read_hero(req, state.config.http.max_body_size).await?;
    state.store.put(hero.name.clone(), hero.clone());
    logger::log_hero(&format!("Created hero {}", hero.name));
    json_response(StatusCode::CREATED, &hero)
}

/// PUT /api/update/{hero-name}
///
/// The new record is stored under the path name, whatever its own `name` says.
pub async fn update_hero<B>(
    req: Request<B>,
    state: &AppState,
    name: &str,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let hero = read_hero(req, state.config.http.max_body_size).await?;
    if state.store.replace(name, hero) {
        logger::log_hero(&format!("Hero {name} updated"));
        Ok(http::build_empty_response(StatusCode::OK))
    } else {
        logger::log_hero(&format!("Hero {name} could not be updated: not found"));
        Ok(http::build_empty_response(StatusCode::BAD_REQUEST))
    }
}

/// DELETE /api/delete
pub fn delete_all_heroes(state: &AppState) -> Response<Full<Bytes>> {
    let removed = state.store.clear();
    logger::log_hero(&format!("Deleted all heroes ({removed} removed)"));
    http::build_empty_response(StatusCode::OK)
}

/// DELETE /api/delete/{hero-name}
pub fn delete_hero(state: &AppState, name: &str) -> Response<Full<Bytes>> {
    if state.store.delete(name) {
        logger::log_hero(&format!("Hero {name} deleted"));
        http::build_empty_response(StatusCode::OK)
    } else {
        logger::log_hero(&format!("Hero {name} could not be deleted: not found"));
        http::build_empty_response(StatusCode::BAD_REQUEST)
    }
}

/// Successful reads answer 200, or 302 when legacy clients expect it
const fn found_status(state: &AppState) -> StatusCode {
    if state.config.http.legacy_found_status {
        StatusCode::FOUND
    } else {
        StatusCode::OK
    }
}

/// Collect the request body (bounded by `max_body_size`) and decode a `Hero`
async fn read_hero<B>(req: Request<B>, max_body_size: u64) -> Result<Hero, ApiError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let too_large = ApiError::PayloadTooLarge {
        limit: max_body_size,
    };

    if let Some(declared) = declared_length(&req) {
        if declared > max_body_size {
            return Err(too_large);
        }
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => return Err(too_large),
        Err(e) => return Err(ApiError::Body(e.to_string())),
    };

    Ok(serde_json::from_slice(&body)?)
}

/// Content-Length, if present and well-formed
fn declared_length<B>(req: &Request<B>) -> Option<u64> {
    let value = req.headers().get(CONTENT_LENGTH)?;
    match value.to_str().ok().and_then(|s| s.parse().ok()) {
        Some(len) => Some(len),
        None => {
            logger::log_warning("Invalid Content-Length value, skipping size check");
            None
        }
    }
}
