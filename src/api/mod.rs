// API module entry
// Hero CRUD endpoints over the shared in-memory store

mod error;
mod handlers;
mod response;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::routing::{self, Endpoint, RouteOutcome};

/// API route handler
///
/// Resolves the request against the route table and dispatches to the hero
/// handler. Handler errors become responses here, so this never fails.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    logger::log_request(req.method(), req.uri());

    let response = match routing::resolve(req.method(), req.uri().path()) {
        RouteOutcome::Matched {
            endpoint,
            hero_name,
        } => {
            let name = hero_name.unwrap_or_default();
            let result = match endpoint {
                Endpoint::ListHeroes => handlers::list_heroes(&state),
                Endpoint::GetHero => handlers::get_hero(&state, &name),
                Endpoint::CreateHero => handlers::create_hero(req, &state).await,
                Endpoint::UpdateHero => handlers::update_hero(req, &state, &name).await,
                Endpoint::DeleteAllHeroes => Ok(handlers::delete_all_heroes(&state)),
                Endpoint::DeleteHero => Ok(handlers::delete_hero(&state, &name)),
            };
            result.unwrap_or_else(|e| response::error_response(&e))
        }
        RouteOutcome::MethodNotAllowed(allowed) => {
            logger::log_warning(&format!(
                "Method not allowed: {} {}",
                req.method(),
                req.uri().path()
            ));
            http::build_405_response(&allowed)
        }
        RouteOutcome::NotFound => http::build_404_response(),
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::Hero;
    use http_body_util::BodyExt;
    use hyper::header::{ALLOW, CONTENT_TYPE};
    use hyper::{Method, StatusCode};

    const THOR: &str =
        r#"{"name":"Thor","description":"God of Thunder","quality":"Strength","rating":5}"#;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(&Config::default()))
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: &str,
    ) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap();
        handle_request(req, Arc::clone(state)).await.unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_thor_lifecycle() {
        let state = state();

        let resp = send(&state, Method::POST, "/api/create", THOR).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let created: Hero = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert_eq!(created, Hero::new("Thor", "God of Thunder", "Strength", 5));

        let resp = send(&state, Method::GET, "/api/Thor", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: Hero = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert_eq!(fetched, created);

        let king =
            r#"{"name":"Thor","description":"Asgardian King","quality":"Wisdom","rating":4}"#;
        let resp = send(&state, Method::PUT, "/api/update/Thor", king).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_of(resp).await.is_empty());

        let resp = send(&state, Method::GET, "/api/Thor", "").await;
        let updated: Hero = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert_eq!(updated.description, "Asgardian King");
        assert_eq!(updated.rating, 4);

        let resp = send(&state, Method::DELETE, "/api/delete/Thor", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_of(resp).await.is_empty());

        let resp = send(&state, Method::GET, "/api/Thor", "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_replaces_existing() {
        let state = state();
        send(&state, Method::POST, "/api/create", THOR).await;
        send(&state, Method::POST, "/api/create", r#"{"name":"Thor","rating":1}"#).await;

        assert_eq!(state.store.len(), 1);
        assert_eq!(state.store.get("Thor"), Some(Hero::new("Thor", "", "", 1)));
    }

    #[tokio::test]
    async fn test_update_unknown_leaves_store_unchanged() {
        let state = state();
        send(&state, Method::POST, "/api/create", THOR).await;

        let resp = send(&state, Method::PUT, "/api/update/Loki", THOR).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_of(resp).await.is_empty());
        assert_eq!(state.store.len(), 1);
        assert!(state.store.get("Loki").is_none());
    }

    #[tokio::test]
    async fn test_update_stores_under_path_name() {
        let state = state();
        send(&state, Method::POST, "/api/create", THOR).await;

        let resp = send(
            &state,
            Method::PUT,
            "/api/update/Thor",
            r#"{"name":"Jane","quality":"Worthy"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.store.get("Thor"), Some(Hero::new("Jane", "", "Worthy", 0)));
        assert!(state.store.get("Jane").is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let state = state();
        send(&state, Method::POST, "/api/create", THOR).await;

        let resp = send(&state, Method::POST, "/api/create", r#"{"name":"#).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: serde_json::Value = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert!(error["error"].as_str().unwrap().starts_with("Invalid hero JSON"));

        let resp = send(&state, Method::PUT, "/api/update/Thor", "not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = send(&state, Method::POST, "/api/create", "").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // Exactly one JSON object: no trailing data, no bare null
        let trailing = format!("{THOR} {{}}");
        let resp = send(&state, Method::POST, "/api/create", &trailing).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = send(&state, Method::POST, "/api/create", "null").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.store.get("").is_none());

        // Store untouched, server still serving
        let resp = send(&state, Method::GET, "/api/Thor", "").await;
        let hero: Hero = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert_eq!(hero.description, "God of Thunder");
    }

    #[tokio::test]
    async fn test_delete_unknown_is_bad_request() {
        let state = state();
        let resp = send(&state, Method::DELETE, "/api/delete/Thanos", "").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_and_delete_all() {
        let state = state();
        let resp = send(&state, Method::GET, "/api/", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, "[]");

        for name in ["Vision", "Hulk", "Thor"] {
            let body = format!(r#"{{"name":"{name}"}}"#);
            send(&state, Method::POST, "/api/create", &body).await;
        }
        send(&state, Method::DELETE, "/api/delete/Hulk", "").await;

        let resp = send(&state, Method::GET, "/api/", "").await;
        let heroes: Vec<Hero> = serde_json::from_slice(&body_of(resp).await).unwrap();
        let names: Vec<&str> = heroes.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Thor", "Vision"]);

        let resp = send(&state, Method::DELETE, "/api/delete", "").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&state, Method::GET, "/api/", "").await;
        assert_eq!(body_of(resp).await, "[]");
    }

    #[tokio::test]
    async fn test_percent_encoded_name() {
        let state = state();
        send(&state, Method::POST, "/api/create", r#"{"name":"Iron Man"}"#).await;

        let resp = send(&state, Method::GET, "/api/Iron%20Man", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unrouted_requests() {
        let state = state();

        let resp = send(&state, Method::POST, "/api/Thor", THOR).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET");

        let resp = send(&state, Method::GET, "/heroes", "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.store.len(), 0);
    }

    #[tokio::test]
    async fn test_legacy_found_status() {
        let mut config = Config::default();
        config.http.legacy_found_status = true;
        let state = Arc::new(AppState::new(&config));
        send(&state, Method::POST, "/api/create", THOR).await;

        let resp = send(&state, Method::GET, "/api/Thor", "").await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        let resp = send(&state, Method::GET, "/api/", "").await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = Config::default();
        config.http.max_body_size = 32;
        let state = Arc::new(AppState::new(&config));

        let resp = send(&state, Method::POST, "/api/create", THOR).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/create")
            .header("Content-Length", "4096")
            .body(Full::new(Bytes::from_static(b"{}")))
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(state.store.len(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates() {
        let state = state();

        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let body = format!(r#"{{"name":"hero-{i}","rating":{}}}"#, i % 6);
                    send(&state, Method::POST, "/api/create", &body).await.status()
                })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::CREATED);
        }

        assert_eq!(state.store.len(), 50);
        for i in 0..50 {
            let resp = send(&state, Method::GET, &format!("/api/hero-{i}"), "").await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }
}
