// Route table module
// Maps method + path pattern to the hero endpoint that serves it

use hyper::Method;

use super::matcher::match_path;

/// Hero API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListHeroes,
    GetHero,
    CreateHero,
    UpdateHero,
    DeleteAllHeroes,
    DeleteHero,
}

/// A registered method + path pattern
pub struct Route {
    pub method: Method,
    pub pattern: &'static str,
    pub endpoint: Endpoint,
}

/// Registered routes, matched in order
pub static ROUTES: [Route; 6] = [
    Route {
        method: Method::GET,
        pattern: "/api/",
        endpoint: Endpoint::ListHeroes,
    },
    Route {
        method: Method::GET,
        pattern: "/api/{hero-name}",
        endpoint: Endpoint::GetHero,
    },
    Route {
        method: Method::POST,
        pattern: "/api/create",
        endpoint: Endpoint::CreateHero,
    },
    Route {
        method: Method::PUT,
        pattern: "/api/update/{hero-name}",
        endpoint: Endpoint::UpdateHero,
    },
    Route {
        method: Method::DELETE,
        pattern: "/api/delete",
        endpoint: Endpoint::DeleteAllHeroes,
    },
    Route {
        method: Method::DELETE,
        pattern: "/api/delete/{hero-name}",
        endpoint: Endpoint::DeleteHero,
    },
];

/// Outcome of routing a request
#[derive(Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    Matched {
        endpoint: Endpoint,
        hero_name: Option<String>,
    },
    /// The path is known but only under these methods
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Resolve a request against `ROUTES`
pub fn resolve(method: &Method, path: &str) -> RouteOutcome {
    let mut allowed = Vec::new();

    for route in &ROUTES {
        let Some(matched) = match_path(route.pattern, path) else {
            continue;
        };
        if route.method == *method {
            return RouteOutcome::Matched {
                endpoint: route.endpoint,
                hero_name: matched.param,
            };
        }
        if !allowed.contains(&route.method) {
            allowed.push(route.method.clone());
        }
    }

    if allowed.is_empty() {
        RouteOutcome::NotFound
    } else {
        RouteOutcome::MethodNotAllowed(allowed)
    }
}
