//! Request routing
//!
//! Entry point for HTTP request processing: method gate, body-size gate,
//! path classification, dispatch, and access logging.

use crate::config::{AppState, RoutesConfig};
use crate::handler::{pages, static_files};
use crate::http;
use crate::logger;
use crate::logger::AccessLogEntry;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::HeaderMap;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Per-request state threaded through the handlers
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// What a request path maps to
#[derive(Debug, PartialEq, Eq)]
pub enum RouteKind {
    /// One of the fixed page routes, carrying its label
    Page(&'static str),
    /// A file under the static tree
    Static,
    /// A favicon alias
    Favicon,
    /// Health probe
    Health,
    /// Nothing matched
    NotFound,
}

/// Classify a request path against the route families
///
/// Order matters: health probes and favicon aliases are checked before the
/// page table so configuration cannot be shadowed by it, and the static
/// prefix is checked last.
pub fn classify_path(path: &str, routes: &RoutesConfig) -> RouteKind {
    if routes.health.enabled
        && (path == routes.health.liveness_path || path == routes.health.readiness_path)
    {
        return RouteKind::Health;
    }

    if routes.favicon_paths.iter().any(|p| path == p) {
        return RouteKind::Favicon;
    }

    if let Some(page) = pages::resolve_page(path) {
        return RouteKind::Page(page);
    }

    // The bare "/static" prefix is not a file; only paths below it are
    if path
        .strip_prefix(static_files::STATIC_PREFIX)
        .is_some_and(|rest| rest.starts_with('/'))
    {
        return RouteKind::Static;
    }

    RouteKind::NotFound
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);

    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_value(req.headers(), "referer");
    entry.user_agent = header_value(req.headers(), "user-agent");

    let is_head = *req.method() == Method::HEAD;
    let mut response = dispatch(&req, &state).await;
    apply_server_headers(&mut response, &state.config.http);

    if access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = if is_head { 0 } else { body_bytes(&response) };
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route the request to the matching handler
async fn dispatch(
    req: &Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    // 1. Only GET/HEAD carry content; OPTIONS and the rest answer early
    if let Some(resp) = check_http_method(req.method(), state.config.http.enable_cors) {
        return resp;
    }

    // 2. Reject oversized declared bodies before touching them
    if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        return resp;
    }

    // 3. Debug mode logs header counts per request
    logger::log_headers_count(req.headers().len(), state.config.server.debug);

    let path = req.uri().path();
    let ctx = RequestContext {
        path,
        is_head: *req.method() == Method::HEAD,
        if_none_match: header_value(req.headers(), "if-none-match"),
        range_header: header_value(req.headers(), "range"),
    };

    match classify_path(path, &state.config.routes) {
        RouteKind::Page(page) => {
            pages::serve_page(page, &state.config.site.title, ctx.is_head)
        }
        RouteKind::Static => {
            static_files::serve_static(&ctx, &state.config.site.static_dir).await
        }
        RouteKind::Favicon => {
            static_files::serve_favicon(&ctx, &state.config.site.static_dir).await
        }
        RouteKind::Health => http::build_health_response("ok"),
        RouteKind::NotFound => http::build_404_response(),
    }
}

/// Answer non-GET/HEAD methods; None means continue processing
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Reject requests whose declared Content-Length exceeds the limit
///
/// The routes themselves ignore request bodies entirely; this gate only
/// keeps a client from streaming an arbitrarily large one at the server.
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let declared = headers.get("content-length")?.to_str().ok()?;
    match declared.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        _ => None,
    }
}

/// Attach the identification and CORS headers every response carries
fn apply_server_headers(response: &mut Response<Full<Bytes>>, http_config: &crate::config::HttpConfig) {
    if let Ok(value) = http_config.server_name.parse() {
        response.headers_mut().insert("Server", value);
    }
    if http_config.enable_cors {
        response
            .headers_mut()
            .insert("Access-Control-Allow-Origin", hyper::header::HeaderValue::from_static("*"));
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

/// Body size of a built response, read back from Content-Length
fn body_bytes(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutesConfig;

    fn default_routes() -> RoutesConfig {
        RoutesConfig::default()
    }

    #[test]
    fn test_page_routes_classify() {
        let routes = default_routes();
        assert_eq!(classify_path("/", &routes), RouteKind::Page("about"));
        assert_eq!(classify_path("/about", &routes), RouteKind::Page("about"));
        assert_eq!(
            classify_path("/projects", &routes),
            RouteKind::Page("projects")
        );
        assert_eq!(classify_path("/pong", &routes), RouteKind::Page("pong"));
        assert_eq!(
            classify_path("/drawing", &routes),
            RouteKind::Page("drawing")
        );
        assert_eq!(
            classify_path("/modern-pirates", &routes),
            RouteKind::Page("modern-pirates")
        );
    }

    #[test]
    fn test_unmatched_paths_are_not_found() {
        let routes = default_routes();
        assert_eq!(classify_path("/missing", &routes), RouteKind::NotFound);
        assert_eq!(classify_path("/about/team", &routes), RouteKind::NotFound);
        assert_eq!(classify_path("/pong2", &routes), RouteKind::NotFound);
        // The bare prefix is not a file
        assert_eq!(classify_path("/static", &routes), RouteKind::NotFound);
    }

    #[test]
    fn test_static_and_favicon_classify() {
        let routes = default_routes();
        assert_eq!(
            classify_path("/static/games/pong.js", &routes),
            RouteKind::Static
        );
        assert_eq!(classify_path("/favicon.ico", &routes), RouteKind::Favicon);
        assert_eq!(classify_path("/favicon.svg", &routes), RouteKind::Favicon);
    }

    #[test]
    fn test_health_respects_config() {
        let mut routes = default_routes();
        assert_eq!(classify_path("/healthz", &routes), RouteKind::Health);
        assert_eq!(classify_path("/readyz", &routes), RouteKind::Health);

        routes.health.enabled = false;
        assert_eq!(classify_path("/healthz", &routes), RouteKind::NotFound);
    }

    #[test]
    fn test_method_gate() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::HEAD, false).is_none());

        let options = check_http_method(&Method::OPTIONS, false).unwrap();
        assert_eq!(options.status(), 204);

        let post = check_http_method(&Method::POST, false).unwrap();
        assert_eq!(post.status(), 405);
    }

    #[test]
    fn test_body_size_gate() {
        let mut headers = HeaderMap::new();
        assert!(check_body_size(&headers, 1024).is_none());

        headers.insert("content-length", "512".parse().unwrap());
        assert!(check_body_size(&headers, 1024).is_none());

        headers.insert("content-length", "2048".parse().unwrap());
        let resp = check_body_size(&headers, 1024).unwrap();
        assert_eq!(resp.status(), 413);

        // Unparseable declarations are left for hyper to deal with
        headers.insert("content-length", "not-a-number".parse().unwrap());
        assert!(check_body_size(&headers, 1024).is_none());
    }
}
