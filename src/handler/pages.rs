//! Page routes and template rendering
//!
//! The site is a single template rendered with a per-route `page` label.
//! The route table is fixed at compile time; there is nothing to configure.

use askama::Template;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http;
use crate::logger;

/// Path to page label, matched exactly
pub const PAGE_ROUTES: &[(&str, &str)] = &[
    ("/", "about"),
    ("/about", "about"),
    ("/projects", "projects"),
    ("/pong", "pong"),
    ("/drawing", "drawing"),
    ("/modern-pirates", "modern-pirates"),
];

/// Resolve a request path to its page label
pub fn resolve_page(path: &str) -> Option<&'static str> {
    PAGE_ROUTES
        .iter()
        .find(|(route, _)| *route == path)
        .map(|(_, page)| *page)
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    page: &'a str,
    title: &'a str,
}

/// Render the site template for a page label
pub fn render_page(page: &str, title: &str) -> Result<String, askama::Error> {
    IndexTemplate { page, title }.render()
}

/// Serve a page route
///
/// Rendering the compiled-in template only fails on formatting errors, which
/// map to 500 the way the original development server surfaced them.
pub fn serve_page(page: &str, title: &str, is_head: bool) -> Response<Full<Bytes>> {
    match render_page(page, title) {
        Ok(html) => http::response::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to render page '{page}': {e}"));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        assert_eq!(resolve_page("/"), Some("about"));
        assert_eq!(resolve_page("/about"), Some("about"));
        assert_eq!(resolve_page("/projects"), Some("projects"));
        assert_eq!(resolve_page("/pong"), Some("pong"));
        assert_eq!(resolve_page("/drawing"), Some("drawing"));
        assert_eq!(resolve_page("/modern-pirates"), Some("modern-pirates"));
    }

    #[test]
    fn test_unknown_paths_do_not_resolve() {
        assert_eq!(resolve_page("/missing"), None);
        assert_eq!(resolve_page("/about/"), None);
        assert_eq!(resolve_page("/pong/extra"), None);
        assert_eq!(resolve_page(""), None);
    }

    #[test]
    fn test_rendered_body_contains_label() {
        for (_, page) in PAGE_ROUTES {
            let html = render_page(page, "test site").expect("template renders");
            assert!(
                html.contains(page),
                "body for '{page}' should contain its label"
            );
        }
    }

    #[test]
    fn test_root_and_about_render_identically() {
        let root = render_page(resolve_page("/").unwrap(), "test site").unwrap();
        let about = render_page(resolve_page("/about").unwrap(), "test site").unwrap();
        assert_eq!(root, about);
    }

    #[test]
    fn test_game_pages_load_their_scripts() {
        for game in ["pong", "drawing", "modern-pirates"] {
            let html = render_page(game, "test site").unwrap();
            assert!(
                html.contains(&format!("/static/games/{game}.js")),
                "page '{game}' should reference its script"
            );
        }
    }

    #[test]
    fn test_plain_pages_have_no_canvas() {
        for page in ["about", "projects"] {
            let html = render_page(page, "test site").unwrap();
            assert!(!html.contains("<canvas"));
        }
    }
}
