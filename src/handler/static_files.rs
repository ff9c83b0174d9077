//! Static file serving
//!
//! Serves the /static/ tree and the favicon aliases from the configured
//! directory, with MIME detection, ETag validation, and Range support.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeOutcome};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// URL prefix of the static tree
pub const STATIC_PREFIX: &str = "/static";

const FAVICON_FILE: &str = "favicon.svg";

/// Serve a request under /static/
pub async fn serve_static(ctx: &RequestContext<'_>, static_dir: &str) -> Response<Full<Bytes>> {
    match load_from_directory(static_dir, ctx.path).await {
        Some((content, content_type)) => respond_with_asset(ctx, &content, content_type),
        None => http::build_404_response(),
    }
}

/// Serve the favicon aliases (/favicon.ico, /favicon.svg)
pub async fn serve_favicon(ctx: &RequestContext<'_>, static_dir: &str) -> Response<Full<Bytes>> {
    let path = Path::new(static_dir).join(FAVICON_FILE);
    match fs::read(&path).await {
        Ok(content) => respond_with_asset(ctx, &content, "image/svg+xml"),
        Err(_) => http::build_404_response(),
    }
}

/// Resolve and read a file beneath the static directory
///
/// The request path is stripped of the /static prefix, cleaned of parent
/// references, and the opened path is verified to stay inside the tree.
async fn load_from_directory(static_dir: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    let relative = path
        .strip_prefix(STATIC_PREFIX)
        .unwrap_or(path)
        .trim_start_matches('/')
        .replace("..", "");

    if relative.is_empty() {
        return None;
    }

    let file_path = Path::new(static_dir).join(&relative);

    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // A missing file is an ordinary 404, not worth a warning
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }
    if file_path_canonical.is_dir() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type =
        mime::content_type_for(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build the response for a loaded asset: 304, 206, or full 200
fn respond_with_asset(
    ctx: &RequestContext<'_>,
    data: &[u8],
    content_type: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::etag_for(data);
    let total_size = data.len();

    if cache::not_modified(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Partial(range) => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[range.start..=range.end].to_vec())
            };
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                range.start,
                range.end,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Full => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data.to_owned())
            };
            http::response::build_asset_response(body, content_type, &etag, ctx.is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents).unwrap();
    }

    fn temp_static_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("portfolio_static_test_{tag}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("games")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_existing_file() {
        let dir = temp_static_dir("load");
        write_file(&dir.join("games"), "pong.js", b"var paddle;");

        let loaded = load_from_directory(dir.to_str().unwrap(), "/static/games/pong.js").await;
        let (content, content_type) = loaded.expect("file should load");
        assert_eq!(content, b"var paddle;");
        assert_eq!(content_type, "application/javascript");
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = temp_static_dir("missing");
        let loaded = load_from_directory(dir.to_str().unwrap(), "/static/nope.css").await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let dir = temp_static_dir("traversal");
        write_file(&dir, "ok.txt", b"fine");

        let loaded =
            load_from_directory(dir.to_str().unwrap(), "/static/../../etc/passwd").await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_bare_prefix_is_none() {
        let dir = temp_static_dir("bare");
        assert!(load_from_directory(dir.to_str().unwrap(), "/static/").await.is_none());
        assert!(load_from_directory(dir.to_str().unwrap(), "/static").await.is_none());
    }
}
