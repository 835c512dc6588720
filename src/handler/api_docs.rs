//! API reference handler module
//!
//! Serves requests under `/api/`. Legacy paths redirect permanently to
//! their current locations; everything else maps to a file under the API
//! root and is served byte-for-byte, degrading to the rendered 404 page on
//! any failure.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use thiserror::Error;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache};
use crate::logger;
use crate::templates::NOT_FOUND_TEMPLATE;

/// Failures while serving a raw API file
#[derive(Debug, Error)]
enum FileError {
    #[error("path escapes the API root")]
    Traversal,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Serve a request under `/api/`
pub async fn serve(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    // Redirect check runs first; a match never falls through to file serving
    if let Some(target) = state.redirects.resolve(ctx.path) {
        return http::build_redirect_response(&target);
    }

    match read_api_file(&state.config.site.api_root, ctx.path).await {
        Ok(data) => {
            let etag = cache::generate_etag(&data);
            if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
                return http::build_304_response(&etag, None);
            }
            http::build_raw_response(data, &etag, ctx.is_head)
        }
        Err(err) => {
            logger::log_warning(&format!("API file '{}' not served: {err}", ctx.path));
            not_found(ctx, state).await
        }
    }
}

/// Map the URL path to a file under the API root and read it
async fn read_api_file(api_root: &str, url_path: &str) -> Result<Vec<u8>, FileError> {
    let file_path = confine_to_root(api_root, url_path).ok_or(FileError::Traversal)?;
    Ok(tokio::fs::read(&file_path).await?)
}

/// Normalize the URL path component-wise under the API root
///
/// Anything stepping outside the root (`..`, root or prefix components) is
/// rejected before the filesystem is touched.
fn confine_to_root(api_root: &str, url_path: &str) -> Option<PathBuf> {
    let relative = url_path.trim_start_matches('/');
    let mut file_path = PathBuf::from(api_root);
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => file_path.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(file_path)
}

/// Render the 404 page for failed file lookups
async fn not_found(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let templates = Arc::clone(&state.templates);
    let rendered = tokio::task::spawn_blocking(move || templates.render(NOT_FOUND_TEMPLATE)).await;

    match rendered {
        Ok(Ok(body)) => http::build_html_response(body, 404, None, None, ctx.is_head),
        Ok(Err(err)) => {
            logger::log_error(&format!("404 page render failed: {err}"));
            http::build_500_response()
        }
        Err(err) => {
            logger::log_error(&format!("Render task failed: {err}"));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Config, LoggingConfig, PerformanceConfig, RedirectsConfig, ServerConfig, SiteConfig,
    };
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    fn fixture(api_files: &[(&str, &[u8])]) -> (TempDir, Arc<AppState>) {
        let dir = TempDir::new().unwrap();
        let docs_root = dir.path().join("docs");
        std::fs::create_dir_all(&docs_root).unwrap();
        std::fs::write(docs_root.join("404.html"), "not found page").unwrap();

        let api_root = dir.path().join("site");
        for (name, content) in api_files {
            let path = api_root.join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        std::fs::create_dir_all(&api_root).unwrap();

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            site: SiteConfig {
                docs_root: docs_root.to_str().unwrap().to_string(),
                api_root: api_root.to_str().unwrap().to_string(),
            },
            logging: LoggingConfig {
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            redirects: RedirectsConfig::default(),
        };

        (dir, Arc::new(AppState::new(config).unwrap()))
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_legacy_lit_html_redirects() {
        let (_dir, state) = fixture(&[]);
        let resp = serve(&ctx("/api/foo/lit_html"), &state).await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/api/foo/_lit_html_");
    }

    #[tokio::test]
    async fn test_legacy_shady_render_redirects() {
        let (_dir, state) = fixture(&[]);
        let resp = serve(&ctx("/api/2.0/shady_render"), &state).await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/api/2.0/_lib_shady_render_");
    }

    #[tokio::test]
    async fn test_serves_raw_file_bytes() {
        let payload: &[u8] = br#"{"version": "1.4"}"#;
        let (_dir, state) = fixture(&[("api/bar/baz.json", payload)]);
        let resp = serve(&ctx("/api/bar/baz.json"), &state).await;
        assert_eq!(resp.status(), 200);
        // Raw files are served without a content type
        assert!(!resp.headers().contains_key("content-type"));
        assert_eq!(body_bytes(resp).await.as_ref(), payload);
    }

    #[tokio::test]
    async fn test_missing_file_renders_404_page() {
        let (_dir, state) = fixture(&[]);
        let resp = serve(&ctx("/api/bar/missing.json"), &state).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(body_bytes(resp).await.as_ref(), b"not found page");
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let (dir, state) = fixture(&[]);
        // A real file one level above the API root must stay unreachable
        std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        let resp = serve(&ctx("/api/../secret.txt"), &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_matching_etag_yields_304() {
        let payload: &[u8] = b"raw bytes";
        let (_dir, state) = fixture(&[("api/file.d.ts", payload)]);
        let first = serve(&ctx("/api/file.d.ts"), &state).await;
        let etag = first.headers()["etag"].to_str().unwrap().to_string();

        let conditional = RequestContext {
            path: "/api/file.d.ts",
            is_head: false,
            if_none_match: Some(etag),
        };
        let resp = serve(&conditional, &state).await;
        assert_eq!(resp.status(), 304);
    }

    #[test]
    fn test_confine_to_root() {
        assert_eq!(
            confine_to_root("site", "/api/foo/bar.json"),
            Some(PathBuf::from("site/api/foo/bar.json"))
        );
        assert_eq!(
            confine_to_root("site", "/api/./foo.json"),
            Some(PathBuf::from("site/api/foo.json"))
        );
        assert!(confine_to_root("site", "/api/../escape.json").is_none());
        assert!(confine_to_root("site", "/api/foo/../../../etc/passwd").is_none());
    }
}
