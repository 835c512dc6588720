//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the page or API reference handler, and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::handler::{api_docs, pages};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let is_head = method == Method::HEAD;

    let response = match check_http_method(&method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: uri.path(),
                is_head,
                if_none_match: header_string(&req, "if-none-match"),
            };

            // Paths under /api/ serve raw reference files; everything else
            // renders a documentation page.
            if ctx.path.starts_with("/api/") {
                api_docs::serve(&ctx, &state).await
            } else {
                pages::serve(&ctx, &state).await
            }
        }
    };

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = http_version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes =
            usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX);
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_head_pass_through() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());
    }

    #[test]
    fn test_options_is_answered() {
        let resp = check_http_method(&Method::OPTIONS).unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers()["allow"], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_other_methods_rejected() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let resp = check_http_method(&method).unwrap();
            assert_eq!(resp.status(), 405);
        }
    }

    #[test]
    fn test_http_version_label() {
        assert_eq!(http_version_label(Version::HTTP_10), "1.0");
        assert_eq!(http_version_label(Version::HTTP_11), "1.1");
        assert_eq!(http_version_label(Version::HTTP_2), "2");
    }
}
