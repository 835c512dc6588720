//! Page handler module
//!
//! Serves documentation pages: resolves the request path to a template,
//! renders it with an empty context, and falls back to the 404/500 error
//! pages when resolution or rendering fails.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache};
use crate::logger;
use crate::templates::{ResolveError, TemplateStore, NOT_FOUND_TEMPLATE, SERVER_ERROR_TEMPLATE};

/// A rendered page and the status it should be served with
struct RenderedPage {
    status: u16,
    body: String,
}

/// Serve a documentation page for any path outside `/api/`
pub async fn serve(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let templates = Arc::clone(&state.templates);
    let path = ctx.path.to_string();

    // Template loads hit the disk on first use; keep that off the event loop
    let rendered =
        tokio::task::spawn_blocking(move || render_with_fallback(&templates, &path)).await;

    match rendered {
        Ok(Ok(page)) => build_page_response(page, ctx),
        Ok(Err(err)) => {
            logger::log_error(&format!("Error page render failed for '{}': {err}", ctx.path));
            http::build_500_response()
        }
        Err(err) => {
            logger::log_error(&format!("Render task failed for '{}': {err}", ctx.path));
            http::build_500_response()
        }
    }
}

/// Render the page for a request path, selecting the error fallback by
/// failure kind
///
/// An `Err` here means the fallback template itself failed; callers degrade
/// to a bare 500.
fn render_with_fallback(
    templates: &TemplateStore,
    path: &str,
) -> Result<RenderedPage, ResolveError> {
    match templates.render_page(path) {
        Ok(body) => Ok(RenderedPage { status: 200, body }),
        Err(ResolveError::NotFound { .. }) => {
            let body = templates.render(NOT_FOUND_TEMPLATE)?;
            Ok(RenderedPage { status: 404, body })
        }
        Err(err) => {
            logger::log_error(&format!("Template render failed for '{path}': {err}"));
            let body = templates.render(SERVER_ERROR_TEMPLATE)?;
            Ok(RenderedPage { status: 500, body })
        }
    }
}

/// Build the response. Successful renders are cacheable and carry a
/// validator; error pages carry neither.
fn build_page_response(page: RenderedPage, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    if page.status == 200 {
        let etag = cache::generate_etag(page.body.as_bytes());
        if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
            return http::build_304_response(&etag, Some(cache::PAGE_CACHE_CONTROL));
        }
        return http::build_html_response(
            page.body,
            200,
            Some(cache::PAGE_CACHE_CONTROL),
            Some(&etag),
            ctx.is_head,
        );
    }

    http::build_html_response(page.body, page.status, None, None, ctx.is_head)
}
