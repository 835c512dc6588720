//! Template store and path resolution
//!
//! Maps request paths to HTML templates under the docs root, following
//! static-site conventions: a clean URL is backed either by a sibling
//! `.html` file or by a directory's `index.html`.

use std::path::Path;

use minijinja::{path_loader, AutoEscape, Environment};
use thiserror::Error;

/// Template rendered when a path resolves to nothing
pub const NOT_FOUND_TEMPLATE: &str = "404.html";
/// Template rendered when resolution or rendering fails unexpectedly
pub const SERVER_ERROR_TEMPLATE: &str = "500.html";

/// Errors from template resolution and rendering
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No template backs the requested path under any resolution rule
    #[error("no template found for '{path}'")]
    NotFound { path: String },
    /// The template exists but failed to load or render
    #[error("template engine error: {0}")]
    Engine(#[from] minijinja::Error),
}

/// Process-wide template store
///
/// Templates load from disk on first use and stay cached for the process
/// lifetime; concurrent reads are safe. Escaping is disabled: templates are
/// first-party HTML, rendering is static passthrough with an empty context.
pub struct TemplateStore {
    env: Environment<'static>,
}

impl TemplateStore {
    pub fn new(docs_root: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(docs_root.as_ref()));
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env }
    }

    /// Resolve a request path to a template name, in rule order:
    ///
    /// 1. Paths ending in `/` resolve to `<path>index.html`.
    /// 2. Paths ending in `.html` resolve unchanged, with no fallback.
    /// 3. Anything else tries `<path>.html`, then `<path>/index.html`.
    ///
    /// A `NotFound` error carries the originally requested path.
    pub fn resolve(&self, path: &str) -> Result<String, ResolveError> {
        let rel = path.trim_start_matches('/');

        if path.ends_with('/') {
            return self.ensure(format!("{rel}index.html"), path);
        }
        if path.ends_with(".html") {
            return self.ensure(rel.to_string(), path);
        }
        match self.ensure(format!("{rel}.html"), path) {
            Err(ResolveError::NotFound { .. }) => self.ensure(format!("{rel}/index.html"), path),
            resolved => resolved,
        }
    }

    /// Render the template resolved for a request path
    pub fn render_page(&self, path: &str) -> Result<String, ResolveError> {
        let name = self.resolve(path)?;
        self.render(&name)
    }

    /// Render a template by name with an empty context
    pub fn render(&self, name: &str) -> Result<String, ResolveError> {
        let template = self.env.get_template(name).map_err(classify)?;
        Ok(template.render(minijinja::context! {})?)
    }

    // Check that a candidate template exists, yielding its name. Missing
    // candidates are reported against the originally requested path.
    fn ensure(&self, name: String, requested: &str) -> Result<String, ResolveError> {
        match self.env.get_template(&name) {
            Ok(_) => Ok(name),
            Err(err) => match classify(err) {
                ResolveError::NotFound { .. } => Err(ResolveError::NotFound {
                    path: requested.to_string(),
                }),
                other => Err(other),
            },
        }
    }
}

fn classify(err: minijinja::Error) -> ResolveError {
    if matches!(err.kind(), minijinja::ErrorKind::TemplateNotFound) {
        ResolveError::NotFound {
            path: err.name().unwrap_or_default().to_string(),
        }
    } else {
        ResolveError::Engine(err)
    }
}
