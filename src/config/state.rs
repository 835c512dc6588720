// Application state module
// Built once at startup, immutable for the process lifetime

use std::sync::Arc;

use crate::routing::RedirectTable;
use crate::templates::TemplateStore;

use super::types::Config;

/// Shared application state
///
/// Everything request handlers need: the loaded configuration, the template
/// store backing page rendering, and the compiled legacy redirect table.
pub struct AppState {
    pub config: Config,
    pub templates: Arc<TemplateStore>,
    pub redirects: RedirectTable,
}

impl AppState {
    /// Build state from loaded configuration
    ///
    /// Fails if a configured redirect pattern is not a valid regular
    /// expression.
    pub fn new(config: Config) -> Result<Self, regex::Error> {
        let templates = Arc::new(TemplateStore::new(&config.site.docs_root));
        let redirects = RedirectTable::compile(&config.redirects.rules)?;

        Ok(Self {
            config,
            templates,
            redirects,
        })
    }
}
