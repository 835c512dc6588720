//! Legacy-path redirect table
//!
//! Deprecated API reference paths redirect permanently to their current
//! locations. Rules are compiled once at startup and evaluated in order;
//! the first match wins.

use regex::Regex;

use crate::config::RedirectRule;

/// Compiled, ordered redirect rules
pub struct RedirectTable {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    pattern: Regex,
    replacement: String,
}

impl RedirectTable {
    /// Compile configured rules
    ///
    /// Patterns are anchored at the start of the path. A pattern may match
    /// only a prefix of the path; the unmatched remainder carries over into
    /// the target unchanged.
    pub fn compile(rules: &[RedirectRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| {
                let pattern = Regex::new(&format!("^(?:{})", rule.pattern))?;
                Ok(CompiledRule {
                    pattern,
                    replacement: rule.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { rules })
    }

    /// Return the redirect target for a path, if any rule matches
    pub fn resolve(&self, path: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| {
            rule.pattern.is_match(path).then(|| {
                rule.pattern
                    .replace(path, rule.replacement.as_str())
                    .into_owned()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RedirectRule, RedirectsConfig};

    fn default_table() -> RedirectTable {
        RedirectTable::compile(&RedirectsConfig::default().rules).unwrap()
    }

    #[test]
    fn test_lit_html_redirects() {
        let table = default_table();
        assert_eq!(
            table.resolve("/api/foo/lit_html").as_deref(),
            Some("/api/foo/_lit_html_")
        );
        assert_eq!(
            table.resolve("/api/1.4/lit_html.templateresult").as_deref(),
            Some("/api/1.4/_lit_html_.templateresult")
        );
    }

    #[test]
    fn test_shady_render_redirects() {
        let table = default_table();
        assert_eq!(
            table.resolve("/api/bar/shady_render").as_deref(),
            Some("/api/bar/_lib_shady_render_")
        );
    }

    #[test]
    fn test_unmatched_path_passes_through() {
        let table = default_table();
        assert!(table.resolve("/api/foo/directives").is_none());
        assert!(table.resolve("/guide").is_none());
    }

    #[test]
    fn test_match_is_anchored_at_path_start() {
        let table = default_table();
        assert!(table.resolve("/docs/api/foo/lit_html").is_none());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            RedirectRule {
                pattern: "/api/old".to_string(),
                replacement: "/api/first".to_string(),
            },
            RedirectRule {
                pattern: "/api/(old)".to_string(),
                replacement: "/api/second-$1".to_string(),
            },
        ];
        let table = RedirectTable::compile(&rules).unwrap();
        assert_eq!(table.resolve("/api/old").as_deref(), Some("/api/first"));
    }

    #[test]
    fn test_invalid_pattern_fails_compile() {
        let rules = vec![RedirectRule {
            pattern: "(".to_string(),
            replacement: "/x".to_string(),
        }];
        assert!(RedirectTable::compile(&rules).is_err());
    }
}
