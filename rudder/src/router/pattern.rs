//! Route pattern compilation and matching.
//!
//! A pattern like `/campaigns/:id` compiles to an anchored regex where each
//! `:name` segment becomes a capture that cannot cross the `/` separator.
//! Matching is full-string; prefix matches are rejected.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// Error compiling a route pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A `:name` segment had no name characters after the colon.
    #[error("empty parameter name in pattern '{0}'")]
    EmptyParamName(String),

    /// The generated regex failed to compile.
    #[error("invalid route pattern '{pattern}': {source}")]
    Invalid {
        pattern: String,
        source: regex::Error,
    },
}

/// A compiled route pattern.
///
/// Compilation is pure and deterministic: the same pattern always yields the
/// same regex and the same parameter order (left to right as written).
#[derive(Debug, Clone)]
pub struct RoutePattern {
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl RoutePattern {
    /// Compile a pattern string into an anchored matcher.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut param_names = Vec::new();
        let mut regex_src = String::from("^");

        for (i, segment) in pattern.split('/').enumerate() {
            if i > 0 {
                regex_src.push('/');
            }
            if let Some(name) = segment.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName(pattern.to_string()));
                }
                param_names.push(name.to_string());
                regex_src.push_str("([^/]+)");
            } else {
                regex_src.push_str(&regex::escape(segment));
            }
        }
        regex_src.push('$');

        let regex = Regex::new(&regex_src).map_err(|source| PatternError::Invalid {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            param_names,
        })
    }

    /// The original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parameter names in capture order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Match a path against this pattern.
    ///
    /// Returns the captured values in parameter order, or `None` when the
    /// segment count or any literal segment differs.
    pub fn matches(&self, path: &str) -> Option<Vec<String>> {
        let captures = self.regex.captures(path)?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|c| c.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    /// Zip captured values with parameter names into a mapping.
    pub fn params_from(&self, captured: Vec<String>) -> HashMap<String, String> {
        self.param_names
            .iter()
            .cloned()
            .zip(captured)
            .collect()
    }

    /// Substitute `:name` placeholders to produce a concrete path.
    ///
    /// Placeholders without a supplied value are left as written.
    pub fn build_url(&self, params: &HashMap<String, String>) -> String {
        let mut url = self.pattern.clone();
        for (name, value) in params {
            url = url.replace(&format!(":{name}"), value);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exactly() {
        let p = RoutePattern::compile("/dashboard").unwrap();
        assert_eq!(p.matches("/dashboard"), Some(vec![]));
        assert_eq!(p.matches("/dashboard/extra"), None);
        assert_eq!(p.matches("/dash"), None);
    }

    #[test]
    fn param_segment_captures_one_segment() {
        let p = RoutePattern::compile("/campaigns/:id").unwrap();
        assert_eq!(p.matches("/campaigns/42"), Some(vec!["42".to_string()]));
        assert_eq!(p.matches("/campaigns/42/edit"), None);
        assert_eq!(p.matches("/campaigns"), None);
    }

    #[test]
    fn param_names_are_left_to_right() {
        let p = RoutePattern::compile("/a/:first/b/:second").unwrap();
        assert_eq!(p.param_names(), ["first", "second"]);
    }

    #[test]
    fn empty_param_name_is_rejected() {
        assert!(RoutePattern::compile("/a/:").is_err());
    }

    #[test]
    fn build_url_substitutes_params() {
        let p = RoutePattern::compile("/import/:campaignId").unwrap();
        let mut params = HashMap::new();
        params.insert("campaignId".to_string(), "7".to_string());
        assert_eq!(p.build_url(&params), "/import/7");
    }
}
