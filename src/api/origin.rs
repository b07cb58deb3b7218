// src/api/origin.rs
// Allowed-origin patterns shared by the CORS layer and the WebSocket upgrade

use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use regex::Regex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::error::{PoemError, PoemResult};

/// Origins permitted to talk to the server.
///
/// Patterns are globs where `*` matches any run of characters, e.g.
/// `http://192.168.1.*`. A lone `*` allows every origin.
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    any: bool,
    patterns: Vec<Regex>,
}

impl AllowedOrigins {
    pub fn parse(patterns: &[String]) -> PoemResult<Self> {
        if patterns.iter().any(|p| p.trim() == "*") {
            return Ok(Self::any());
        }

        let patterns = patterns
            .iter()
            .map(|p| glob_to_regex(p.trim()))
            .collect::<PoemResult<Vec<_>>>()?;

        Ok(Self {
            any: false,
            patterns,
        })
    }

    pub fn any() -> Self {
        Self {
            any: true,
            patterns: Vec::new(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.any || self.patterns.iter().any(|re| re.is_match(origin))
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any);

        if self.any {
            return layer.allow_origin(Any);
        }

        let origins = self.clone();
        layer.allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| origins.allows(o))
                    .unwrap_or(false)
            },
        ))
    }
}

fn glob_to_regex(pattern: &str) -> PoemResult<Regex> {
    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{}$", escaped))
        .map_err(|e| PoemError::config(format!("invalid origin pattern '{}': {}", pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(patterns: &[&str]) -> AllowedOrigins {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        AllowedOrigins::parse(&patterns).unwrap()
    }

    #[test]
    fn wildcard_matches_lan_hosts() {
        let allowed = origins(&["http://192.168.1.*"]);
        assert!(allowed.allows("http://192.168.1.20"));
        assert!(allowed.allows("http://192.168.1.20:3000"));
        assert!(!allowed.allows("http://192.168.2.20"));
        assert!(!allowed.allows("https://192.168.1.20"));
    }

    #[test]
    fn dots_are_literal() {
        let allowed = origins(&["http://192.168.1.*"]);
        assert!(!allowed.allows("http://192x168x1x5"));
    }

    #[test]
    fn exact_patterns_and_lists() {
        let allowed = origins(&["http://localhost:3000", "https://poems.example"]);
        assert!(allowed.allows("http://localhost:3000"));
        assert!(allowed.allows("https://poems.example"));
        assert!(!allowed.allows("http://localhost:3001"));
    }

    #[test]
    fn star_allows_everything() {
        assert!(origins(&["*"]).allows("http://anything.test"));
    }

    #[test]
    fn empty_list_allows_nothing() {
        assert!(!origins(&[]).allows("http://localhost"));
    }
}
