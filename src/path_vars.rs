//! Helpers for `{name}` placeholders inside route templates.
//!
//! Routes declared on function triggers use `{name}` placeholders while API
//! clients such as Bruno and Insomnia expect `:name`. These functions extract,
//! rewrite and join route strings without touching anything else.

use crate::extractor::PathParameters;
use once_cell::sync::Lazy;
use regex::Regex;

static PATH_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-zA-Z0-9_]+)\}").expect("path variable pattern is valid"));

/// Placeholder every client collection uses for the server base URL.
pub const HOST_PLACEHOLDER: &str = "{{host}}";

/// Extracts the placeholder names of a route, left to right.
///
/// Duplicate names are kept, so `a/{id}/b/{id}` yields `["id", "id"]`.
pub fn extract_path_vars(route: &str) -> Vec<String> {
    PATH_VAR
        .captures_iter(route)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Rewrites every `{name}` placeholder to `:name`.
///
/// A route without placeholders is returned unchanged.
pub fn replace_path_vars(route: &str) -> String {
    PATH_VAR.replace_all(route, ":$1").into_owned()
}

/// Extracts each placeholder together with the literal text fused to it.
///
/// The fragment is the text in front of the placeholder within its path
/// segment, or the text behind it when nothing precedes it. For example
/// `items/id:{id}` yields `("id", "id:")` and `files/{name}.json` yields
/// `("name", ".json")`.
pub fn path_var_fragments(route: &str) -> Vec<(String, String)> {
    let mut fragments = Vec::new();

    for segment in route.split('/') {
        let matches: Vec<_> = PATH_VAR.captures_iter(segment).collect();
        for (idx, caps) in matches.iter().enumerate() {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let previous_end = if idx == 0 {
                0
            } else {
                matches[idx - 1].get(0).map(|m| m.end()).unwrap_or(0)
            };
            let next_start = matches
                .get(idx + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(segment.len());

            let front = &segment[previous_end..whole.start()];
            let back = &segment[whole.end()..next_start];
            let fragment = if front.is_empty() { back } else { front };

            fragments.push((caps[1].to_string(), fragment.to_string()));
        }
    }

    fragments
}

/// Builds the path parameter map of a route with empty fragments.
pub fn path_parameters(route: &str) -> PathParameters {
    let mut params = PathParameters::new();
    for name in extract_path_vars(route) {
        params.insert(name, String::new());
    }
    params
}

/// Builds the path parameter map of a route, keeping fused literal fragments.
pub fn path_parameters_with_fragments(route: &str) -> PathParameters {
    let mut params = PathParameters::new();
    for (name, fragment) in path_var_fragments(route) {
        params.insert(name, fragment);
    }
    params
}

/// Joins route pieces with single slashes.
///
/// Empty segments are dropped. The result starts with `/` only when the first
/// piece does.
pub fn join_route(parts: &[&str]) -> String {
    let rooted = parts.first().map(|p| p.starts_with('/')).unwrap_or(false);
    let joined = parts
        .iter()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if rooted {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Builds the client URL for a route: `{{host}}` followed by the route with
/// colon-form placeholders.
pub fn host_url(route: &str) -> String {
    join_route(&[HOST_PLACEHOLDER, &replace_path_vars(route)])
}
