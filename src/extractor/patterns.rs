//! Annotation patterns recognized by the extractor.

use super::TriggerType;
use once_cell::sync::Lazy;
use regex::Regex;

/// `[Function("Name")]` or `[Function(nameof(Name))]`.
pub static FUNCTION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[Function\((?:nameof\()?"?(?P<fname>\w+)"?\)?\)\]"#)
        .expect("function name pattern is valid")
});

/// `[Require<Kind>]` or `[Require<Kind>(args)]`.
pub static AUTHENTICATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[Require(?P<kind>DocsTokenGroups|S2SToken|DocsToken|PlatformApiAuth)(?:\((?P<args>[^)]*)\))?\]",
    )
    .expect("authentication pattern is valid")
});

/// Visibility, optional `async`, return type, identifier and the opening paren.
pub static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:public|protected|private)\s+(?:async\s+)?[\w<>\[\]?.]+\s+(?P<fname>\w+)\(")
        .expect("declaration pattern is valid")
});

/// `[<Kind>Trigger ...]` for every recognized trigger keyword.
pub static TRIGGER_KIND: Lazy<Regex> = Lazy::new(|| {
    let keywords = TriggerType::RECOGNIZED
        .iter()
        .map(|trigger| trigger.keyword())
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\[(?P<kind>{})Trigger[\S\s]*?\]", keywords))
        .expect("trigger kind pattern is valid")
});

/// `[HttpTrigger(level, "get", "post", Route = "path")]`; the route may also be
/// a bare expression such as `Route = Routes.Health`.
pub static HTTP_TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\[HttpTrigger\([\w.]+,\s*(?P<methods>(?:"\w+"\s*,\s*)+)Route\s*=\s*(?:"(?P<route>[^"]+)"|(?P<route_expr>[^\])]+))\)\]"#,
    )
    .expect("http trigger pattern is valid")
});

/// `[TimerTrigger("cron", ...)]`.
pub static TIMER_TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[TimerTrigger\("(?P<cron>[^"]+)"[^)]*\)\]"#).expect("timer trigger pattern is valid")
});

/// Returns the function name declared on this line, if any.
pub fn function_name(line: &str) -> Option<String> {
    FUNCTION_NAME
        .captures(line)
        .map(|caps| caps["fname"].to_string())
}

/// Returns the authentication tokens declared on this line.
///
/// Without an argument list the requirement kind itself is the token. With
/// one, each comma or space separated entry becomes a token, quotes stripped.
pub fn authentication(line: &str) -> Vec<String> {
    let Some(caps) = AUTHENTICATION.captures(line) else {
        return Vec::new();
    };

    match caps.name("args").map(|m| m.as_str()).filter(|args| !args.is_empty()) {
        Some(args) => args
            .replace(", ", ",")
            .replace(' ', ",")
            .replace('"', "")
            .split(',')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
        None => vec![caps["kind"].to_string()],
    }
}

/// Parsed contents of an `HttpTrigger` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTrigger {
    pub methods: Vec<String>,
    pub route: String,
}

/// Finds the first `HttpTrigger` annotation in the text.
pub fn http_trigger(text: &str) -> Option<HttpTrigger> {
    let caps = HTTP_TRIGGER.captures(text)?;

    let methods = caps["methods"]
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '"')
        .collect::<String>()
        .split(',')
        .filter(|method| !method.is_empty())
        .map(str::to_string)
        .collect();

    // a route built from a constant is passed through unresolved
    let route = caps
        .name("route")
        .or_else(|| caps.name("route_expr"))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Some(HttpTrigger { methods, route })
}

/// Finds the trigger keyword of the first trigger annotation in the text.
pub fn trigger_kind(text: &str) -> TriggerType {
    TRIGGER_KIND
        .captures(text)
        .map(|caps| TriggerType::from_keyword(&caps["kind"]))
        .unwrap_or(TriggerType::Unknown)
}

/// Finds the cron expression of a `TimerTrigger` annotation.
pub fn timer_interval(text: &str) -> Option<String> {
    TIMER_TRIGGER
        .captures(text)
        .map(|caps| caps["cron"].to_string())
}
