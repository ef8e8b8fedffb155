//! Scanning of a function declaration's parameter list.
//!
//! Trigger annotations live inside the parameter list, which may span several
//! lines and contain nested parentheses and string literals. The scanner
//! finds where the list ends and how many lines it covers so the line walk can
//! resume after it.

use super::patterns;
use super::Endpoint;
use crate::path_vars;

/// Position of the scanner within a parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Plain parameter text; `depth` counts unclosed `(`.
    InSignature { depth: usize },
    /// Inside a `"..."` literal; delimiters are ignored until it closes.
    InString { depth: usize, escaped: bool },
    /// The depth-zero `)` was reached.
    Done,
}

/// The extent of a scanned parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureSpan {
    /// Byte offset where the parameter list starts.
    pub start: usize,
    /// Byte offset of the closing `)`, or the text length when unbalanced.
    pub end: usize,
    /// Newline characters between `start` and `end`.
    pub newlines: usize,
    pub state: ScanState,
}

impl SignatureSpan {
    /// Lines the line walk skips after the declaration line.
    pub fn lines_skipped(&self) -> usize {
        self.newlines.saturating_sub(1)
    }

    pub fn is_closed(&self) -> bool {
        self.state == ScanState::Done
    }
}

/// Scans from `start` (just after the declaration's opening paren) up to the
/// parenthesis that closes the parameter list.
pub fn scan_signature(text: &str, start: usize) -> SignatureSpan {
    let mut state = ScanState::InSignature { depth: 0 };
    let mut newlines = 0;
    let mut end = text.len();

    for (offset, byte) in text.as_bytes()[start.min(text.len())..].iter().enumerate() {
        if *byte == b'\n' {
            newlines += 1;
            continue;
        }

        state = match (state, *byte) {
            (ScanState::InSignature { depth }, b'(') => ScanState::InSignature { depth: depth + 1 },
            (ScanState::InSignature { depth: 0 }, b')') => ScanState::Done,
            (ScanState::InSignature { depth }, b')') => ScanState::InSignature { depth: depth - 1 },
            (ScanState::InSignature { depth }, b'"') => ScanState::InString { depth, escaped: false },
            (ScanState::InString { depth, escaped: false }, b'\\') => ScanState::InString { depth, escaped: true },
            (ScanState::InString { depth, escaped: false }, b'"') => ScanState::InSignature { depth },
            (ScanState::InString { depth, .. }, _) => ScanState::InString { depth, escaped: false },
            (other, _) => other,
        };

        if state == ScanState::Done {
            end = start + offset;
            break;
        }
    }

    SignatureSpan {
        start,
        end,
        newlines,
        state,
    }
}

/// Resolves the trigger metadata of the declaration at the start of `text`
/// into `endpoint` and returns the number of lines to skip.
pub fn resolve_header(text: &str, endpoint: &mut Endpoint) -> usize {
    let Some(declaration) = patterns::DECLARATION.find(text) else {
        return 0;
    };

    let span = scan_signature(text, declaration.end());
    let parameters = &text[span.start..span.end];

    endpoint.trigger_type = patterns::trigger_kind(parameters);

    if let Some(trigger) = patterns::http_trigger(parameters) {
        endpoint.methods = trigger.methods;
        endpoint.route = trigger.route;
        if !endpoint.route.is_empty() {
            endpoint.path_parameters = path_vars::path_parameters(&endpoint.route);
        }
    }

    if let Some(interval) = patterns::timer_interval(parameters) {
        endpoint.interval = interval;
    }

    span.lines_skipped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::TriggerType;

    const MULTI_LINE: &str = r#"        [Function(nameof(GetDashboardSummary))]
        [RequireDocsToken(OperationType.Read)]
        public async Task<HttpResponseData> GetDashboardSummary(
            [HttpTrigger(AuthorizationLevel.Anonymous, "get", Route = "dashboard-summary/{param}")]
            HttpRequestData req,
            FunctionContext context)
        {
            logger.LogInformation($"{context.FunctionDefinition.Name} called");
        }
"#;

    const SINGLE_LINE: &str = r#"        public async Task<HttpResponseData> GetDashboardSummary([HttpTrigger(AuthorizationLevel.Anonymous, "get", Route = "dashboard-summary")] HttpRequestData req, FunctionContext context)
        {
            return req.Ok(result);
        }
"#;

    fn declaration_text(source: &str) -> &str {
        let offset = source.find("public async").unwrap();
        &source[offset..]
    }

    #[test]
    fn test_multi_line_header_skips_lines() {
        let mut endpoint = Endpoint::default();
        let skipped = resolve_header(declaration_text(MULTI_LINE), &mut endpoint);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_single_line_header_skips_nothing() {
        let mut endpoint = Endpoint::default();
        let skipped = resolve_header(declaration_text(SINGLE_LINE), &mut endpoint);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_multi_line_header_metadata() {
        let mut endpoint = Endpoint::default();
        resolve_header(declaration_text(MULTI_LINE), &mut endpoint);

        assert_eq!(endpoint.trigger_type, TriggerType::Http);
        assert_eq!(endpoint.methods, vec!["get"]);
        assert_eq!(endpoint.route, "dashboard-summary/{param}");
        assert_eq!(endpoint.path_parameters.names().collect::<Vec<_>>(), vec!["param"]);
    }

    #[test]
    fn test_single_line_header_metadata() {
        let mut endpoint = Endpoint::default();
        resolve_header(declaration_text(SINGLE_LINE), &mut endpoint);

        assert_eq!(endpoint.trigger_type, TriggerType::Http);
        assert_eq!(endpoint.methods, vec!["get"]);
        assert_eq!(endpoint.route, "dashboard-summary");
        assert!(endpoint.path_parameters.is_empty());
    }

    #[test]
    fn test_scan_counts_newlines_up_to_depth_zero_close() {
        let text = "Run(\n  int a = Compute(1, (2)),\n  [Attr(\")\")] string b\n) { body(\n) }";
        let span = scan_signature(text, 4);

        assert!(span.is_closed());
        assert_eq!(&text[span.end..span.end + 1], ")");
        assert_eq!(span.newlines, text[span.start..span.end].matches('\n').count());
        assert_eq!(span.newlines, 3);
        assert_eq!(span.lines_skipped(), 2);
    }

    #[test]
    fn test_scan_ignores_parens_inside_string_literals() {
        let text = "F([Route(\"a)\")] int x)";
        let span = scan_signature(text, 2);
        assert!(span.is_closed());
        assert_eq!(span.end, text.len() - 1);
    }

    #[test]
    fn test_scan_unbalanced_runs_to_end() {
        let text = "F(int a,\n int b";
        let span = scan_signature(text, 2);
        assert!(!span.is_closed());
        assert_eq!(span.end, text.len());
        assert_eq!(span.newlines, 1);
        assert_eq!(span.lines_skipped(), 0);
    }

    #[test]
    fn test_header_without_trigger_is_unknown() {
        let mut endpoint = Endpoint::default();
        let skipped = resolve_header("private Task Helper(HttpRequestData req, string id)\n{\n}", &mut endpoint);
        assert_eq!(skipped, 0);
        assert_eq!(endpoint.trigger_type, TriggerType::Unknown);
        assert!(endpoint.methods.is_empty());
    }

    #[test]
    fn test_scan_ignores_brackets_inside_default_values() {
        let text = "F(string sep = \"[\", int x)\n{\n}\nnext\nlines\n";
        let span = scan_signature(text, 2);

        assert!(span.is_closed());
        assert_eq!(&text[span.end..span.end + 1], ")");
        assert_eq!(span.newlines, 0);
        assert_eq!(span.lines_skipped(), 0);
    }

    #[test]
    fn test_scan_honours_escaped_quotes() {
        let text = "F(string q = \"say \\\")\\\"\", int x)";
        let span = scan_signature(text, 2);

        assert!(span.is_closed());
        assert_eq!(span.end, text.len() - 1);
    }

    #[test]
    fn test_unbalanced_bracket_in_route_keeps_header_on_one_line() {
        let text = "public async Task<HttpResponseData> Legacy([HttpTrigger(AuthorizationLevel.Anonymous, \"get\", Route = \"legacy/items[\")] HttpRequestData req)\n{\n}\n";
        let mut endpoint = Endpoint::default();
        let skipped = resolve_header(text, &mut endpoint);

        assert_eq!(skipped, 0);
        assert_eq!(endpoint.trigger_type, TriggerType::Http);
        assert_eq!(endpoint.route, "legacy/items[");
    }
}
