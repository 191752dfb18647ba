//! Client identity sent with sitemap and page requests.

/// Default identity: desktop Chrome. Many sites serve bot-looking agents a
/// block page instead of the sitemap.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Configured value that selects a rotating browser identity.
const IMPERSONATE: &str = "impersonate";

const BROWSER_USER_AGENTS: [&str; 6] = [
    USER_AGENT,
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

/// One of the browser identities, picked from the clock.
fn browser_user_agent() -> &'static str {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    BROWSER_USER_AGENTS[nanos % BROWSER_USER_AGENTS.len()]
}

/// Resolve the configured user agent.
///
/// Unset or blank gives [`USER_AGENT`], `impersonate` (any case) picks a
/// browser identity, anything else is sent verbatim.
pub fn resolve_user_agent(configured: Option<&str>) -> String {
    match configured.map(str::trim) {
        None | Some("") => USER_AGENT.to_string(),
        Some(value) if value.eq_ignore_ascii_case(IMPERSONATE) => {
            browser_user_agent().to_string()
        }
        Some(value) => value.to_string(),
    }
}
