//! User-Agent string shared by the search and image clients.

/// Project URL for User-Agent identification (RFC 9308 good citizenship).
const PROJECT_UA_URL: &str = "https://github.com/fierce/imgsearch";

/// Default User-Agent for all outbound requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("imgsearch/{version} (image-collection-tool; +{PROJECT_UA_URL})")
}
