//! Keyword routing between the chat endpoint and the license lookup flow

/// Any of these (case-insensitive substring) diverts a question to license lookup
pub const LICENSE_KEYWORDS: &[&str] = &[
    "license",
    "licenses",
    "certification",
    "certifications",
    "credentials",
    "ussf",
    "my license",
    "my certification",
    "check my",
    "look up my",
    "status",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Ask for an email address, then query license status
    LicenseLookup,
    /// Send the question to the chat endpoint
    Chat,
}

pub fn is_license_query(text: &str) -> bool {
    let lower = text.to_lowercase();
    LICENSE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

pub fn route(text: &str) -> Route {
    if is_license_query(text) {
        Route::LicenseLookup
    } else {
        Route::Chat
    }
}
