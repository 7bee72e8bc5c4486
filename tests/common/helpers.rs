//! Shared test helper functions

use url::{Url, form_urlencoded};

/// Catalog role used by most scenarios
pub const DESIGNER: &str = "I'm an API Designer";

/// A question registered only under [`DESIGNER`]
pub const DESIGN_STANDARDS_QUESTION: &str =
    "What design standards should I follow to ensure consistency across APIs?";

pub const TESTER: &str = "I'm an API Tester";

/// Form-encodes key/value pairs into a query string (without the leading `?`)
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Path + query for a canned-answer lookup
pub fn answer_path(role: &str, question: &str) -> String {
    format!(
        "/api/v1/answers?{}",
        query_string(&[("role", role), ("question", question)])
    )
}

/// Path of the question list for a role, with the role as an encoded segment
pub fn questions_path(role: &str) -> String {
    let mut url = Url::parse("http://localhost/api/v1/roles").expect("Invalid base URL");
    url.path_segments_mut()
        .expect("Base URL cannot be a base")
        .push(role)
        .push("questions");
    url.path().to_string()
}
