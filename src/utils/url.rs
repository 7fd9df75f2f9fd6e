//! Endpoint URL construction.

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use arihante::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.example.com/v1/", "/chat/completions"),
///     "https://api.example.com/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
