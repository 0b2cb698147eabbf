//! Cache Key Construction
//!
//! Builds canonical keys for request-shaped lookups so that parameter order
//! at the call site does not change the key.

use std::fmt::Display;

// == Create Cache Key ==
/// Builds `endpoint?k1=v1&k2=v2` with parameters sorted by name, then by
/// rendered value when a name repeats.
///
/// With no parameters the endpoint is returned unchanged. Values are not
/// URL-encoded: a name or value containing `&` or `=` can make two distinct
/// parameter sets produce the same key.
///
/// # Example
/// ```
/// use keyed_cache::cache::create_cache_key;
///
/// let key = create_cache_key("/api/x", [("b", 2), ("a", 1)]);
/// assert_eq!(key, "/api/x?a=1&b=2");
/// ```
pub fn create_cache_key<I, K, V>(endpoint: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let mut pairs: Vec<(String, String)> = params
        .into_iter()
        .map(|(name, value)| (name.as_ref().to_string(), value.to_string()))
        .collect();
    if pairs.is_empty() {
        return endpoint.to_string();
    }

    // Repeated names are ordered by value so input order never leaks through
    pairs.sort();

    let query = pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", endpoint, query)
}
