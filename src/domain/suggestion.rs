use url::form_urlencoded;

const SEARCH_BASE_URL: &str = "https://www.blinkit.com/search";

/// Deterministic external-marketplace search link offered when no in-range
/// seller carries the requested product. Form encoding maps spaces to `+`.
pub fn external_search_url(product_name: &str) -> String {
    let query: String = form_urlencoded::byte_serialize(product_name.as_bytes()).collect();
    format!("{}?query={}", SEARCH_BASE_URL, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_become_plus() {
        assert_eq!(
            external_search_url("eco friendly bags"),
            "https://www.blinkit.com/search?query=eco+friendly+bags"
        );
    }

    #[test]
    fn test_plain_name_passes_through() {
        assert_eq!(
            external_search_url("tomatoes"),
            "https://www.blinkit.com/search?query=tomatoes"
        );
    }

    #[test]
    fn test_specials_are_percent_encoded() {
        assert_eq!(
            external_search_url("chips & dip"),
            "https://www.blinkit.com/search?query=chips+%26+dip"
        );
    }
}
