// Utility functions
use reqwest::Url;

/// Extracts the board token from a public Greenhouse board URL.
///
/// `https://boards.greenhouse.io/stripe` -> `stripe`
pub fn board_token_from_url(board_url: &str) -> Option<String> {
    let url = Url::parse(board_url).ok()?;
    let token = url.path_segments()?.find(|s| !s.is_empty())?;
    Some(token.to_string())
}

/// Resolves a possibly relative `href` against `base`. Empty input stays empty.
pub fn absolute_url(base: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    base.join(href).map(String::from).unwrap_or_default()
}

/// Last non-empty path segment, used as a source-local id for scraped cards.
pub fn last_path_segment(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_string))
        })
        .unwrap_or_default()
}
