//! Static HTML pages.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../templates/index.html");
const GET_COOKIES_HTML: &str = include_str!("../templates/get_cookies.html");

/// GET / - Submission form
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /get-cookies - Instructions for copying the session cookie
pub async fn get_cookies_page() -> Html<&'static str> {
    Html(GET_COOKIES_HTML)
}
