use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../templates/index.html");

/// Upload page. Count and size checks in the page are advisory; the server
/// re-checks size on every upload.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
