//! Redirect construction and URI rewriting.

use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

/// Temporary redirect to `location`, preserving the request method.
pub fn redirect(location: &str) -> Response {
    match header::HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        // Locations come from the fixed route table; this arm guards
        // against future table entries with invalid header characters.
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Replace the path of `uri`, keeping everything else.
pub fn rewrite_uri(uri: &Uri, new_path: &str) -> Result<Uri, axum::http::Error> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(new_path.parse()?);
    Ok(Uri::from_parts(parts)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_sets_location() {
        let response = redirect("/login?error=accesso_negato");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?error=accesso_negato"
        );
    }

    #[test]
    fn test_rewrite_swaps_path() {
        let uri: Uri = "/apple-touch-icon.png".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "/icon-192x192.png").unwrap();
        assert_eq!(rewritten.path(), "/icon-192x192.png");
    }
}
