//! Where to send the shopkeeper after they log in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Only local pages other than the log-in and log-out routes may be
/// redirected to.
fn is_safe_redirect_path(path_and_query: &str) -> bool {
    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return false;
    }

    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW && path != endpoints::LOG_OUT
}

/// Reduce `raw_url` to a local path and query, or `None` if it points
/// somewhere the log-in page should not redirect to.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_path(path_and_query).then(|| path_and_query.to_owned())
}

/// The log-in page URL with `redirect_target` in the query string.
pub fn log_in_url_with_redirect(redirect_target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("could not encode redirect URL {redirect_target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// The log-in page URL that brings the client back to the page that made
/// `request`.
///
/// htmx requests to `/api` routes come from a page, given by the
/// `HX-Current-URL` header. Anything else falls back to the dashboard.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    let redirect_target = if request.uri().path().starts_with("/api") {
        hx_current_path(request)
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    let redirect_target = redirect_target.unwrap_or_else(|| {
        tracing::warn!(
            "no redirect target for {}, falling back to the dashboard",
            request.uri()
        );
        endpoints::DASHBOARD_VIEW.to_owned()
    });

    log_in_url_with_redirect(&redirect_target)
}

fn hx_current_path(request: &Request) -> Option<String> {
    let headers = request.headers();

    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        return None;
    }

    // HX-Current-URL is absolute, so only its path and query are kept.
    let current_url = headers.get("hx-current-url")?.to_str().ok()?;
    let uri = current_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_path(path_and_query).then(|| path_and_query.to_owned())
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request};

    use crate::endpoints;

    use super::{build_log_in_redirect_url, log_in_url_with_redirect, normalize_redirect_url};

    #[test]
    fn keeps_local_path_and_query() {
        assert_eq!(
            normalize_redirect_url("/settings?tab=theme"),
            Some("/settings?tab=theme".to_owned())
        );
    }

    #[test]
    fn rejects_external_and_log_in_urls() {
        assert_eq!(normalize_redirect_url("https://example.com/dashboard"), None);
        assert_eq!(normalize_redirect_url("//example.com"), None);
        assert_eq!(normalize_redirect_url(endpoints::LOG_IN_VIEW), None);
        assert_eq!(normalize_redirect_url(endpoints::LOG_OUT), None);
    }

    #[test]
    fn page_request_redirects_back_to_page() {
        let request = Request::get("/settings").body(Body::empty()).unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            log_in_url_with_redirect("/settings")
        );
    }

    #[test]
    fn api_request_uses_current_url() {
        let request = Request::get("/api/transactions/form")
            .header("HX-Request", "true")
            .header("HX-Current-URL", "http://localhost:3000/settings")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            log_in_url_with_redirect("/settings")
        );
    }

    #[test]
    fn api_request_without_htmx_falls_back_to_dashboard() {
        let request = Request::get("/api/transactions/form")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            "/log_in?redirect_url=%2Fdashboard"
        );
    }
}
