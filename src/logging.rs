//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields whose values never make it into the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level. Passwords in
/// submitted forms are redacted. Event streams are passed through untouched
/// since their body never ends.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if is_form(&parts.headers) {
        let display_text = REDACTED_FIELDS
            .iter()
            .fold(body_text.clone(), |text, field| redact_password(&text, field));
        log_body("Received request", &parts, &display_text);
    } else {
        log_body("Received request", &parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    if is_event_stream(response.headers()) {
        tracing::info!("Sending event stream: {:#?}", response.headers());
        return response;
    }

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_body("Sending response", &parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

fn is_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/event-stream"))
}

async fn body_to_text(body: Body) -> Result<String, axum::Error> {
    let bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&bytes).to_string())
}

fn redact_password(form_text: &str, field_name: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == field_name => format!("{field_name}=********"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a
/// character.
fn truncate(body: &str) -> &str {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return body;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_body(label: &str, parts: &impl std::fmt::Debug, body: &str) {
    let truncated = truncate(body);

    if truncated.len() < body.len() {
        tracing::info!("{label}: {parts:#?}\nbody: {truncated}...");
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{label}: {parts:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        middleware,
        response::sse::{Event, Sse},
        routing::{get, post},
    };
    use axum_test::TestServer;
    use tokio_stream::once;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_password, truncate};

    #[test]
    fn redacts_password_field() {
        let got = redact_password("username=mushahid&password=hisab&remember_me=on", "password");

        assert_eq!(got, "username=mushahid&password=********&remember_me=on");
    }

    #[test]
    fn redact_leaves_similar_field_names() {
        let got = redact_password("confirm_password=abc&password=def", "password");

        assert_eq!(got, "confirm_password=abc&password=********");
    }

    #[test]
    fn truncate_respects_character_boundaries() {
        let body = "₹".repeat(LOG_BODY_LENGTH_LIMIT);

        let got = truncate(&body);

        assert!(got.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(got.chars().all(|c| c == '₹'));
    }

    #[tokio::test]
    async fn passes_request_and_response_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).unwrap();

        let response = server
            .post("/echo")
            .form(&[("username", "mushahid"), ("password", "hisab")])
            .await;

        response.assert_status_ok();
        response.assert_text("username=mushahid&password=hisab");
    }

    #[tokio::test]
    async fn does_not_buffer_event_streams() {
        let app = Router::new()
            .route(
                "/events",
                get(|| async {
                    Sse::new(once(Ok::<_, std::convert::Infallible>(
                        Event::default().data("hello"),
                    )))
                }),
            )
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).unwrap();

        let response = server.get("/events").await;

        response.assert_status_ok();
        assert!(response.text().contains("data: hello"));
    }
}
