//! Middleware for logging requests and responses.

use axum::{
    extract::Request,
    http::{HeaderValue, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{endpoints, internal_server_error::InternalServerError};

/// The most bytes of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The form field holding the access code, which is the user's only credential.
const REDACTED_FIELD: &str = "user_code";

/// Routes whose responses may show the user their access code.
const REDACTED_RESPONSE_PATHS: [&str; 3] =
    [endpoints::LOG_IN_API, endpoints::NEW_CODE_API, endpoints::USERS];

const REDACTED_BODY: &str = "[redacted]";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level.
/// Access codes are never logged: the `user_code` form field is masked and the
/// bodies of the log-in and sign-up responses are left out.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_text) = match extract_header_and_body_text_from_request(request).await {
        Ok(parts) => parts,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return InternalServerError::default().into_response();
        }
    };

    if headers.method == axum::http::Method::POST
        && headers.headers.get(CONTENT_TYPE)
            == Some(&HeaderValue::from_static(
                "application/x-www-form-urlencoded",
            ))
    {
        log_request(&headers, &redact_form_field(&body_text, REDACTED_FIELD));
    } else {
        log_request(&headers, &body_text);
    }

    let redact_response = REDACTED_RESPONSE_PATHS.contains(&headers.uri.path());

    let request = Request::from_parts(headers, body_text.into());
    let response = next.run(request).await;

    let (headers, body_text) = match extract_header_and_body_text_from_response(response).await {
        Ok(parts) => parts,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return InternalServerError::default().into_response();
        }
    };
    if redact_response {
        log_response(&headers, REDACTED_BODY);
    } else {
        log_response(&headers, &body_text);
    }

    Response::from_parts(headers, body_text.into())
}

/// Replace the value of `field_name` in the URL encoded `form_text` with asterisks.
///
/// Text that is not a valid form is returned as is.
fn redact_form_field(form_text: &str, field_name: &str) -> String {
    let Ok(fields) = serde_urlencoded::from_str::<Vec<(String, String)>>(form_text) else {
        return form_text.to_owned();
    };

    let fields = fields
        .into_iter()
        .map(|(name, value)| {
            if name == field_name {
                (name, "********".to_owned())
            } else {
                (name, value)
            }
        })
        .collect::<Vec<_>>();

    serde_urlencoded::to_string(&fields).unwrap_or_else(|_| form_text.to_owned())
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> Result<(axum::http::request::Parts, String), axum::Error> {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok((headers, String::from_utf8_lossy(&body_bytes).to_string()))
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> Result<(axum::http::response::Parts, String), axum::Error> {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok((headers, String::from_utf8_lossy(&body_bytes).to_string()))
}

/// The first [LOG_BODY_LENGTH_LIMIT] bytes of `body`, cut at a character boundary.
fn truncate_body(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {headers:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {headers:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use crate::{endpoints, register_user::post_new_code, test_utils::capture_logs};

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_form_field, truncate_body};

    #[test]
    fn redacts_access_code() {
        let redacted = redact_form_field("user_code=abc123&display_name=Rara", "user_code");

        assert_eq!(redacted, "user_code=********&display_name=Rara");
    }

    #[test]
    fn leaves_other_forms_alone() {
        let form = "type_=expense&amount=50.000&category=Makan";

        assert_eq!(redact_form_field(form, "user_code"), form);
    }

    #[test]
    fn truncates_on_char_boundary() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate_body(&body);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(body.starts_with(truncated));
    }

    #[tokio::test]
    async fn passes_request_body_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .post("/echo")
            .form(&[("user_code", "abc123")])
            .await;

        response.assert_status_ok();
        response.assert_text("user_code=abc123");
    }

    #[tokio::test]
    async fn generated_code_is_not_logged() {
        let app = Router::new()
            .route(endpoints::NEW_CODE_API, post(post_new_code))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let (logs, response) = capture_logs(server.post(endpoints::NEW_CODE_API)).await;

        let user_code = scraper::Html::parse_fragment(&response.text())
            .select(&scraper::Selector::parse("input[name=user_code]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"))
            .expect("the name step should carry the generated code")
            .to_owned();
        assert!(logs.contains("Sending response"), "got logs {logs}");
        assert!(!logs.contains(&user_code), "access code found in logs {logs}");
    }

    #[tokio::test]
    async fn submitted_code_is_not_logged() {
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let (logs, _) = capture_logs(
            server
                .post(endpoints::LOG_IN_API)
                .form(&[("user_code", "rahasia42")]),
        )
        .await;

        assert!(logs.contains("Received request"), "got logs {logs}");
        assert!(!logs.contains("rahasia42"), "access code found in logs {logs}");
    }
}
