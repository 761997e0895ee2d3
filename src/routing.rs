//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx},
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    register_user::{create_user_endpoint, post_new_code},
    transaction::{create_transaction_endpoint, get_new_transaction_page, post_amount_field},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::NEW_CODE_API, post(post_new_code))
        .route(endpoints::USERS, post(create_user_endpoint))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(endpoints::AMOUNT_FIELD_API, post(post_amount_field))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod end_to_end_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::{TestResponse, TestServer};
    use rusqlite::Connection;
    use scraper::Html;
    use time::Duration;

    use crate::{AppState, DEFAULT_COOKIE_DURATION, endpoints, test_utils::element_text};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Asia/Jakarta",
            DEFAULT_COOKIE_DURATION,
        )
        .unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    fn session_cookie(response: &TestResponse) -> Cookie<'static> {
        response.cookie("session")
    }

    /// Submit a code that nobody owns, then a display name.
    async fn sign_up(server: &TestServer, user_code: &str, display_name: &str) -> Cookie<'static> {
        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("user_code", user_code)])
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("Kode Akun Baru"));

        let response = server
            .post(endpoints::USERS)
            .form(&[("user_code", user_code), ("display_name", display_name)])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("hx-redirect", endpoints::DASHBOARD_VIEW);

        session_cookie(&response)
    }

    #[tokio::test]
    async fn protected_pages_redirect_to_log_in() {
        let server = get_test_server();

        for path in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
        ] {
            let response = server.get(path).await;

            response.assert_status(StatusCode::SEE_OTHER);
            response.assert_header("location", endpoints::LOG_IN_VIEW);
        }
    }

    #[tokio::test]
    async fn protected_api_uses_hx_redirect() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("type_", "expense"), ("amount", "1000")])
            .await;

        response.assert_header("hx-redirect", endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let server = get_test_server();

        server
            .get("/does/not/exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn new_user_sees_empty_dashboard() {
        let server = get_test_server();

        let cookie = sign_up(&server, "abc123", "Rara").await;
        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_eq!(element_text(&html, "h1"), "Halo, Rara");
        assert_eq!(element_text(&html, "#balance"), "Rp 0");
        assert!(element_text(&html, "#empty-state").contains("Belum ada catatan"));
    }

    #[tokio::test]
    async fn balance_reflects_todays_transactions() {
        let server = get_test_server();
        let cookie = sign_up(&server, "abc123", "Rara").await;

        for (type_, amount) in [("expense", "50000"), ("income", "200.000")] {
            let response = server
                .post(endpoints::TRANSACTIONS_API)
                .add_cookie(cookie.clone())
                .form(&[
                    ("type_", type_),
                    ("amount", amount),
                    ("category", ""),
                    ("note", ""),
                ])
                .await;
            response.assert_status(StatusCode::SEE_OTHER);
            response.assert_header("hx-redirect", "/dashboard?saved=true");
        }

        let response = server
            .get("/dashboard?saved=true")
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_eq!(element_text(&html, "#balance"), "Rp 150.000");
        assert_eq!(element_text(&html, "#add-transaction"), "Tersimpan ✓");
        assert_eq!(element_text(&html, ".day-group h3"), "Hari Ini");
    }

    #[tokio::test]
    async fn returning_user_logs_in_with_code() {
        let server = get_test_server();
        sign_up(&server, "abc123", "Rara").await;

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("user_code", "abc123")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("hx-redirect", endpoints::DASHBOARD_VIEW);
        assert!(!response.text().contains("Kode Akun Baru"));
    }

    #[tokio::test]
    async fn log_out_ends_session() {
        let server = get_test_server();
        sign_up(&server, "abc123", "Rara").await;

        let response = server.get(endpoints::LOG_OUT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", endpoints::LOG_IN_VIEW);
        assert_eq!(session_cookie(&response).max_age(), Some(Duration::ZERO));
    }
}
