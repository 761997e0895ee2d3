use axum::{
    body::Body,
    http::{StatusCode, header::SET_COOKIE},
    response::Response,
};
use axum_extra::extract::cookie::Cookie;
use time::OffsetDateTime;

use crate::auth::COOKIE_SESSION;

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

/// Assert that `response` sets a session cookie that has not expired.
#[track_caller]
pub(crate) fn assert_set_cookie(response: &Response<Body>) {
    let session_cookie = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|header| Cookie::parse(header.to_str().ok()?.to_owned()).ok())
        .find(|cookie| cookie.name() == COOKIE_SESSION)
        .unwrap_or_else(|| panic!("could not find cookie '{COOKIE_SESSION}'"));

    assert!(session_cookie.expires_datetime() > Some(OffsetDateTime::now_utc()));
}
