use std::borrow::Cow;

use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use url::form_urlencoded;

const OVERRIDE_FIELD: &str = "_method";
const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

/// Lets HTML forms reach PUT/DELETE routes. A POST carrying `_method`
/// (query string first, then urlencoded body) is re-dispatched with that method.
/// Must wrap the router so it runs before route matching.
pub async fn method_override(req: Request, next: Next) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();

    if let Some(method) = parts
        .uri
        .query()
        .and_then(|q| find_override(form_urlencoded::parse(q.as_bytes())))
    {
        log::debug!("method override via query: POST -> {} {}", method, parts.uri.path());
        parts.method = method;
        return next.run(Request::from_parts(parts, body)).await;
    }

    if !is_urlencoded_form(&parts.headers) {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let bytes = match axum::body::to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("Failed to buffer form body for {}: {}", parts.uri.path(), err);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if let Some(method) = find_override(form_urlencoded::parse(&bytes)) {
        log::debug!("method override via form: POST -> {} {}", method, parts.uri.path());
        parts.method = method;
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_urlencoded_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn find_override<'a>(
    mut pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
) -> Option<Method> {
    pairs.find_map(|(key, value)| {
        if key == OVERRIDE_FIELD {
            parse_override(&value)
        } else {
            None
        }
    })
}

fn parse_override(value: &str) -> Option<Method> {
    match value.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
