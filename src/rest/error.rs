use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;
use thiserror::Error;

use crate::provider::ProviderError;

use super::views::Views;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("storage error: {0:#}")]
    Store(anyhow::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Provider(ProviderError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AppError::Provider(_) => "The quote provider is unavailable right now.",
            AppError::Store(_) => "Your favorites could not be reached.",
            AppError::NotFound(_) => "Nothing lives at this address.",
            AppError::Render(_) => "The page could not be rendered.",
        }
    }
}

/// An [`AppError`] on its way out as an HTML error page.
pub struct ErrorPage {
    views: Arc<Views>,
    error: AppError,
}

impl ErrorPage {
    pub fn new(views: Arc<Views>, error: AppError) -> Self {
        Self { views, error }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            log::error!("{} -> {}", self.error, status);
        } else {
            log::warn!("{} -> {}", self.error, status);
        }

        let message = self.error.public_message();
        match self.views.render(
            "error.html",
            context! { status => status.as_u16(), message => message },
        ) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                log::error!("Failed to render error page: {}", err);
                (status, message).into_response()
            }
        }
    }
}
