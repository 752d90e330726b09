use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;

use crate::storage::{NewQuote, SavedQuote};

use super::{
    error::{AppError, ErrorPage},
    models::{SaveQuoteForm, UpdateQuoteForm},
    AppState,
};

type PageResult = Result<Response, ErrorPage>;

pub async fn random_quotes(State(state): State<AppState>) -> PageResult {
    let quotes = state
        .quotes
        .fetch_random_quotes(state.quote_count)
        .await
        .map_err(|err| state.fail(err))?;
    state.page("index.html", context! { quotes })
}

pub async fn list_favorites(State(state): State<AppState>) -> PageResult {
    let quotes = state
        .storage
        .list_quotes()
        .map_err(|err| state.fail(AppError::Store(err)))?;
    state.page("favorites.html", context! { quotes })
}

pub async fn favorite_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    let quote = match parse_id(&id) {
        Some(id) => state
            .storage
            .load_quote(id)
            .map_err(|err| state.fail(AppError::Store(err)))?,
        None => None,
    };

    match quote {
        Some(quote) => state.page("details.html", context! { quote }),
        None => {
            log::warn!("{}", AppError::NotFound(format!("favorite quote {}", id)));
            let page = state.page("details.html", context! { quote => None::<SavedQuote> })?;
            Ok((StatusCode::NOT_FOUND, page).into_response())
        }
    }
}

pub async fn save_quote(
    State(state): State<AppState>,
    Form(form): Form<SaveQuoteForm>,
) -> PageResult {
    let quote = NewQuote::from(form);
    let id = state
        .storage
        .create_quote(&quote)
        .map_err(|err| state.fail(AppError::Store(err)))?;
    log::info!("⭐ Saved favorite {} ({})", id, quote.character);
    Ok(Redirect::to("/favorite-quotes").into_response())
}

pub async fn update_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<UpdateQuoteForm>,
) -> PageResult {
    let quote_id = parse_id(&id)
        .ok_or_else(|| state.fail(AppError::NotFound(format!("favorite quote {}", id))))?;
    let affected = state
        .storage
        .update_quote(quote_id, &form.quote)
        .map_err(|err| state.fail(AppError::Store(err)))?;
    if affected == 0 {
        log::warn!("Update of favorite {} matched no row", quote_id);
    }
    Ok(Redirect::to(&format!("/favorite-quotes/{}", quote_id)).into_response())
}

pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    let quote_id = parse_id(&id)
        .ok_or_else(|| state.fail(AppError::NotFound(format!("favorite quote {}", id))))?;
    let affected = state
        .storage
        .delete_quote(quote_id)
        .map_err(|err| state.fail(AppError::Store(err)))?;
    if affected == 0 {
        log::warn!("Delete of favorite {} matched no row", quote_id);
    } else {
        log::info!("🗑️ Deleted favorite {}", quote_id);
    }
    Ok(Redirect::to("/favorite-quotes").into_response())
}

pub async fn not_found(State(state): State<AppState>, uri: Uri) -> impl IntoResponse {
    state.fail(AppError::NotFound(format!("endpoint {}", uri.path())))
}

fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse::<i64>().ok()
}

impl AppState {
    fn fail(&self, err: impl Into<AppError>) -> ErrorPage {
        ErrorPage::new(self.views.clone(), err.into())
    }

    fn page<C: serde::Serialize>(&self, name: &str, ctx: C) -> PageResult {
        let html = self
            .views
            .render(name, ctx)
            .map_err(|err| self.fail(err))?;
        Ok(Html(html).into_response())
    }
}
