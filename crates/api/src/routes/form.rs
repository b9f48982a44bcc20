//! HTML Form Routes

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    Form,
};
use feature_engine::YieldInput;
use std::sync::Arc;

use crate::views::{render_page, Outcome};
use crate::{ApiError, AppState};

/// Render the empty form with default inputs
pub async fn show_form(State(state): State<Arc<AppState>>) -> Html<String> {
    let input = YieldInput::for_crop(state.default_crop().unwrap_or_default());
    Html(render_page(
        state.assembler.crops(),
        &input,
        None,
        &state.schema_notices(),
        state.year_range(),
    ))
}

/// Predict from a submitted form and re-render it with the result
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<YieldInput>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let input = match payload {
        Ok(Form(input)) => input,
        Err(rejection) => {
            let err = ApiError::from(rejection);
            let input = YieldInput::for_crop(state.default_crop().unwrap_or_default());
            let page = render_page(
                state.assembler.crops(),
                &input,
                Some(&Outcome::Failure(err.to_string())),
                &state.schema_notices(),
                state.year_range(),
            );
            return (err.status(), Html(page));
        }
    };

    let (status, outcome, notices) = match state.predict(input.clone()) {
        Ok(outcome) => (
            StatusCode::OK,
            Outcome::Success(outcome.message()),
            outcome.warnings,
        ),
        Err(e) => (
            e.status(),
            Outcome::Failure(e.to_string()),
            state.schema_notices(),
        ),
    };

    let page = render_page(
        state.assembler.crops(),
        &input,
        Some(&outcome),
        &notices,
        state.year_range(),
    );
    (status, Html(page))
}
