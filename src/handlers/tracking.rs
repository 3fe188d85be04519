//! Public tracking endpoint — no authentication

use crate::app::AppState;
use crate::database::PublicJobView;
use crate::error::Result;
use axum::extract::{Path, State};
use axum::Json;

pub async fn track_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PublicJobView>> {
    let view = state.tracking_service.track_by_code(&code).await?;

    Ok(Json(view))
}
