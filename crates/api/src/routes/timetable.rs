use crate::state::AppState;
use axum::{extract::State, Json};
use types::TimetablePayload;

pub async fn timetable(State(state): State<AppState>) -> Json<TimetablePayload> {
    Json(state.payload.as_ref().clone())
}
