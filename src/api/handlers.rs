use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::AppState;
use crate::config::ConfigUpdate;
use crate::error::InvalidInput;
use crate::schedule::TimeInfo;
use crate::timetable::{ClassEntry, parse_weekday, weekday_name};

/// Error payload for rejected requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<InvalidInput> for ErrorResponse {
    fn from(err: InvalidInput) -> Self {
        warn!("Rejected request: {}", err);
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Liveness probe
pub async fn index() -> &'static str {
    "Class notification bot is running!"
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub started_at: String,
    pub ready: bool,
    pub armed_timers: usize,
}

/// Bot status and armed-timer count
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        started_at: state.data.started_at.to_rfc3339(),
        ready: state.notifier.is_ready(),
        armed_timers: state.manager.armed_timer_count(),
    })
}

/// Current time as the scheduler sees it
pub async fn time_info(State(state): State<AppState>) -> Json<TimeInfo> {
    Json(state.manager.current_time_info().await)
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub sent: bool,
}

/// Send the self-test message immediately
pub async fn send_test_message(State(state): State<AppState>) -> Json<SendResponse> {
    Json(SendResponse {
        sent: state.notifier.send_test_message().await,
    })
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub class_name: String,
    pub location: String,
    pub custom_text: Option<String>,
}

/// Send a class notification immediately
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Json<SendResponse> {
    let sent = state
        .notifier
        .send_class_message(&req.class_name, &req.location, req.custom_text)
        .await;
    Json(SendResponse { sent })
}

#[derive(Debug, Deserialize)]
pub struct ScheduleMessageRequest {
    pub hour: u32,
    pub minute: u32,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ScheduledResponse {
    pub timer_id: u64,
    pub armed_timers: usize,
}

/// Arm an ad-hoc message timer at the given local time
pub async fn schedule_message(
    State(state): State<AppState>,
    Json(req): Json<ScheduleMessageRequest>,
) -> Result<Json<ScheduledResponse>, ErrorResponse> {
    let timer_id = state
        .manager
        .schedule_custom_message(req.hour, req.minute, req.text)
        .await?;
    Ok(Json(ScheduledResponse {
        timer_id,
        armed_timers: state.manager.armed_timer_count(),
    }))
}

/// Merge a partial configuration update.
/// Armed timers pick up the change at the next scheduling pass.
pub async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Result<StatusCode, ErrorResponse> {
    state.data.update_config(update).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ClassEntryPayload {
    pub name: String,
    pub end_time: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDayRequest {
    pub entries: Vec<ClassEntryPayload>,
}

#[derive(Debug, Serialize)]
pub struct UpdateDayResponse {
    pub day: &'static str,
    pub classes: usize,
    pub armed_timers: usize,
}

/// Replace a day's class list. Takes effect immediately when the day is
/// "today" in the configured timezone; otherwise at the next midnight pass.
pub async fn update_timetable_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
    Json(req): Json<UpdateDayRequest>,
) -> Result<Json<UpdateDayResponse>, ErrorResponse> {
    let day = parse_weekday(&day)?;
    let entries = req
        .entries
        .iter()
        .map(|e| ClassEntry::new(&e.name, &e.end_time, &e.location))
        .collect::<Result<Vec<_>, _>>()?;
    let classes = entries.len();

    state.manager.update_schedule_for_day(day, entries).await;
    Ok(Json(UpdateDayResponse {
        day: weekday_name(day),
        classes,
        armed_timers: state.manager.armed_timer_count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_request_accepts_optional_custom_text() {
        let req: SendMessageRequest =
            serde_json::from_str(r#"{"class_name": "ADS", "location": "TG-421"}"#).unwrap();
        assert_eq!(req.class_name, "ADS");
        assert!(req.custom_text.is_none());

        // Missing required field is a synchronous rejection
        let missing = serde_json::from_str::<SendMessageRequest>(r#"{"class_name": "ADS"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_update_day_request_payload() {
        let req: UpdateDayRequest = serde_json::from_str(
            r#"{"entries": [{"name": "Maths", "end_time": "09:30", "location": "B-101"}]}"#,
        )
        .unwrap();
        assert_eq!(req.entries.len(), 1);
        assert_eq!(req.entries[0].end_time, "09:30");
    }

    #[test]
    fn test_error_response_serializes_message() {
        let response = ErrorResponse::from(InvalidInput::UnknownDay("Funday".to_string()));
        let body = serde_json::to_string(&response).unwrap();
        assert_eq!(body, r#"{"error":"unknown day: 'Funday'"}"#);
    }
}
