use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::assistant::{QueryResponder, ReportSummarizer};
use crate::booking::BookingSelection;
use crate::completion::CompletionService;
use crate::directory;
use crate::error::AssistantError;
use crate::extract;
use crate::models::{
    AddReminderRequest, AskRequest, AskResponse, BookingView, ChooseDoctorRequest,
    ChooseSpecialtyRequest, ChooseTimeSlotRequest, ConfirmBookingResponse, CreateSessionResponse,
    LabReportRequest, LabReportResponse, RemindersResponse, SessionSnapshot, SpecialtyListing,
};
use crate::session::{InMemorySessionStorage, SessionState, SessionStorage};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn api_error(err: AssistantError) -> ApiError {
    let status = match &err {
        AssistantError::UnknownSpecialty(_)
        | AssistantError::UnknownDoctor(_)
        | AssistantError::UnknownTimeSlot(_) => StatusCode::BAD_REQUEST,
        AssistantError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        AssistantError::InvalidTransition { .. } => StatusCode::CONFLICT,
        AssistantError::PdfRead(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssistantError::Completion(_) | AssistantError::CompletionTimeout(_) => {
            StatusCode::BAD_GATEWAY
        }
        AssistantError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

#[derive(Clone)]
pub struct AppState {
    pub session_storage: Arc<dyn SessionStorage>,
    pub responder: QueryResponder,
    pub summarizer: ReportSummarizer,
}

pub fn create_app(completion: Arc<dyn CompletionService>) -> Router {
    let app_state = AppState {
        session_storage: Arc::new(InMemorySessionStorage::new()),
        responder: QueryResponder::new(completion.clone()),
        summarizer: ReportSummarizer::new(completion),
    };
    build_router(app_state)
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/specialties", get(list_specialties))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/ask", post(ask_question))
        .route("/sessions/{id}/booking", get(get_booking))
        .route("/sessions/{id}/booking/specialty", post(choose_specialty))
        .route("/sessions/{id}/booking/doctor", post(choose_doctor))
        .route("/sessions/{id}/booking/slot", post(choose_time_slot))
        .route("/sessions/{id}/booking/confirm", post(confirm_booking))
        .route(
            "/sessions/{id}/reminders",
            post(add_reminder).get(list_reminders).delete(clear_reminders),
        )
        .route("/sessions/{id}/lab-report", post(summarize_lab_report))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "AI Healthcare Assistant",
        "version": "1.0.0",
        "description": "Medical Q&A, appointment booking, medication reminders and lab test assistance",
        "views": [
            "Home",
            "Ask a Medical Question",
            "Book an Appointment",
            "Medication Reminders",
            "Lab Test Assistance"
        ],
        "endpoints": {
            "POST /sessions": "Create a session",
            "GET /sessions/{id}": "Session snapshot",
            "POST /sessions/{id}/ask": "Ask a medical question",
            "GET /specialties": "Specialty directory",
            "POST /sessions/{id}/booking/{specialty|doctor|slot|confirm}": "Booking wizard steps",
            "POST /sessions/{id}/reminders": "Add a medication reminder",
            "POST /sessions/{id}/lab-report": "Summarize an uploaded lab report (base64 PDF)",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_specialties() -> Json<Vec<SpecialtyListing>> {
    let listing = directory::specialties()
        .into_iter()
        .map(|name| SpecialtyListing {
            name: name.to_string(),
            doctors: directory::lookup(name).unwrap_or_default().to_vec(),
        })
        .collect();
    Json(listing)
}

async fn create_session(State(state): State<AppState>) -> ApiResult<CreateSessionResponse> {
    let session = SessionState::new();
    let session_id = session.id.clone();

    state.session_storage.save(session).await.map_err(|e| {
        error!("Failed to create session: {}", e);
        api_error(e)
    })?;

    info!("Session {} created", session_id);
    Ok(Json(CreateSessionResponse { session_id }))
}

async fn load_session(state: &AppState, id: &str) -> Result<SessionState, ApiError> {
    match state.session_storage.get(id).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(api_error(AssistantError::SessionNotFound(id.to_string()))),
        Err(e) => {
            error!("Failed to load session {}: {}", id, e);
            Err(api_error(e))
        }
    }
}

async fn save_session(state: &AppState, session: SessionState) -> Result<(), ApiError> {
    state.session_storage.save(session).await.map_err(|e| {
        error!("Failed to save session: {}", e);
        api_error(e)
    })
}

fn booking_view(booking: &BookingSelection) -> BookingView {
    BookingView {
        stage: booking.stage(),
        specialty: booking.specialty().map(String::from),
        doctor: booking.doctor().map(|d| d.name.clone()),
        time_slot: booking.time_slot().map(String::from),
        next_options: booking.next_options(),
    }
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionSnapshot> {
    let session = load_session(&state, &id).await?;
    Ok(Json(SessionSnapshot {
        session_id: session.id.clone(),
        created_at: session.created_at.to_rfc3339(),
        booking: booking_view(&session.booking),
        reminders: session.reminders.list().to_vec(),
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    // Ensure the session exists so a bogus id still 404s.
    load_session(&state, &id).await?;
    state.session_storage.delete(&id).await.map_err(api_error)?;
    info!("Session {} deleted", id);
    Ok(Json(json!({ "session_id": id, "status": "deleted" })))
}

async fn ask_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AskRequest>,
) -> ApiResult<AskResponse> {
    load_session(&state, &id).await?;

    info!("Session {}: answering medical question", id);
    let response = state.responder.respond(&request.query).await.map_err(|e| {
        error!("Completion failed for session {}: {}", id, e);
        api_error(e)
    })?;

    Ok(Json(AskResponse { response }))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BookingView> {
    let session = load_session(&state, &id).await?;
    Ok(Json(booking_view(&session.booking)))
}

async fn choose_specialty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChooseSpecialtyRequest>,
) -> ApiResult<BookingView> {
    let mut session = load_session(&state, &id).await?;
    session
        .booking
        .choose_specialty(&request.specialty)
        .map_err(api_error)?;
    let view = booking_view(&session.booking);
    save_session(&state, session).await?;
    Ok(Json(view))
}

async fn choose_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChooseDoctorRequest>,
) -> ApiResult<BookingView> {
    let mut session = load_session(&state, &id).await?;
    session
        .booking
        .choose_doctor(&request.doctor)
        .map_err(api_error)?;
    let view = booking_view(&session.booking);
    save_session(&state, session).await?;
    Ok(Json(view))
}

async fn choose_time_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChooseTimeSlotRequest>,
) -> ApiResult<BookingView> {
    let mut session = load_session(&state, &id).await?;
    session
        .booking
        .choose_time_slot(&request.time_slot)
        .map_err(api_error)?;
    let view = booking_view(&session.booking);
    save_session(&state, session).await?;
    Ok(Json(view))
}

async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ConfirmBookingResponse> {
    let mut session = load_session(&state, &id).await?;
    let booking = session.booking.confirm().map_err(api_error)?;
    save_session(&state, session).await?;

    info!(
        "Session {}: booked {} with {} at {}",
        id, booking.specialty, booking.doctor, booking.time_slot
    );
    Ok(Json(ConfirmBookingResponse {
        message: "Your appointment has been successfully booked!".to_string(),
        booking,
    }))
}

async fn add_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddReminderRequest>,
) -> ApiResult<RemindersResponse> {
    let mut session = load_session(&state, &id).await?;
    session.reminders.add(request.medication_name, request.time);
    let reminders = session.reminders.list().to_vec();
    save_session(&state, session).await?;
    Ok(Json(RemindersResponse { reminders }))
}

async fn list_reminders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<RemindersResponse> {
    let session = load_session(&state, &id).await?;
    Ok(Json(RemindersResponse {
        reminders: session.reminders.list().to_vec(),
    }))
}

async fn clear_reminders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<RemindersResponse> {
    let mut session = load_session(&state, &id).await?;
    session.reminders.clear();
    save_session(&state, session).await?;
    Ok(Json(RemindersResponse { reminders: vec![] }))
}

async fn summarize_lab_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<LabReportRequest>,
) -> ApiResult<LabReportResponse> {
    load_session(&state, &id).await?;

    let pdf_bytes = STANDARD
        .decode(&request.pdf_base64)
        .map_err(|_| bad_request_error("pdf_base64 is not valid base64"))?;

    info!(
        "Session {}: extracting lab report text ({} bytes)",
        id,
        pdf_bytes.len()
    );

    // PDF parsing is CPU-bound; keep it off the async workers.
    let extracted_text = tokio::task::spawn_blocking(move || extract::extract_text(&pdf_bytes))
        .await
        .map_err(|e| api_error(AssistantError::Internal(e.to_string())))?
        .map_err(api_error)?;

    let summary = state
        .summarizer
        .summarize(&extracted_text)
        .await
        .map_err(|e| {
            error!("Lab report summarization failed for session {}: {}", id, e);
            api_error(e)
        })?;

    Ok(Json(LabReportResponse { summary }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct StubCompletion {
        reply: &'static str,
    }

    #[async_trait]
    impl CompletionService for StubCompletion {
        async fn complete(&self, _preamble: &str, _prompt: &str) -> Result<String> {
            Ok(self.reply.to_string())
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl CompletionService for FailingCompletion {
        async fn complete(&self, _preamble: &str, _prompt: &str) -> Result<String> {
            Err(AssistantError::Completion("upstream unavailable".to_string()))
        }
    }

    fn test_app() -> Router {
        create_app(Arc::new(StubCompletion {
            reply: "stub completion reply",
        }))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_test_session(app: &Router) -> String {
        let (status, body) = send(app, "POST", "/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_check_is_healthy() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn specialties_listing_matches_the_directory() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/specialties", None).await;
        assert_eq!(status, StatusCode::OK);
        let listing = body.as_array().unwrap();
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[0]["name"], "Cardiologist");
        assert_eq!(listing[0]["doctors"][0]["name"], "Dr. Alice Heart");
    }

    #[tokio::test]
    async fn booking_wizard_end_to_end() {
        let app = test_app();
        let session_id = create_test_session(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/booking/specialty"),
            Some(json!({ "specialty": "Cardiologist" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stage"], "specialty_chosen");
        assert_eq!(
            body["next_options"],
            json!(["Dr. Alice Heart", "Dr. Bob Cardio"])
        );

        let (status, _) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/booking/doctor"),
            Some(json!({ "doctor": "Dr. Alice Heart" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/booking/slot"),
            Some(json!({ "time_slot": "10:00 AM" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["specialty"], "Cardiologist");
        assert_eq!(body["doctor"], "Dr. Alice Heart");
        assert_eq!(body["time_slot"], "10:00 AM");

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/booking/confirm"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["booking"]["specialty"], "Cardiologist");
        assert_eq!(body["booking"]["doctor"], "Dr. Alice Heart");
        assert_eq!(body["booking"]["time_slot"], "10:00 AM");

        // Confirming reset the wizard.
        let (status, body) = send(
            &app,
            "GET",
            &format!("/sessions/{session_id}/booking"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stage"], "no_specialty");
        assert_eq!(body["specialty"], Value::Null);
        assert_eq!(body["doctor"], Value::Null);
        assert_eq!(body["time_slot"], Value::Null);
    }

    #[tokio::test]
    async fn out_of_order_booking_step_conflicts() {
        let app = test_app();
        let session_id = create_test_session(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/booking/doctor"),
            Some(json!({ "doctor": "Dr. Alice Heart" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("invalid booking transition"));
    }

    #[tokio::test]
    async fn unknown_specialty_is_a_bad_request() {
        let app = test_app();
        let session_id = create_test_session(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/booking/specialty"),
            Some(json!({ "specialty": "Astrologist" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reminders_add_list_clear() {
        let app = test_app();
        let session_id = create_test_session(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/reminders"),
            Some(json!({ "medication_name": "Aspirin", "time": "08:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/reminders"),
            Some(json!({ "medication_name": "Vitamin D", "time": "09:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["reminders"],
            json!([
                { "medication_name": "Aspirin", "time": "08:00" },
                { "medication_name": "Vitamin D", "time": "09:00" }
            ])
        );

        let (status, body) = send(
            &app,
            "DELETE",
            &format!("/sessions/{session_id}/reminders"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reminders"], json!([]));

        let (_, body) = send(
            &app,
            "GET",
            &format!("/sessions/{session_id}/reminders"),
            None,
        )
        .await;
        assert_eq!(body["reminders"], json!([]));
    }

    #[tokio::test]
    async fn ask_returns_the_completion_reply() {
        let app = test_app();
        let session_id = create_test_session(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/ask"),
            Some(json!({ "query": "What is hypertension?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "stub completion reply");
    }

    #[tokio::test]
    async fn completion_failure_maps_to_bad_gateway() {
        let app = create_app(Arc::new(FailingCompletion));
        let session_id = create_test_session(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/ask"),
            Some(json!({ "query": "What is hypertension?" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = test_app();
        let (status, _) = send(&app, "GET", "/sessions/does-not-exist", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/sessions/does-not-exist/ask",
            Some(json!({ "query": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleted_session_is_gone() {
        let app = test_app();
        let session_id = create_test_session(&app).await;

        let (status, _) = send(&app, "DELETE", &format!("/sessions/{session_id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", &format!("/sessions/{session_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lab_report_rejects_bad_payloads() {
        let app = test_app();
        let session_id = create_test_session(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/lab-report"),
            Some(json!({ "pdf_base64": "%%% not base64 %%%" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let garbage = STANDARD.encode(b"not a pdf at all");
        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/lab-report"),
            Some(json!({ "pdf_base64": garbage })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().starts_with("Error reading PDF: "));
    }
}
