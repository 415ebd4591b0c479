use serde::{Deserialize, Serialize};

use crate::booking::{BookingConfirmation, BookingStage};
use crate::directory::Doctor;
use crate::reminders::Reminder;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub created_at: String,
    pub booking: BookingView,
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpecialtyListing {
    pub name: String,
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChooseSpecialtyRequest {
    pub specialty: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChooseDoctorRequest {
    pub doctor: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChooseTimeSlotRequest {
    pub time_slot: String,
}

/// Current wizard position plus the choices valid at this stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingView {
    pub stage: BookingStage,
    pub specialty: Option<String>,
    pub doctor: Option<String>,
    pub time_slot: Option<String>,
    pub next_options: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmBookingResponse {
    pub message: String,
    pub booking: BookingConfirmation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddReminderRequest {
    pub medication_name: String,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemindersResponse {
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LabReportRequest {
    /// Base64-encoded PDF bytes.
    pub pdf_base64: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LabReportResponse {
    pub summary: String,
}
