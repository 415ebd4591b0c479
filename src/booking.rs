//! Appointment booking wizard.
//!
//! A strict linear state machine over the specialty directory:
//! `NoSpecialty -> SpecialtyChosen -> DoctorChosen -> TimeChosen`, with
//! `confirm` folding `TimeChosen` back to `NoSpecialty`. Out-of-order
//! transitions are rejected with [`AssistantError::InvalidTransition`]
//! instead of being silently hidden; re-choosing at the current stage
//! overwrites the stored value (last trigger wins).

use serde::{Deserialize, Serialize};

use crate::directory::{self, Doctor};
use crate::error::{AssistantError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    NoSpecialty,
    SpecialtyChosen,
    DoctorChosen,
    TimeChosen,
}

/// The in-progress selection for one session. Fields are only ever set in
/// stage order and are cleared together when a booking is confirmed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingSelection {
    specialty: Option<String>,
    doctor: Option<Doctor>,
    time_slot: Option<String>,
}

/// Snapshot of a confirmed booking, returned once at confirmation time.
/// Nothing is persisted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub specialty: String,
    pub doctor: String,
    pub time_slot: String,
}

impl BookingSelection {
    pub fn stage(&self) -> BookingStage {
        match (&self.specialty, &self.doctor, &self.time_slot) {
            (None, _, _) => BookingStage::NoSpecialty,
            (Some(_), None, _) => BookingStage::SpecialtyChosen,
            (Some(_), Some(_), None) => BookingStage::DoctorChosen,
            (Some(_), Some(_), Some(_)) => BookingStage::TimeChosen,
        }
    }

    pub fn specialty(&self) -> Option<&str> {
        self.specialty.as_deref()
    }

    pub fn doctor(&self) -> Option<&Doctor> {
        self.doctor.as_ref()
    }

    pub fn time_slot(&self) -> Option<&str> {
        self.time_slot.as_deref()
    }

    /// Step 1: pick a specialty from the directory. Rejected once a doctor
    /// has been chosen.
    pub fn choose_specialty(&mut self, specialty: &str) -> Result<()> {
        if self.doctor.is_some() {
            return Err(AssistantError::InvalidTransition {
                action: "choose specialty",
                required: "no doctor selected yet",
            });
        }
        directory::lookup(specialty)?;
        self.specialty = Some(specialty.to_string());
        Ok(())
    }

    /// Step 2: pick a doctor from the chosen specialty's list. Rejected
    /// before a specialty is chosen and once a time slot has been chosen.
    pub fn choose_doctor(&mut self, doctor_name: &str) -> Result<()> {
        let Some(specialty) = self.specialty.as_deref() else {
            return Err(AssistantError::InvalidTransition {
                action: "choose doctor",
                required: "a specialty to be selected first",
            });
        };
        if self.time_slot.is_some() {
            return Err(AssistantError::InvalidTransition {
                action: "choose doctor",
                required: "no time slot selected yet",
            });
        }
        let doctor = directory::find_doctor(specialty, doctor_name)?;
        self.doctor = Some(doctor.clone());
        Ok(())
    }

    /// Step 3: pick one of the chosen doctor's time slots.
    pub fn choose_time_slot(&mut self, time_slot: &str) -> Result<()> {
        let Some(doctor) = self.doctor.as_ref() else {
            return Err(AssistantError::InvalidTransition {
                action: "choose time slot",
                required: "a doctor to be selected first",
            });
        };
        if !doctor.has_slot(time_slot) {
            return Err(AssistantError::UnknownTimeSlot(time_slot.to_string()));
        }
        self.time_slot = Some(time_slot.to_string());
        Ok(())
    }

    /// Confirm the fully-populated selection. Returns the confirmed triple
    /// and resets the wizard to `NoSpecialty`.
    pub fn confirm(&mut self) -> Result<BookingConfirmation> {
        match (&self.specialty, &self.doctor, &self.time_slot) {
            (Some(specialty), Some(doctor), Some(time_slot)) => {
                let confirmation = BookingConfirmation {
                    specialty: specialty.clone(),
                    doctor: doctor.name.clone(),
                    time_slot: time_slot.clone(),
                };
                *self = BookingSelection::default();
                Ok(confirmation)
            }
            _ => Err(AssistantError::InvalidTransition {
                action: "confirm booking",
                required: "specialty, doctor and time slot to all be selected",
            }),
        }
    }

    /// Choices valid at the current stage, in directory order. Mirrors what
    /// the wizard UI would offer for the next step.
    pub fn next_options(&self) -> Vec<String> {
        match self.stage() {
            BookingStage::NoSpecialty => directory::specialties()
                .into_iter()
                .map(String::from)
                .collect(),
            BookingStage::SpecialtyChosen => {
                let specialty = self.specialty.as_deref().unwrap_or_default();
                directory::lookup(specialty)
                    .map(|doctors| doctors.iter().map(|d| d.name.clone()).collect())
                    .unwrap_or_default()
            }
            BookingStage::DoctorChosen => self
                .doctor
                .as_ref()
                .map(|d| d.time_slots.clone())
                .unwrap_or_default(),
            BookingStage::TimeChosen => vec!["confirm".to_string()],
        }
    }
}
