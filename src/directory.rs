//! Static specialty directory: specialty name -> doctors -> time slots.
//!
//! The table is fixed at process start and never changes at runtime.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{AssistantError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    pub time_slots: Vec<String>,
}

impl Doctor {
    fn new(name: &str, time_slots: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            time_slots: time_slots.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn has_slot(&self, slot: &str) -> bool {
        self.time_slots.iter().any(|s| s == slot)
    }
}

struct SpecialtyEntry {
    name: &'static str,
    doctors: Vec<Doctor>,
}

static DIRECTORY: LazyLock<Vec<SpecialtyEntry>> = LazyLock::new(|| {
    vec![
        SpecialtyEntry {
            name: "Cardiologist",
            doctors: vec![
                Doctor::new("Dr. Alice Heart", &["10:00 AM", "2:00 PM"]),
                Doctor::new("Dr. Bob Cardio", &["11:00 AM", "4:00 PM"]),
            ],
        },
        SpecialtyEntry {
            name: "Dermatologist",
            doctors: vec![
                Doctor::new("Dr. Clara Skin", &["9:00 AM", "3:00 PM"]),
                Doctor::new("Dr. David Derma", &["12:00 PM", "5:00 PM"]),
            ],
        },
        SpecialtyEntry {
            name: "Pediatrician",
            doctors: vec![
                Doctor::new("Dr. Emily Kids", &["10:30 AM", "1:30 PM"]),
                Doctor::new("Dr. Frank Child", &["11:30 AM", "3:30 PM"]),
            ],
        },
    ]
});

/// Ordered specialty names, as presented to the user.
pub fn specialties() -> Vec<&'static str> {
    DIRECTORY.iter().map(|entry| entry.name).collect()
}

/// Doctors for a specialty, in table order.
pub fn lookup(specialty: &str) -> Result<&'static [Doctor]> {
    DIRECTORY
        .iter()
        .find(|entry| entry.name == specialty)
        .map(|entry| entry.doctors.as_slice())
        .ok_or_else(|| AssistantError::UnknownSpecialty(specialty.to_string()))
}

/// A single doctor under a specialty, by display name.
pub fn find_doctor(specialty: &str, doctor_name: &str) -> Result<&'static Doctor> {
    lookup(specialty)?
        .iter()
        .find(|doctor| doctor.name == doctor_name)
        .ok_or_else(|| AssistantError::UnknownDoctor(doctor_name.to_string()))
}
