//! Medication reminder log: append-only within a session, cleared wholesale.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub medication_name: String,
    pub time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderLog {
    entries: Vec<Reminder>,
}

impl ReminderLog {
    /// Appends unconditionally. Empty names and arbitrary time strings are
    /// accepted; entries are never validated or deduplicated.
    pub fn add(&mut self, medication_name: impl Into<String>, time: impl Into<String>) {
        self.entries.push(Reminder {
            medication_name: medication_name.into(),
            time: time.into(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order.
    pub fn list(&self) -> &[Reminder] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_insertion_order() {
        let mut log = ReminderLog::default();
        log.add("Aspirin", "08:00");
        log.add("Vitamin D", "09:00");

        assert_eq!(
            log.list(),
            &[
                Reminder {
                    medication_name: "Aspirin".to_string(),
                    time: "08:00".to_string()
                },
                Reminder {
                    medication_name: "Vitamin D".to_string(),
                    time: "09:00".to_string()
                },
            ]
        );

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn each_add_grows_the_list_by_one() {
        let mut log = ReminderLog::default();
        for i in 0..5 {
            let before = log.list().to_vec();
            log.add(format!("med-{i}"), "12:00");
            assert_eq!(log.list().len(), before.len() + 1);
            assert_eq!(&log.list()[..before.len()], before.as_slice());
        }
    }

    #[test]
    fn empty_name_and_freeform_time_are_accepted() {
        let mut log = ReminderLog::default();
        log.add("", "whenever");
        assert_eq!(log.list().len(), 1);
        assert_eq!(log.list()[0].medication_name, "");
        assert_eq!(log.list()[0].time, "whenever");
    }
}
