pub mod assistant;
pub mod booking;
pub mod completion;
pub mod directory;
pub mod error;
pub mod extract;
pub mod models;
pub mod reminders;
pub mod service;
pub mod session;

// Re-export commonly used types
pub use assistant::{QueryResponder, ReportSummarizer};
pub use booking::{BookingConfirmation, BookingSelection, BookingStage};
pub use completion::{CompletionService, OpenRouterCompletion};
pub use directory::Doctor;
pub use error::{AssistantError, Result};
pub use extract::extract_text;
pub use reminders::{Reminder, ReminderLog};
pub use service::{AppState, create_app};
pub use session::{InMemorySessionStorage, SessionState, SessionStorage};
