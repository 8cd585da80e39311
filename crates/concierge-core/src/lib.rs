//! Concierge core
//!
//! Client-side model of the Soccer Referee Concierge: the message transcript,
//! license report types, keyword routing, the backend API and its HTTP
//! implementation, persisted client state, and the chat controller that ties
//! them together.
//!
//! Rendering lives in the CLI crate; nothing in here writes to the terminal.

pub mod api;
pub mod controller;
pub mod feedback;
pub mod http;
pub mod license;
pub mod message;
pub mod routing;
pub mod source;
pub mod splash;
pub mod store;

pub use api::{ApiError, ChatAnswer, ConciergeApi, HealthReport};
pub use controller::{
    ChatController, FeedbackOutcome, QuestionStep, SubmitOutcome, EXAMPLE_QUESTIONS,
};
pub use feedback::{FeedbackForm, FeedbackSubmission};
pub use http::HttpConciergeClient;
pub use license::{BadgeColor, Discipline, LicenseRecord, LicenseReport, LicenseStatus};
pub use message::{ChatMessage, LicenseMessage, Message, Role, Transcript};
pub use routing::{is_license_query, route, Route, LICENSE_KEYWORDS};
pub use source::Source;
pub use store::{FileStateStore, MemoryStateStore, StateStore, StoreError};
