//! Chat controller
//!
//! Owns the session state (transcript, loading flags, email prompt) and
//! drives the three backend flows: question answering, license lookup and
//! feedback submission.
//!
//! Each flow is split into a synchronous `begin_*` step that validates input
//! and updates state, and a `finish_*` step that records the backend result.
//! The `submit_*` methods run both around the API call. While a request is in
//! flight the matching loading flag is set and further submissions are
//! ignored.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::api::{ApiError, ChatAnswer, ConciergeApi};
use crate::feedback::FeedbackForm;
use crate::license::LicenseReport;
use crate::message::{Message, Transcript};
use crate::routing::{route, Route};
use crate::splash;
use crate::store::{StateStore, StoreError};

/// Shown instead of an answer when the chat request fails
pub const CHAT_ERROR_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// Shown when a question is diverted to license lookup
pub const EMAIL_PROMPT: &str = "I can look up your USSF license status. Please enter the email address associated with your US Soccer account:";

const LICENSE_ERROR_PREFIX: &str = "Sorry, I couldn't find license information: ";
const LICENSE_ERROR_FALLBACK: &str = "Failed to look up license";

/// Suggested questions on the welcome screen
pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "I'm a new ref. Where do I start?",
    "Check my license status",
    "Why am I not getting assignments?",
];

/// Result of submitting a question or an email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing happened: blank input or a request already in flight
    Ignored,
    /// Question was a license query; the email prompt is now open
    EmailRequested,
    /// Backend responded and the response was appended
    Answered,
    /// Backend call failed and an error message was appended
    Failed,
}

/// What the caller should do after [`ChatController::begin_question`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionStep {
    /// No request needed; the outcome is final
    Done(SubmitOutcome),
    /// Send this trimmed question to the chat endpoint
    Ask(String),
}

/// Result of a feedback submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Submit control was disabled; no request issued
    Ignored,
    Sent,
    /// Request failed; the form stays open for retry
    Failed(String),
}

pub struct ChatController {
    api: Arc<dyn ConciergeApi>,
    transcript: Transcript,
    loading: bool,
    license_loading: bool,
    awaiting_email: bool,
}

impl ChatController {
    pub fn new(api: Arc<dyn ConciergeApi>) -> Self {
        Self {
            api,
            transcript: Transcript::new(),
            loading: false,
            license_loading: false,
            awaiting_email: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn api(&self) -> &Arc<dyn ConciergeApi> {
        &self.api
    }

    /// A chat request is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A license lookup is in flight
    pub fn is_license_loading(&self) -> bool {
        self.license_loading
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.license_loading
    }

    /// The email prompt is showing
    pub fn awaiting_email(&self) -> bool {
        self.awaiting_email
    }

    /// Question input is enabled
    pub fn accepts_questions(&self) -> bool {
        !self.is_busy() && !self.awaiting_email
    }

    /// Validate and record a question
    pub fn begin_question(&mut self, text: &str) -> QuestionStep {
        let question = text.trim();
        if question.is_empty() || !self.accepts_questions() {
            return QuestionStep::Done(SubmitOutcome::Ignored);
        }

        self.transcript.push(Message::user(question));

        match route(question) {
            Route::LicenseLookup => {
                debug!("Routing question to license lookup");
                self.awaiting_email = true;
                QuestionStep::Done(SubmitOutcome::EmailRequested)
            }
            Route::Chat => {
                self.loading = true;
                QuestionStep::Ask(question.to_string())
            }
        }
    }

    /// Record the chat endpoint's result and clear the loading flag
    pub fn finish_question(&mut self, result: Result<ChatAnswer, ApiError>) -> SubmitOutcome {
        self.loading = false;
        match result {
            Ok(answer) => {
                self.transcript
                    .push(Message::assistant_with_sources(answer.answer, answer.sources));
                SubmitOutcome::Answered
            }
            Err(e) => {
                error!("Chat request failed: {}", e);
                self.transcript.push(Message::assistant(CHAT_ERROR_MESSAGE));
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit_question(&mut self, text: &str) -> SubmitOutcome {
        let question = match self.begin_question(text) {
            QuestionStep::Ask(question) => question,
            QuestionStep::Done(outcome) => return outcome,
        };
        let api = Arc::clone(&self.api);
        let result = api.ask(&question).await;
        self.finish_question(result)
    }

    /// Validate an email and record the lookup request.
    ///
    /// Returns the trimmed email when a license request should be issued.
    pub fn begin_license_lookup(&mut self, email: &str) -> Option<String> {
        let email = email.trim();
        if email.is_empty() || self.license_loading {
            return None;
        }

        self.license_loading = true;
        self.awaiting_email = false;
        self.transcript
            .push(Message::user(format!("Look up licenses for: {email}")));
        Some(email.to_string())
    }

    /// Record the license endpoint's result and clear the loading flag
    pub fn finish_license_lookup(
        &mut self,
        result: Result<LicenseReport, ApiError>,
    ) -> SubmitOutcome {
        self.license_loading = false;
        match result {
            Ok(report) => {
                info!("License lookup returned {} license(s)", report.license_count());
                self.transcript.push(Message::license(report));
                SubmitOutcome::Answered
            }
            Err(e) => {
                error!("License lookup failed: {}", e);
                let detail = e.detail().unwrap_or(LICENSE_ERROR_FALLBACK);
                self.transcript
                    .push(Message::assistant(format!("{LICENSE_ERROR_PREFIX}{detail}")));
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit_license_email(&mut self, email: &str) -> SubmitOutcome {
        let Some(email) = self.begin_license_lookup(email) else {
            return SubmitOutcome::Ignored;
        };
        let api = Arc::clone(&self.api);
        let result = api.license_status(&email).await;
        self.finish_license_lookup(result)
    }

    /// Close the email prompt without looking anything up
    pub fn cancel_license_lookup(&mut self) {
        self.awaiting_email = false;
    }

    /// Send the form if its submit control is enabled.
    ///
    /// Feedback never touches the transcript.
    pub async fn submit_feedback(&self, form: &mut FeedbackForm) -> FeedbackOutcome {
        if !form.can_submit() {
            return FeedbackOutcome::Ignored;
        }

        form.begin();
        let submission = form.to_submission();
        match self.api.submit_feedback(&submission).await {
            Ok(()) => {
                info!("Feedback submitted");
                form.finish(true);
                FeedbackOutcome::Sent
            }
            Err(e) => {
                error!("Error submitting feedback: {}", e);
                form.finish(false);
                FeedbackOutcome::Failed(e.to_string())
            }
        }
    }

    /// Splash document to show on first run, if any
    pub async fn load_splash(&self, store: &dyn StateStore) -> Option<String> {
        splash::pending(self.api.as_ref(), store).await
    }

    pub fn dismiss_splash(&self, store: &dyn StateStore) -> Result<(), StoreError> {
        splash::dismiss(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HealthReport;
    use crate::feedback::FeedbackSubmission;
    use crate::http::HttpConciergeClient;
    use crate::message::Role;
    use crate::store::MemoryStateStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records calls; every call fails unless an answer is scripted
    #[derive(Default)]
    struct RecordingApi {
        questions: Mutex<Vec<String>>,
        emails: Mutex<Vec<String>>,
        feedback: Mutex<Vec<FeedbackSubmission>>,
        answer: Option<ChatAnswer>,
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            detail: None,
        }
    }

    #[async_trait]
    impl ConciergeApi for RecordingApi {
        async fn ask(&self, question: &str) -> Result<ChatAnswer, ApiError> {
            self.questions.lock().unwrap().push(question.to_string());
            self.answer.clone().ok_or_else(unavailable)
        }

        async fn license_status(&self, email: &str) -> Result<LicenseReport, ApiError> {
            self.emails.lock().unwrap().push(email.to_string());
            Err(unavailable())
        }

        async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<(), ApiError> {
            self.feedback.lock().unwrap().push(submission.clone());
            Ok(())
        }

        async fn fetch_splash(&self) -> Result<String, ApiError> {
            Err(unavailable())
        }

        async fn health(&self) -> Result<HealthReport, ApiError> {
            Err(unavailable())
        }
    }

    fn recording(answer: Option<&str>) -> Arc<RecordingApi> {
        Arc::new(RecordingApi {
            answer: answer.map(|a| ChatAnswer {
                answer: a.to_string(),
                sources: Vec::new(),
            }),
            ..Default::default()
        })
    }

    fn http_controller(server: &MockServer) -> ChatController {
        let api = HttpConciergeClient::new(&server.uri(), None).unwrap();
        ChatController::new(Arc::new(api))
    }

    fn text_of(message: &Message) -> &str {
        match message {
            Message::Chat(chat) => &chat.content,
            Message::License(_) => panic!("expected a chat message"),
        }
    }

    #[tokio::test]
    async fn test_license_query_prompts_for_email_without_chat_call() {
        let server = MockServer::start().await;
        Mock::given(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut controller = http_controller(&server);
        let outcome = controller.submit_question("Check my license status").await;

        assert_eq!(outcome, SubmitOutcome::EmailRequested);
        assert!(controller.awaiting_email());
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(
            controller.transcript().last(),
            Some(&Message::user("Check my license status"))
        );
    }

    #[tokio::test]
    async fn test_question_answered_with_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat"))
            .and(query_param("q", "What is offside?"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "A player is in an offside position if...",
                "sources": ["ifab.com/laws"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut controller = http_controller(&server);
        let outcome = controller.submit_question("  What is offside?  ").await;

        assert_eq!(outcome, SubmitOutcome::Answered);
        assert!(!controller.is_loading());
        assert_eq!(controller.transcript().len(), 2);
        match controller.transcript().last() {
            Some(Message::Chat(chat)) => {
                assert_eq!(chat.role, Role::Assistant);
                assert_eq!(chat.sources, vec!["ifab.com/laws"]);
                let links: Vec<_> = crate::source::parse_all(&chat.sources)
                    .into_iter()
                    .filter(|s| s.is_link())
                    .collect();
                assert_eq!(links.len(), 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_failure_appends_fixed_error() {
        let server = MockServer::start().await;
        Mock::given(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "LLM down"})),
            )
            .mount(&server)
            .await;

        let mut controller = http_controller(&server);
        let outcome = controller.submit_question("What is a DOGSO?").await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(!controller.is_loading());
        let last = controller.transcript().last().unwrap();
        assert_eq!(text_of(last), CHAT_ERROR_MESSAGE);
        assert!(!text_of(last).contains("LLM down"));
    }

    #[tokio::test]
    async fn test_license_failure_includes_server_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/license-status"))
            .and(query_param("email", "pat@example.com"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "No account found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut controller = http_controller(&server);
        controller.submit_question("check my certification").await;
        let outcome = controller.submit_license_email(" pat@example.com ").await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(!controller.awaiting_email());
        assert!(!controller.is_license_loading());

        let messages = controller.transcript().as_slice();
        assert_eq!(messages.len(), 3);
        assert_eq!(text_of(&messages[1]), "Look up licenses for: pat@example.com");
        assert!(text_of(&messages[2]).contains("No account found"));
    }

    #[tokio::test]
    async fn test_license_failure_without_detail_uses_fallback() {
        let api = recording(None);
        let mut controller = ChatController::new(api.clone());

        controller.submit_question("ussf").await;
        controller.submit_license_email("pat@example.com").await;

        let last = controller.transcript().last().unwrap();
        assert_eq!(
            text_of(last),
            "Sorry, I couldn't find license information: Failed to look up license"
        );
        assert_eq!(*api.emails.lock().unwrap(), vec!["pat@example.com"]);
    }

    #[tokio::test]
    async fn test_license_success_appends_license_message() {
        let server = MockServer::start().await;
        Mock::given(path("/api/license-status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "full_name": "Pat Doe",
                "licenses": {"coach": [{"name": "D License", "status": "expired"}]}
            })))
            .mount(&server)
            .await;

        let mut controller = http_controller(&server);
        controller.submit_question("look up my credentials").await;
        let outcome = controller.submit_license_email("pat@example.com").await;

        assert_eq!(outcome, SubmitOutcome::Answered);
        match controller.transcript().last() {
            Some(Message::License(msg)) => assert_eq!(msg.report.full_name, "Pat Doe"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let api = recording(Some("unused"));
        let mut controller = ChatController::new(api.clone());

        assert_eq!(controller.submit_question("   ").await, SubmitOutcome::Ignored);
        assert_eq!(controller.submit_license_email("").await, SubmitOutcome::Ignored);
        assert!(controller.transcript().is_empty());
        assert!(api.questions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_questions_blocked_while_email_prompt_open() {
        let api = recording(Some("unused"));
        let mut controller = ChatController::new(api.clone());

        controller.submit_question("What's my status?").await;
        assert_eq!(
            controller.submit_question("What is offside?").await,
            SubmitOutcome::Ignored
        );
        assert_eq!(controller.transcript().len(), 1);

        controller.cancel_license_lookup();
        assert!(!controller.awaiting_email());
        assert_eq!(controller.transcript().len(), 1, "cancel adds no message");

        assert_eq!(
            controller.submit_question("What is offside?").await,
            SubmitOutcome::Answered
        );
        assert_eq!(*api.questions.lock().unwrap(), vec!["What is offside?"]);
    }

    #[test]
    fn test_second_question_ignored_while_loading() {
        let mut controller = ChatController::new(recording(None));

        assert_eq!(
            controller.begin_question("What is a foul?"),
            QuestionStep::Ask("What is a foul?".to_string())
        );
        assert!(controller.is_loading());
        assert!(!controller.accepts_questions());

        assert_eq!(
            controller.begin_question("And a misconduct?"),
            QuestionStep::Done(SubmitOutcome::Ignored)
        );
        assert_eq!(controller.transcript().len(), 1);

        controller.finish_question(Err(unavailable()));
        assert!(!controller.is_loading());
        assert!(controller.accepts_questions());
    }

    #[test]
    fn test_history_grows_one_per_submission_and_response() {
        let mut controller = ChatController::new(recording(None));
        let questions = ["What is offside?", "Who pays referees?", "status"];

        for (i, q) in questions.iter().enumerate() {
            let before = controller.transcript().len();
            let step = controller.begin_question(q);
            assert_eq!(controller.transcript().len(), before + 1, "question {i}");
            if matches!(step, QuestionStep::Ask(_)) {
                controller.finish_question(Ok(ChatAnswer {
                    answer: "ok".to_string(),
                    sources: Vec::new(),
                }));
                assert_eq!(controller.transcript().len(), before + 2);
            }
        }
    }

    #[tokio::test]
    async fn test_feedback_empty_description_issues_no_post() {
        let server = MockServer::start().await;
        Mock::given(path("/api/feedback"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let controller = http_controller(&server);
        let mut form = FeedbackForm::new("Sam", "   ");

        assert!(!form.can_submit());
        assert_eq!(
            controller.submit_feedback(&mut form).await,
            FeedbackOutcome::Ignored
        );
    }

    #[tokio::test]
    async fn test_feedback_failure_keeps_form_open() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/feedback"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let controller = http_controller(&server);
        let mut form = FeedbackForm::new("", "Answers are slow");

        assert!(matches!(
            controller.submit_feedback(&mut form).await,
            FeedbackOutcome::Failed(_)
        ));
        assert!(!form.is_submitted());
        assert!(form.can_submit());
        assert_eq!(form.description, "Answers are slow");

        // retry is allowed
        assert!(matches!(
            controller.submit_feedback(&mut form).await,
            FeedbackOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_feedback_does_not_touch_transcript() {
        let api = recording(None);
        let controller = ChatController::new(api.clone());
        let mut form = FeedbackForm::new("Sam", "Love it");

        assert_eq!(controller.submit_feedback(&mut form).await, FeedbackOutcome::Sent);
        assert!(form.is_submitted());
        assert!(controller.transcript().is_empty());
        assert_eq!(
            api.feedback.lock().unwrap()[0],
            FeedbackSubmission {
                name: Some("Sam".to_string()),
                description: "Love it".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_splash_roundtrip_through_controller() {
        let controller = ChatController::new(recording(None));
        let store = MemoryStateStore::new();

        // fetch fails in the recording api
        assert_eq!(controller.load_splash(&store).await, None);
        controller.dismiss_splash(&store).unwrap();
        assert!(splash::is_dismissed(&store));
    }
}
