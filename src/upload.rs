//! Submitting one invoice file for extraction.
//!
//! [UploadWorkflow] holds the staged file and category and enforces the
//! submission rules. [UploadController] pairs it with an [ApiClient] to
//! perform the actual request.

use std::{cell::RefCell, fmt, future::Future, rc::Rc};

use log::{info, warn};
use serde::Deserialize;

use crate::{
    api::{ApiClient, MultipartForm, Payload},
    error::{ApiError, Failure},
    expense::{Amount, Category},
};

pub const UPLOAD_PATH: &str = "/api/invoice/upload";

/// A file picked by the user, read into memory.
#[derive(Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What the backend reports after processing an invoice.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub expense_id: Option<i64>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Why a submission was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    NothingStaged,
    AlreadySubmitting,
}

/// The result of calling [UploadController::submit].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing was sent.
    Refused(Refusal),
    Completed(UploadReceipt),
    Failed(Failure),
}

/// A file sent to the backend, remembered until the response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    selection: u64,
}

/// The staged file and category for one upload form.
#[derive(Debug, Default)]
pub struct UploadWorkflow {
    staged: Option<UploadFile>,
    category: Category,
    submitting: bool,
    // Bumped on every file selection so a late success does not clear a
    // file picked while the previous one was uploading.
    selection: u64,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the staged file.
    pub fn select_file(&mut self, file: UploadFile) {
        self.staged = Some(file);
        self.selection += 1;
    }

    pub fn select_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn staged_file(&self) -> Option<&UploadFile> {
        self.staged.as_ref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether [UploadWorkflow::begin_submit] would send anything right now.
    pub fn can_submit(&self) -> bool {
        self.staged.is_some() && !self.submitting
    }

    /// Mark a submission as in flight and build its request body.
    ///
    /// # Errors
    /// Returns the [Refusal] when no file is staged or another submission is
    /// still in flight. The workflow is left unchanged in that case.
    pub fn begin_submit(&mut self) -> Result<(SubmissionTicket, MultipartForm), Refusal> {
        if self.submitting {
            return Err(Refusal::AlreadySubmitting);
        }

        let file = self.staged.clone().ok_or(Refusal::NothingStaged)?;
        self.submitting = true;

        let form = MultipartForm::default()
            .file("file", file)
            .text("category", self.category.wire_value());

        Ok((
            SubmissionTicket {
                selection: self.selection,
            },
            form,
        ))
    }

    /// Record the backend's answer to the submission `ticket` was issued for.
    ///
    /// Success clears the staged file unless a different file has been
    /// selected since. Failure keeps the file so it can be resubmitted.
    pub fn finish_submit(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<UploadReceipt, ApiError>,
    ) -> SubmitOutcome {
        self.submitting = false;

        match result {
            Ok(receipt) => {
                if ticket.selection == self.selection {
                    self.staged = None;
                }
                SubmitOutcome::Completed(receipt)
            }
            Err(error) => SubmitOutcome::Failed(Failure::Upload(error)),
        }
    }
}

/// Runs submissions for one upload form.
#[derive(Clone)]
pub struct UploadController {
    workflow: Rc<RefCell<UploadWorkflow>>,
    client: ApiClient,
}

impl UploadController {
    pub fn new(client: ApiClient) -> Self {
        Self {
            workflow: Rc::new(RefCell::new(UploadWorkflow::new())),
            client,
        }
    }

    pub fn select_file(&self, file: UploadFile) {
        info!("staged {} ({} bytes)", file.name, file.bytes.len());
        self.workflow.borrow_mut().select_file(file);
    }

    pub fn select_category(&self, category: Category) {
        self.workflow.borrow_mut().select_category(category);
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&UploadWorkflow) -> R) -> R {
        f(&self.workflow.borrow())
    }

    /// Send the staged file, unless there is none or a submission is in flight.
    ///
    /// The submission is marked in flight before this returns, the returned
    /// future sends it.
    pub fn submit(&self) -> impl Future<Output = SubmitOutcome> + 'static {
        let started = self.workflow.borrow_mut().begin_submit();
        let controller = self.clone();

        async move {
            let (ticket, form) = match started {
                Ok(started) => started,
                Err(refusal) => return SubmitOutcome::Refused(refusal),
            };

            let result = controller
                .client
                .post::<UploadReceipt>(UPLOAD_PATH, Payload::Multipart(form))
                .await;

            let outcome = controller
                .workflow
                .borrow_mut()
                .finish_submit(ticket, result);
            match &outcome {
                SubmitOutcome::Completed(receipt) => {
                    info!("invoice processed, expense id {:?}", receipt.expense_id)
                }
                SubmitOutcome::Failed(failure) => {
                    warn!("invoice upload failed: {}", failure.error())
                }
                SubmitOutcome::Refused(_) => {}
            }

            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use serde_json::json;

    use crate::{
        api::{Method, RequestBody},
        error::{ApiError, Failure},
        expense::Category,
        session::SessionStore,
        test_utils::{client_with, GatedTransport, ScriptedTransport},
    };

    use super::{
        Refusal, SubmitOutcome, UploadController, UploadFile, UploadWorkflow, UPLOAD_PATH,
    };

    fn pdf(name: &str) -> UploadFile {
        UploadFile::new(name, "application/pdf", b"%PDF-1.7".to_vec())
    }

    fn receipt_json() -> serde_json::Value {
        json!({
            "status": "success",
            "expense_id": 12,
            "business_name": "Office Depot",
            "amount": 117.0,
            "date": "2024-05-02"
        })
    }

    #[test]
    fn default_category_is_other() {
        assert_eq!(UploadWorkflow::new().category(), Category::Other);
    }

    #[test]
    fn selecting_replaces_staged_file() {
        let mut workflow = UploadWorkflow::new();

        workflow.select_file(pdf("first.pdf"));
        workflow.select_file(pdf("second.pdf"));

        assert_eq!(
            workflow.staged_file().map(|file| file.name.as_str()),
            Some("second.pdf")
        );
    }

    #[tokio::test]
    async fn submit_without_file_sends_nothing() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = SessionStore::ephemeral();
        let controller = UploadController::new(client_with(transport.clone(), &session));

        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Refused(Refusal::NothingStaged));
        assert!(transport.requests().is_empty());
        assert!(controller.with_state(|state| state.staged_file().is_none()));
        assert!(!controller.with_state(UploadWorkflow::is_submitting));
    }

    #[tokio::test]
    async fn successful_submit_sends_file_and_category_then_clears_file() {
        let transport = Rc::new(ScriptedTransport::default());
        transport.respond(200, receipt_json());
        let mut session = SessionStore::ephemeral();
        session.login("token");
        let controller = UploadController::new(client_with(transport.clone(), &session));
        controller.select_file(pdf("invoice.pdf"));
        controller.select_category(Category::It);

        let outcome = controller.submit().await;

        let receipt = match outcome {
            SubmitOutcome::Completed(receipt) => receipt,
            other => panic!("expected completion, got {other:?}"),
        };
        assert_eq!(receipt.expense_id, Some(12));
        assert!(controller.with_state(|state| state.staged_file().is_none()));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert!(requests[0].url.ends_with(UPLOAD_PATH));
        assert_eq!(requests[0].bearer.as_deref(), Some("token"));
        let RequestBody::Multipart(form) = &requests[0].body else {
            panic!("expected a multipart body, got {:?}", requests[0].body);
        };
        assert_eq!(form.files, vec![("file".to_owned(), pdf("invoice.pdf"))]);
        assert_eq!(form.fields, vec![("category".to_owned(), "IT".to_owned())]);
    }

    #[tokio::test]
    async fn failed_submit_keeps_file_for_retry() {
        let transport = Rc::new(ScriptedTransport::default());
        transport.respond(400, json!({"detail": "Invalid file type"}));
        transport.respond(200, receipt_json());
        let session = SessionStore::ephemeral();
        let controller = UploadController::new(client_with(transport.clone(), &session));
        controller.select_file(pdf("invoice.pdf"));

        let first = controller.submit().await;

        assert_eq!(
            first,
            SubmitOutcome::Failed(Failure::Upload(ApiError::Backend {
                status: 400,
                detail: "Invalid file type".to_owned()
            }))
        );
        assert_eq!(
            controller.with_state(|state| state.staged_file().cloned()),
            Some(pdf("invoice.pdf"))
        );

        let retry = controller.submit().await;

        assert!(
            matches!(retry, SubmitOutcome::Completed(_)),
            "got {retry:?}"
        );
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0].body, requests[1].body,
            "retry must resend the same file"
        );
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_refused() {
        let transport = Rc::new(GatedTransport::default());
        let session = SessionStore::ephemeral();
        let controller = UploadController::new(client_with(transport.clone(), &session));
        controller.select_file(pdf("invoice.pdf"));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let first = tokio::task::spawn_local({
                    let controller = controller.clone();
                    async move { controller.submit().await }
                });
                transport.wait_for_requests(1).await;

                assert!(controller.with_state(UploadWorkflow::is_submitting));
                assert_eq!(
                    controller.submit().await,
                    SubmitOutcome::Refused(Refusal::AlreadySubmitting)
                );

                transport.release(0, 200, receipt_json());
                let outcome = first.await.unwrap();

                assert!(
                    matches!(outcome, SubmitOutcome::Completed(_)),
                    "got {outcome:?}"
                );
                assert_eq!(transport.request_count(), 1);
                assert!(!controller.with_state(UploadWorkflow::is_submitting));
            })
            .await;
    }

    #[test]
    fn success_does_not_clear_file_selected_during_upload() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf("first.pdf"));
        let (ticket, _) = workflow.begin_submit().unwrap();

        workflow.select_file(pdf("second.pdf"));
        let outcome =
            workflow.finish_submit(ticket, Ok(serde_json::from_value(receipt_json()).unwrap()));

        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert_eq!(
            workflow.staged_file().map(|file| file.name.as_str()),
            Some("second.pdf")
        );
    }
}
