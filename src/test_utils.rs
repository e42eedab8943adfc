//! In-memory transports and record builders shared by the unit tests.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::oneshot;

use crate::{
    api::{ApiClient, ApiRequest, ApiResponse, Transport},
    error::ApiError,
    expense::{Category, Expense},
    session::SessionStore,
};

pub(crate) const TEST_BASE_URL: &str = "http://localhost:8000";

pub(crate) fn client_with(transport: Rc<dyn Transport>, session: &SessionStore) -> ApiClient {
    ApiClient::new(TEST_BASE_URL, session.reader(), transport)
}

/// Answers requests in order from a queue of canned responses.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn respond(&self, status: u16, body: serde_json::Value) {
        self.respond_text(status, &body.to_string());
    }

    pub(crate) fn respond_text(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(ApiResponse {
            status,
            body: body.to_owned(),
        }));
    }

    pub(crate) fn fail(&self, error: ApiError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_owned())))
    }
}

/// Holds every request open until the test releases it, so responses can be
/// delivered in any order.
#[derive(Default)]
pub(crate) struct GatedTransport {
    requests: RefCell<Vec<ApiRequest>>,
    gates: RefCell<Vec<Option<oneshot::Sender<ApiResponse>>>>,
}

impl GatedTransport {
    /// Yield until at least `count` requests have been sent.
    pub(crate) async fn wait_for_requests(&self, count: usize) {
        while self.gates.borrow().len() < count {
            tokio::task::yield_now().await;
        }
    }

    /// Answer the `index`th request.
    pub(crate) fn release(&self, index: usize, status: u16, body: serde_json::Value) {
        let gate = self.gates.borrow_mut()[index]
            .take()
            .expect("request was already released");
        gate.send(ApiResponse {
            status,
            body: body.to_string(),
        })
        .expect("request future was dropped");
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for GatedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let (sender, receiver) = oneshot::channel();
        self.requests.borrow_mut().push(request);
        self.gates.borrow_mut().push(Some(sender));

        receiver
            .await
            .map_err(|_| ApiError::Network("gate closed".to_owned()))
    }
}

/// The JSON the backend sends for one expense.
pub(crate) fn expense_json(
    id: i64,
    business_name: &str,
    date: &str,
    amount: &str,
    category: Category,
) -> serde_json::Value {
    json!({
        "id": id,
        "invoice_id": id,
        "business_name": business_name,
        "amount_before_vat": amount,
        "amount_after_vat": amount,
        "transaction_date": date,
        "category": category.wire_value(),
        "invoice_number": null,
        "notes": null,
        "created_at": "2024-06-01T12:00:00Z"
    })
}

pub(crate) fn expense(
    id: i64,
    business_name: &str,
    date: &str,
    amount: &str,
    category: Category,
) -> Expense {
    serde_json::from_value(expense_json(id, business_name, date, amount, category))
        .expect("test expense should deserialize")
}
