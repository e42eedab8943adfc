//! Yew components of the dashboard.

mod app;
mod auth_screen;
mod dashboard;
mod expense_table;
mod icons;
mod invoice_upload;
mod notification;

use std::rc::Rc;

use yew::{hook, use_state, Callback};

use crate::{api::ApiClient, config::AppConfig};

pub use app::{App, AppProps};
pub use notification::{Notice, NoticeKind, NotificationBanner};

/// Shared with every component below [App].
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub client: ApiClient,
    pub config: Rc<AppConfig>,
    /// Called when the backend rejects the session token.
    pub on_unauthorized: Callback<()>,
}

/// Re-render the calling component on demand.
///
/// Components keep their state in view models behind `Rc<RefCell<_>>` and
/// call this after mutating it.
#[hook]
pub(crate) fn use_redraw() -> Callback<()> {
    let generation = use_state(|| 0_u64);

    Callback::from(move |_| generation.set(generation.wrapping_add(1)))
}
