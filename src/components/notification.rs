use yew::{function_component, html, Callback, Html, Properties};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message shown above a form or table until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct NotificationBannerProps {
    pub notice: Option<Notice>,
    #[prop_or_default]
    pub on_dismiss: Option<Callback<()>>,
}

#[function_component(NotificationBanner)]
pub fn notification_banner(props: &NotificationBannerProps) -> Html {
    let Some(notice) = &props.notice else {
        return html! {};
    };

    let class = match notice.kind {
        NoticeKind::Success => "flex items-start justify-between gap-4 rounded-xl border border-green-200 bg-green-50 px-4 py-3 text-sm text-green-800",
        NoticeKind::Error => "flex items-start justify-between gap-4 rounded-xl border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700",
    };

    html! {
        <div class={class} role="alert">
            <span>{ notice.message.clone() }</span>
            if let Some(on_dismiss) = props.on_dismiss.clone() {
                <button
                    class="font-bold opacity-60 hover:opacity-100"
                    aria-label="Dismiss"
                    onclick={Callback::from(move |_| on_dismiss.emit(()))}
                >
                    {"×"}
                </button>
            }
        </div>
    }
}
