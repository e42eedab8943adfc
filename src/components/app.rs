use std::rc::Rc;

use log::{info, warn};
use yew::{
    context::ContextProvider, function_component, html, use_memo, use_mut_ref, use_state, Callback,
    Html, Properties,
};

use crate::{
    api::ApiClient,
    config::AppConfig,
    navigation::{Route, Tab, AFTER_LOGIN},
    session::SessionStore,
    transport::BrowserTransport,
};

use super::{auth_screen::AuthScreen, dashboard::Dashboard, AppContext};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

/// Owns the session and decides which screen is shown.
#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let session = use_mut_ref(|| SessionStore::from_config(&props.config));
    let requested = use_state(|| Route::Dashboard(Tab::default()));

    let reader = session.borrow().reader();
    let client = use_memo(
        move |config| {
            ApiClient::new(
                config.api_base_url.clone(),
                reader,
                Rc::new(BrowserTransport),
            )
        },
        props.config.clone(),
    );

    let on_authenticated = {
        let session = session.clone();
        let requested = requested.clone();
        Callback::from(move |token: String| {
            session.borrow_mut().login(token);
            requested.set(AFTER_LOGIN);
        })
    };

    let on_logout = {
        let session = session.clone();
        let requested = requested.clone();
        Callback::from(move |_| {
            session.borrow_mut().logout();
            info!("signed out");
            requested.set(Route::Login);
        })
    };

    let on_unauthorized = {
        let on_logout = on_logout.clone();
        Callback::from(move |_| {
            warn!("session rejected by the server");
            on_logout.emit(());
        })
    };

    let on_navigate = {
        let requested = requested.clone();
        Callback::from(move |tab: Tab| requested.set(Route::Dashboard(tab)))
    };

    let context = AppContext {
        client: (*client).clone(),
        config: props.config.clone(),
        on_unauthorized,
    };

    let route = requested.resolve(session.borrow().is_authenticated());
    let content = match route {
        Route::Login => html! { <AuthScreen on_authenticated={on_authenticated} /> },
        Route::Dashboard(tab) => html! {
            <Dashboard tab={tab} on_navigate={on_navigate} on_logout={on_logout} />
        },
    };

    html! {
        <ContextProvider<AppContext> context={context}>
            { content }
        </ContextProvider<AppContext>>
    }
}
