use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::auth::{self, AuthForm, AuthMode, AuthSuccess};

use super::{
    notification::{Notice, NotificationBanner},
    use_redraw, AppContext,
};

#[derive(Properties, PartialEq)]
pub struct AuthScreenProps {
    /// Receives the access token after a successful login.
    pub on_authenticated: Callback<String>,
}

const INPUT_CLASS: &str = "w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary";

#[function_component(AuthScreen)]
pub fn auth_screen(props: &AuthScreenProps) -> Html {
    let ctx = use_context::<AppContext>().expect("app context not found");
    let form = use_mut_ref(AuthForm::new);
    let redraw = use_redraw();

    let on_field = |apply: fn(&mut AuthForm, String)| {
        let form = form.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            apply(&mut form.borrow_mut(), input.value());
            redraw.emit(());
        })
    };
    let on_email = on_field(|form, value| form.email = value);
    let on_password = on_field(|form, value| form.password = value);
    let on_confirm = on_field(|form, value| form.confirm_password = value);

    let on_submit = {
        let form = form.clone();
        let redraw = redraw.clone();
        let client = ctx.client.clone();
        let on_authenticated = props.on_authenticated.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let credentials = form.borrow_mut().begin_submit();
            redraw.emit(());
            let Some(credentials) = credentials else {
                return;
            };

            let form = form.clone();
            let redraw = redraw.clone();
            let client = client.clone();
            let on_authenticated = on_authenticated.clone();
            spawn_local(async move {
                let result = auth::submit(&client, &credentials).await;
                form.borrow_mut().finish_submit(&result);
                redraw.emit(());

                if let Ok(AuthSuccess::LoggedIn(token)) = result {
                    on_authenticated.emit(token);
                }
            });
        })
    };

    let toggle_mode = {
        let form = form.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            form.borrow_mut().toggle_mode();
            redraw.emit(());
        })
    };

    let state = form.borrow();
    let is_login = state.mode == AuthMode::Login;
    let notice = state
        .error()
        .map(Notice::error)
        .or_else(|| state.notice().map(Notice::success));

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{ if is_login { "Welcome back" } else { "Create account" } }</h1>
                    <p class="text-sm text-muted-foreground mt-2">
                        { if is_login { "Sign in to manage your invoices." } else { "Register to start uploading invoices." } }
                    </p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Email"}</label>
                        <input type="email" autocomplete="email" class={INPUT_CLASS} value={state.email.clone()} oninput={on_email} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Password"}</label>
                        <input type="password" class={INPUT_CLASS} value={state.password.clone()} oninput={on_password} />
                    </div>

                    if !is_login {
                        <div class="space-y-1">
                            <label class="text-sm font-medium text-foreground">{"Confirm Password"}</label>
                            <input type="password" class={INPUT_CLASS} value={state.confirm_password.clone()} oninput={on_confirm} />
                        </div>
                    }

                    <NotificationBanner notice={notice} />

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={state.is_pending()}
                    >
                        { if state.is_pending() { "Please wait..." } else if is_login { "Login" } else { "Sign up" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    { if is_login { "No account?" } else { "Already have an account?" } }
                    <button class="ml-2 text-primary font-semibold" onclick={toggle_mode}>
                        { if is_login { "Sign up" } else { "Login" } }
                    </button>
                </div>
            </div>
        </div>
    }
}
