use leptos::prelude::*;
use leptos_router::components::Redirect;
use snapfeed_shared::auth::{sign_in, sign_out, TokenStore};
use snapfeed_shared::{ApiError, Profile, SocialApi};
use wasm_bindgen_futures::spawn_local;

use crate::api::{HttpApi, LocalStorageToken};

/// Reactive auth state shared via context.
#[derive(Clone, Copy, Debug)]
pub struct AuthState {
    pub user: RwSignal<Option<Profile>>,
    pub token: RwSignal<Option<String>>,
}

impl AuthState {
    pub fn logout(&self) {
        sign_out(&LocalStorageToken);
        self.token.set(None);
        self.user.set(None);
    }
}

/// Provider component — wraps children with auth context.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let token = RwSignal::new(LocalStorageToken.token());
    let user: RwSignal<Option<Profile>> = RwSignal::new(None);

    let auth = AuthState { user, token };
    provide_context(auth);

    // Fetch the logged-in profile whenever we hold a token
    Effect::new(move |_| {
        if token.get().is_some() {
            spawn_local(async move {
                match HttpApi::from_document().get_logged_user().await {
                    Ok(u) => user.set(Some(u)),
                    Err(ApiError::Status { status: 401, .. }) => {
                        // Token rejected — drop it
                        auth.logout();
                    }
                    Err(_) => {}
                }
            });
        } else {
            user.set(None);
        }
    });

    children()
}

/// Renders children only for a logged-in user, otherwise sends them to /login.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthState>();

    move || {
        if auth.token.get().is_some() {
            children().into_any()
        } else {
            view! { <Redirect path="/login" /> }.into_any()
        }
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        submitting.set(true);
        spawn_local(async move {
            let api = HttpApi::from_document();
            let result = sign_in(
                &api,
                &LocalStorageToken,
                &email.get_untracked(),
                &password.get_untracked(),
            )
            .await;
            match result {
                Ok(resp) => {
                    error.set(None);
                    auth.user.set(resp.user);
                    auth.token.set(Some(resp.token));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            submitting.set(false);
        });
    };

    view! {
        // Already authenticated: go home
        <Show when=move || auth.token.get().is_some()>
            <Redirect path="/" />
        </Show>
        <div class="snapfeed-login">
            <h1>"Login"</h1>
            <Show when=move || error.get().is_some()>
                <p class="snapfeed-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <form on:submit=on_submit>
                <label>
                    "Email"
                    <input
                        class="snapfeed-input"
                        type="text"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        class="snapfeed-input"
                        type="password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <button class="snapfeed-btn" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Logging in..." } else { "Login" }}
                </button>
            </form>
        </div>
    }
}
