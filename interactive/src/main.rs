mod api;
mod auth;
mod cell;
mod feed;
mod post;
mod profile;

use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use snapfeed_shared::feed::FeedSource;
use wasm_bindgen::JsCast;

use crate::auth::{AuthProvider, AuthState, LoginPage, RequireAuth};
use crate::feed::FeedPage;
use crate::post::PostPage;
use crate::profile::{MyProfile, UserProfile};

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let document = web_sys::window()
        .expect("no window")
        .document()
        .expect("no document");

    // Mount the app if the mount point exists
    if let Some(el) = document.get_element_by_id("snapfeed") {
        let html_el: web_sys::HtmlElement = el.unchecked_into();
        leptos::mount::mount_to(html_el, App).forget();
    }
}

#[component]
fn App() -> impl IntoView {
    view! {
        <AuthProvider>
            <Router>
                <div class="snapfeed-layout">
                    <Sidebar />
                    <main class="snapfeed-main">
                        <Routes fallback=|| view! { <p>"Page not found."</p> }>
                            <Route path=path!("/") view=HomePage />
                            <Route path=path!("/explore") view=ExplorePage />
                            <Route path=path!("/login") view=LoginPage />
                            <Route path=path!("/profile") view=MyProfile />
                            <Route path=path!("/profile/:id") view=UserProfile />
                            <Route path=path!("/post/:id") view=PostPage />
                        </Routes>
                    </main>
                </div>
            </Router>
        </AuthProvider>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <RequireAuth>
            <FeedPage source=FeedSource::home() />
        </RequireAuth>
    }
}

#[component]
fn ExplorePage() -> impl IntoView {
    view! {
        <RequireAuth>
            <FeedPage source=FeedSource::Explore />
        </RequireAuth>
    }
}

#[component]
fn Sidebar() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let on_logout = move |_: MouseEvent| auth.logout();

    view! {
        <aside class="snapfeed-sidebar">
            <h2>"Snap" <span class="snapfeed-accent">"Feed"</span></h2>
            <nav>
                <ul>
                    <li><a href="/">"Home"</a></li>
                    <li><a href="/explore">"Explore"</a></li>
                    <li><a href="/profile">"Profile"</a></li>
                </ul>
            </nav>
            <Show when=move || auth.token.get().is_some()>
                <div class="snapfeed-auth">
                    <span class="snapfeed-username">
                        {move || auth.user.get().map(|u| u.username).unwrap_or_default()}
                    </span>
                    <button class="snapfeed-btn snapfeed-btn-sm" on:click=on_logout>"Logout"</button>
                </div>
            </Show>
        </aside>
    }
}
