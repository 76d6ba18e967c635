use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use snapfeed_shared::profile::{FollowList, ProfileState, ProfileTarget, ProfileViewer};
use snapfeed_shared::User;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::auth::RequireAuth;
use crate::cell::SignalCell;

/// `/profile` — the logged-in user.
#[component]
pub fn MyProfile() -> impl IntoView {
    view! {
        <RequireAuth>
            <ProfileView target=ProfileTarget::Me />
        </RequireAuth>
    }
}

/// `/profile/:id`
#[component]
pub fn UserProfile() -> impl IntoView {
    let params = use_params_map();
    let user_id = Memo::new(move |_| params.get().get("id").unwrap_or_default());

    move || {
        let id = user_id.get();
        if id.is_empty() {
            view! { <div>"User ID is required"</div> }.into_any()
        } else {
            view! { <ProfileView target=ProfileTarget::User(id) /> }.into_any()
        }
    }
}

#[component]
fn ProfileView(target: ProfileTarget) -> impl IntoView {
    let state = RwSignal::new(ProfileState::default());
    let viewer = ProfileViewer::new(HttpApi::from_document(), SignalCell(state));

    {
        let viewer = viewer.clone();
        spawn_local(async move {
            let _ = viewer.load(&target).await;
        });
    }

    let open = {
        let viewer = viewer.clone();
        Callback::new(move |list: FollowList| {
            let viewer = viewer.clone();
            spawn_local(async move {
                let _ = viewer.open(list).await;
            });
        })
    };
    let close = Callback::new(move |_: ()| viewer.close());

    move || {
        // An error replaces the whole page until a later fetch succeeds
        if let Some(err) = state.with(|s| s.error.clone()) {
            return view! { <div class="snapfeed-error">{format!("Error: {err}")}</div> }.into_any();
        }
        let Some(profile) = state.with(|s| s.profile.clone()) else {
            return view! { <div class="snapfeed-loading">"Loading..."</div> }.into_any();
        };
        let posts = state.with(|s| s.posts.clone());
        let post_count = posts.len();

        view! {
            <section class="snapfeed-profile">
                <div class="snapfeed-profile-header">
                    <img
                        src=profile.profile_picture_url.clone().unwrap_or_default()
                        alt=profile.username.clone()
                        class="snapfeed-avatar-lg"
                    />
                    <h1>{profile.username.clone()}</h1>
                    <p>{profile.bio.clone().unwrap_or_default()}</p>
                    <div class="snapfeed-profile-stats">
                        <p>
                            <strong>"Posts"</strong>
                            <strong>{post_count}</strong>
                        </p>
                        <p class="snapfeed-clickable" on:click=move |_: MouseEvent| open.run(FollowList::Followers)>
                            <strong>"Followers"</strong>
                            <strong>{profile.total_followers}</strong>
                        </p>
                        <p class="snapfeed-clickable" on:click=move |_: MouseEvent| open.run(FollowList::Following)>
                            <strong>"Following"</strong>
                            <strong>{profile.total_following}</strong>
                        </p>
                    </div>
                </div>
                <div class="snapfeed-post-grid">
                    {posts
                        .into_iter()
                        .map(|p| {
                            view! {
                                <a href=format!("/post/{}", p.id)>
                                    <img
                                        class="snapfeed-grid-image"
                                        src=p.image_url.unwrap_or_default()
                                        alt=p.caption
                                    />
                                </a>
                            }
                        })
                        .collect_view()}
                </div>
                {move || {
                    state
                        .with(|s| s.open.zip(s.open_users().map(<[User]>::to_vec)))
                        .map(|(list, users)| view! { <FollowPopup list=list users=users on_close=close /> })
                }}
            </section>
        }
        .into_any()
    }
}

#[component]
fn FollowPopup(list: FollowList, users: Vec<User>, on_close: Callback<()>) -> impl IntoView {
    let title = match list {
        FollowList::Followers => "Followers",
        FollowList::Following => "Following",
    };

    view! {
        <div class="snapfeed-popup-backdrop">
            <div class="snapfeed-popup">
                <h2>{title}</h2>
                <ul>
                    {users
                        .into_iter()
                        .map(|u| {
                            view! {
                                <li>
                                    <a href=format!("/profile/{}", u.id)>
                                        <img
                                            src=u.profile_picture_url.unwrap_or_default()
                                            alt=u.username.clone()
                                            class="snapfeed-avatar"
                                            width="32"
                                            height="32"
                                        />
                                        <span>{u.username}</span>
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <button class="snapfeed-btn" on:click=move |_| on_close.run(())>"Close"</button>
            </div>
        </div>
    }
}
