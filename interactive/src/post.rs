use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use snapfeed_shared::detail::{PostDetailState, PostDetailViewer};
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::cell::SignalCell;

/// `/post/:id` — one post and its comments, read-only.
#[component]
pub fn PostPage() -> impl IntoView {
    let params = use_params_map();
    let post_id = Memo::new(move |_| params.get().get("id").unwrap_or_default());
    let state = RwSignal::new(PostDetailState {
        loading: true,
        ..Default::default()
    });
    let viewer = PostDetailViewer::new(HttpApi::from_document(), SignalCell(state));

    Effect::new(move |_| {
        let id = post_id.get();
        let viewer = viewer.clone();
        spawn_local(async move {
            let _ = viewer.load(&id).await;
        });
    });

    move || {
        let current = state.get();
        if let Some(err) = current.error {
            return view! { <div class="snapfeed-error">{err}</div> }.into_any();
        }
        let Some(detail) = current.post else {
            let text = if current.loading { "Loading..." } else { "Post not found." };
            return view! { <div class="snapfeed-loading">{text}</div> }.into_any();
        };
        let post = detail.post;

        view! {
            <article class="snapfeed-post-detail">
                {post.image_url.map(|url| view! {
                    <img class="snapfeed-detail-image" src=url alt=post.caption.clone() />
                })}
                {post.user.map(|u| view! {
                    <a class="snapfeed-author" href=format!("/profile/{}", u.id)>
                        <img
                            src=u.profile_picture_url.unwrap_or_default()
                            alt=u.username.clone()
                            class="snapfeed-avatar"
                            width="40"
                            height="40"
                        />
                        <strong>{u.username}</strong>
                    </a>
                })}
                <p>{post.caption}</p>
                <h3>"Comments:"</h3>
                <ul class="snapfeed-comment-list">
                    {detail
                        .comments
                        .into_iter()
                        .map(|c| {
                            view! {
                                <li class="snapfeed-comment">
                                    <img
                                        src=c.user.profile_picture_url.unwrap_or_default()
                                        alt=c.user.username.clone()
                                        class="snapfeed-avatar"
                                        width="32"
                                        height="32"
                                    />
                                    <span>
                                        <strong>{c.user.username}</strong>
                                        {format!(": {}", c.content)}
                                    </span>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </article>
        }
        .into_any()
    }
}
