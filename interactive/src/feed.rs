use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use snapfeed_shared::feed::{FeedSource, FeedState, FeedSynchronizer, PostView};
use snapfeed_shared::Comment;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::cell::SignalCell;

type Feed = FeedSynchronizer<HttpApi, SignalCell<FeedState>>;

/// Home or explore feed, depending on `source`.
#[component]
pub fn FeedPage(source: FeedSource) -> impl IntoView {
    let state = RwSignal::new(FeedState::default());
    let feed = FeedSynchronizer::new(HttpApi::from_document(), source, SignalCell(state));

    // Fetch posts on mount
    {
        let feed = feed.clone();
        spawn_local(async move {
            let _ = feed.load().await;
        });
    }

    view! {
        <section class="snapfeed-feed">
            <h1>{source.title()}</h1>
            <Show when=move || state.with(|s| s.error().is_some())>
                <p class="snapfeed-error">
                    {move || state.with(|s| s.error().unwrap_or_default().to_string())}
                </p>
            </Show>
            <Show when=move || state.with(FeedState::is_loading)>
                <p class="snapfeed-loading">"Loading posts..."</p>
            </Show>
            <div class="snapfeed-post-list">
                <For
                    each=move || state.with(|s| s.posts().iter().map(|p| p.id.clone()).collect::<Vec<_>>())
                    key=|id| id.clone()
                    let:post_id
                >
                    <PostCard post_id=post_id state=state feed=feed.clone() />
                </For>
            </div>
        </section>
    }
}

#[component]
fn PostCard(post_id: String, state: RwSignal<FeedState>, feed: Feed) -> impl IntoView {
    let post = {
        let id = post_id.clone();
        Memo::new(move |_| state.with(|s| s.post(&id).cloned()))
    };
    let field = move |f: fn(&PostView) -> bool| post.with(|p| p.as_ref().map(f).unwrap_or(false));
    let liked = move || field(|p| p.is_liked);
    let input_open = move || field(|p| p.show_comment_input);

    let on_like = {
        let feed = feed.clone();
        let id = post_id.clone();
        move |_: MouseEvent| {
            let was_liked = post.with_untracked(|p| p.as_ref().is_some_and(|p| p.is_liked));
            let feed = feed.clone();
            let id = id.clone();
            spawn_local(async move {
                let _ = if was_liked {
                    feed.unlike(&id).await
                } else {
                    feed.like(&id).await
                };
            });
        }
    };

    let on_toggle = {
        let feed = feed.clone();
        let id = post_id.clone();
        move |_: MouseEvent| feed.toggle_comment_input(&id)
    };

    let draft = {
        let id = post_id.clone();
        move || state.with(|s| s.draft(&id).to_string())
    };

    let on_submit = {
        let feed = feed.clone();
        let id = post_id.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            let feed = feed.clone();
            let id = id.clone();
            spawn_local(async move {
                let _ = feed.submit_draft(&id).await;
            });
        }
    };

    let comment_form = {
        let feed = feed.clone();
        let id = post_id.clone();
        move || {
            input_open().then(|| {
                let feed = feed.clone();
                let id = id.clone();
                view! {
                    <form class="snapfeed-comment-form" on:submit=on_submit.clone()>
                        <input
                            class="snapfeed-input"
                            type="text"
                            placeholder="Write a comment..."
                            prop:value=draft.clone()
                            on:input=move |ev| feed.set_draft(&id, event_target_value(&ev))
                        />
                        <button class="snapfeed-btn" type="submit">"Submit"</button>
                    </form>
                }
            })
        }
    };

    let header = move || {
        post.get().map(|p| {
            let link = format!("/post/{}", p.id);
            view! {
                {p.image_url.clone().map(|url| view! {
                    <a href=link.clone()>
                        <img class="snapfeed-post-image" src=url alt=p.caption.clone() />
                    </a>
                })}
                <h2 class="snapfeed-caption">{p.caption.clone()}</h2>
                {p.user.clone().map(|u| view! {
                    <a class="snapfeed-author" href=format!("/profile/{}", u.id)>
                        <img
                            src=u.profile_picture_url.unwrap_or_default()
                            alt=u.username.clone()
                            class="snapfeed-avatar"
                            width="32"
                            height="32"
                        />
                        <span>{u.username}</span>
                    </a>
                })}
            }
        })
    };

    view! {
        <article class="snapfeed-card">
            {header}
            <p class="snapfeed-likes">
                <span>"Total Likes: "</span>
                {move || post.with(|p| p.as_ref().map(|p| p.total_likes).unwrap_or_default())}
            </p>
            <div class="snapfeed-actions">
                <button class="snapfeed-like" class:liked=liked on:click=on_like>
                    {move || if liked() { "\u{2665}" } else { "\u{2661}" }}
                </button>
                <button class="snapfeed-comment-toggle" on:click=on_toggle>"Comment"</button>
            </div>
            {comment_form}
            <div class="snapfeed-comment-list">
                <For
                    each=move || post.with(|p| p.as_ref().map(|p| p.comments.clone()).unwrap_or_default())
                    key=|c| c.id.clone()
                    let:comment
                >
                    <CommentRow comment=comment feed=feed.clone() />
                </For>
            </div>
        </article>
    }
}

#[component]
fn CommentRow(comment: Comment, feed: Feed) -> impl IntoView {
    let comment_id = comment.id.clone();
    let on_delete = move |_: MouseEvent| {
        let feed = feed.clone();
        let id = comment_id.clone();
        spawn_local(async move {
            let _ = feed.delete_comment(&id).await;
        });
    };

    view! {
        <div class="snapfeed-comment">
            <strong>{format!("{}:", comment.user.username)}</strong>
            " "
            <span>{comment.content}</span>
            <button class="snapfeed-btn-sm snapfeed-btn-danger" on:click=on_delete>"Delete"</button>
        </div>
    }
}
