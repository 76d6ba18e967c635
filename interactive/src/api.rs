use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snapfeed_shared::auth::TokenStore;
use snapfeed_shared::{
    ApiError, CreateComment, CreatedComment, Envelope, LoginRequest, LoginResponse, PostDetail,
    PostPage, PostRef, Profile, SocialApi, User, UserList,
};
use tracing::warn;
use web_sys::window;

const TOKEN_KEY: &str = "snapfeed_token";
const DEFAULT_API_BASE: &str = "http://localhost:8080/api/v1";

fn meta_content(name: &str) -> Option<String> {
    let document = window()?.document()?;
    let el = document
        .query_selector(&format!("meta[name='{name}']"))
        .ok()
        .flatten()?;
    el.get_attribute("content").filter(|c| !c.is_empty())
}

fn encode(s: &str) -> String {
    web_sys::js_sys::encode_uri_component(s)
        .as_string()
        .unwrap_or_default()
}

/// Bearer token kept in `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageToken;

impl LocalStorageToken {
    fn storage() -> Option<web_sys::Storage> {
        window()?.local_storage().ok()?
    }
}

impl TokenStore for LocalStorageToken {
    fn token(&self) -> Option<String> {
        Self::storage()?.get_item(TOKEN_KEY).ok()?
    }

    fn store(&self, token: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(err) = storage.set_item(TOKEN_KEY, token) {
                warn!(error = ?err, "could not store token");
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            if let Err(err) = storage.remove_item(TOKEN_KEY) {
                warn!(error = ?err, "could not clear token");
            }
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn decode(err: gloo_net::Error) -> ApiError {
    ApiError::Decode(err.to_string())
}

/// HTTP client for the remote API.
///
/// The base URL comes from `<meta name="snapfeed-api">` and the optional API
/// key from `<meta name="snapfeed-api-key">`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
    api_key: Option<String>,
}

impl HttpApi {
    pub fn from_document() -> Self {
        Self {
            base: meta_content("snapfeed-api").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: meta_content("snapfeed-api-key"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    fn authorize(&self, mut req: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            req = req.header("apiKey", key);
        }
        if let Some(token) = LocalStorageToken.token() {
            req = req.header("Authorization", &format!("Bearer {}", token));
        }
        req
    }

    async fn dispatch(&self, req: RequestBuilder, body: Option<String>) -> Result<Response, ApiError> {
        let req = self.authorize(req);
        let resp = match body {
            Some(body) => {
                req.header("Content-Type", "application/json")
                    .body(body)
                    .map_err(network)?
                    .send()
                    .await
            }
            None => req.send().await,
        }
        .map_err(network)?;

        if !resp.ok() {
            let message = resp.json::<ErrorBody>().await.ok().and_then(|b| b.message);
            let err = ApiError::status(resp.status(), message);
            warn!(url = %resp.url(), error = %err, "request failed");
            return Err(err);
        }

        Ok(resp)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.dispatch(Request::get(&self.url(path)), None).await?;
        let envelope: Envelope<T> = resp.json().await.map_err(decode)?;
        envelope.into_data()
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let resp = self.dispatch(Request::post(&self.url(path)), Some(body)).await?;
        let envelope: Envelope<T> = resp.json().await.map_err(decode)?;
        envelope.into_data()
    }

    /// POST whose reply body carries nothing we need.
    async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.dispatch(Request::post(&self.url(path)), Some(body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(Request::delete(&self.url(path)), None).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl SocialApi for HttpApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body =
            serde_json::to_string(credentials).map_err(|e| ApiError::Decode(e.to_string()))?;
        let resp = self.dispatch(Request::post(&self.url("/login")), Some(body)).await?;
        resp.json().await.map_err(decode)
    }

    async fn list_following_posts(&self, page_size: u32, page: u32) -> Result<PostPage, ApiError> {
        self.get(&format!("/following-post?size={page_size}&page={page}"))
            .await
    }

    async fn list_explore_posts(&self) -> Result<PostPage, ApiError> {
        self.get("/explore-post").await
    }

    async fn get_post(&self, post_id: &str) -> Result<PostDetail, ApiError> {
        self.get(&format!("/post/{}", encode(post_id))).await
    }

    async fn create_comment(&self, post_id: &str, text: &str) -> Result<CreatedComment, ApiError> {
        let payload = CreateComment {
            post_id: post_id.to_string(),
            comment: text.to_string(),
        };
        self.post("/create-comment", &payload).await
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/delete-comment/{}", encode(comment_id)))
            .await
    }

    async fn like_post(&self, post_id: &str) -> Result<(), ApiError> {
        let payload = PostRef {
            post_id: post_id.to_string(),
        };
        self.post_unit("/like", &payload).await
    }

    async fn unlike_post(&self, post_id: &str) -> Result<(), ApiError> {
        let payload = PostRef {
            post_id: post_id.to_string(),
        };
        self.post_unit("/unlike", &payload).await
    }

    async fn get_logged_user(&self) -> Result<Profile, ApiError> {
        self.get("/user").await
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Profile, ApiError> {
        self.get(&format!("/user/{}", encode(user_id))).await
    }

    async fn get_posts_by_user(&self, user_id: &str) -> Result<PostPage, ApiError> {
        self.get(&format!("/users-post/{}", encode(user_id))).await
    }

    async fn get_followers(&self, user_id: &str) -> Result<Vec<User>, ApiError> {
        let list: UserList = self.get(&format!("/followers/{}", encode(user_id))).await?;
        Ok(list.users)
    }

    async fn get_following(&self, user_id: &str) -> Result<Vec<User>, ApiError> {
        let list: UserList = self.get(&format!("/following/{}", encode(user_id))).await?;
        Ok(list.users)
    }
}
