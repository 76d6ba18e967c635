use std::cell::RefCell;

use tracing::{debug, warn};

use crate::{AuthError, LoginRequest, LoginResponse, SocialApi};

/// Where the bearer token lives between requests.
///
/// The API client reads it on every call; expiry and refresh are the remote
/// API's business.
pub trait TokenStore {
    fn token(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn store(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

/// Log in and keep the returned token.
pub async fn sign_in<A, T>(
    api: &A,
    tokens: &T,
    email: &str,
    password: &str,
) -> Result<LoginResponse, AuthError>
where
    A: SocialApi + ?Sized,
    T: TokenStore + ?Sized,
{
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    match api.login(&request).await {
        Ok(response) => {
            tokens.store(&response.token);
            debug!(email = %request.email, "logged in");
            Ok(response)
        }
        Err(err) => {
            warn!(email = %request.email, error = %err, "login failed");
            Err(AuthError::Rejected(err))
        }
    }
}

pub fn sign_out<T: TokenStore + ?Sized>(tokens: &T) {
    tokens.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;

    #[tokio::test]
    async fn sign_in_stores_token() {
        let api = MockApi::new();
        let tokens = MemoryTokenStore::default();

        sign_in(&api, &tokens, " ana@example.com ", "secret")
            .await
            .unwrap();
        assert_eq!(tokens.token().as_deref(), Some("token-for-ana@example.com"));

        sign_out(&tokens);
        assert!(!tokens.has_token());
    }

    #[tokio::test]
    async fn missing_password_makes_no_call() {
        let api = MockApi::new();
        let tokens = MemoryTokenStore::default();

        let err = sign_in(&api, &tokens, "ana@example.com", "").await.unwrap_err();
        assert_eq!(err, AuthError::MissingCredentials);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_login_keeps_previous_token() {
        let api = MockApi::new();
        api.fail("login:bob@example.com");
        let tokens = MemoryTokenStore::default();
        tokens.store("old");

        let err = sign_in(&api, &tokens, "bob@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Login failed. Please check your credentials.");
        assert_eq!(tokens.token().as_deref(), Some("old"));
    }
}
