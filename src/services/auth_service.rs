use crate::auth::AuthContext;
use crate::error::ClientError;
use crate::gateway::{Gateway, RequestOptions};
use crate::models::{Credentials, LoginResponse, RegisterResponse};

pub const SIGN_UP_FAILED: &str = "Sign up failed";
pub const NO_TOKEN_RECEIVED: &str = "No token received. Please try again.";

pub struct AuthService<'a> {
    gateway: &'a Gateway,
}

impl<'a> AuthService<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Creates an account and returns the server's confirmation message.
    /// Does not log in.
    pub async fn register(&self, auth: &AuthContext, credentials: &Credentials) -> Result<String, ClientError> {
        credentials.validate()?;

        let options = RequestOptions::post().json(credentials)?;
        let response: RegisterResponse = self.gateway.request(auth, "/auth/register", options).await?;

        match response.message {
            Some(message) => {
                tracing::info!(email = %credentials.email, "registered account");
                Ok(message)
            }
            None => Err(ClientError::Auth(
                response.details.unwrap_or_else(|| SIGN_UP_FAILED.to_string()),
            )),
        }
    }

    /// Exchanges credentials for a token and stores it in `auth`.
    pub async fn login(&self, auth: &mut AuthContext, credentials: &Credentials) -> Result<(), ClientError> {
        credentials.validate()?;

        let options = RequestOptions::post().json(credentials)?;
        let response: LoginResponse = self.gateway.request(auth, "/auth/login", options).await?;

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Auth(NO_TOKEN_RECEIVED.to_string()))?;

        auth.login(token)?;
        tracing::info!(email = %credentials.email, "logged in");
        Ok(())
    }

    /// Local only: the API has no session to revoke.
    pub fn logout(&self, auth: &mut AuthContext) -> Result<(), ClientError> {
        auth.logout()
    }
}
