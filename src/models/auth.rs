use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.email.trim().is_empty() {
            return Err(ClientError::required("email"));
        }
        if self.password.is_empty() {
            return Err(ClientError::required("password"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    pub message: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}
