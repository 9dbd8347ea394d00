use std::fs;
use std::path::PathBuf;

use crate::auth::{AuthContext, FileCredentialStore};
use crate::config::AppConfig;
use crate::gateway::Gateway;

pub fn get_config_dir(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let config_dir = if let Some(ref custom_dir) = config.storage.config_dir {
        custom_dir.clone()
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("pantrypal")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn credential_store(config: &AppConfig) -> anyhow::Result<FileCredentialStore> {
    Ok(FileCredentialStore::in_dir(get_config_dir(config)?))
}

/// Everything one command needs to talk to the API.
pub struct ClientContext {
    pub gateway: Gateway,
    pub auth: AuthContext,
}

impl ClientContext {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let gateway = Gateway::from_config(config)?;
        let auth = AuthContext::load(credential_store(config)?)?;
        Ok(Self { gateway, auth })
    }

    /// Refuses to dispatch protected calls without a credential.
    pub fn require_login(&self) -> anyhow::Result<()> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Not logged in. Run `pantry auth login <email>` first"))
        }
    }
}
