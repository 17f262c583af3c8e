//! Credential loading from the process environment and shared config.

use std::path::Path;

use anyhow::anyhow;
use ini::Ini;
use log::debug;

use crate::constants::AWS_ACCESS_KEY_ID;
use crate::constants::AWS_PROFILE;
use crate::constants::AWS_SECRET_ACCESS_KEY;
use crate::constants::AWS_SHARED_CREDENTIALS_FILE;
use crate::credential::Credential;
use crate::error::Error;
use crate::error::Result;

/// Loader trait will try to load credential from different sources.
pub trait CredentialLoad: Send + Sync {
    /// Load credential from this source.
    ///
    /// - If found, return `Ok(Some(cred))`
    /// - If the source has nothing, return `Ok(None)`
    /// - If unexpected errors happened, return `Err(err)`
    fn load_credential(&self) -> Result<Option<Credential>>;
}

/// Load the credential from `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`.
///
/// Both variables must be present, otherwise this source has nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvLoader;

impl CredentialLoad for EnvLoader {
    fn load_credential(&self) -> Result<Option<Credential>> {
        let access_key_id = std::env::var(AWS_ACCESS_KEY_ID).ok();
        let secret_access_key = std::env::var(AWS_SECRET_ACCESS_KEY).ok();

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) if !ak.is_empty() && !sk.is_empty() => {
                Ok(Some(Credential::new(&ak, &sk)))
            }
            _ => Ok(None),
        }
    }
}

/// Load the credential from the shared credentials file.
///
/// The file defaults to `~/.aws/credentials` and can be moved with
/// `AWS_SHARED_CREDENTIALS_FILE`; the profile defaults to `default` and the
/// `AWS_PROFILE` environment variable overrides whatever was configured here.
#[derive(Debug)]
pub struct ProfileLoader {
    profile: String,
    credentials_file: Option<String>,
}

impl Default for ProfileLoader {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            credentials_file: None,
        }
    }
}

impl ProfileLoader {
    /// Pick a profile section instead of `default`.
    pub fn with_profile(mut self, profile: &str) -> Self {
        self.profile = profile.to_string();
        self
    }

    /// Read a specific file instead of resolving one.
    pub fn with_credentials_file(mut self, path: &str) -> Self {
        self.credentials_file = Some(path.to_string());
        self
    }

    fn resolve_path(&self) -> Option<String> {
        if let Some(path) = &self.credentials_file {
            return Some(path.clone());
        }
        if let Ok(path) = std::env::var(AWS_SHARED_CREDENTIALS_FILE) {
            if !path.is_empty() {
                return Some(path);
            }
        }

        let home = home::home_dir()?;
        Some(home.join(".aws").join("credentials").to_string_lossy().into_owned())
    }
}

impl CredentialLoad for ProfileLoader {
    fn load_credential(&self) -> Result<Option<Credential>> {
        let profile = std::env::var(AWS_PROFILE)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.profile.clone());

        let Some(path) = self.resolve_path() else {
            debug!("home directory not found, skipping shared credentials file");
            return Ok(None);
        };
        if !Path::new(&path).exists() {
            debug!("credentials file {path} not found");
            return Ok(None);
        }

        let conf = Ini::load_from_file(&path).map_err(|err| {
            Error::Unexpected(anyhow!("failed to load credentials file {path}: {err}"))
        })?;

        let Some(props) = conf.section(Some(profile.as_str())) else {
            debug!("profile {profile} not found in credentials file {path}");
            return Ok(None);
        };

        let access_key_id = props.get("aws_access_key_id");
        let secret_access_key = props.get("aws_secret_access_key");

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) => Ok(Some(Credential::new(ak, sk))),
            _ => Ok(None),
        }
    }
}

/// Load the credential the default way: environment first, then the shared
/// credentials file. The first source with a credential wins.
#[derive(Debug, Default)]
pub struct DefaultLoader {
    env: EnvLoader,
    profile: ProfileLoader,
}

impl CredentialLoad for DefaultLoader {
    fn load_credential(&self) -> Result<Option<Credential>> {
        if let Some(cred) = self.env.load_credential()? {
            return Ok(Some(cred));
        }

        self.profile.load_credential()
    }
}
