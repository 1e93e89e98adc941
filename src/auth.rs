// Token sources for the Gist API.
//
// The client asks a `TokenProvider` for a bearer token before every
// request. The terminal binary uses `SessionTokenProvider`, which looks
// in the environment, then in a token file in the home directory, and
// finally asks the user for a personal access token (scope `gist`),
// storing it for later runs.

use crate::error::{GistError, Result};
use crate::ui::cancelled_or;
use dialoguer::Password;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Anything able to hand out a bearer token.
pub trait TokenProvider {
    fn token(&self) -> Result<String>;
}

/// A fixed token, handy for tests and scripting.
#[derive(Clone, Debug)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Where the current token comes from. Never carries the token itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenSource {
    Environment(String),
    Stored(PathBuf),
    Missing,
}

/// Token provider backed by the environment and a token file, with an
/// interactive fallback that creates a new stored session.
pub struct SessionTokenProvider {
    env_token: Option<(String, String)>,
    token_path: PathBuf,
    interactive: bool,
    cached: Mutex<Option<String>>,
}

impl SessionTokenProvider {
    /// Provider reading `GITHUB_TOKEN`/`GH_TOKEN` and the default token file.
    pub fn from_env(interactive: bool) -> Self {
        let env_token = TOKEN_ENV_VARS.iter().find_map(|var| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (var.to_string(), v))
        });
        Self::new(env_token, default_token_path(), interactive)
    }

    pub fn new(env_token: Option<(String, String)>, token_path: PathBuf, interactive: bool) -> Self {
        SessionTokenProvider {
            env_token,
            token_path,
            interactive,
            cached: Mutex::new(None),
        }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Report where a token would be taken from, without prompting.
    pub fn source(&self) -> TokenSource {
        if let Some((var, _)) = &self.env_token {
            return TokenSource::Environment(var.clone());
        }
        match load_token(&self.token_path) {
            Ok(Some(_)) => TokenSource::Stored(self.token_path.clone()),
            _ => TokenSource::Missing,
        }
    }

    /// Ask the user for a token and store it. `None` when the prompt
    /// was interrupted.
    pub fn login(&self) -> Result<Option<String>> {
        let prompt = Password::new()
            .with_prompt("GitHub personal access token (gist scope)")
            .interact();
        let Some(token) = cancelled_or(prompt)? else {
            return Ok(None);
        };
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(GistError::Auth("no token entered".into()));
        }
        persist_token(&self.token_path, &token)?;
        self.remember(&token);
        Ok(Some(token))
    }

    /// Resolve a token up front, prompting if needed, so no prompt is
    /// drawn later under a progress spinner. `None` when the user
    /// dismissed the prompt.
    pub fn ensure_session(&self) -> Result<Option<String>> {
        if let Some(token) = self.known_token()? {
            return Ok(Some(token));
        }
        if self.interactive {
            return self.login();
        }
        Err(GistError::Auth(format!(
            "no GitHub token found; set {} or run `gist-manager login`",
            TOKEN_ENV_VARS.join("/")
        )))
    }

    /// Cached, environment or stored token, without prompting.
    fn known_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.cached() {
            return Ok(Some(token));
        }
        if let Some((var, token)) = &self.env_token {
            debug!(source = %var, "using token from environment");
            self.remember(token);
            return Ok(Some(token.clone()));
        }
        if let Some(token) = load_token(&self.token_path)? {
            debug!(path = %self.token_path.display(), "using stored token");
            self.remember(&token);
            return Ok(Some(token));
        }
        Ok(None)
    }

    /// Remove the stored token. Returns whether one existed.
    pub fn logout(&self) -> Result<bool> {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = None;
        }
        match std::fs::remove_file(&self.token_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn remember(&self, token: &str) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = Some(token.to_string());
        }
    }

    fn cached(&self) -> Option<String> {
        self.cached.lock().ok().and_then(|c| c.clone())
    }
}

impl TokenProvider for SessionTokenProvider {
    fn token(&self) -> Result<String> {
        self.ensure_session()?
            .ok_or_else(|| GistError::Auth("login cancelled".into()))
    }
}

/// Default token file in the user's home directory.
pub fn default_token_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(".gist_manager_token")
}

/// Persist token into `path`, readable only by the owner on unix.
pub fn persist_token(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, token)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Load a stored token. A missing or blank file is `None`.
pub fn load_token(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(data) => {
            let token = data.trim();
            Ok((!token.is_empty()).then(|| token.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
