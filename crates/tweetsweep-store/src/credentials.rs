//! Credential store backed by a small TOML file
//!
//! Loading, parsing and persisting are pure file operations. Asking the user
//! is delegated to a [`CredentialPrompt`] so tests can script the answers.

use crate::error::CredentialError;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};
use tweetsweep_domain::Credentials;

/// How often an empty answer is re-asked before giving up
pub const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Source of credential values when no usable file exists
pub trait CredentialPrompt {
    /// Ask for one field; `field` is one of [`Credentials::FIELDS`]
    fn ask(&mut self, field: &'static str) -> io::Result<String>;
}

/// On-disk layout
#[derive(Debug, Serialize, Deserialize)]
struct CredentialsFile {
    consumer_key: String,
    consumer_secret: String,
    access_key: String,
    access_secret: String,
}

impl From<CredentialsFile> for Credentials {
    fn from(file: CredentialsFile) -> Self {
        Credentials::new(file.consumer_key, file.consumer_secret, file.access_key, file.access_secret)
    }
}

impl From<&Credentials> for CredentialsFile {
    fn from(creds: &Credentials) -> Self {
        Self {
            consumer_key: creds.consumer_key.clone(),
            consumer_secret: creds.consumer_secret.clone(),
            access_key: creds.access_key.clone(),
            access_secret: creds.access_secret.clone(),
        }
    }
}

/// Read credentials from a file
pub fn load(path: &Path) -> Result<Credentials, CredentialError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CredentialError::NotFound(path.to_path_buf())
        } else {
            CredentialError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let file: CredentialsFile = toml::from_str(&contents).map_err(|source| CredentialError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.into())
}

/// Write credentials to a file
///
/// The file is written to a temporary sibling first and renamed into place.
/// On Unix it is created with mode `0600`.
pub fn save(path: &Path, credentials: &Credentials) -> Result<(), CredentialError> {
    let write_err = |source| CredentialError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let contents = toml::to_string_pretty(&CredentialsFile::from(credentials))?;
    let tmp = path.with_extension("tmp");

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)
}

/// Load credentials, asking for them and persisting them on first use
///
/// A missing or unparseable file triggers the prompt; the answers are written
/// to `path` before they are returned. Validation against the remote API is
/// left to the first real call.
pub fn load_or_prompt<P: CredentialPrompt + ?Sized>(
    path: &Path,
    prompt: &mut P,
) -> Result<Credentials, CredentialError> {
    match load(path) {
        Ok(creds) if creds.is_complete() => return Ok(creds),
        Ok(_) => warn!("Credentials file {} has empty fields, asking again", path.display()),
        Err(CredentialError::NotFound(_)) => {}
        Err(e @ CredentialError::Read { .. }) => return Err(e),
        Err(e) => warn!("{}, asking again", e),
    }

    let mut answers: [String; 4] = Default::default();
    for (answer, field) in answers.iter_mut().zip(Credentials::FIELDS) {
        *answer = ask_nonempty(prompt, field)?;
    }
    let [consumer_key, consumer_secret, access_key, access_secret] = answers;

    let creds = Credentials::new(consumer_key, consumer_secret, access_key, access_secret);
    save(path, &creds)?;
    info!("Credentials saved to {}", path.display());
    Ok(creds)
}

fn ask_nonempty<P: CredentialPrompt + ?Sized>(
    prompt: &mut P,
    field: &'static str,
) -> Result<String, CredentialError> {
    for _ in 0..MAX_PROMPT_ATTEMPTS {
        let answer = prompt.ask(field).map_err(CredentialError::Prompt)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
    Err(CredentialError::Incomplete(field))
}
