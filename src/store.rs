//! Shared credentials file rendering and replacement.
//!
//! The file holds exactly one `[default]` profile. Replacement is
//! destructive: whatever was at the path before a run, including other
//! profiles, is gone afterwards.

use std::io;
use std::path::{Path, PathBuf};

use log::info;
use tokio::fs;

use crate::credentials::TemporaryCredentials;

/// Default location of the shared credentials file.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aws").join("credentials"))
}

/// Removes a previous credentials file so the run starts from a clean
/// state. An absent file already is the clean state.
pub async fn clear(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => {
            info!("Removed previous credentials file {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Renders the `[default]` profile. The expiration is only ever reported
/// to the operator, never persisted.
pub fn render(creds: &TemporaryCredentials) -> String {
    format!(
        "[default]\n\
         aws_access_key_id = {}\n\
         aws_secret_access_key = {}\n\
         aws_session_token = {}\n",
        creds.access_key_id, creds.secret_access_key, creds.session_token,
    )
}

/// Writes the credentials file, replacing whatever is at `path`.
///
/// The content lands in a sibling staging file first and is renamed into
/// place, so an interrupted run never leaves a half-written file behind.
pub async fn write(path: &Path, creds: &TemporaryCredentials) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let staging = staging_path(path);
    fs::write(&staging, render(creds)).await?;
    set_owner_only(&staging).await?;
    fs::rename(&staging, path).await?;

    info!("Wrote credentials file {}", path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "credentials".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
async fn set_owner_only(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path).await?.permissions();
    permissions.set_mode(0o600);
    fs::set_permissions(path, permissions).await
}

#[cfg(not(unix))]
async fn set_owner_only(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use aws_smithy_types::DateTime;
    use configparser::ini::Ini;

    use super::*;

    fn sample_credentials() -> TemporaryCredentials {
        TemporaryCredentials {
            access_key_id: "ASIAEXAMPLEKEYID".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: "FwoGZXIvYXdzEXAMPLETOKEN==".to_string(),
            expiration: DateTime::from_secs(1_700_000_000),
        }
    }

    fn scratch_path(test: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("awscred-store-{}-{test}", std::process::id()))
            .join("credentials")
    }

    #[test]
    fn render_matches_expected_profile_layout() {
        let creds = TemporaryCredentials {
            access_key_id: "AKIA...".to_string(),
            secret_access_key: "abcd...".to_string(),
            session_token: "tok...".to_string(),
            expiration: DateTime::from_secs(0),
        };
        assert_eq!(
            render(&creds),
            "[default]\n\
             aws_access_key_id = AKIA...\n\
             aws_secret_access_key = abcd...\n\
             aws_session_token = tok...\n"
        );
    }

    #[test]
    fn rendered_profile_parses_back_exactly() {
        let creds = sample_credentials();
        let mut ini = Ini::new();
        ini.read(render(&creds)).unwrap();

        assert_eq!(
            ini.get("default", "aws_access_key_id"),
            Some(creds.access_key_id.clone())
        );
        assert_eq!(
            ini.get("default", "aws_secret_access_key"),
            Some(creds.secret_access_key.clone())
        );
        assert_eq!(
            ini.get("default", "aws_session_token"),
            Some(creds.session_token.clone())
        );
        assert_eq!(ini.get("default", "expiration"), None);
    }

    #[tokio::test]
    async fn clear_succeeds_when_no_file_exists() {
        let path = scratch_path("clear-absent");
        clear(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn clear_removes_a_valid_file() {
        let path = scratch_path("clear-valid");
        write(&path, &sample_credentials()).await.unwrap();
        assert!(path.exists());

        clear(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn clear_removes_a_malformed_file() {
        let path = scratch_path("clear-malformed");
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, "not an ini file [[[").await.unwrap();

        clear(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn write_creates_the_parent_directory() {
        let path = scratch_path("write-parent");
        write(&path, &sample_credentials()).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, render(&sample_credentials()));
    }

    #[tokio::test]
    async fn write_replaces_prior_content_and_leaves_no_staging_file() {
        let path = scratch_path("write-replace");
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, "[other]\nstale = yes\n").await.unwrap();

        write(&path, &sample_credentials()).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, render(&sample_credentials()));
        assert!(!staging_path(&path).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = scratch_path("write-mode");
        write(&path, &sample_credentials()).await.unwrap();

        let mode = fs::metadata(&path).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
