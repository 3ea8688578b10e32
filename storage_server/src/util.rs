use std::{fs, path::PathBuf};

use offchain::SigningAuthority;

use crate::errors::{AppError, Result};

pub(crate) fn get_key_path(dir: &str) -> Option<PathBuf> {
    let mut path_buf = get_base_dir(dir)?;
    path_buf.push("config/secret_key");
    Some(path_buf)
}

pub(crate) fn get_data_dir(dir: &str) -> Option<PathBuf> {
    let mut path_buf = get_base_dir(dir)?;
    path_buf.push("data/offchain.db");
    Some(path_buf)
}

pub(crate) fn get_toml_config_file(dir: &str, name: &str) -> Option<PathBuf> {
    let mut path_buf = get_base_dir(dir)?;
    path_buf.push("config");
    path_buf.push(format!("{name}.toml"));
    Some(path_buf)
}

pub(crate) fn get_base_dir(dir: &str) -> Option<PathBuf> {
    let mut path_buf = PathBuf::new();
    if dir.starts_with("~/") {
        path_buf.push(dirs::home_dir()?);
        path_buf.push(dir.strip_prefix("~/")?);
    } else {
        path_buf.push(dir);
    }
    Some(path_buf)
}

/// The signing key from `secret_key`, or else the key file under `root_dir`
///
/// A missing key file is created with a fresh key.
pub(crate) fn load_authority(root_dir: &str, secret_key: Option<&str>) -> Result<SigningAuthority> {
    if let Some(secret_key) = secret_key {
        return Ok(SigningAuthority::from_hex(secret_key)?);
    }

    let path = get_key_path(root_dir).ok_or(AppError::RootDir)?;
    if path.exists() {
        return Ok(SigningAuthority::from_hex(&fs::read_to_string(path)?)?);
    }

    let authority = generate_key(root_dir)?;
    tracing::info!(path = %path.display(), "generated new secret key");
    Ok(authority)
}

/// Write a fresh secret key to the key file under `root_dir`
pub(crate) fn generate_key(root_dir: &str) -> Result<SigningAuthority> {
    let path = get_key_path(root_dir).ok_or(AppError::RootDir)?;
    if path.exists() {
        return Err(AppError::KeyExists(path));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let authority = SigningAuthority::generate();
    fs::write(&path, authority.secret_hex())?;
    Ok(authority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_under_root_dir() {
        assert_eq!(
            get_key_path("/srv/store"),
            Some(PathBuf::from("/srv/store/config/secret_key"))
        );
        assert_eq!(
            get_data_dir("/srv/store"),
            Some(PathBuf::from("/srv/store/data/offchain.db"))
        );
        assert_eq!(
            get_toml_config_file("/srv/store", "config"),
            Some(PathBuf::from("/srv/store/config/config.toml"))
        );
    }

    #[test]
    fn key_is_generated_once_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let root_dir = dir.path().to_str().unwrap();

        let generated = load_authority(root_dir, None).unwrap();
        let reloaded = load_authority(root_dir, None).unwrap();

        assert_eq!(generated.public_key(), reloaded.public_key());
        assert!(matches!(generate_key(root_dir), Err(AppError::KeyExists(_))));
    }

    #[test]
    fn explicit_key_wins() {
        let dir = tempfile::tempdir().unwrap();
        let root_dir = dir.path().to_str().unwrap();
        let authority = SigningAuthority::generate();

        let loaded = load_authority(root_dir, Some(&authority.secret_hex())).unwrap();

        assert_eq!(loaded.public_key(), authority.public_key());
        assert!(!get_key_path(root_dir).unwrap().exists());
    }
}
