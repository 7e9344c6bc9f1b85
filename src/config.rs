use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(temelie::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(temelie::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// NFS export mounted by every media app under `/data/nfs`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NfsShare {
    pub server: String,
    pub path: String,
    pub capacity: String,
}
impl Default for NfsShare {
    fn default() -> Self {
        Self {
            server: "nas.hont.ro".into(),
            path: "/complete".into(),
            capacity: "1Ti".into(),
        }
    }
}

/// SMB share mounted by every media app under `/data/smb-e`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SmbShare {
    pub source: String,
    pub capacity: String,
    pub username: String,
    pub password: String,
}
impl Default for SmbShare {
    fn default() -> Self {
        Self {
            source: "//l2.hont.ro/E".into(),
            capacity: "500Gi".into(),
            username: "shareuser".into(),
            password: "a9Tp2R7K1vNxL6dYwZ3BqV0sH4JmP8Gc".into(),
        }
    }
}

/// Site-specific values interpolated into the manifest templates.
///
/// The defaults reproduce the reference homelab tree byte-for-byte; a
/// `temelie.toml` file can override any subset of them.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    /// Base domain; each app is exposed as `<app>.<domain>`.
    pub domain: String,
    /// Namespace the media apps and their storage claims live in.
    pub namespace: String,
    /// E-mail handed to the Let's Encrypt ACME resolver.
    pub acme_email: String,
    /// Pinned traefik Helm chart version.
    pub traefik_chart_version: String,
    pub nfs: NfsShare,
    pub smb: SmbShare,
}
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: "hont.ro".into(),
            namespace: "media".into(),
            acme_email: "your-email@example.com".into(),
            traefik_chart_version: "10.3.2".into(),
            nfs: NfsShare::default(),
            smb: SmbShare::default(),
        }
    }
}
impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed = toml::from_str(&content).map_err(|error| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: error,
        })?;

        Ok(parsed)
    }

    /// Loads `path` when given, otherwise falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_site() {
        let config = SiteConfig::default();

        assert_eq!(config.domain, "hont.ro");
        assert_eq!(config.namespace, "media");
        assert_eq!(config.nfs.server, "nas.hont.ro");
        assert_eq!(config.smb.source, "//l2.hont.ro/E");
        assert_eq!(config.traefik_chart_version, "10.3.2");
    }

    #[test]
    fn partial_toml_overrides_keep_remaining_defaults() {
        let toml = r#"
domain = "lab.example"

[nfs]
server = "tank.lab.example"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.domain, "lab.example");
        assert_eq!(config.nfs.server, "tank.lab.example");
        assert_eq!(config.nfs.path, "/complete");
        assert_eq!(config.namespace, "media");
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let result = SiteConfig::from_file("definitely/not/here/temelie.toml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
