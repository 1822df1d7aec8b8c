//! Plugin configuration: default profiles, per-host overrides, toggles.
//!
//! ```toml
//! ssh_default_profile = "remote"
//! container_default_profile = "container"
//! auto_clone = false
//! infer_cwd = true
//!
//! [hosts.prod-db]
//! profile = "danger"
//!
//! [profiles.danger]
//! style = "bg=colour52"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::session::SessionCategory;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PANECLONE_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Profile for every SSH session. Empty means leave the pane alone.
    pub ssh_default_profile: String,
    /// Profile for every container session. Empty means leave the pane alone.
    pub container_default_profile: String,
    /// Clone automatically when a pane with a remote session is split.
    #[serde(deserialize_with = "lenient_bool")]
    pub auto_clone: bool,
    /// After cloning, `cd` into the directory the source pane's prompt shows.
    /// On unless turned off.
    #[serde(deserialize_with = "lenient_bool")]
    pub infer_cwd: bool,
    /// Per-host settings keyed by host or container name.
    pub hosts: HashMap<String, HostSettings>,
    /// Host-specific rendering of named profiles.
    pub profiles: HashMap<String, ProfileStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfileStyle {
    /// tmux style string set as the pane's `window-style`.
    pub style: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            ssh_default_profile: String::new(),
            container_default_profile: String::new(),
            auto_clone: false,
            infer_cwd: true,
            hosts: HashMap::new(),
            profiles: HashMap::new(),
        }
    }
}

impl RemoteConfig {
    /// Parse a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Configured default profile for a category, `None` when unset or empty.
    pub fn default_profile(&self, category: SessionCategory) -> Option<&str> {
        let profile = match category {
            SessionCategory::Ssh => &self.ssh_default_profile,
            SessionCategory::Container => &self.container_default_profile,
        };
        Some(profile.as_str()).filter(|p| !p.is_empty())
    }

    pub fn host_settings(&self, host: &str) -> Option<&HostSettings> {
        self.hosts.get(host)
    }

    /// `(profile name, style)` pairs that carry a style.
    pub fn profile_styles(&self) -> HashMap<String, String> {
        self.profiles
            .iter()
            .filter_map(|(name, p)| p.style.clone().map(|style| (name.clone(), style)))
            .collect()
    }
}

/// Accept `true`/`false` as well as the strings `"True"`/`"False"` (any
/// case). Anything else counts as `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
        Other(toml::Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Text(s) => s.eq_ignore_ascii_case("true"),
        Raw::Other(v) => {
            tracing::warn!("expected a boolean, got {v}; using false");
            false
        }
    })
}

/// Read and parse `path`. A missing file is `Ok(None)`.
pub fn load_config(path: &Path) -> Result<Option<RemoteConfig>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };
    RemoteConfig::from_toml(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
}

/// Load `path`, falling back to built-in defaults on any problem.
pub fn load_or_default(path: Option<&Path>) -> RemoteConfig {
    let Some(path) = path else {
        tracing::debug!("no config path, using defaults");
        return RemoteConfig::default();
    };
    match load_config(path) {
        Ok(Some(config)) => {
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            RemoteConfig::default()
        }
        Err(e) => {
            tracing::warn!("{e}; using defaults");
            RemoteConfig::default()
        }
    }
}

/// Resolve the config file location.
///
/// Resolution order:
/// 1. Explicit path (`--config`)
/// 2. `$PANECLONE_CONFIG`
/// 3. `$XDG_CONFIG_HOME/paneclone/config.toml`
/// 4. `$HOME/.config/paneclone/config.toml`
pub fn resolve_config_path<F>(explicit: Option<&str>, env_lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = env_lookup(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    if let Some(dir) = env_lookup("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir).join("paneclone/config.toml"));
    }
    env_lookup("HOME")
        .filter(|h| !h.is_empty())
        .map(|home| PathBuf::from(home).join(".config/paneclone/config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
ssh_default_profile = "remote"
container_default_profile = ""
auto_clone = "True"
infer_cwd = false

[hosts.foo]
profile = "foo_profile"

[hosts.bar]

[profiles.foo_profile]
style = "bg=colour52"
"#;

    #[test]
    fn parse_sample() {
        let config = RemoteConfig::from_toml(SAMPLE).expect("parse");
        assert_eq!(config.default_profile(SessionCategory::Ssh), Some("remote"));
        assert_eq!(config.default_profile(SessionCategory::Container), None);
        assert!(config.auto_clone);
        assert!(!config.infer_cwd);
        assert_eq!(
            config.host_settings("foo").and_then(|h| h.profile.as_deref()),
            Some("foo_profile")
        );
        assert_eq!(config.host_settings("bar"), Some(&HostSettings::default()));
        assert!(config.host_settings("baz").is_none());
        assert_eq!(
            config.profile_styles().get("foo_profile").map(String::as_str),
            Some("bg=colour52")
        );
    }

    #[test]
    fn empty_document_is_default() {
        let config = RemoteConfig::from_toml("").expect("parse");
        assert_eq!(config, RemoteConfig::default());
        assert!(!config.auto_clone);
        assert!(config.infer_cwd);
    }

    #[test]
    fn infer_cwd_defaults_on_when_other_keys_are_set() {
        let config = RemoteConfig::from_toml("auto_clone = true").expect("parse");
        assert!(config.auto_clone);
        assert!(config.infer_cwd);
    }

    #[test]
    fn lenient_bool_variants() {
        let config = RemoteConfig::from_toml("auto_clone = \"false\"\ninfer_cwd = true").expect("parse");
        assert!(!config.auto_clone);
        assert!(config.infer_cwd);

        let config = RemoteConfig::from_toml("auto_clone = 3").expect("parse");
        assert!(!config.auto_clone);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(RemoteConfig::from_toml("ssh_default_profile = [").is_err());
    }

    #[test]
    fn load_or_default_without_path() {
        assert_eq!(load_or_default(None), RemoteConfig::default());
    }

    #[test]
    fn load_or_default_missing_file() {
        let path = Path::new("/nonexistent/paneclone/config.toml");
        assert!(matches!(load_config(path), Ok(None)));
        assert_eq!(load_or_default(Some(path)), RemoteConfig::default());
    }

    #[test]
    fn resolve_explicit_wins() {
        let path = resolve_config_path(Some("/etc/pc.toml"), |_| Some("/ignored".to_string()));
        assert_eq!(path, Some(PathBuf::from("/etc/pc.toml")));
    }

    #[test]
    fn resolve_env_order() {
        let env = |name: &str| match name {
            "XDG_CONFIG_HOME" => Some("/xdg".to_string()),
            "HOME" => Some("/home/me".to_string()),
            _ => None,
        };
        assert_eq!(
            resolve_config_path(None, env),
            Some(PathBuf::from("/xdg/paneclone/config.toml"))
        );

        let env = |name: &str| (name == "HOME").then(|| "/home/me".to_string());
        assert_eq!(
            resolve_config_path(None, env),
            Some(PathBuf::from("/home/me/.config/paneclone/config.toml"))
        );

        let env = |name: &str| (name == CONFIG_ENV).then(|| "/tmp/x.toml".to_string());
        assert_eq!(resolve_config_path(None, env), Some(PathBuf::from("/tmp/x.toml")));

        assert_eq!(resolve_config_path(None, |_| None), None);
    }
}
