//! Layered settings for a publishing run.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use slate_anatomy::{Anatomy, DEFAULT_PUBLISH_TEMPLATE};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Environment variables are read as `SLATE_<SECTION>__<KEY>`.
const ENV_PREFIX: &str = "SLATE_";
const ENV_SEPARATOR: &str = "__";

/// Top-level settings, one section per subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub anatomy: AnatomySettings,
    pub collect_audio: CollectAudioSettings,
}

impl Settings {
    /// Load settings from defaults, an optional TOML file, and the
    /// environment. Later sources override earlier ones per key.
    ///
    /// A missing file is not an error (the defaults still apply), but a file
    /// that exists and fails to parse is.
    #[instrument(skip_all, fields(file = ?path))]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let settings: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.collect_audio.product_name.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("collect_audio.product_name"));
        }
        if self.anatomy.publish_template.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("anatomy.publish_template"));
        }
        Ok(())
    }
}

/// Where the local entity snapshot database lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub database_path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { database_path: PathBuf::from("slate.db") }
    }
}

/// Project roots and the publish path template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnatomySettings {
    /// Named filesystem roots exposed to the template as `roots.<name>`.
    pub roots: BTreeMap<String, String>,
    pub publish_template: String,
}

impl Default for AnatomySettings {
    fn default() -> Self {
        Self {
            roots: BTreeMap::new(),
            publish_template: DEFAULT_PUBLISH_TEMPLATE.to_string(),
        }
    }
}

impl AnatomySettings {
    /// Compile these settings into a project [`Anatomy`].
    ///
    /// Fails if the configured template does not parse, which is why callers
    /// should do this once at startup rather than per instance.
    pub fn anatomy(&self, project: impl Into<String>) -> slate_anatomy::error::Result<Anatomy> {
        Anatomy::new(project, self.roots.iter().map(|(k, v)| (k.as_str(), v.as_str())), &self.publish_template)
    }
}

/// Behavior of the folder-audio collection step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectAudioSettings {
    pub enabled: bool,
    /// Product name holding a folder's audio deliverable.
    pub product_name: String,
    /// Instance families the collector considers; empty means all.
    pub families: Vec<String>,
}

impl Default for CollectAudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            product_name: "audioMain".to_string(),
            families: vec!["review".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        figment::Jail::expect_with(|_jail| {
            let settings = Settings::load(None).unwrap();
            assert!(settings.collect_audio.enabled);
            assert_eq!(settings.collect_audio.product_name, "audioMain");
            assert_eq!(settings.collect_audio.families, vec!["review".to_string()]);
            assert_eq!(settings.anatomy.publish_template, DEFAULT_PUBLISH_TEMPLATE);
            assert_eq!(settings.store.database_path, PathBuf::from("slate.db"));
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "slate.toml",
                r#"
                    [store]
                    database_path = "/var/lib/slate/entities.db"

                    [anatomy]
                    publish_template = "{{ roots.publish }}/{{ folder }}/{{ ext }}"

                    [anatomy.roots]
                    publish = "/mnt/projects"

                    [collect_audio]
                    product_name = "audioScratch"
                    families = ["review", "render"]
                "#,
            )?;
            let settings = Settings::load(Some(Path::new("slate.toml"))).unwrap();
            assert_eq!(settings.store.database_path, PathBuf::from("/var/lib/slate/entities.db"));
            assert_eq!(settings.anatomy.roots["publish"], "/mnt/projects");
            assert_eq!(settings.collect_audio.product_name, "audioScratch");
            assert_eq!(settings.collect_audio.families.len(), 2);
            // Sections the file does not mention keep their defaults.
            assert!(settings.collect_audio.enabled);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("slate.toml", "[collect_audio]\nproduct_name = \"fromFile\"\n")?;
            jail.set_env("SLATE_COLLECT_AUDIO__PRODUCT_NAME", "fromEnv");
            jail.set_env("SLATE_COLLECT_AUDIO__ENABLED", "false");
            let settings = Settings::load(Some(Path::new("slate.toml"))).unwrap();
            assert_eq!(settings.collect_audio.product_name, "fromEnv");
            assert!(!settings.collect_audio.enabled);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        figment::Jail::expect_with(|_jail| {
            let settings = Settings::load(Some(Path::new("does-not-exist.toml"))).unwrap();
            assert_eq!(settings.collect_audio.product_name, "audioMain");
            Ok(())
        });
    }

    #[test]
    fn test_empty_product_name_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SLATE_COLLECT_AUDIO__PRODUCT_NAME", "  ");
            let err = Settings::load(None).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid("collect_audio.product_name")));
            Ok(())
        });
    }

    #[test]
    fn test_anatomy_settings_compile() {
        let mut settings = AnatomySettings::default();
        settings.roots.insert("publish".to_string(), "/pub".to_string());
        assert!(settings.anatomy("demo").is_ok());

        settings.publish_template = "{{ unclosed".to_string();
        assert!(settings.anatomy("demo").is_err());
    }
}
