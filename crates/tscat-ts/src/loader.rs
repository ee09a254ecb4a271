//! Build a [`Translator`] from a directory of `<stem>_<locale>.ts` files.
//!
//! Explicit locales must all exist; in discovery mode (no locales listed)
//! every matching file is tried and unreadable ones are skipped with a
//! warning.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use tscat_catalog::Translator;

use crate::error::LoadError;
use crate::reader::read_file;

/// Where to find catalogues and how to chain them.
///
/// Deserializable so hosts can embed it in their own settings:
///
/// ```
/// let config: tscat_ts::LoaderConfig = serde_json::from_str(
///     r#"{ "directory": "mythbrowser/i18n", "stem": "mythbrowser", "locales": ["hu"] }"#,
/// ).unwrap();
/// assert_eq!(config.file_for("hu").to_str(), Some("mythbrowser/i18n/mythbrowser_hu.ts"));
/// assert!(config.fallback_chain.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoaderConfig {
    /// Directory holding the `.ts` files.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// File name prefix, usually the plugin name.
    pub stem: String,
    /// Locales to load. Empty means every file matching the stem.
    #[serde(default)]
    pub locales: Vec<String>,
    /// Fallback chain handed to the translator.
    #[serde(default)]
    pub fallback_chain: Vec<String>,
}

fn default_directory() -> PathBuf {
    PathBuf::from("i18n")
}

impl LoaderConfig {
    /// Discover every catalogue for `stem` under `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            stem: stem.into(),
            locales: Vec::new(),
            fallback_chain: Vec::new(),
        }
    }

    /// Restrict loading to these locales.
    #[must_use]
    pub fn with_locales(mut self, locales: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.locales = locales.into_iter().map(Into::into).collect();
        self
    }

    /// Set the translator's fallback chain.
    #[must_use]
    pub fn with_fallback_chain(
        mut self,
        chain: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.fallback_chain = chain.into_iter().map(Into::into).collect();
        self
    }

    /// Path of the catalogue for `locale`.
    #[must_use]
    pub fn file_for(&self, locale: &str) -> PathBuf {
        self.directory.join(format!("{}_{locale}.ts", self.stem))
    }
}

/// The locale suffix of `<stem>_<locale>.ts`, if `path` has that shape.
#[must_use]
pub fn locale_from_path(stem: &str, path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let locale = name
        .strip_suffix(".ts")?
        .strip_prefix(stem)?
        .strip_prefix('_')?;
    (!locale.is_empty()).then(|| locale.to_string())
}

/// Load catalogues as described by `config`.
///
/// Explicit locales are registered under the requested tag. Discovered
/// files are registered under the document's `language` attribute, or the
/// filename suffix when the document has none.
pub fn load(config: &LoaderConfig) -> Result<Translator, LoadError> {
    let mut translator = Translator::new();

    if config.locales.is_empty() {
        for (locale, path) in discover(config)? {
            match read_file(&path) {
                Ok(catalogue) => {
                    let tag = catalogue.language().map_or(locale, str::to_string);
                    debug!(locale = %tag, path = %path.display(), "loaded catalogue");
                    translator.add_catalogue(tag, catalogue);
                }
                Err(err) => warn!(path = %path.display(), error = %err, "skipping catalogue"),
            }
        }
    } else {
        for locale in &config.locales {
            let path = config.file_for(locale);
            if !path.is_file() {
                return Err(LoadError::MissingLocale {
                    locale: locale.clone(),
                    path,
                });
            }
            let catalogue = read_file(&path)?;
            debug!(%locale, path = %path.display(), "loaded catalogue");
            translator.add_catalogue(locale.clone(), catalogue);
        }
    }

    translator.set_fallback_chain(config.fallback_chain.clone());
    Ok(translator)
}

/// `(locale, path)` for every matching file, sorted by path.
fn discover(config: &LoaderConfig) -> Result<Vec<(String, PathBuf)>, LoadError> {
    let dir_err = |source| LoadError::Directory {
        path: config.directory.clone(),
        source,
    };
    let mut found = Vec::new();
    for entry in std::fs::read_dir(&config.directory).map_err(dir_err)? {
        let path = entry.map_err(dir_err)?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(locale) = locale_from_path(&config.stem, &path) {
            found.push((locale, path));
        }
    }
    found.sort_by(|a, b| a.1.cmp(&b.1));
    debug!(
        directory = %config.directory.display(),
        stem = %config.stem,
        count = found.len(),
        "discovered catalogues"
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HU: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS><TS version="1.1">
<context>
    <name>MythBrowser</name>
    <message>
        <source>Back</source>
        <translation>Vissza</translation>
    </message>
    <message>
        <source>Enter URL</source>
        <translation type="unfinished"></translation>
    </message>
</context>
</TS>
"#;

    const DE: &str = r#"<TS version="2.1" language="de_DE">
<context>
    <name>MythBrowser</name>
    <message>
        <source>Enter URL</source>
        <translation>URL eingeben</translation>
    </message>
</context>
</TS>
"#;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mythbrowser_hu.ts"), HU).unwrap();
        std::fs::write(dir.path().join("mythbrowser_de.ts"), DE).unwrap();
        std::fs::write(dir.path().join("mythbrowser_xx.ts"), "<not-ts>").unwrap();
        std::fs::write(dir.path().join("mythgallery_hu.ts"), HU).unwrap();
        std::fs::write(dir.path().join("README"), "ignored").unwrap();
        dir
    }

    #[test]
    fn locale_from_path_shapes() {
        let p = |s: &str| PathBuf::from(s);
        assert_eq!(
            locale_from_path("mythbrowser", &p("i18n/mythbrowser_hu.ts")),
            Some("hu".into())
        );
        assert_eq!(
            locale_from_path("mythbrowser", &p("mythbrowser_pt_BR.ts")),
            Some("pt_BR".into())
        );
        assert_eq!(locale_from_path("mythbrowser", &p("mythbrowser_.ts")), None);
        assert_eq!(locale_from_path("mythbrowser", &p("mythbrowser_hu.qm")), None);
        assert_eq!(locale_from_path("mythbrowser", &p("mythgallery_hu.ts")), None);
    }

    #[test]
    fn explicit_locales() {
        let dir = fixture_dir();
        let config = LoaderConfig::new(dir.path(), "mythbrowser").with_locales(["hu"]);
        let tr = load(&config).unwrap();
        assert_eq!(tr.locales(), vec!["hu"]);
        assert_eq!(tr.tr("hu", "MythBrowser", "Back"), "Vissza");
        assert_eq!(tr.tr("hu", "MythBrowser", "Enter URL"), "Enter URL");
    }

    #[test]
    fn missing_explicit_locale_is_error() {
        let dir = fixture_dir();
        let config = LoaderConfig::new(dir.path(), "mythbrowser").with_locales(["fi"]);
        let err = load(&config).unwrap_err();
        assert!(matches!(err, LoadError::MissingLocale { ref locale, .. } if locale == "fi"));
    }

    #[test]
    fn broken_explicit_locale_is_error() {
        let dir = fixture_dir();
        let config = LoaderConfig::new(dir.path(), "mythbrowser").with_locales(["xx"]);
        assert!(matches!(load(&config), Err(LoadError::Ts(_))));
    }

    #[test]
    fn discovery_skips_broken_files() {
        let dir = fixture_dir();
        let tr = load(&LoaderConfig::new(dir.path(), "mythbrowser")).unwrap();
        // `de_DE` comes from the language attribute, `hu` from the filename.
        assert_eq!(tr.locales(), vec!["de_DE", "hu"]);
    }

    #[test]
    fn fallback_chain_is_applied() {
        let dir = fixture_dir();
        let config = LoaderConfig::new(dir.path(), "mythbrowser").with_fallback_chain(["de_DE"]);
        let tr = load(&config).unwrap();
        assert_eq!(tr.fallback_chain(), ["de_DE".to_string()]);
        assert_eq!(tr.tr("hu", "MythBrowser", "Enter URL"), "URL eingeben");
    }

    #[test]
    fn missing_directory_is_error() {
        let config = LoaderConfig::new("/nonexistent/i18n", "mythbrowser");
        assert!(matches!(load(&config), Err(LoadError::Directory { .. })));
    }

    #[test]
    fn config_defaults_from_json() {
        let config: LoaderConfig = serde_json::from_str(r#"{ "stem": "mythbrowser" }"#).unwrap();
        assert_eq!(config, LoaderConfig::new("i18n", "mythbrowser"));
    }

    #[test]
    fn config_requires_stem() {
        assert!(serde_json::from_str::<LoaderConfig>(r#"{ "directory": "i18n" }"#).is_err());
    }
}
