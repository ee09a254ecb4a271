#![forbid(unsafe_code)]

//! MythBrowser UI strings.
//!
//! The plugin's TS catalogues are compiled into the crate and parsed on
//! first use. [`tr`] is the whole host-facing surface: it never fails, and
//! shows the English source text whenever no finished translation exists
//! (which, for the bundled Hungarian catalogue, is every string).
//!
//! ```
//! use tscat_mythbrowser::{contexts, tr};
//!
//! assert_eq!(tr("hu", contexts::BROWSER_CONFIG, "Ok"), "Ok");
//! assert_eq!(tr("hu", contexts::MYTH_BROWSER, "Enter URL"), "Enter URL");
//! ```

use std::sync::OnceLock;

use tracing::{debug, warn};

use tscat_catalog::{Catalogue, Translator};
use tscat_ts::{TsError, parse_str};

/// Context names used by the plugin's UI components.
pub mod contexts {
    /// Bookmark editor dialog.
    pub const BOOKMARK_EDITOR: &str = "BookmarkEditor";
    /// Bookmark manager screen.
    pub const BOOKMARK_MANAGER: &str = "BookmarkManager";
    /// Browser settings screen.
    pub const BROWSER_CONFIG: &str = "BrowserConfig";
    /// Main browser view.
    pub const MYTH_BROWSER: &str = "MythBrowser";
    /// Page-loading indicator.
    pub const WEB_PAGE: &str = "WebPage";

    /// Every context, in catalogue order.
    pub const ALL: [&str; 5] = [
        BOOKMARK_EDITOR,
        BOOKMARK_MANAGER,
        BROWSER_CONFIG,
        MYTH_BROWSER,
        WEB_PAGE,
    ];
}

/// Hungarian catalogue, as shipped in `mythbrowser/i18n`.
pub const HUNGARIAN_TS: &str = include_str!("../catalogs/mythbrowser_hu.ts");

/// `(locale, TS document)` for every bundled catalogue.
pub const BUNDLED: &[(&str, &str)] = &[("hu", HUNGARIAN_TS)];

/// Parse the bundled catalogue for `locale`, if one ships.
pub fn bundled_catalogue(locale: &str) -> Result<Option<Catalogue>, TsError> {
    BUNDLED
        .iter()
        .find(|(tag, _)| *tag == locale)
        .map(|(_, text)| parse_str(text))
        .transpose()
}

/// A fresh translator over every bundled catalogue.
pub fn translator() -> Result<Translator, TsError> {
    let mut translator = Translator::new();
    for (locale, text) in BUNDLED {
        translator.add_catalogue(*locale, parse_str(text)?);
    }
    debug!(locales = BUNDLED.len(), "bundled MythBrowser catalogues parsed");
    Ok(translator)
}

/// The process-wide translator, parsed once.
pub fn shared() -> Result<&'static Translator, &'static TsError> {
    static SHARED: OnceLock<Result<Translator, TsError>> = OnceLock::new();
    SHARED.get_or_init(translator).as_ref()
}

/// Translate a MythBrowser string, falling back to `source`.
///
/// A bundled catalogue that fails to parse is logged and treated as
/// empty, so the UI still renders in the source language.
#[must_use]
pub fn tr<'a>(locale: &str, context: &str, source: &'a str) -> &'a str {
    match shared() {
        Ok(translator) => translator.tr(locale, context, source),
        Err(err) => {
            warn!(error = %err, "bundled catalogues unavailable; using source text");
            source
        }
    }
}
