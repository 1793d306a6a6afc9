//! Localization provider interface

use std::{collections::BTreeMap, path::Path};

use thiserror::Error;

/// Host localization lookup
pub trait Localization: Send + Sync {
    /// Returns `true` if a translation exists for `key`
    fn has(&self, key: &str) -> bool;

    /// Translated string for `key`. Only meaningful if [Localization::has] returned `true`.
    fn localize(&self, key: &str) -> String;
}

/// Translate `key`, or return the embedded English `fallback` if there is no translation
pub fn text(l10n: &dyn Localization, key: &str, fallback: &str) -> String {
    if l10n.has(key) {
        l10n.localize(key)
    } else {
        trace!(key = %key, "missing translation");
        fallback.to_owned()
    }
}

lazy_static::lazy_static! {
    static ref PLACEHOLDER_REGEX: regex::Regex = regex::Regex::new(r"\{(\w+)\}").unwrap();
}

/// Like [text], then replace `{name}` placeholders with the given values
///
/// Placeholders are substituted in a single pass: values are inserted verbatim, and unknown
/// placeholders are left as they are.
pub fn format(l10n: &dyn Localization, key: &str, fallback: &str, args: &[(&str, &str)]) -> String {
    let template = text(l10n, key, fallback);

    PLACEHOLDER_REGEX
        .replace_all(&template, |caps: &regex::Captures| {
            let name = &caps[1];
            args.iter()
                .find(|(arg, _)| *arg == name)
                .map(|(_, value)| (*value).to_owned())
                .unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

/// Localization provider without any translation
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTranslations;

impl Localization for NoTranslations {
    fn has(&self, _key: &str) -> bool {
        false
    }

    fn localize(&self, key: &str) -> String {
        key.to_owned()
    }
}

#[derive(Debug, Error)]
pub enum TranslationsError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("language file root must be an object")]
    NotAnObject,
}

/// Translations loaded from a JSON language file
///
/// Nested objects are flattened into dotted keys, so `{"LIGHTGROUPS": {"Title": "..."}}` and
/// `{"LIGHTGROUPS.Title": "..."}` are equivalent.
#[derive(Debug, Default, Clone)]
pub struct Translations {
    strings: BTreeMap<String, String>,
}

impl Translations {
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Self, TranslationsError> {
        let json = tokio::fs::read(path.as_ref()).await?;
        let value: serde_json::Value = serde_json::from_slice(&json)?;
        let this = Self::from_value(&value)?;

        debug!(path = %path.as_ref().display(), count = this.strings.len(), "loaded translations");

        Ok(this)
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self, TranslationsError> {
        let root = value.as_object().ok_or(TranslationsError::NotAnObject)?;

        let mut strings = BTreeMap::new();
        Self::flatten(None, root, &mut strings);

        Ok(Self { strings })
    }

    fn flatten(
        prefix: Option<&str>,
        object: &serde_json::Map<String, serde_json::Value>,
        strings: &mut BTreeMap<String, String>,
    ) {
        for (key, value) in object {
            let key = match prefix {
                Some(prefix) => format!("{}.{}", prefix, key),
                None => key.clone(),
            };

            match value {
                serde_json::Value::String(s) => {
                    strings.insert(key, s.clone());
                }
                serde_json::Value::Object(inner) => {
                    Self::flatten(Some(&key), inner, strings);
                }
                _ => {
                    warn!(key = %key, "ignoring non-string translation");
                }
            }
        }
    }
}

impl Localization for Translations {
    fn has(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }

    fn localize(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}
