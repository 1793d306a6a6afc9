use std::collections::BTreeMap;

use parse_display::Display;
use serde_derive::{Deserialize, Serialize};

mod patch;
pub use patch::*;

mod scene;
pub use scene::*;

pub type Color = palette::rgb::Srgb<u8>;

/// Opaque identifier of a light entity, assigned by the host store
#[derive(Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display("{0}")]
#[serde(transparent)]
pub struct EntityId(pub String);

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of embedded document a patch batch targets
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    #[display("AmbientLight")]
    AmbientLight,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
}

/// Light source settings relevant to group editing
///
/// Fields the host never wrote stay `None`, so the projector can tell "absent" from a real
/// value and apply its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Color intensity, between 0 and 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// Darkness sources occlude instead of emitting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub darkness: Option<bool>,
    /// Older spelling of `darkness`, kept in sync with it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dim: Option<f64>,
    pub animation: AnimationConfig,
}

impl LightConfig {
    pub fn is_darkness_source(&self) -> bool {
        self.darkness.unwrap_or(false) || self.negative.unwrap_or(false)
    }
}

/// Namespaced key-value storage attached to an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(BTreeMap<String, BTreeMap<String, serde_json::Value>>);

impl Flags {
    pub fn get(&self, namespace: &str, key: &str) -> Option<&serde_json::Value> {
        self.0.get(namespace).and_then(|scope| scope.get(key))
    }

    pub fn set(&mut self, namespace: &str, key: &str, value: serde_json::Value) {
        self.0
            .entry(namespace.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
    }

    pub fn unset(&mut self, namespace: &str, key: &str) {
        if let Some(scope) = self.0.get_mut(namespace) {
            scope.remove(key);

            if scope.is_empty() {
                self.0.remove(namespace);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightEntity {
    pub id: EntityId,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub config: LightConfig,
    #[serde(default)]
    pub flags: Flags,
}

impl LightEntity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            hidden: false,
            config: Default::default(),
            flags: Default::default(),
        }
    }

    /// Apply a patch to this entity. `label_flag` is the (namespace, key) pair the group
    /// label is stored under.
    pub fn apply(&mut self, patch: &LightPatch, label_flag: (&str, &str)) {
        if let Some(hidden) = patch.hidden {
            self.hidden = hidden;
        }

        if let Some(config) = &patch.config {
            config.apply(&mut self.config);
        }

        if let Some(label) = &patch.group_label {
            let (namespace, key) = label_flag;
            match label {
                Some(label) => self
                    .flags
                    .set(namespace, key, serde_json::Value::String(label.clone())),
                None => self.flags.unset(namespace, key),
            }
        }
    }
}

/// Group label of an entity, as read from its flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLabel {
    /// The flag was never set, or holds a non-string value
    Undefined,
    /// The flag is set, but empty or whitespace only
    Blank,
    /// The trimmed label
    Named(String),
}

impl GroupLabel {
    pub fn from_flag(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::String(label)) => Self::from(label.as_str()),
            _ => Self::Undefined,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for GroupLabel {
    fn from(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            Self::Blank
        } else {
            Self::Named(trimmed.to_owned())
        }
    }
}
