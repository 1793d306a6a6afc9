use serde_derive::Serialize;

use super::{EntityId, LightConfig};

/// Update request for a single light entity
///
/// Only the fields which are set are written by the store; everything else on the entity is
/// left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightPatch {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigPatch>,
    /// `Some(None)` clears the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_label: Option<Option<String>>,
}

impl LightPatch {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            hidden: None,
            config: None,
            group_label: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub darkness: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dim: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationPatch>,
}

impl ConfigPatch {
    pub fn apply(&self, config: &mut LightConfig) {
        fn set<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        set(&mut config.color, &self.color);
        set(&mut config.alpha, &self.alpha);
        set(&mut config.darkness, &self.darkness);
        set(&mut config.negative, &self.negative);
        set(&mut config.vision, &self.vision);
        set(&mut config.bright, &self.bright);
        set(&mut config.dim, &self.dim);

        if let Some(animation) = &self.animation {
            config.animation.kind = animation.kind.clone();
            config.animation.speed = Some(animation.speed);
            config.animation.intensity = Some(animation.intensity);
            config.animation.reverse = Some(animation.reverse);
        }
    }
}

/// Full replacement of a light's animation settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationPatch {
    /// `None` removes the animation
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub speed: f64,
    pub intensity: f64,
    pub reverse: bool,
}
