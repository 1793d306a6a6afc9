use serde_derive::{Deserialize, Serialize};

use super::{EntityId, LightEntity};

/// Scene document, as stored by the bundled stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    pub lights: Vec<LightEntity>,
}

impl Scene {
    pub fn light(&self, id: &EntityId) -> Option<&LightEntity> {
        self.lights.iter().find(|light| &light.id == id)
    }

    pub fn light_mut(&mut self, id: &EntityId) -> Option<&mut LightEntity> {
        self.lights.iter_mut().find(|light| &light.id == id)
    }
}
