//! Host collaborators: entity store and renderer

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    group::LabelSource,
    models::{EntityId, EntityType, GroupLabel, LightEntity, LightPatch},
};

mod file;
pub use file::FileStore;

mod memory;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("scene not found: {0}")]
    SceneNotFound(String),
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("cannot serialize scene: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Persistent storage of the scene's light entities
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// All lights of a scene, in scene order
    async fn list_lights(&self, scene_id: &str) -> Result<Vec<LightEntity>, StoreError>;

    /// Value of a flag set on an entity
    fn get_flag(&self, entity: &LightEntity, namespace: &str, key: &str) -> Option<serde_json::Value> {
        entity.flags.get(namespace, key).cloned()
    }

    /// Apply a batch of patches in a single request
    async fn submit_patch(
        &self,
        entity_type: EntityType,
        patches: &[LightPatch],
    ) -> Result<(), StoreError>;
}

/// Which parts of the scene need a redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    pub lighting: bool,
    pub vision: bool,
}

/// Host rendering pipeline
pub trait Renderer: Send + Sync {
    /// Rebuild the live light source for an entity. Best effort, no result is reported.
    fn reinitialize_source(&self, id: &EntityId);

    fn request_refresh(&self, request: RefreshRequest);
}

/// Renderer for hosts without a rendering pipeline: requests are only logged
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn reinitialize_source(&self, id: &EntityId) {
        debug!(id = %id, "reinitialize light source");
    }

    fn request_refresh(&self, request: RefreshRequest) {
        debug!(
            lighting = request.lighting,
            vision = request.vision,
            "refresh requested"
        );
    }
}

/// Reads group labels through [EntityStore::get_flag]
pub struct FlagLabels<'s, S: ?Sized> {
    store: &'s S,
    namespace: &'s str,
    key: &'s str,
}

impl<'s, S: EntityStore + ?Sized> FlagLabels<'s, S> {
    pub fn new(store: &'s S, (namespace, key): (&'s str, &'s str)) -> Self {
        Self {
            store,
            namespace,
            key,
        }
    }
}

impl<'s, S: EntityStore + ?Sized> LabelSource for FlagLabels<'s, S> {
    fn group_label(&self, entity: &LightEntity) -> GroupLabel {
        GroupLabel::from_flag(
            self.store
                .get_flag(entity, self.namespace, self.key)
                .as_ref(),
        )
    }
}
