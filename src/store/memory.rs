use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EntityStore, StoreError};
use crate::{
    config::{DEFAULT_FLAG_KEY, DEFAULT_FLAG_NAMESPACE},
    models::{EntityType, LightEntity, LightPatch, Scene},
};

/// Entity store keeping a single scene in memory
#[derive(Debug)]
pub struct MemoryStore {
    scene: RwLock<Scene>,
    label_flag: (String, String),
    read_only: bool,
    batches: AtomicUsize,
}

impl MemoryStore {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene: RwLock::new(scene),
            label_flag: (DEFAULT_FLAG_NAMESPACE.to_owned(), DEFAULT_FLAG_KEY.to_owned()),
            read_only: false,
            batches: AtomicUsize::new(0),
        }
    }

    /// Flag the group label is written to when a patch changes it
    pub fn with_label_flag(mut self, (namespace, key): (&str, &str)) -> Self {
        self.label_flag = (namespace.to_owned(), key.to_owned());
        self
    }

    /// Reject every submission with [StoreError::PermissionDenied]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Number of batches applied so far
    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub async fn scene(&self) -> Scene {
        self.scene.read().await.clone()
    }

    /// Apply a batch to `scene`. Nothing is modified unless every patch targets an existing
    /// light.
    pub(super) fn apply_batch(
        scene: &mut Scene,
        patches: &[LightPatch],
        (namespace, key): (&str, &str),
    ) -> Result<(), StoreError> {
        if let Some(missing) = patches.iter().find(|patch| scene.light(&patch.id).is_none()) {
            return Err(StoreError::EntityNotFound(missing.id.clone()));
        }

        for patch in patches {
            if let Some(light) = scene.light_mut(&patch.id) {
                light.apply(patch, (namespace, key));
            }
        }

        Ok(())
    }

    pub(super) async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, Scene> {
        self.scene.write().await
    }

    pub(super) fn label_flag(&self) -> (&str, &str) {
        (&self.label_flag.0, &self.label_flag.1)
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list_lights(&self, scene_id: &str) -> Result<Vec<LightEntity>, StoreError> {
        let scene = self.scene.read().await;

        if scene.id != scene_id {
            return Err(StoreError::SceneNotFound(scene_id.to_owned()));
        }

        Ok(scene.lights.clone())
    }

    async fn submit_patch(
        &self,
        entity_type: EntityType,
        patches: &[LightPatch],
    ) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::PermissionDenied);
        }

        let mut scene = self.scene.write().await;
        Self::apply_batch(&mut scene, patches, self.label_flag())?;
        self.batches.fetch_add(1, Ordering::SeqCst);

        trace!(entity_type = %entity_type, count = patches.len(), "applied patch batch");

        Ok(())
    }
}
