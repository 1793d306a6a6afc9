use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{EntityStore, MemoryStore, StoreError};
use crate::models::{EntityType, LightEntity, LightPatch, Scene};

/// Entity store backed by a TOML scene document
///
/// The document is rewritten after every successful batch. If writing fails, the batch is not
/// applied to the in-memory copy either.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    pub async fn load(path: &Path, label_flag: (&str, &str)) -> Result<Self, StoreError> {
        let full = tokio::fs::read_to_string(path).await?;
        let scene: Scene = toml::from_str(&full)?;

        info!(
            path = %path.display(),
            scene = %scene.id,
            lights = scene.lights.len(),
            "loaded scene"
        );

        Ok(Self {
            path: path.to_owned(),
            inner: MemoryStore::new(scene).with_label_flag(label_flag),
        })
    }

    pub async fn scene(&self) -> Scene {
        self.inner.scene().await
    }

    async fn save(&self, scene: &Scene) -> Result<(), StoreError> {
        let contents = toml::to_string_pretty(scene)?;

        // Write next to the target, then move it over so readers never see a partial file
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl EntityStore for FileStore {
    async fn list_lights(&self, scene_id: &str) -> Result<Vec<LightEntity>, StoreError> {
        self.inner.list_lights(scene_id).await
    }

    async fn submit_patch(
        &self,
        entity_type: EntityType,
        patches: &[LightPatch],
    ) -> Result<(), StoreError> {
        let mut scene = self.inner.write().await;

        let mut updated = scene.clone();
        MemoryStore::apply_batch(&mut updated, patches, self.inner.label_flag())?;
        self.save(&updated).await?;
        *scene = updated;

        debug!(
            path = %self.path.display(),
            entity_type = %entity_type,
            count = patches.len(),
            "saved scene"
        );

        Ok(())
    }
}
