//! Group operations against the host collaborators

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use serde_derive::Serialize;
use thiserror::Error;

use crate::{
    config::Settings,
    group::{self, Group, GroupEditState, GroupIndex, Radius},
    l10n::{self, Localization},
    models::{EntityId, EntityType, LightPatch},
    store::{EntityStore, FlagLabels, RefreshRequest, Renderer, StoreError},
};


#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("only privileged operators can manage light groups")]
    NotPrivileged,
    #[error("an update of group {0} is already pending")]
    Busy(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A group, as presented to the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub name: String,
    pub member_ids: Vec<EntityId>,
    pub state: GroupEditState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The store accepted the batch
    Applied {
        group: String,
        patched: usize,
        /// Localized message for the operator
        notice: String,
    },
    /// Nothing matched, nothing was submitted
    Unchanged { group: String },
}

#[derive(Debug, Clone, Copy)]
enum Notice {
    Enabled,
    Disabled,
    Updated,
    Recolored,
    Scaled(Radius),
    Assigned,
    Unassigned,
}

impl Notice {
    fn text(self, l10n: &dyn Localization, group: &str, count: usize) -> String {
        let (key, fallback) = match self {
            Self::Enabled => ("LIGHTGROUPS.NoticeEnabled", "{group}: enabled"),
            Self::Disabled => ("LIGHTGROUPS.NoticeDisabled", "{group}: disabled"),
            Self::Updated => ("LIGHTGROUPS.NoticeUpdated", "{group}: updated"),
            Self::Recolored => ("LIGHTGROUPS.NoticeColor", "{group}: color changed"),
            Self::Scaled(Radius::Bright) => {
                ("LIGHTGROUPS.NoticeBrightness", "{group}: brightness adjusted")
            }
            Self::Scaled(Radius::Dim) => ("LIGHTGROUPS.NoticeRadius", "{group}: radius adjusted"),
            Self::Assigned => ("LIGHTGROUPS.NoticeAssigned", "{group}: {count} lights assigned"),
            Self::Unassigned => (
                "LIGHTGROUPS.NoticeUnassigned",
                "{count} lights removed from their group",
            ),
        };

        l10n::format(
            l10n,
            key,
            fallback,
            &[("group", group), ("count", &count.to_string())],
        )
    }

    fn toggled(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Marks a group as having a submission in flight until dropped
struct PendingGuard {
    pending: Arc<Mutex<HashSet<String>>>,
    name: String,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.name);
    }
}

pub struct GroupManager {
    scene_id: String,
    store: Arc<dyn EntityStore>,
    renderer: Arc<dyn Renderer>,
    l10n: Arc<dyn Localization>,
    settings: Arc<Settings>,
    pending: Arc<Mutex<HashSet<String>>>,
}

impl std::fmt::Debug for GroupManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupManager")
            .field("scene_id", &self.scene_id)
            .finish()
    }
}

impl GroupManager {
    pub fn new(
        scene_id: impl Into<String>,
        store: Arc<dyn EntityStore>,
        renderer: Arc<dyn Renderer>,
        l10n: Arc<dyn Localization>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            scene_id: scene_id.into(),
            store,
            renderer,
            l10n,
            settings,
            pending: Default::default(),
        }
    }

    fn check_privileged(&self) -> Result<(), ManagerError> {
        if self.settings.privileged {
            Ok(())
        } else {
            Err(ManagerError::NotPrivileged)
        }
    }

    fn begin(&self, name: &str) -> Result<PendingGuard, ManagerError> {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !pending.insert(name.to_owned()) {
            return Err(ManagerError::Busy(name.to_owned()));
        }

        Ok(PendingGuard {
            pending: self.pending.clone(),
            name: name.to_owned(),
        })
    }

    async fn index(&self) -> Result<GroupIndex, ManagerError> {
        let lights = self.store.list_lights(&self.scene_id).await?;
        let labels = FlagLabels::new(&*self.store, self.settings.label_flag());
        Ok(group::index(lights, &labels))
    }

    /// Current groups with their edit state, sorted by name
    #[instrument(skip(self))]
    pub async fn groups(&self) -> Result<Vec<GroupView>, ManagerError> {
        self.check_privileged()?;

        Ok(self
            .index()
            .await?
            .into_iter()
            .map(|group| GroupView {
                name: group.name().to_owned(),
                member_ids: group.member_ids().cloned().collect(),
                state: self.project(&group),
            })
            .collect())
    }

    /// Edit state of a group, built with this manager's catalog and translations
    pub fn project(&self, group: &Group) -> GroupEditState {
        group::project(group, &self.settings.animations, &*self.l10n)
    }

    /// Make every member of the group match the edited state
    #[instrument(skip(self, edited))]
    pub async fn submit(
        &self,
        name: &str,
        edited: &GroupEditState,
    ) -> Result<Outcome, ManagerError> {
        self.mutate(name, |group| (group::build(group, edited), Notice::Updated))
            .await
    }

    /// Enable or disable every member of the group
    #[instrument(skip(self))]
    pub async fn toggle(&self, name: &str, enabled: bool) -> Result<Outcome, ManagerError> {
        self.mutate(name, |group| {
            (group::toggle(group, enabled), Notice::toggled(enabled))
        })
        .await
    }

    /// Invert the group's state, as displayed from its lead member
    #[instrument(skip(self))]
    pub async fn flip(&self, name: &str) -> Result<Outcome, ManagerError> {
        self.mutate(name, |group| {
            (group::flip(group), Notice::toggled(group.lead().hidden))
        })
        .await
    }

    /// Set the color of every member of the group, leaving everything else untouched
    #[instrument(skip(self))]
    pub async fn recolor(&self, name: &str, color: &str) -> Result<Outcome, ManagerError> {
        self.mutate(name, |group| (group::recolor(group, color), Notice::Recolored))
            .await
    }

    /// Multiply a radius of every member of the group
    #[instrument(skip(self))]
    pub async fn scale(
        &self,
        name: &str,
        radius: Radius,
        multiplier: f64,
    ) -> Result<Outcome, ManagerError> {
        self.mutate(name, |group| {
            (group::scale(group, radius, multiplier), Notice::Scaled(radius))
        })
        .await
    }

    /// Move lights into the group `label`, or out of any group if `label` is blank
    ///
    /// Both the target group and every group the lights leave must be idle.
    #[instrument(skip(self))]
    pub async fn assign(&self, ids: &[EntityId], label: &str) -> Result<Outcome, ManagerError> {
        self.check_privileged()?;

        let name = label.trim();
        let mut guards = vec![self.begin(name)?];

        if ids.is_empty() {
            return Ok(Outcome::Unchanged {
                group: name.to_owned(),
            });
        }

        for source in &self.index().await? {
            if source.name() != name && source.member_ids().any(|id| ids.contains(id)) {
                guards.push(self.begin(source.name())?);
            }
        }

        let patches = group::assign(ids, name);
        self.store
            .submit_patch(EntityType::AmbientLight, &patches)
            .await?;

        let notice = if name.is_empty() {
            Notice::Unassigned
        } else {
            Notice::Assigned
        };

        Ok(self.applied(name, &patches, notice))
    }

    async fn mutate(
        &self,
        name: &str,
        make: impl FnOnce(&Group) -> (Vec<LightPatch>, Notice),
    ) -> Result<Outcome, ManagerError> {
        self.check_privileged()?;

        let name = name.trim();
        let _guard = self.begin(name)?;

        let index = self.index().await?;
        let group = match index.get(name) {
            Some(group) => group,
            None => {
                debug!(group = %name, "no lights in group, nothing to do");
                return Ok(Outcome::Unchanged {
                    group: name.to_owned(),
                });
            }
        };

        let (patches, notice) = make(group);

        if let Err(error) = self
            .store
            .submit_patch(EntityType::AmbientLight, &patches)
            .await
        {
            error!(group = %name, error = %error, "updating light group failed");
            return Err(error.into());
        }

        for id in group.member_ids() {
            self.renderer.reinitialize_source(id);
        }

        self.renderer.request_refresh(RefreshRequest {
            lighting: true,
            vision: true,
        });

        Ok(self.applied(name, &patches, notice))
    }

    fn applied(&self, name: &str, patches: &[LightPatch], notice: Notice) -> Outcome {
        let notice = notice.text(&*self.l10n, name, patches.len());
        info!(group = %name, count = patches.len(), "{}", notice);

        Outcome::Applied {
            group: name.to_owned(),
            patched: patches.len(),
            notice,
        }
    }
}
