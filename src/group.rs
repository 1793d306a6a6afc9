//! Light groups: indexing, edit state projection and batch mutations

use crate::models::{EntityId, GroupLabel, LightEntity};

mod batch;
pub use batch::*;

mod form;

mod index;
pub use index::*;

mod state;
pub use state::*;

/// Reads the group label of an entity
pub trait LabelSource {
    fn group_label(&self, entity: &LightEntity) -> GroupLabel;
}

/// Lights sharing one non-empty trimmed label
///
/// Groups only exist as the output of [index], and always have at least one member.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    members: Vec<LightEntity>,
}

impl Group {
    fn new(name: String, lead: LightEntity) -> Self {
        Self {
            name,
            members: vec![lead],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members, in discovery order
    pub fn members(&self) -> &[LightEntity] {
        &self.members
    }

    /// First discovered member, which supplies the values displayed for the group
    pub fn lead(&self) -> &LightEntity {
        &self.members[0]
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.members.iter().map(|member| &member.id)
    }
}
