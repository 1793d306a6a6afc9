use std::{cmp::Ordering, collections::HashMap};

use feruca::Collator;

use super::{Group, LabelSource};
use crate::models::{GroupLabel, LightEntity};

/// Groups of a scene, sorted by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupIndex {
    groups: Vec<Group>,
}

impl GroupIndex {
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(Group::name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl IntoIterator for GroupIndex {
    type Item = Group;
    type IntoIter = std::vec::IntoIter<Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a GroupIndex {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Collation used to order group names
///
/// Unicode collation at the root locale: accents and case are secondary and tertiary
/// differences, so "alley" < "Alley" < "Église" < "forge".
pub fn compare_names(a: &str, b: &str) -> Ordering {
    Collator::default().collate(a, b)
}

/// Partition lights into groups by label
///
/// Lights without a label, or with a blank one, are skipped. Within a group, members keep the
/// order in which they appear in `lights`.
pub fn index(
    lights: impl IntoIterator<Item = LightEntity>,
    labels: &(impl LabelSource + ?Sized),
) -> GroupIndex {
    let mut groups: Vec<Group> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for light in lights {
        let name = match labels.group_label(&light) {
            GroupLabel::Named(name) => name,
            GroupLabel::Blank | GroupLabel::Undefined => continue,
        };

        match positions.get(&name) {
            Some(&position) => groups[position].members.push(light),
            None => {
                positions.insert(name.clone(), groups.len());
                groups.push(Group::new(name, light));
            }
        }
    }

    let mut collator = Collator::default();
    groups.sort_by(|a, b| collator.collate(a.name.as_str(), b.name.as_str()));

    trace!(count = groups.len(), "indexed light groups");

    GroupIndex { groups }
}
