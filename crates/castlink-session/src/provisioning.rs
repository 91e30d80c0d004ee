//! Provisioning: creating groups and assigning scenes on connect.
//!
//! The tracker never trusts individual acknowledgements. It keeps the set of
//! groups and the default scene it asked for, and each check rescans the
//! authoritative [`GroupDirectory`], crossing off whatever is now present.
//! An acknowledgement that arrives out of order, twice, or as part of a full
//! `groupList` is therefore handled the same way.

use std::collections::{BTreeMap, BTreeSet};

use castlink_proto::{ClientMessage, DEFAULT_GROUP_ID, Group};

use crate::GroupSceneBinding;

/// The service's group list as last reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDirectory {
    scenes: BTreeMap<String, String>,
}

impl GroupDirectory {
    /// Insert or update groups (`groupsCreated`, `groupsUpdated`).
    pub fn upsert(&mut self, groups: &[Group]) {
        for group in groups {
            self.scenes.insert(group.group_id.clone(), group.scene_id.clone());
        }
    }

    /// Replace the whole directory (`groupList`).
    pub fn replace(&mut self, groups: &[Group]) {
        self.scenes.clear();
        self.upsert(groups);
    }

    /// Scene assigned to `group_id`.
    pub fn scene_of(&self, group_id: &str) -> Option<&str> {
        self.scenes.get(group_id).map(String::as_str)
    }

    /// True if the group exists.
    pub fn contains(&self, group_id: &str) -> bool {
        self.scenes.contains_key(group_id)
    }

    /// Groups in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.scenes.iter().map(|(group, scene)| (group.as_str(), scene.as_str()))
    }

    /// Number of known groups.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// True if no groups are known.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Forget every group.
    pub fn clear(&mut self) {
        self.scenes.clear();
    }
}

/// Requests sent on connect that the service has not yet acknowledged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningTracker {
    pending_groups: BTreeSet<String>,
    pending_default_scene: Option<String>,
}

impl ProvisioningTracker {
    /// Record the requests for `bindings` and `default_scene` as outstanding
    /// and return the messages that make them.
    ///
    /// Empty group ids, the reserved default group and groups already being
    /// tracked are skipped. The first binding for a group wins.
    pub fn begin(
        &mut self,
        bindings: &[GroupSceneBinding],
        default_scene: Option<&str>,
    ) -> Vec<ClientMessage> {
        let mut messages = Vec::new();

        let mut groups = Vec::new();
        for binding in bindings {
            if binding.group_id.is_empty() {
                continue;
            }
            if binding.group_id == DEFAULT_GROUP_ID {
                tracing::debug!(scene = %binding.scene_id, "default group already exists, not creating it");
                continue;
            }
            if self.pending_groups.insert(binding.group_id.clone()) {
                groups.push(Group::new(&binding.group_id, &binding.scene_id));
            }
        }
        if !groups.is_empty() {
            messages.push(ClientMessage::CreateGroups { groups });
        }

        if let Some(scene) = default_scene.filter(|scene| !scene.is_empty()) {
            self.pending_default_scene = Some(scene.to_owned());
            messages.push(ClientMessage::UpdateGroups { groups: vec![Group::new(DEFAULT_GROUP_ID, scene)] });
        }

        tracing::debug!(
            groups = self.pending_groups.len(),
            default_scene = ?self.pending_default_scene,
            "provisioning requested"
        );
        messages
    }

    /// Cross off everything `directory` now satisfies. True once nothing is
    /// outstanding.
    pub fn is_complete(&mut self, directory: &GroupDirectory) -> bool {
        self.pending_groups.retain(|group| !directory.contains(group));
        if self
            .pending_default_scene
            .as_deref()
            .is_some_and(|scene| directory.scene_of(DEFAULT_GROUP_ID) == Some(scene))
        {
            self.pending_default_scene = None;
        }
        self.pending_groups.is_empty() && self.pending_default_scene.is_none()
    }

    /// True while any request is outstanding.
    pub fn has_outstanding(&self) -> bool {
        self.outstanding() > 0
    }

    /// Number of outstanding requests.
    pub fn outstanding(&self) -> usize {
        self.pending_groups.len() + usize::from(self.pending_default_scene.is_some())
    }

    /// Groups not yet acknowledged.
    pub fn outstanding_groups(&self) -> impl Iterator<Item = &str> + '_ {
        self.pending_groups.iter().map(String::as_str)
    }

    /// Default scene not yet acknowledged.
    pub fn pending_default_scene(&self) -> Option<&str> {
        self.pending_default_scene.as_deref()
    }

    /// Forget everything outstanding.
    pub fn reset(&mut self) {
        self.pending_groups.clear();
        self.pending_default_scene = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> Vec<GroupSceneBinding> {
        pairs.iter().map(|(g, s)| GroupSceneBinding::new(*g, *s)).collect()
    }

    #[test]
    fn begin_builds_create_and_update() {
        let mut tracker = ProvisioningTracker::default();
        let messages = tracker.begin(&bindings(&[("vip", "vip-scene")]), Some("lobby"));

        assert_eq!(messages, vec![
            ClientMessage::CreateGroups { groups: vec![Group::new("vip", "vip-scene")] },
            ClientMessage::UpdateGroups { groups: vec![Group::new("default", "lobby")] },
        ]);
        assert_eq!(tracker.outstanding(), 2);
    }

    #[test]
    fn begin_skips_empty_default_and_duplicate_groups() {
        let mut tracker = ProvisioningTracker::default();
        let messages =
            tracker.begin(&bindings(&[("", "x"), ("default", "y"), ("a", "1"), ("a", "2")]), None);

        assert_eq!(messages, vec![ClientMessage::CreateGroups { groups: vec![Group::new("a", "1")] }]);
        assert_eq!(tracker.outstanding_groups().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn nothing_requested_is_complete() {
        let mut tracker = ProvisioningTracker::default();
        assert!(tracker.begin(&[], None).is_empty());
        assert!(tracker.is_complete(&GroupDirectory::default()));
    }

    #[test]
    fn completes_only_when_directory_satisfies_everything() {
        let mut tracker = ProvisioningTracker::default();
        tracker.begin(&bindings(&[("vip", "vip-scene"), ("mods", "m")]), Some("lobby"));
        let mut directory = GroupDirectory::default();

        directory.upsert(&[Group::new("vip", "vip-scene")]);
        assert!(!tracker.is_complete(&directory));
        assert_eq!(tracker.outstanding(), 2);

        directory.upsert(&[Group::new("default", "elsewhere"), Group::new("mods", "m")]);
        assert!(!tracker.is_complete(&directory));
        assert_eq!(tracker.pending_default_scene(), Some("lobby"));

        directory.replace(&[Group::new("default", "lobby")]);
        assert!(tracker.is_complete(&directory));
    }

    #[test]
    fn reset_clears_outstanding() {
        let mut tracker = ProvisioningTracker::default();
        tracker.begin(&bindings(&[("vip", "s")]), Some("lobby"));
        tracker.reset();
        assert!(!tracker.has_outstanding());
    }
}
