#![forbid(unsafe_code)]

use murmur_domain::{Contact, ContactId, GroupInfo, GroupMemberRole};

use super::contacts::prohibited_to_invite_incognito;

/// Contacts chosen on the add-members screen, in the order they were picked.
///
/// Behaves as an ordered set: an id is stored at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedContacts {
	ids: Vec<ContactId>,
}

impl SelectedContacts {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `id` unless already selected. Returns whether the set changed.
	pub fn add_contact(&mut self, id: ContactId) -> bool {
		if self.ids.contains(&id) {
			return false;
		}
		self.ids.push(id);
		true
	}

	/// Removes `id`. Returns whether the set changed.
	pub fn remove_contact(&mut self, id: ContactId) -> bool {
		let before = self.ids.len();
		self.ids.retain(|selected| *selected != id);
		self.ids.len() != before
	}

	/// Empties the selection, returning how many contacts were dropped.
	pub fn clear_selection(&mut self) -> usize {
		let dropped = self.ids.len();
		self.ids.clear();
		dropped
	}

	/// Keeps only the ids `keep` accepts, returning how many were dropped.
	pub fn retain(&mut self, mut keep: impl FnMut(ContactId) -> bool) -> usize {
		let before = self.ids.len();
		self.ids.retain(|id| keep(*id));
		before - self.ids.len()
	}

	pub fn contains(&self, id: ContactId) -> bool {
		self.ids.contains(&id)
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = ContactId> + '_ {
		self.ids.iter().copied()
	}

	pub fn as_slice(&self) -> &[ContactId] {
		&self.ids
	}
}

/// Drops selected ids that are no longer eligible or that may not be invited.
///
/// Returns how many ids were dropped.
pub fn prune_selection(selected: &mut SelectedContacts, group_info: &GroupInfo, contacts_to_add: &[Contact]) -> usize {
	selected.retain(|id| {
		contacts_to_add
			.iter()
			.any(|c| c.contact_id == id && !prohibited_to_invite_incognito(group_info, c))
	})
}

/// Roles the user may grant in `group_info`, lowest first.
pub fn role_choices(group_info: &GroupInfo) -> Vec<GroupMemberRole> {
	GroupMemberRole::up_to(group_info.membership.member_role).collect()
}

/// Role preselected when the screen opens: the configured default, capped by the user's own role.
pub fn initial_role(configured: GroupMemberRole, group_info: &GroupInfo) -> GroupMemberRole {
	configured.min(group_info.membership.member_role)
}
