#![forbid(unsafe_code)]

use std::sync::Arc;

use murmur_domain::{ChatInfo, GroupId, GroupInfo, GroupMember};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct ModelData {
	chats: Vec<ChatInfo>,
	group_members: Vec<GroupMember>,
}

/// Observable client-side model: known chats and group members of all groups.
///
/// Cheap to clone; clones share the same data. Every mutation bumps a revision that
/// subscribers observe through [`ChatModel::subscribe`].
#[derive(Debug, Clone)]
pub struct ChatModel {
	inner: Arc<RwLock<ModelData>>,
	revision_tx: Arc<watch::Sender<u64>>,
}

impl Default for ChatModel {
	fn default() -> Self {
		Self::new()
	}
}

impl ChatModel {
	pub fn new() -> Self {
		Self::with_data(Vec::new(), Vec::new())
	}

	pub fn with_data(chats: Vec<ChatInfo>, group_members: Vec<GroupMember>) -> Self {
		let (revision_tx, _) = watch::channel(0);
		Self {
			inner: Arc::new(RwLock::new(ModelData { chats, group_members })),
			revision_tx: Arc::new(revision_tx),
		}
	}

	/// Snapshot of all chats.
	pub fn chats(&self) -> Vec<ChatInfo> {
		self.inner.read().chats.clone()
	}

	/// Snapshot of the members of all groups.
	pub fn group_members(&self) -> Vec<GroupMember> {
		self.inner.read().group_members.clone()
	}

	pub fn group_members_of(&self, group_id: GroupId) -> Vec<GroupMember> {
		self.inner
			.read()
			.group_members
			.iter()
			.filter(|m| m.group_id == group_id)
			.cloned()
			.collect()
	}

	/// Run `f` against the current chats and members without cloning them.
	pub fn read<R>(&self, f: impl FnOnce(&[ChatInfo], &[GroupMember]) -> R) -> R {
		let data = self.inner.read();
		f(&data.chats, &data.group_members)
	}

	pub fn set_chats(&self, chats: Vec<ChatInfo>) {
		self.inner.write().chats = chats;
		self.bump();
	}

	pub fn add_chat(&self, chat: ChatInfo) {
		self.inner.write().chats.push(chat);
		self.bump();
	}

	pub fn set_group_members(&self, group_members: Vec<GroupMember>) {
		self.inner.write().group_members = group_members;
		self.bump();
	}

	/// Insert or replace a member of `group_info`, keyed by member id.
	///
	/// Returns `true` when the member was inserted, `false` when an existing record was replaced
	/// or the member belongs to another group.
	pub fn upsert_group_member(&self, group_info: &GroupInfo, member: GroupMember) -> bool {
		if member.group_id != group_info.group_id {
			warn!(
				group_id = %group_info.group_id,
				member_group_id = %member.group_id,
				group_member_id = %member.group_member_id,
				"upsert_group_member: member belongs to another group"
			);
			return false;
		}

		let inserted = {
			let mut data = self.inner.write();
			match data
				.group_members
				.iter_mut()
				.find(|m| m.group_member_id == member.group_member_id)
			{
				Some(existing) => {
					*existing = member;
					false
				}
				None => {
					data.group_members.push(member);
					true
				}
			}
		};
		debug!(group_id = %group_info.group_id, inserted, "upsert_group_member");
		self.bump();
		inserted
	}

	/// Receiver that changes whenever the model is mutated.
	pub fn subscribe(&self) -> watch::Receiver<u64> {
		self.revision_tx.subscribe()
	}

	pub fn revision(&self) -> u64 {
		*self.revision_tx.borrow()
	}

	fn bump(&self) {
		self.revision_tx.send_modify(|revision| *revision += 1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use murmur_domain::{
		Contact, ContactId, GroupMemberId, GroupMemberRole, GroupMemberStatus, GroupProfile,
	};

	fn member(id: i64, group: i64, contact: i64) -> GroupMember {
		GroupMember {
			group_member_id: GroupMemberId(id),
			group_id: GroupId(group),
			member_role: GroupMemberRole::Member,
			member_status: GroupMemberStatus::Invited,
			member_contact_id: Some(ContactId(contact)),
			display_name: format!("contact-{contact}"),
			member_incognito: false,
		}
	}

	fn group(id: i64) -> GroupInfo {
		GroupInfo {
			group_id: GroupId(id),
			local_display_name: "team".to_string(),
			group_profile: GroupProfile {
				display_name: "team".to_string(),
				..Default::default()
			},
			membership: GroupMember {
				member_role: GroupMemberRole::Owner,
				member_status: GroupMemberStatus::Creator,
				member_contact_id: None,
				..member(100, id, 0)
			},
		}
	}

	#[test]
	fn upsert_inserts_then_replaces() {
		let model = ChatModel::new();
		let g = group(1);

		assert!(model.upsert_group_member(&g, member(1, 1, 10)));
		assert_eq!(model.group_members().len(), 1);

		let mut updated = member(1, 1, 10);
		updated.member_status = GroupMemberStatus::Connected;
		assert!(!model.upsert_group_member(&g, updated.clone()));

		let members = model.group_members();
		assert_eq!(members, vec![updated]);
	}

	#[test]
	fn upsert_rejects_member_of_another_group() {
		let model = ChatModel::new();
		let before = model.revision();
		assert!(!model.upsert_group_member(&group(1), member(1, 2, 10)));
		assert!(model.group_members().is_empty());
		assert_eq!(model.revision(), before);
	}

	#[test]
	fn mutations_bump_revision_for_subscribers() {
		let model = ChatModel::new();
		let mut rx = model.subscribe();
		assert!(!rx.has_changed().unwrap());

		model.add_chat(Contact::new(ContactId(1), "alice").into());
		assert!(rx.has_changed().unwrap());
		assert_eq!(*rx.borrow_and_update(), 1);

		model.upsert_group_member(&group(1), member(1, 1, 1));
		assert_eq!(model.revision(), 2);
	}

	#[test]
	fn replacing_chats_and_members_bumps_revision() {
		let model = ChatModel::with_data(vec![Contact::new(ContactId(1), "alice").into()], vec![member(1, 1, 1)]);
		let mut rx = model.subscribe();

		model.set_chats(vec![group(1).into(), Contact::new(ContactId(2), "bob").into()]);
		assert!(rx.has_changed().unwrap());
		assert_eq!(model.read(|chats, _| chats.len()), 2);

		model.set_group_members(Vec::new());
		assert!(model.group_members().is_empty());
		assert_eq!(*rx.borrow_and_update(), 2);
	}

	#[test]
	fn group_members_of_filters_by_group() {
		let model = ChatModel::with_data(Vec::new(), vec![member(1, 1, 10), member(2, 2, 11), member(3, 1, 12)]);
		let ids: Vec<_> = model.group_members_of(GroupId(1)).into_iter().map(|m| m.group_member_id).collect();
		assert_eq!(ids, vec![GroupMemberId(1), GroupMemberId(3)]);
	}

	#[test]
	fn clones_share_data() {
		let model = ChatModel::new();
		let other = model.clone();
		other.add_chat(Contact::new(ContactId(2), "bob").into());
		assert_eq!(model.read(|chats, _| chats.len()), 1);
	}
}
