#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::sync::Arc;

use murmur_domain::{ChatInfo, ContactId, GroupId, GroupMember, GroupMemberId, GroupMemberRole, GroupMemberStatus};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{ChatController, ChatModel, ClientCoreError};

/// One `add_member` invocation as seen by [`LocalChatController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddMemberCall {
	pub group_id: GroupId,
	pub contact_id: ContactId,
	pub role: GroupMemberRole,
}

/// Callback run at the start of every `add_member` call, before the result is decided.
pub type AddMemberHook = Arc<dyn Fn(&AddMemberCall) + Send + Sync>;

#[derive(Debug)]
struct LocalState {
	next_member_id: i64,
	failing: HashSet<ContactId>,
	calls: Vec<AddMemberCall>,
}

/// In-memory controller that answers commands from a [`ChatModel`].
///
/// It validates invitations the way the chat backend does, but never touches the model:
/// applying the returned record is up to the caller.
pub struct LocalChatController {
	model: ChatModel,
	state: Mutex<LocalState>,
	hook: Option<AddMemberHook>,
}

impl LocalChatController {
	pub fn new(model: ChatModel) -> Self {
		let next_member_id = model.read(|chats, members| {
			let memberships = chats.iter().filter_map(|chat| match chat {
				ChatInfo::Group { group_info } => Some(group_info.membership.group_member_id.0),
				_ => None,
			});
			members
				.iter()
				.map(|m| m.group_member_id.0)
				.chain(memberships)
				.max()
				.unwrap_or(0)
				+ 1
		});

		Self {
			model,
			state: Mutex::new(LocalState {
				next_member_id,
				failing: HashSet::new(),
				calls: Vec::new(),
			}),
			hook: None,
		}
	}

	/// Reject invitations of the given contacts.
	pub fn fail_for(self, contacts: impl IntoIterator<Item = ContactId>) -> Self {
		self.state.lock().failing.extend(contacts);
		self
	}

	pub fn with_hook(mut self, hook: AddMemberHook) -> Self {
		self.hook = Some(hook);
		self
	}

	/// All calls received so far, in order.
	pub fn calls(&self) -> Vec<AddMemberCall> {
		self.state.lock().calls.clone()
	}

	fn check(&self, call: &AddMemberCall) -> Result<(String, bool), ClientCoreError> {
		self.model.read(|chats, members| {
			let group_info = chats
				.iter()
				.find_map(|chat| match chat {
					ChatInfo::Group { group_info } if group_info.group_id == call.group_id => Some(group_info),
					_ => None,
				})
				.ok_or(ClientCoreError::UnknownGroup(call.group_id))?;

			let contact = chats
				.iter()
				.filter_map(ChatInfo::as_direct)
				.find(|c| c.contact_id == call.contact_id)
				.ok_or(ClientCoreError::UnknownContact(call.contact_id))?;

			let own_role = group_info.membership.member_role;
			if call.role > own_role {
				return Err(ClientCoreError::RoleNotAllowed {
					role: call.role,
					own_role,
				});
			}

			let already_member = members.iter().any(|m| {
				m.group_id == call.group_id && m.member_current() && m.member_contact_id == Some(call.contact_id)
			});
			if already_member {
				return Err(ClientCoreError::AlreadyMember {
					group_id: call.group_id,
					contact_id: call.contact_id,
				});
			}

			Ok((contact.display_name.clone(), contact.contact_conn_incognito))
		})
	}
}

#[async_trait::async_trait]
impl ChatController for LocalChatController {
	async fn add_member(
		&self,
		group_id: GroupId,
		contact_id: ContactId,
		role: GroupMemberRole,
	) -> Result<GroupMember, ClientCoreError> {
		let call = AddMemberCall {
			group_id,
			contact_id,
			role,
		};
		self.state.lock().calls.push(call);
		if let Some(hook) = &self.hook {
			hook(&call);
		}

		// Give other tasks a chance to run, like a real round trip would.
		tokio::task::yield_now().await;

		let result = self.check(&call).and_then(|(display_name, incognito)| {
			let mut state = self.state.lock();
			if state.failing.contains(&contact_id) {
				return Err(ClientCoreError::Rejected(format!("invitation of contact {contact_id} failed")));
			}
			let group_member_id = GroupMemberId(state.next_member_id);
			state.next_member_id += 1;
			Ok(GroupMember {
				group_member_id,
				group_id,
				member_role: role,
				member_status: GroupMemberStatus::Invited,
				member_contact_id: Some(contact_id),
				display_name,
				member_incognito: incognito,
			})
		});

		match &result {
			Ok(member) => debug!(%group_id, %contact_id, %role, group_member_id = %member.group_member_id, "add_member ok"),
			Err(error) => warn!(%group_id, %contact_id, %role, %error, "add_member failed"),
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use murmur_domain::{Contact, GroupInfo, GroupProfile};

	fn model() -> ChatModel {
		let group = GroupInfo {
			group_id: GroupId(1),
			local_display_name: "team".to_string(),
			group_profile: GroupProfile {
				display_name: "team".to_string(),
				..Default::default()
			},
			membership: GroupMember {
				group_member_id: GroupMemberId(5),
				group_id: GroupId(1),
				member_role: GroupMemberRole::Admin,
				member_status: GroupMemberStatus::Connected,
				member_contact_id: None,
				display_name: "me".to_string(),
				member_incognito: false,
			},
		};
		let existing = GroupMember {
			group_member_id: GroupMemberId(6),
			group_id: GroupId(1),
			member_role: GroupMemberRole::Member,
			member_status: GroupMemberStatus::Connected,
			member_contact_id: Some(ContactId(2)),
			display_name: "bob".to_string(),
			member_incognito: false,
		};
		ChatModel::with_data(
			vec![
				group.into(),
				Contact::new(ContactId(1), "alice").into(),
				Contact::new(ContactId(2), "bob").into(),
			],
			vec![existing],
		)
	}

	#[tokio::test]
	async fn invites_contact_with_fresh_member_id() {
		let controller = LocalChatController::new(model());
		let member = controller
			.add_member(GroupId(1), ContactId(1), GroupMemberRole::Member)
			.await
			.expect("invite");
		assert_eq!(member.group_member_id, GroupMemberId(7));
		assert_eq!(member.member_contact_id, Some(ContactId(1)));
		assert_eq!(member.member_status, GroupMemberStatus::Invited);
		assert_eq!(member.display_name, "alice");
	}

	#[tokio::test]
	async fn rejects_invalid_invitations() {
		let controller = LocalChatController::new(model()).fail_for([ContactId(1)]);

		let err = controller
			.add_member(GroupId(9), ContactId(1), GroupMemberRole::Member)
			.await
			.unwrap_err();
		assert!(matches!(err, ClientCoreError::UnknownGroup(GroupId(9))));

		let err = controller
			.add_member(GroupId(1), ContactId(3), GroupMemberRole::Member)
			.await
			.unwrap_err();
		assert!(matches!(err, ClientCoreError::UnknownContact(ContactId(3))));

		let err = controller
			.add_member(GroupId(1), ContactId(2), GroupMemberRole::Member)
			.await
			.unwrap_err();
		assert!(matches!(err, ClientCoreError::AlreadyMember { .. }));

		let err = controller
			.add_member(GroupId(1), ContactId(1), GroupMemberRole::Owner)
			.await
			.unwrap_err();
		assert!(matches!(err, ClientCoreError::RoleNotAllowed { .. }));

		let err = controller
			.add_member(GroupId(1), ContactId(1), GroupMemberRole::Admin)
			.await
			.unwrap_err();
		assert!(matches!(err, ClientCoreError::Rejected(_)));

		assert_eq!(controller.calls().len(), 5);
	}

	#[tokio::test]
	async fn hook_sees_every_call() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let hook_seen = seen.clone();
		let controller = LocalChatController::new(model()).with_hook(Arc::new(move |call: &AddMemberCall| {
			hook_seen.lock().push(call.contact_id);
		}));

		let _ = controller.add_member(GroupId(1), ContactId(1), GroupMemberRole::Member).await;
		let _ = controller.add_member(GroupId(1), ContactId(2), GroupMemberRole::Member).await;
		assert_eq!(*seen.lock(), vec![ContactId(1), ContactId(2)]);
	}
}
