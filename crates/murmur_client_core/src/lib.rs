#![forbid(unsafe_code)]

use murmur_domain::{ContactId, GroupId, GroupMember, GroupMemberRole};

mod local;
mod model;

pub use local::{AddMemberCall, AddMemberHook, LocalChatController};
pub use model::ChatModel;

/// Errors for client core operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientCoreError {
	/// The group is not known locally.
	#[error("unknown group: {0}")]
	UnknownGroup(GroupId),

	/// The contact is not known locally.
	#[error("unknown contact: {0}")]
	UnknownContact(ContactId),

	/// The contact is already a current member of the group.
	#[error("contact {contact_id} is already a member of group {group_id}")]
	AlreadyMember { group_id: GroupId, contact_id: ContactId },

	/// The requested role is above the role of the inviting user.
	#[error("cannot grant role {role}: own role is {own_role}")]
	RoleNotAllowed {
		role: GroupMemberRole,
		own_role: GroupMemberRole,
	},

	/// The backend refused the command.
	#[error("command rejected: {0}")]
	Rejected(String),
}

/// Chat backend commands used by the client screens.
#[async_trait::async_trait]
pub trait ChatController: Send + Sync + 'static {
	/// Invite a contact into a group with the given role.
	///
	/// Returns the new membership record. Any error means the contact was not invited.
	async fn add_member(
		&self,
		group_id: GroupId,
		contact_id: ContactId,
		role: GroupMemberRole,
	) -> Result<GroupMember, ClientCoreError>;
}
