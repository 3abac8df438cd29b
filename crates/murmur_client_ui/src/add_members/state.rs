#![forbid(unsafe_code)]

use std::fmt;
use std::sync::Arc;

use murmur_domain::GroupMemberRole;
use rust_i18n::t;

use super::selection::SelectedContacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
	InviteProhibited,
}

/// Blocking informational alert shown over the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiAlert {
	pub kind: AlertKind,
	pub title: String,
	pub text: String,
	pub confirm_text: String,
}

impl UiAlert {
	pub fn invite_prohibited() -> Self {
		Self {
			kind: AlertKind::InviteProhibited,
			title: t!("add_members.invite_prohibited").to_string(),
			text: t!("add_members.invite_prohibited_description").to_string(),
			confirm_text: t!("add_members.ok").to_string(),
		}
	}
}

/// Transient state of one add-members screen session.
#[derive(Debug, Clone)]
pub struct AddMembersState {
	pub selected_contacts: SelectedContacts,
	pub selected_role: GroupMemberRole,
	pub alert: Option<UiAlert>,
	pub inviting: bool,
	pub closed: bool,
}

impl AddMembersState {
	pub fn new(selected_role: GroupMemberRole) -> Self {
		Self {
			selected_contacts: SelectedContacts::new(),
			selected_role,
			alert: None,
			inviting: false,
			closed: false,
		}
	}

	/// The invite action is available only with a non-empty selection.
	pub fn can_invite(&self) -> bool {
		!self.selected_contacts.is_empty() && !self.inviting && !self.closed
	}
}

/// Navigation callback that dismisses the screen.
#[derive(Clone)]
pub struct CloseHandle(Arc<dyn Fn() + Send + Sync>);

impl CloseHandle {
	pub fn new(close: impl Fn() + Send + Sync + 'static) -> Self {
		Self(Arc::new(close))
	}

	pub fn noop() -> Self {
		Self::new(|| {})
	}

	pub fn close(&self) {
		(self.0)()
	}
}

impl fmt::Debug for CloseHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("CloseHandle")
	}
}
