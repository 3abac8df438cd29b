#![forbid(unsafe_code)]

//! Screen for inviting existing contacts into a group.
//!
//! The screen owns a transient [`AddMembersState`], changed only through
//! [`AddMembersAction`]s, and renders to an [`AddMembersView`] on demand. The model and the
//! controller are shared with the rest of the client.

use std::sync::Arc;

use murmur_client_core::{ChatController, ChatModel};
use murmur_domain::{Contact, ContactId, GroupInfo, GroupMemberRole};
use tracing::{debug, info};

use crate::settings::UiSettings;

pub mod contacts;
pub mod invite;
pub mod reducer;
pub mod rows;
pub mod selection;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use contacts::{contacts_to_add, contacts_to_add_from_model, prohibited_to_invite_incognito};
pub use invite::{InviteFailure, InviteOutcome, invite_members};
pub use reducer::{AddMembersAction, AddMembersCommand, AddMembersContext, apply_commands, reduce};
pub use rows::{ContactRowUi, RowAffordance, RowIcon, RowTap, Tone};
pub use selection::{SelectedContacts, initial_role, prune_selection, role_choices};
pub use state::{AddMembersState, AlertKind, CloseHandle, UiAlert};
pub use view::{AddMembersBody, AddMembersView, SelectionFooterUi, build_view};

/// One open add-members screen for a group.
pub struct AddMembersScreen {
	group_info: GroupInfo,
	model: ChatModel,
	controller: Arc<dyn ChatController>,
	close: CloseHandle,
	state: AddMembersState,
}

impl AddMembersScreen {
	pub fn new(
		group_info: GroupInfo,
		model: ChatModel,
		controller: Arc<dyn ChatController>,
		close: CloseHandle,
		settings: &UiSettings,
	) -> Self {
		let role = initial_role(settings.default_member_role, &group_info);
		info!(group_id = %group_info.group_id, %role, "add members screen opened");
		Self {
			group_info,
			model,
			controller,
			close,
			state: AddMembersState::new(role),
		}
	}

	pub fn group_info(&self) -> &GroupInfo {
		&self.group_info
	}

	pub fn state(&self) -> &AddMembersState {
		&self.state
	}

	/// Eligible contacts, recomputed from the current model.
	pub fn contacts_to_add(&self) -> Vec<Contact> {
		contacts_to_add_from_model(&self.model, &self.group_info)
	}

	/// Drops selected contacts the model no longer offers, e.g. ones that joined meanwhile.
	fn sync_selection(&mut self, contacts: &[Contact]) {
		let dropped = prune_selection(&mut self.state.selected_contacts, &self.group_info, contacts);
		if dropped > 0 {
			debug!(dropped, "selected contacts no longer eligible");
		}
	}

	pub fn dispatch(&mut self, action: AddMembersAction) {
		let contacts = self.contacts_to_add();
		self.sync_selection(&contacts);
		let ctx = AddMembersContext {
			group_info: &self.group_info,
			contacts_to_add: &contacts,
		};
		let commands = reduce(&mut self.state, &ctx, action);
		apply_commands(&mut self.state, &self.close, commands);
	}

	pub fn can_invite(&self) -> bool {
		self.state.can_invite()
	}

	/// Snapshots the selection and role and marks the screen as inviting.
	///
	/// Returns `None` when the invite action is disabled. The screen stays usable while the
	/// returned invite runs; hand its outcome to [`AddMembersScreen::finish_invite`].
	pub fn start_invite(&mut self) -> Option<PendingInvite> {
		let contacts = self.contacts_to_add();
		self.sync_selection(&contacts);
		if !self.can_invite() {
			debug!("invite requested with nothing to invite");
			return None;
		}

		self.state.inviting = true;
		Some(PendingInvite {
			controller: self.controller.clone(),
			model: self.model.clone(),
			group_info: self.group_info.clone(),
			contacts: self.state.selected_contacts.as_slice().to_vec(),
			role: self.state.selected_role,
		})
	}

	/// Closes the screen once an invite started by [`AddMembersScreen::start_invite`] is done.
	///
	/// The close callback runs even when back navigation already closed the screen.
	pub fn finish_invite(&mut self, outcome: InviteOutcome) -> InviteOutcome {
		self.state.inviting = false;
		apply_commands(&mut self.state, &self.close, vec![AddMembersCommand::Close]);
		outcome
	}

	/// Invites the selected contacts, then closes the screen.
	///
	/// Returns `None` without doing anything when the invite action is disabled.
	pub async fn invite_members(&mut self) -> Option<InviteOutcome> {
		let pending = self.start_invite()?;
		let outcome = pending.run().await;
		Some(self.finish_invite(outcome))
	}

	pub fn view(&self) -> AddMembersView {
		let contacts = self.contacts_to_add();
		let mut state = self.state.clone();
		prune_selection(&mut state.selected_contacts, &self.group_info, &contacts);
		build_view(&self.group_info, &contacts, &state)
	}
}

/// An invite batch detached from the screen, owning everything it needs.
pub struct PendingInvite {
	controller: Arc<dyn ChatController>,
	model: ChatModel,
	group_info: GroupInfo,
	contacts: Vec<ContactId>,
	role: GroupMemberRole,
}

impl PendingInvite {
	pub fn contacts(&self) -> &[ContactId] {
		&self.contacts
	}

	pub fn role(&self) -> GroupMemberRole {
		self.role
	}

	pub async fn run(self) -> InviteOutcome {
		invite_members(
			self.controller.as_ref(),
			&self.model,
			&self.group_info,
			&self.contacts,
			self.role,
		)
		.await
	}
}
