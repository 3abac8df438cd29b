#![forbid(unsafe_code)]

use murmur_domain::{Contact, ContactId, GroupInfo, GroupMemberRole};
use tracing::{debug, warn};

use super::contacts::prohibited_to_invite_incognito;
use super::rows::{RowAffordance, RowTap};
use super::state::{AddMembersState, CloseHandle, UiAlert};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMembersAction {
	/// The user tapped a contact row.
	TapContact(ContactId),
	AddContact(ContactId),
	RemoveContact(ContactId),
	ClearSelection,
	SelectRole(GroupMemberRole),
	DismissAlert,
	/// Back navigation.
	Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddMembersCommand {
	ShowAlert(UiAlert),
	Close,
}

/// Read-only inputs the reducer checks actions against.
#[derive(Debug, Clone, Copy)]
pub struct AddMembersContext<'a> {
	pub group_info: &'a GroupInfo,
	pub contacts_to_add: &'a [Contact],
}

impl AddMembersContext<'_> {
	fn contact(&self, id: ContactId) -> Option<&Contact> {
		self.contacts_to_add.iter().find(|c| c.contact_id == id)
	}
}

pub fn reduce(state: &mut AddMembersState, ctx: &AddMembersContext<'_>, action: AddMembersAction) -> Vec<AddMembersCommand> {
	let mut commands = Vec::new();
	if state.closed {
		debug!(?action, "screen closed, ignoring action");
		return commands;
	}

	match action {
		AddMembersAction::TapContact(id) => {
			let Some(contact) = ctx.contact(id) else {
				warn!(contact_id = %id, "tap on a contact that can't be added");
				return commands;
			};
			match RowAffordance::for_contact(ctx.group_info, contact, &state.selected_contacts).tap(id) {
				RowTap::ShowProhibitedAlert => commands.push(AddMembersCommand::ShowAlert(UiAlert::invite_prohibited())),
				RowTap::Remove(id) => {
					state.selected_contacts.remove_contact(id);
				}
				RowTap::Add(id) => {
					state.selected_contacts.add_contact(id);
				}
			}
		}
		AddMembersAction::AddContact(id) => match ctx.contact(id) {
			None => warn!(contact_id = %id, "add of a contact that can't be added"),
			Some(contact) if prohibited_to_invite_incognito(ctx.group_info, contact) => {
				commands.push(AddMembersCommand::ShowAlert(UiAlert::invite_prohibited()));
			}
			Some(_) => {
				state.selected_contacts.add_contact(id);
			}
		},
		AddMembersAction::RemoveContact(id) => {
			state.selected_contacts.remove_contact(id);
		}
		AddMembersAction::ClearSelection => {
			let dropped = state.selected_contacts.clear_selection();
			debug!(dropped, "selection cleared");
		}
		AddMembersAction::SelectRole(role) => {
			let own_role = ctx.group_info.membership.member_role;
			if role <= own_role {
				state.selected_role = role;
			} else {
				warn!(%role, %own_role, "role above own role not offered");
			}
		}
		AddMembersAction::DismissAlert => {
			state.alert = None;
		}
		AddMembersAction::Back => commands.push(AddMembersCommand::Close),
	}

	debug!(?action, selected = state.selected_contacts.len(), role = %state.selected_role, "reduced");
	commands
}

pub fn apply_commands(state: &mut AddMembersState, close: &CloseHandle, commands: Vec<AddMembersCommand>) {
	for command in commands {
		match command {
			AddMembersCommand::ShowAlert(alert) => {
				state.alert = Some(alert);
			}
			AddMembersCommand::Close => {
				state.closed = true;
				state.selected_contacts.clear_selection();
				close.close();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::add_members::state::AlertKind;
	use crate::add_members::test_support::{contact, group_info};
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn incognito(id: i64, name: &str) -> Contact {
		let mut c = contact(id, name);
		c.contact_conn_incognito = true;
		c
	}

	#[test]
	fn tap_toggles_selection() {
		let g = group_info(GroupMemberRole::Admin, false);
		let contacts = vec![contact(1, "alice")];
		let ctx = AddMembersContext {
			group_info: &g,
			contacts_to_add: &contacts,
		};
		let mut state = AddMembersState::new(GroupMemberRole::Member);

		assert!(reduce(&mut state, &ctx, AddMembersAction::TapContact(ContactId(1))).is_empty());
		assert!(state.selected_contacts.contains(ContactId(1)));
		assert!(state.can_invite());

		reduce(&mut state, &ctx, AddMembersAction::TapContact(ContactId(1)));
		assert!(state.selected_contacts.is_empty());
		assert!(!state.can_invite());
	}

	#[test]
	fn tapping_prohibited_contact_raises_alert_and_never_selects() {
		let g = group_info(GroupMemberRole::Admin, false);
		let contacts = vec![incognito(1, "alice")];
		let ctx = AddMembersContext {
			group_info: &g,
			contacts_to_add: &contacts,
		};
		let mut state = AddMembersState::new(GroupMemberRole::Member);

		for action in [
			AddMembersAction::TapContact(ContactId(1)),
			AddMembersAction::AddContact(ContactId(1)),
		] {
			let commands = reduce(&mut state, &ctx, action);
			assert!(matches!(
				commands.as_slice(),
				[AddMembersCommand::ShowAlert(UiAlert {
					kind: AlertKind::InviteProhibited,
					..
				})]
			));
			apply_commands(&mut state, &CloseHandle::noop(), commands);
			assert!(state.selected_contacts.is_empty());
			assert!(state.alert.is_some());
		}

		reduce(&mut state, &ctx, AddMembersAction::DismissAlert);
		assert!(state.alert.is_none());
	}

	#[test]
	fn ignores_contacts_outside_eligible_list() {
		let g = group_info(GroupMemberRole::Admin, false);
		let contacts = vec![contact(1, "alice")];
		let ctx = AddMembersContext {
			group_info: &g,
			contacts_to_add: &contacts,
		};
		let mut state = AddMembersState::new(GroupMemberRole::Member);
		reduce(&mut state, &ctx, AddMembersAction::AddContact(ContactId(7)));
		reduce(&mut state, &ctx, AddMembersAction::TapContact(ContactId(7)));
		assert!(state.selected_contacts.is_empty());
	}

	#[test]
	fn role_above_own_role_is_ignored() {
		let g = group_info(GroupMemberRole::Admin, false);
		let ctx = AddMembersContext {
			group_info: &g,
			contacts_to_add: &[],
		};
		let mut state = AddMembersState::new(GroupMemberRole::Member);
		reduce(&mut state, &ctx, AddMembersAction::SelectRole(GroupMemberRole::Owner));
		assert_eq!(state.selected_role, GroupMemberRole::Member);
		reduce(&mut state, &ctx, AddMembersAction::SelectRole(GroupMemberRole::Admin));
		assert_eq!(state.selected_role, GroupMemberRole::Admin);
	}

	#[test]
	fn clear_and_back() {
		let g = group_info(GroupMemberRole::Admin, false);
		let contacts = vec![contact(1, "alice"), contact(2, "bob")];
		let ctx = AddMembersContext {
			group_info: &g,
			contacts_to_add: &contacts,
		};
		let mut state = AddMembersState::new(GroupMemberRole::Member);
		reduce(&mut state, &ctx, AddMembersAction::AddContact(ContactId(1)));
		reduce(&mut state, &ctx, AddMembersAction::AddContact(ContactId(2)));
		reduce(&mut state, &ctx, AddMembersAction::ClearSelection);
		assert!(state.selected_contacts.is_empty());

		let closes = Arc::new(AtomicUsize::new(0));
		let counter = closes.clone();
		let close = CloseHandle::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		let commands = reduce(&mut state, &ctx, AddMembersAction::Back);
		assert_eq!(commands, vec![AddMembersCommand::Close]);
		apply_commands(&mut state, &close, commands);
		assert!(state.closed);
		assert_eq!(closes.load(Ordering::SeqCst), 1);

		assert!(reduce(&mut state, &ctx, AddMembersAction::AddContact(ContactId(1))).is_empty());
		assert!(state.selected_contacts.is_empty());
	}
}
