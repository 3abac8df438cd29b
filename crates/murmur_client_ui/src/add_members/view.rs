#![forbid(unsafe_code)]

use std::fmt;

use murmur_domain::{Contact, GroupInfo, GroupMemberRole};
use rust_i18n::t;

use super::rows::{ContactRowUi, RowIcon, contact_rows};
use super::selection::role_choices;
use super::state::AddMembersState;

/// Toolkit-neutral description of the add-members screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMembersView {
	pub title: String,
	pub header: GroupHeaderUi,
	pub body: AddMembersBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeaderUi {
	pub name: String,
	pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddMembersBody {
	NoContacts { message: String },
	Contacts(ContactsSection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsSection {
	pub role_picker: RolePickerUi,
	pub invite_button: InviteButtonUi,
	pub footer: SelectionFooterUi,
	pub rows: Vec<ContactRowUi>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePickerUi {
	pub label: String,
	pub options: Vec<RoleOptionUi>,
	pub selected: GroupMemberRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOptionUi {
	pub role: GroupMemberRole,
	pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteButtonUi {
	pub label: String,
	pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionFooterUi {
	Selected { text: String, clear_label: String },
	NoneSelected { text: String },
}

pub fn role_label(role: GroupMemberRole) -> String {
	let label = match role {
		GroupMemberRole::Member => t!("role.member"),
		GroupMemberRole::Admin => t!("role.admin"),
		GroupMemberRole::Owner => t!("role.owner"),
	};
	label.to_string()
}

pub fn build_view(group_info: &GroupInfo, contacts_to_add: &[Contact], state: &AddMembersState) -> AddMembersView {
	let header = GroupHeaderUi {
		name: group_info.display_name().to_string(),
		image: group_info.image().map(str::to_string),
	};

	let body = if contacts_to_add.is_empty() {
		AddMembersBody::NoContacts {
			message: t!("add_members.no_contacts_to_add").to_string(),
		}
	} else {
		let selected_count = state.selected_contacts.len();
		let footer = if selected_count >= 1 {
			SelectionFooterUi::Selected {
				text: t!("add_members.contacts_selected", count = selected_count).to_string(),
				clear_label: t!("add_members.clear_selection").to_string(),
			}
		} else {
			SelectionFooterUi::NoneSelected {
				text: t!("add_members.no_contacts_selected").to_string(),
			}
		};

		AddMembersBody::Contacts(ContactsSection {
			role_picker: RolePickerUi {
				label: t!("add_members.new_member_role").to_string(),
				options: role_choices(group_info)
					.into_iter()
					.map(|role| RoleOptionUi {
						role,
						label: role_label(role),
					})
					.collect(),
				selected: state.selected_role,
			},
			invite_button: InviteButtonUi {
				label: t!("add_members.invite_button").to_string(),
				enabled: state.can_invite(),
			},
			footer,
			rows: contact_rows(group_info, contacts_to_add, &state.selected_contacts),
		})
	};

	AddMembersView {
		title: t!("add_members.title").to_string(),
		header,
		body,
	}
}

/// Plain-text rendering, used by the terminal front end.
impl fmt::Display for AddMembersView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{}", self.title)?;
		writeln!(f, "  [{}]", self.header.name)?;
		writeln!(f)?;

		let section = match &self.body {
			AddMembersBody::NoContacts { message } => return writeln!(f, "  {message}"),
			AddMembersBody::Contacts(section) => section,
		};

		let options: Vec<&str> = section.role_picker.options.iter().map(|o| o.label.as_str()).collect();
		writeln!(
			f,
			"  {}: {} ({})",
			section.role_picker.label,
			role_label(section.role_picker.selected),
			options.join(", ")
		)?;
		let state = if section.invite_button.enabled { "" } else { " (disabled)" };
		writeln!(f, "  > {}{state}", section.invite_button.label)?;
		match &section.footer {
			SelectionFooterUi::Selected { text, clear_label } => writeln!(f, "  {text}  [{clear_label}]")?,
			SelectionFooterUi::NoneSelected { text } => writeln!(f, "  {text}")?,
		}
		writeln!(f)?;

		for row in &section.rows {
			let mark = match row.icon {
				RowIcon::Incognito => "[~]",
				RowIcon::CheckCircle => "[x]",
				RowIcon::Circle => "[ ]",
			};
			writeln!(f, "  {mark} {} (#{})", row.name, row.contact_id)?;
		}
		Ok(())
	}
}
