#![forbid(unsafe_code)]

use murmur_domain::{Contact, ContactId, GroupInfo};
use rust_i18n::t;

use super::contacts::prohibited_to_invite_incognito;
use super::selection::SelectedContacts;

/// How a contact row presents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAffordance {
	/// Contact can't be invited; tapping explains why.
	Blocked,
	Selected,
	Unselected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIcon {
	/// Theater-masks icon for incognito contacts.
	Incognito,
	CheckCircle,
	Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
	Default,
	Muted,
	Accent,
}

/// What tapping a row does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTap {
	ShowProhibitedAlert,
	Remove(ContactId),
	Add(ContactId),
}

impl RowAffordance {
	pub fn for_contact(group_info: &GroupInfo, contact: &Contact, selected: &SelectedContacts) -> Self {
		if prohibited_to_invite_incognito(group_info, contact) {
			RowAffordance::Blocked
		} else if selected.contains(contact.contact_id) {
			RowAffordance::Selected
		} else {
			RowAffordance::Unselected
		}
	}

	pub fn icon(self) -> RowIcon {
		match self {
			RowAffordance::Blocked => RowIcon::Incognito,
			RowAffordance::Selected => RowIcon::CheckCircle,
			RowAffordance::Unselected => RowIcon::Circle,
		}
	}

	pub fn icon_tone(self) -> Tone {
		match self {
			RowAffordance::Selected => Tone::Accent,
			RowAffordance::Blocked | RowAffordance::Unselected => Tone::Muted,
		}
	}

	pub fn name_tone(self) -> Tone {
		match self {
			RowAffordance::Blocked => Tone::Muted,
			RowAffordance::Selected | RowAffordance::Unselected => Tone::Default,
		}
	}

	pub fn tap(self, contact_id: ContactId) -> RowTap {
		match self {
			RowAffordance::Blocked => RowTap::ShowProhibitedAlert,
			RowAffordance::Selected => RowTap::Remove(contact_id),
			RowAffordance::Unselected => RowTap::Add(contact_id),
		}
	}
}

/// A rendered row of the contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRowUi {
	pub contact_id: ContactId,
	pub name: String,
	pub image: Option<String>,
	pub name_tone: Tone,
	pub affordance: RowAffordance,
	pub icon: RowIcon,
	pub icon_tone: Tone,
	pub icon_description: String,
	pub tap: RowTap,
	/// A divider follows this row (every row but the last).
	pub divider_after: bool,
}

pub fn contact_row(group_info: &GroupInfo, contact: &Contact, selected: &SelectedContacts) -> ContactRowUi {
	let affordance = RowAffordance::for_contact(group_info, contact, selected);
	ContactRowUi {
		contact_id: contact.contact_id,
		name: contact.chat_view_name(),
		image: contact.image.clone(),
		name_tone: affordance.name_tone(),
		affordance,
		icon: affordance.icon(),
		icon_tone: affordance.icon_tone(),
		icon_description: t!("add_members.contact_checked").to_string(),
		tap: affordance.tap(contact.contact_id),
		divider_after: false,
	}
}

pub fn contact_rows(group_info: &GroupInfo, contacts: &[Contact], selected: &SelectedContacts) -> Vec<ContactRowUi> {
	let last = contacts.len().saturating_sub(1);
	contacts
		.iter()
		.enumerate()
		.map(|(index, contact)| ContactRowUi {
			divider_after: index < last,
			..contact_row(group_info, contact, selected)
		})
		.collect()
}
