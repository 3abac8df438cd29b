#![forbid(unsafe_code)]

use std::collections::HashSet;

use murmur_client_core::ChatModel;
use murmur_domain::{ChatInfo, Contact, ContactId, GroupId, GroupInfo, GroupMember};

/// Direct contacts that can be invited into `group_id`, sorted by display name (case-insensitive).
///
/// Contacts linked to a current member of the group are left out.
pub fn contacts_to_add(chats: &[ChatInfo], group_members: &[GroupMember], group_id: GroupId) -> Vec<Contact> {
	let member_contact_ids: HashSet<ContactId> = group_members
		.iter()
		.filter(|m| m.group_id == group_id && m.member_current())
		.filter_map(|m| m.member_contact_id)
		.collect();

	let mut contacts: Vec<Contact> = chats
		.iter()
		.filter_map(ChatInfo::as_direct)
		.filter(|c| !member_contact_ids.contains(&c.contact_id))
		.cloned()
		.collect();
	contacts.sort_by_cached_key(|c| c.display_name.to_lowercase());
	contacts
}

pub fn contacts_to_add_from_model(model: &ChatModel, group_info: &GroupInfo) -> Vec<Contact> {
	model.read(|chats, members| contacts_to_add(chats, members, group_info.group_id))
}

/// A contact known under an incognito profile must not be brought into a group where the
/// user appears with the main profile.
pub fn prohibited_to_invite_incognito(group_info: &GroupInfo, contact: &Contact) -> bool {
	!group_info.membership.member_incognito && contact.contact_conn_incognito
}
