#![forbid(unsafe_code)]

use murmur_domain::{
	Contact, ContactId, GroupId, GroupInfo, GroupMember, GroupMemberId, GroupMemberRole, GroupMemberStatus,
	GroupProfile,
};

pub(crate) fn contact(id: i64, name: &str) -> Contact {
	Contact::new(ContactId(id), name)
}

pub(crate) fn member(id: i64, group_id: GroupId, contact: Option<i64>, status: GroupMemberStatus) -> GroupMember {
	GroupMember {
		group_member_id: GroupMemberId(id),
		group_id,
		member_role: GroupMemberRole::Member,
		member_status: status,
		member_contact_id: contact.map(ContactId),
		display_name: format!("member-{id}"),
		member_incognito: false,
	}
}

/// Group 1 where the user holds `role`.
pub(crate) fn group_info(role: GroupMemberRole, incognito: bool) -> GroupInfo {
	GroupInfo {
		group_id: GroupId(1),
		local_display_name: "team".to_string(),
		group_profile: GroupProfile {
			display_name: "team".to_string(),
			full_name: "The Team".to_string(),
			image: None,
		},
		membership: GroupMember {
			member_role: role,
			member_status: GroupMemberStatus::Connected,
			member_contact_id: None,
			member_incognito: incognito,
			..member(1000, GroupId(1), None, GroupMemberStatus::Connected)
		},
	}
}
