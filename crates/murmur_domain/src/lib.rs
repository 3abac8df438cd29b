#![forbid(unsafe_code)]

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for parsing identifiers and enumerations from strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseIdError {
	#[error("empty value")]
	Empty,
	#[error("invalid id: {0}")]
	InvalidId(String),
	#[error("unknown member role: {0}")]
	UnknownRole(String),
	#[error("unknown member status: {0}")]
	UnknownStatus(String),
}

fn parse_i64_id(s: &str) -> Result<i64, ParseIdError> {
	let s = s.trim();
	if s.is_empty() {
		return Err(ParseIdError::Empty);
	}
	s.parse::<i64>().map_err(|_| ParseIdError::InvalidId(s.to_string()))
}

/// Local contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ContactId {
	type Err = ParseIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_i64_id(s).map(Self)
	}
}

/// Local group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for GroupId {
	type Err = ParseIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_i64_id(s).map(Self)
	}
}

/// Identifier of a membership record, unique across all groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupMemberId(pub i64);

impl fmt::Display for GroupMemberId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Privilege level of a group member.
///
/// Ordered by privilege: `Member < Admin < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupMemberRole {
	#[default]
	Member,
	Admin,
	Owner,
}

impl GroupMemberRole {
	/// All roles, lowest privilege first.
	pub const ALL: [GroupMemberRole; 3] = [GroupMemberRole::Member, GroupMemberRole::Admin, GroupMemberRole::Owner];

	/// Stable string identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			GroupMemberRole::Member => "member",
			GroupMemberRole::Admin => "admin",
			GroupMemberRole::Owner => "owner",
		}
	}

	/// The lowest privilege role.
	pub const fn lowest() -> Self {
		GroupMemberRole::Member
	}

	/// Roles that a member holding `max` may grant, lowest first.
	pub fn up_to(max: GroupMemberRole) -> impl Iterator<Item = GroupMemberRole> {
		Self::ALL.into_iter().filter(move |role| *role <= max)
	}
}

impl fmt::Display for GroupMemberRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for GroupMemberRole {
	type Err = ParseIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() {
			return Err(ParseIdError::Empty);
		}

		match s.to_ascii_lowercase().as_str() {
			"member" => Ok(GroupMemberRole::Member),
			"admin" => Ok(GroupMemberRole::Admin),
			"owner" => Ok(GroupMemberRole::Owner),
			other => Err(ParseIdError::UnknownRole(other.to_string())),
		}
	}
}

/// Lifecycle status of a membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupMemberStatus {
	Removed,
	Left,
	GroupDeleted,
	#[default]
	Invited,
	Introduced,
	IntroInvited,
	Accepted,
	Announced,
	Connected,
	Complete,
	Creator,
}

impl GroupMemberStatus {
	pub const fn as_str(self) -> &'static str {
		match self {
			GroupMemberStatus::Removed => "removed",
			GroupMemberStatus::Left => "left",
			GroupMemberStatus::GroupDeleted => "group_deleted",
			GroupMemberStatus::Invited => "invited",
			GroupMemberStatus::Introduced => "introduced",
			GroupMemberStatus::IntroInvited => "intro_invited",
			GroupMemberStatus::Accepted => "accepted",
			GroupMemberStatus::Announced => "announced",
			GroupMemberStatus::Connected => "connected",
			GroupMemberStatus::Complete => "complete",
			GroupMemberStatus::Creator => "creator",
		}
	}

	/// Whether a member with this status still belongs to the group.
	///
	/// Pending invitations count as current.
	pub const fn is_current(self) -> bool {
		!matches!(
			self,
			GroupMemberStatus::Removed | GroupMemberStatus::Left | GroupMemberStatus::GroupDeleted
		)
	}
}

impl fmt::Display for GroupMemberStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for GroupMemberStatus {
	type Err = ParseIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() {
			return Err(ParseIdError::Empty);
		}

		let lower = s.to_ascii_lowercase().replace('-', "_");
		let found = [
			GroupMemberStatus::Removed,
			GroupMemberStatus::Left,
			GroupMemberStatus::GroupDeleted,
			GroupMemberStatus::Invited,
			GroupMemberStatus::Introduced,
			GroupMemberStatus::IntroInvited,
			GroupMemberStatus::Accepted,
			GroupMemberStatus::Announced,
			GroupMemberStatus::Connected,
			GroupMemberStatus::Complete,
			GroupMemberStatus::Creator,
		]
		.into_iter()
		.find(|status| status.as_str() == lower);
		found.ok_or(ParseIdError::UnknownStatus(lower))
	}
}

/// A direct-message contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
	pub contact_id: ContactId,
	pub local_display_name: String,
	pub display_name: String,
	#[serde(default)]
	pub full_name: String,
	#[serde(default)]
	pub local_alias: String,
	/// Profile image reference (e.g. a data URI), rendered by the UI toolkit.
	#[serde(default)]
	pub image: Option<String>,
	/// The connection with this contact uses an incognito profile.
	#[serde(default)]
	pub contact_conn_incognito: bool,
}

impl Contact {
	/// Contact with the given display name and no alias, full name, image or incognito profile.
	pub fn new(contact_id: ContactId, display_name: impl Into<String>) -> Self {
		let display_name = display_name.into();
		Self {
			contact_id,
			local_display_name: display_name.clone(),
			display_name,
			full_name: String::new(),
			local_alias: String::new(),
			image: None,
			contact_conn_incognito: false,
		}
	}

	/// Name shown in chat lists and rows.
	pub fn chat_view_name(&self) -> String {
		if !self.local_alias.is_empty() {
			return self.local_alias.clone();
		}
		if self.full_name.is_empty() || self.full_name == self.display_name {
			self.display_name.clone()
		} else {
			format!("{} / {}", self.display_name, self.full_name)
		}
	}
}

/// A membership record linking a contact (or the user) to a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMember {
	pub group_member_id: GroupMemberId,
	pub group_id: GroupId,
	pub member_role: GroupMemberRole,
	pub member_status: GroupMemberStatus,
	/// Linked local contact, if the member is known as a contact.
	#[serde(default)]
	pub member_contact_id: Option<ContactId>,
	pub display_name: String,
	/// The member joined with an incognito profile.
	#[serde(default)]
	pub member_incognito: bool,
}

impl GroupMember {
	pub fn member_current(&self) -> bool {
		self.member_status.is_current()
	}
}

/// Public profile of a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct GroupProfile {
	pub display_name: String,
	#[serde(default)]
	pub full_name: String,
	#[serde(default)]
	pub image: Option<String>,
}

/// A group together with the user's own membership in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupInfo {
	pub group_id: GroupId,
	pub local_display_name: String,
	pub group_profile: GroupProfile,
	pub membership: GroupMember,
}

impl GroupInfo {
	pub fn display_name(&self) -> &str {
		&self.group_profile.display_name
	}

	pub fn image(&self) -> Option<&str> {
		self.group_profile.image.as_deref()
	}
}

/// A pending request from someone who wants to become a contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserContactRequest {
	pub contact_request_id: i64,
	pub local_display_name: String,
}

/// Kind of a chat in the chat list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatInfo {
	Direct { contact: Contact },
	Group { group_info: GroupInfo },
	ContactRequest { contact_request: UserContactRequest },
}

impl ChatInfo {
	/// Chat identifier: `@<contact>`, `#<group>` or `<@<request>`.
	pub fn id(&self) -> String {
		match self {
			ChatInfo::Direct { contact } => format!("@{}", contact.contact_id),
			ChatInfo::Group { group_info } => format!("#{}", group_info.group_id),
			ChatInfo::ContactRequest { contact_request } => format!("<@{}", contact_request.contact_request_id),
		}
	}

	pub fn display_name(&self) -> &str {
		match self {
			ChatInfo::Direct { contact } => &contact.display_name,
			ChatInfo::Group { group_info } => group_info.display_name(),
			ChatInfo::ContactRequest { contact_request } => &contact_request.local_display_name,
		}
	}

	/// The contact behind a direct chat.
	pub fn as_direct(&self) -> Option<&Contact> {
		match self {
			ChatInfo::Direct { contact } => Some(contact),
			_ => None,
		}
	}
}

impl From<Contact> for ChatInfo {
	fn from(contact: Contact) -> Self {
		ChatInfo::Direct { contact }
	}
}

impl From<GroupInfo> for ChatInfo {
	fn from(group_info: GroupInfo) -> Self {
		ChatInfo::Group { group_info }
	}
}
