#![forbid(unsafe_code)]

//! Demo scenarios: a group, contacts and existing members described in TOML.
//!
//! ```toml
//! [group]
//! group_id = 1
//! display_name = "team"
//! role = "admin"
//!
//! [[contacts]]
//! contact_id = 1
//! display_name = "alice"
//!
//! [[members]]
//! group_member_id = 10
//! contact_id = 2
//! display_name = "bob"
//! status = "connected"
//!
//! [controller]
//! fail_contacts = [3]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context as _, bail};
use murmur_client_core::{ChatModel, LocalChatController};
use murmur_domain::{
	ChatInfo, Contact, ContactId, GroupId, GroupInfo, GroupMember, GroupMemberId, GroupMemberRole, GroupMemberStatus,
	GroupProfile,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
	pub group: ScenarioGroup,
	#[serde(default)]
	pub contacts: Vec<ScenarioContact>,
	#[serde(default)]
	pub members: Vec<ScenarioMember>,
	#[serde(default)]
	pub controller: ScenarioController,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioGroup {
	pub group_id: i64,
	pub display_name: String,
	#[serde(default)]
	pub full_name: String,
	#[serde(default)]
	pub image: Option<String>,
	/// The user's own role in the group.
	#[serde(default)]
	pub role: GroupMemberRole,
	/// The user joined with an incognito profile.
	#[serde(default)]
	pub incognito: bool,
	#[serde(default = "default_membership_id")]
	pub membership_id: i64,
}

fn default_membership_id() -> i64 {
	1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioContact {
	pub contact_id: i64,
	pub display_name: String,
	#[serde(default)]
	pub full_name: String,
	#[serde(default)]
	pub local_alias: String,
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default)]
	pub incognito: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioMember {
	pub group_member_id: i64,
	/// Defaults to the scenario group.
	#[serde(default)]
	pub group_id: Option<i64>,
	#[serde(default)]
	pub contact_id: Option<i64>,
	pub display_name: String,
	#[serde(default)]
	pub role: GroupMemberRole,
	#[serde(default = "default_member_status")]
	pub status: GroupMemberStatus,
}

fn default_member_status() -> GroupMemberStatus {
	GroupMemberStatus::Connected
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScenarioController {
	/// Contacts whose invitation the local controller rejects.
	#[serde(default)]
	pub fail_contacts: Vec<i64>,
}

impl Scenario {
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let data = fs::read_to_string(path).with_context(|| format!("read scenario {}", path.display()))?;
		Self::parse(&data).with_context(|| format!("load scenario {}", path.display()))
	}

	pub fn parse(data: &str) -> anyhow::Result<Self> {
		let scenario: Scenario = toml::from_str(data).context("parse scenario")?;
		scenario.validate()?;
		Ok(scenario)
	}

	fn validate(&self) -> anyhow::Result<()> {
		let mut seen = std::collections::HashSet::new();
		for c in &self.contacts {
			if c.display_name.trim().is_empty() {
				bail!("contact {} has an empty display name", c.contact_id);
			}
			if !seen.insert(c.contact_id) {
				bail!("duplicate contact id {}", c.contact_id);
			}
		}
		let mut member_ids = std::collections::HashSet::from([self.group.membership_id]);
		for m in &self.members {
			if !member_ids.insert(m.group_member_id) {
				bail!("duplicate group member id {}", m.group_member_id);
			}
		}
		Ok(())
	}

	pub fn group_info(&self) -> GroupInfo {
		let group_id = GroupId(self.group.group_id);
		GroupInfo {
			group_id,
			local_display_name: self.group.display_name.clone(),
			group_profile: GroupProfile {
				display_name: self.group.display_name.clone(),
				full_name: self.group.full_name.clone(),
				image: self.group.image.clone(),
			},
			membership: GroupMember {
				group_member_id: GroupMemberId(self.group.membership_id),
				group_id,
				member_role: self.group.role,
				member_status: GroupMemberStatus::Connected,
				member_contact_id: None,
				display_name: "you".to_string(),
				member_incognito: self.group.incognito,
			},
		}
	}

	pub fn contacts(&self) -> Vec<Contact> {
		self.contacts
			.iter()
			.map(|c| Contact {
				full_name: c.full_name.clone(),
				local_alias: c.local_alias.clone(),
				image: c.image.clone(),
				contact_conn_incognito: c.incognito,
				..Contact::new(ContactId(c.contact_id), c.display_name.clone())
			})
			.collect()
	}

	pub fn members(&self) -> Vec<GroupMember> {
		self.members
			.iter()
			.map(|m| GroupMember {
				group_member_id: GroupMemberId(m.group_member_id),
				group_id: GroupId(m.group_id.unwrap_or(self.group.group_id)),
				member_role: m.role,
				member_status: m.status,
				member_contact_id: m.contact_id.map(ContactId),
				display_name: m.display_name.clone(),
				member_incognito: false,
			})
			.collect()
	}

	/// A model holding the group chat, one direct chat per contact and the members.
	pub fn model(&self) -> ChatModel {
		let mut chats: Vec<ChatInfo> = vec![self.group_info().into()];
		chats.extend(self.contacts().into_iter().map(ChatInfo::from));
		ChatModel::with_data(chats, self.members())
	}

	pub fn controller(&self, model: ChatModel) -> LocalChatController {
		LocalChatController::new(model).fail_for(self.controller.fail_contacts.iter().map(|id| ContactId(*id)))
	}

	/// Resolve a contact by id or by display name (case-insensitive).
	pub fn resolve_contact(&self, needle: &str) -> Option<ContactId> {
		let needle = needle.trim();
		if let Ok(id) = needle.parse::<ContactId>()
			&& self.contacts.iter().any(|c| c.contact_id == id.0)
		{
			return Some(id);
		}
		self.contacts
			.iter()
			.find(|c| c.display_name.eq_ignore_ascii_case(needle) || c.local_alias.eq_ignore_ascii_case(needle))
			.map(|c| ContactId(c.contact_id))
	}
}
