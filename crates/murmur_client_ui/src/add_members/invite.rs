#![forbid(unsafe_code)]

use murmur_client_core::{ChatController, ChatModel};
use murmur_domain::{ContactId, GroupInfo, GroupMember, GroupMemberRole};
use serde::Serialize;
use tracing::{Instrument as _, info, info_span, warn};
use uuid::Uuid;

/// The contact whose invitation stopped the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteFailure {
	pub contact_id: ContactId,
	pub reason: String,
}

/// Result of one invite batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteOutcome {
	pub batch_id: Uuid,
	pub role: GroupMemberRole,
	/// Members created, in invitation order.
	pub invited: Vec<GroupMember>,
	pub failed: Option<InviteFailure>,
	/// Contacts after the failure that were never sent.
	pub not_attempted: Vec<ContactId>,
}

impl InviteOutcome {
	pub fn is_complete(&self) -> bool {
		self.failed.is_none()
	}
}

/// Invites `contacts` into the group one at a time, in order.
///
/// Each returned member is upserted into `model`. The first failure ends the batch; members
/// invited before it stay invited.
pub async fn invite_members(
	controller: &dyn ChatController,
	model: &ChatModel,
	group_info: &GroupInfo,
	contacts: &[ContactId],
	role: GroupMemberRole,
) -> InviteOutcome {
	let batch_id = Uuid::new_v4();
	let span = info_span!("invite_members", %batch_id, group_id = %group_info.group_id, %role);
	run_batch(controller, model, group_info, contacts, role, batch_id)
		.instrument(span)
		.await
}

async fn run_batch(
	controller: &dyn ChatController,
	model: &ChatModel,
	group_info: &GroupInfo,
	contacts: &[ContactId],
	role: GroupMemberRole,
	batch_id: Uuid,
) -> InviteOutcome {
	info!(count = contacts.len(), "inviting contacts");

	let mut outcome = InviteOutcome {
		batch_id,
		role,
		invited: Vec::with_capacity(contacts.len()),
		failed: None,
		not_attempted: Vec::new(),
	};

	for (index, &contact_id) in contacts.iter().enumerate() {
		match controller.add_member(group_info.group_id, contact_id, role).await {
			Ok(member) => {
				model.upsert_group_member(group_info, member.clone());
				outcome.invited.push(member);
			}
			Err(error) => {
				warn!(%contact_id, %error, "invitation failed, stopping batch");
				outcome.failed = Some(InviteFailure {
					contact_id,
					reason: error.to_string(),
				});
				outcome.not_attempted = contacts[index + 1..].to_vec();
				break;
			}
		}
	}

	info!(
		invited = outcome.invited.len(),
		failed = outcome.failed.is_some(),
		not_attempted = outcome.not_attempted.len(),
		"invite batch finished"
	);
	outcome
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::add_members::test_support::{contact, group_info};
	use murmur_client_core::LocalChatController;
	use murmur_domain::GroupMemberStatus;

	fn setup(fail: &[i64]) -> (ChatModel, GroupInfo, LocalChatController) {
		let g = group_info(GroupMemberRole::Admin, false);
		let model = ChatModel::with_data(
			vec![
				g.clone().into(),
				contact(1, "c1").into(),
				contact(2, "c2").into(),
				contact(3, "c3").into(),
				contact(4, "c4").into(),
			],
			Vec::new(),
		);
		let controller = LocalChatController::new(model.clone()).fail_for(fail.iter().map(|id| ContactId(*id)));
		(model, g, controller)
	}

	#[tokio::test]
	async fn invites_all_in_order() {
		let (model, g, controller) = setup(&[]);
		let ids = [ContactId(2), ContactId(1)];
		let outcome = invite_members(&controller, &model, &g, &ids, GroupMemberRole::Admin).await;

		assert!(outcome.is_complete());
		let invited: Vec<_> = outcome.invited.iter().map(|m| m.member_contact_id).collect();
		assert_eq!(invited, vec![Some(ContactId(2)), Some(ContactId(1))]);
		assert!(outcome.invited.iter().all(|m| m.member_role == GroupMemberRole::Admin));

		let members = model.group_members_of(g.group_id);
		assert_eq!(members.len(), 2);
		assert!(members.iter().all(|m| m.member_status == GroupMemberStatus::Invited));
	}

	#[tokio::test]
	async fn stops_on_first_failure() {
		let (model, g, controller) = setup(&[3]);
		let ids = [ContactId(1), ContactId(2), ContactId(3), ContactId(4)];
		let outcome = invite_members(&controller, &model, &g, &ids, GroupMemberRole::Member).await;

		assert_eq!(outcome.invited.len(), 2);
		assert_eq!(outcome.failed.as_ref().map(|f| f.contact_id), Some(ContactId(3)));
		assert_eq!(outcome.not_attempted, vec![ContactId(4)]);

		let attempted: Vec<_> = controller.calls().into_iter().map(|c| c.contact_id).collect();
		assert_eq!(attempted, vec![ContactId(1), ContactId(2), ContactId(3)]);

		let upserted: Vec<_> = model
			.group_members_of(g.group_id)
			.into_iter()
			.filter_map(|m| m.member_contact_id)
			.collect();
		assert_eq!(upserted, vec![ContactId(1), ContactId(2)]);
	}

	#[tokio::test]
	async fn empty_batch_makes_no_calls() {
		let (model, g, controller) = setup(&[]);
		let outcome = invite_members(&controller, &model, &g, &[], GroupMemberRole::Member).await;
		assert!(outcome.invited.is_empty());
		assert!(outcome.is_complete());
		assert!(controller.calls().is_empty());
	}
}
