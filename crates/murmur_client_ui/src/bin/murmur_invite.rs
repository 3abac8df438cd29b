#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use murmur_client_ui::add_members::view::role_label;
use murmur_client_ui::add_members::{AddMembersAction, AddMembersScreen, CloseHandle, InviteOutcome};
use murmur_client_ui::scenario::Scenario;
use murmur_client_ui::settings::{self, UiSettings};
use murmur_domain::{ContactId, GroupMemberRole};
use rust_i18n::t;
use tracing::{info, warn};

rust_i18n::i18n!("locales", fallback = "en-US");

fn usage_and_exit() -> ! {
	eprintln!(
		"Usage: murmur_invite --scenario file.toml [--select contact]... [--role role] [--settings file.toml] [--locale tag] [--json]\n\
\n\
Options:\n\
	--scenario  Group, contacts and members to load (required)\n\
	--select    Contact to tap, by id or name (repeatable)\n\
	--role      Role for new members: member, admin or owner\n\
	            Default: default_member_role from settings\n\
	--settings  Settings file (default: <config dir>/murmur/ui-settings.toml)\n\
	--locale    Locale for labels (default: locale from settings)\n\
	--json      Print the invite outcome as JSON\n\
	--help      Show this help\n\
\n\
Examples:\n\
	murmur_invite --scenario team.toml --select alice --select 3\n\
	murmur_invite --scenario team.toml --select bob --role admin --json\n"
	);
	std::process::exit(2)
}

struct Args {
	scenario: PathBuf,
	settings: PathBuf,
	select: Vec<String>,
	role: Option<GroupMemberRole>,
	locale: Option<String>,
	json: bool,
}

fn parse_args() -> Args {
	let mut scenario: Option<PathBuf> = None;
	let mut settings_path: Option<PathBuf> = None;
	let mut select: Vec<String> = Vec::new();
	let mut role: Option<GroupMemberRole> = None;
	let mut locale: Option<String> = None;
	let mut json = false;

	let mut it = std::env::args().skip(1);
	while let Some(arg) = it.next() {
		match arg.as_str() {
			"--help" | "-h" => usage_and_exit(),
			"--scenario" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				scenario = Some(PathBuf::from(v));
			}
			"--settings" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				settings_path = Some(PathBuf::from(v));
			}
			"--select" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				if v.trim().is_empty() {
					eprintln!("--select must be non-empty");
					usage_and_exit();
				}
				select.push(v);
			}
			"--role" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				let parsed: GroupMemberRole = v.parse().unwrap_or_else(|_| {
					eprintln!("Invalid --role value: {v}");
					usage_and_exit()
				});
				role = Some(parsed);
			}
			"--locale" => {
				let v = it.next().unwrap_or_else(|| usage_and_exit());
				if v.trim().is_empty() {
					eprintln!("--locale must be non-empty");
					usage_and_exit();
				}
				locale = Some(v);
			}
			"--json" => json = true,
			other => {
				eprintln!("Unknown argument: {other}");
				usage_and_exit();
			}
		}
	}

	let Some(scenario) = scenario else {
		eprintln!("--scenario is required");
		usage_and_exit();
	};

	Args {
		scenario,
		settings: settings_path.unwrap_or_else(settings::default_settings_path),
		select,
		role,
		locale,
		json,
	}
}

fn init_tracing(settings: &UiSettings) {
	let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| settings.log_filter.clone());
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn print_outcome(scenario: &Scenario, outcome: &InviteOutcome) {
	let role = role_label(outcome.role);
	println!("{}", t!("invite.invited", count = outcome.invited.len(), role = role));
	if let Some(failure) = &outcome.failed {
		println!(
			"{}",
			t!(
				"invite.failed",
				name = contact_name(scenario, failure.contact_id),
				reason = failure.reason
			)
		);
	}
	if !outcome.not_attempted.is_empty() {
		println!("{}", t!("invite.not_attempted", count = outcome.not_attempted.len()));
	}
}

fn contact_name(scenario: &Scenario, contact_id: ContactId) -> String {
	scenario
		.contacts()
		.into_iter()
		.find(|c| c.contact_id == contact_id)
		.map(|c| c.chat_view_name())
		.unwrap_or_else(|| contact_id.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = parse_args();

	let settings = settings::load_from_path(&args.settings)?;
	init_tracing(&settings);
	rust_i18n::set_locale(args.locale.as_deref().unwrap_or(&settings.locale));

	let scenario = Scenario::load(&args.scenario)?;
	let group_info = scenario.group_info();
	let model = scenario.model();
	let controller = Arc::new(scenario.controller(model.clone()));
	let close = CloseHandle::new(|| info!("add members screen closed"));

	let mut screen = AddMembersScreen::new(group_info, model, controller, close, &settings);
	println!("{}", screen.view());

	for needle in &args.select {
		let contact_id = scenario
			.resolve_contact(needle)
			.with_context(|| format!("unknown contact {needle:?}"))?;
		screen.dispatch(AddMembersAction::TapContact(contact_id));
		if let Some(alert) = screen.state().alert.clone() {
			warn!(%contact_id, "contact cannot be invited");
			eprintln!("{}\n{}", alert.title, alert.text);
			screen.dispatch(AddMembersAction::DismissAlert);
		}
	}

	if let Some(role) = args.role {
		screen.dispatch(AddMembersAction::SelectRole(role));
		if screen.state().selected_role != role {
			eprintln!("Role {role} is above your role in this group, keeping {}", screen.state().selected_role);
		}
	}

	if !args.select.is_empty() || args.role.is_some() {
		println!("{}", screen.view());
	}

	match screen.invite_members().await {
		Some(outcome) if args.json => {
			println!("{}", serde_json::to_string_pretty(&outcome).context("serialize outcome")?);
		}
		Some(outcome) => print_outcome(&scenario, &outcome),
		None => println!("{}", t!("invite.nothing_to_invite")),
	}

	Ok(())
}
