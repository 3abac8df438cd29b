use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use murmur_domain::GroupMemberRole;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const CURRENT_SETTINGS_VERSION: u32 = 1;

fn default_settings_version() -> u32 {
	CURRENT_SETTINGS_VERSION
}

/// Client UI settings, stored as TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
	pub settings_version: u32,
	pub locale: String,
	/// Role preselected for new members, capped by the user's own role in the group.
	pub default_member_role: GroupMemberRole,
	/// `tracing` filter used when `RUST_LOG` is not set.
	pub log_filter: String,
}

impl Default for UiSettings {
	fn default() -> Self {
		Self {
			settings_version: default_settings_version(),
			locale: "en-US".to_string(),
			default_member_role: GroupMemberRole::lowest(),
			log_filter: "info,murmur_client_ui=debug,murmur_client_core=debug".to_string(),
		}
	}
}

/// `<config dir>/murmur/ui-settings.toml`.
pub fn default_settings_path() -> PathBuf {
	let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
	dir.push("murmur");
	dir.push("ui-settings.toml");
	dir
}

fn migrate_settings_toml(mut v: toml::Value) -> toml::Value {
	let version = v.get("settings_version").and_then(|x| x.as_integer()).unwrap_or(0) as u32;
	if version < CURRENT_SETTINGS_VERSION {
		if let Some(table) = v.as_table_mut() {
			table.insert(
				"settings_version".to_string(),
				toml::Value::Integer(CURRENT_SETTINGS_VERSION as i64),
			);
		} else {
			let mut tbl = toml::map::Map::new();
			tbl.insert(
				"settings_version".to_string(),
				toml::Value::Integer(CURRENT_SETTINGS_VERSION as i64),
			);
			return toml::Value::Table(tbl);
		}
	}
	v
}

/// Load settings from `path`; a missing file yields the defaults.
pub fn load_from_path(path: &Path) -> anyhow::Result<UiSettings> {
	let data = match fs::read_to_string(path) {
		Ok(data) => data,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
			debug!(path = %path.display(), "no settings file, using defaults");
			return Ok(UiSettings::default());
		}
		Err(e) => return Err(e).with_context(|| format!("read settings from {}", path.display())),
	};

	let v = toml::from_str::<toml::Value>(&data).with_context(|| format!("parse settings {}", path.display()))?;
	let v = migrate_settings_toml(v);
	let settings = v
		.try_into::<UiSettings>()
		.with_context(|| format!("invalid settings in {}", path.display()))?;
	Ok(settings)
}

pub fn persist_to_path(settings: &UiSettings, path: &Path) -> anyhow::Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
	}
	let data = toml::to_string_pretty(settings).context("serialize settings")?;
	fs::write(path, data).with_context(|| format!("write settings to {}", path.display()))?;
	info!(path = %path.display(), "settings saved");
	Ok(())
}
