#![forbid(unsafe_code)]

pub mod add_members;
pub mod scenario;
pub mod settings;

rust_i18n::i18n!("locales", fallback = "en-US");
