//! Storage keys. Each category lives under its own key so a corrupt
//! value under one key never hides the others.

pub const BOOKMARKS: &str = "quran_reader.bookmarks";
pub const HISTORY: &str = "quran_reader.history";
pub const THEME: &str = "quran_reader.theme";
pub const SETTINGS: &str = "quran_reader.settings";
pub const CURRENT_USER: &str = "quran_reader.current_user";
pub const ACCOUNTS: &str = "quran_reader.accounts";
pub const SESSION: &str = "quran_reader.session";
