pub mod auth;
pub mod i18n;
pub mod storage_session;
