pub mod auth_helpers;
pub mod catalog;
pub mod content_manager;
pub mod form_helpers;
pub mod public_helpers;
pub mod sanitization_helpers;
pub mod tasbeeh;
pub mod translation;
