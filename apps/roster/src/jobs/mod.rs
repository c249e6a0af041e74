// Job editing: reconciliation-backed save, create, edit-session load and plan preview.

pub mod handlers;
pub mod service;
