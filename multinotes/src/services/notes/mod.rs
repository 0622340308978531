pub mod notes_hooks;
pub mod notes_http;
pub mod notes_service;
pub mod notes_shared;

pub use notes_service::NotesService;
