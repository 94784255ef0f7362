pub mod backend;
pub mod client;
pub mod document;
pub mod error;
pub mod models;
pub mod registry;
pub mod settings;
pub mod vocabulary;
