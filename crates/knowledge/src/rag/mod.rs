//! RAG (Retrieval-Augmented Generation) answering.

pub mod handler;
pub mod profile;

pub use handler::{build_context, QueryHandler};
pub use profile::{MissPolicy, OperatingMode, QaProfile};
