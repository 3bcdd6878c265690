pub mod alerts;
pub mod coinmarket;
pub mod mailer;
pub mod orchestrator;
pub mod store;
pub mod tickets;
