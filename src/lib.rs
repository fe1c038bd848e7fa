pub mod config;
pub mod feedback;
pub mod job;
pub mod mail;
pub mod report;
pub mod store;
pub mod window;
