pub mod announcements;
pub mod categories;
pub mod copilot;
pub mod fairwinds;
pub mod feedback;
pub mod pull_requests;
pub mod root;
pub mod tags;
