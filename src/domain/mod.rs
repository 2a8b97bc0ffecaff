pub mod announcement;
pub mod copilot;
pub mod fairwinds;
pub mod feedback;
pub mod pull_request;

pub use announcement::*;
pub use copilot::*;
pub use fairwinds::*;
pub use feedback::*;
pub use pull_request::*;
