//! Outbound HTTP clients for the third-party APIs the portal fronts. Each is
//! constructed from its config section when enabled; handlers answer 503 when
//! the corresponding section is absent.

pub mod bitbucket;
pub mod copilot;
pub mod fairwinds;
pub mod jira;

pub use bitbucket::BitbucketClient;
pub use copilot::CopilotClient;
pub use fairwinds::FairwindsClient;
pub use jira::JiraClient;
