use std::sync::Arc;

use crate::{
    clients::{BitbucketClient, CopilotClient, FairwindsClient},
    config::Settings,
    service::ServiceContext,
};

#[derive(Clone)]
pub struct AppState {
    pub service_context: Arc<ServiceContext>,
    pub bitbucket: Option<Arc<BitbucketClient>>,
    pub copilot: Option<Arc<CopilotClient>>,
    pub fairwinds: Option<Arc<FairwindsClient>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        bitbucket: Option<Arc<BitbucketClient>>,
        copilot: Option<Arc<CopilotClient>>,
        fairwinds: Option<Arc<FairwindsClient>>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            service_context,
            bitbucket,
            copilot,
            fairwinds,
            settings,
        }
    }
}
