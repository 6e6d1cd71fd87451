use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::service::InquiryService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub inquiries: InquiryService,
}

impl AppState {
    pub fn new(config: ServiceConfig, inquiries: InquiryService) -> Self {
        Self {
            config: Arc::new(config),
            inquiries,
        }
    }
}
