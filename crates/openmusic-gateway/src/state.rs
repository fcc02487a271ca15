use std::sync::Arc;

use openmusic_auth::TokenManager;
use openmusic_service::Services;

#[derive(Clone)]
pub struct AppState {
    services: Arc<Services>,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            services: Arc::new(services),
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn tokens(&self) -> &TokenManager {
        self.services.authentications.tokens()
    }
}
