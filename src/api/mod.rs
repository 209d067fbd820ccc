pub mod resource;
pub mod transport;

pub use resource::{Acknowledgement, Resource};
pub use transport::{RequestBody, RequestOptions, Transport};

use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::models::Entity;
use crate::session::Session;
use crate::upload::Uploader;

/// Bundle of everything that talks to the remote API, sharing one
/// transport and one session.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<Transport>,
    storage_public_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: Arc<Session>) -> Self {
        Self {
            transport: Arc::new(Transport::new(config, session)),
            storage_public_url: config.storage.public_url.clone(),
        }
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub fn session(&self) -> &Arc<Session> {
        self.transport.session()
    }

    pub fn resource<T: Entity>(&self) -> Resource<T> {
        Resource::new(self.transport.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.transport.clone())
    }

    pub fn uploader(&self) -> Uploader {
        Uploader::new(self.transport.clone(), self.storage_public_url.clone())
    }
}
