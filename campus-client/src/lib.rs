//! Typed Campus API client.
//!
//! This crate assembles the pieces the UI consumes: configuration loading,
//! the reqwest-backed transport, and the per-resource façades over the
//! caching core in `campus-cache`. A [`CampusClient`] is built once at
//! application start; façades are cheap handles created per screen with the
//! context the screen operates under.
//!
//! ```no_run
//! use campus_client::{CampusClient, ClientConfig};
//! use campus_client::resources::ReadOptions;
//! use campus_client::types::PageQuery;
//! use campus_core::RequestContext;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load()?;
//! let client = CampusClient::new(&config)?;
//!
//! let students = client.students(RequestContext::for_institute("inst-1"));
//! let page = students
//!     .list(&Default::default(), ReadOptions::new().with_ttl_minutes(15))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod resources;
pub mod transport;
pub mod types;

pub use config::{AuthConfig, CacheSettings, ClientConfig, ConfigError};
pub use transport::RestTransport;

use std::sync::Arc;

use campus_cache::{CacheConfig, CachedClient, CacheStats, HttpTransport};
use campus_core::RequestContext;

use resources::{Classes, ExamResults, HomeworkFacade, Sms, Students};

/// The top-level client: one shared cache, one transport, typed façades.
#[derive(Clone)]
pub struct CampusClient {
    api: CachedClient,
}

impl CampusClient {
    /// Build a client with the production reqwest transport.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let transport = RestTransport::new(config)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            CacheConfig::from(&config.cache),
        ))
    }

    /// Build a client over any transport. This is how tests inject mocks
    /// and how alternative transports (e.g. an offline fixture server)
    /// plug in.
    pub fn with_transport(transport: Arc<dyn HttpTransport>, cache: CacheConfig) -> Self {
        Self {
            api: CachedClient::new(transport, cache),
        }
    }

    /// The underlying cached client, for callers that need raw
    /// endpoint-level access.
    pub fn api(&self) -> &CachedClient {
        &self.api
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.api.stats()
    }

    /// Drop all cached data. Called on logout so the next session cannot
    /// observe the previous user's responses.
    pub fn clear_cache(&self) {
        self.api.invalidation().invalidate_all();
    }

    pub fn students(&self, context: RequestContext) -> Students {
        Students::new(self.api.clone(), context)
    }

    pub fn classes(&self, context: RequestContext) -> Classes {
        Classes::new(self.api.clone(), context)
    }

    pub fn exam_results(&self, context: RequestContext) -> ExamResults {
        ExamResults::new(self.api.clone(), context)
    }

    pub fn homework(&self, context: RequestContext) -> HomeworkFacade {
        HomeworkFacade::new(self.api.clone(), context)
    }

    pub fn sms(&self, context: RequestContext) -> Sms {
        Sms::new(self.api.clone(), context)
    }
}
