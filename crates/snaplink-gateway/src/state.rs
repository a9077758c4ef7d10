use snaplink_redirector::Resolver;
use snaplink_shortener::Registry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    resolver: Arc<Resolver>,
    base_url: String,
}

impl AppState {
    pub fn new(resolver: Arc<Resolver>, public_base_url: impl Into<String>) -> Self {
        Self {
            registry: resolver.registry().clone(),
            resolver,
            base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Public prefix that short codes are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
