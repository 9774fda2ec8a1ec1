use std::sync::Arc;

use crate::clock::{Clock, VenueTime};
use crate::registry::TempleRegistry;
use crate::store::{AccountStore, TokenStore};
use crate::tokens::TokenService;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub accounts: Arc<dyn AccountStore>,
    pub clock: Arc<dyn Clock>,
    pub admin_email: String,
}

impl AppState {
    pub fn new(
        token_store: Arc<dyn TokenStore>,
        accounts: Arc<dyn AccountStore>,
        registry: TempleRegistry,
        clock: Arc<dyn Clock>,
        venue: VenueTime,
        admin_email: impl Into<String>,
    ) -> Self {
        let tokens = TokenService::new(token_store, Arc::new(registry), Arc::clone(&clock), venue);
        Self {
            tokens: Arc::new(tokens),
            accounts,
            clock,
            admin_email: admin_email.into(),
        }
    }
}
