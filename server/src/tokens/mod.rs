//! Darshan token lifecycle: booking, classification and QR rendering.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::clock::{Clock, VenueTime};
use crate::models::{NewToken, TimeSlot, Token};
use crate::registry::TempleRegistry;
use crate::store::TokenStore;
use crate::utils::error::AppError;

pub mod classifier;
pub mod payload;
pub mod qr;

pub use classifier::{classify, is_expired, partition, Classification, Partition};
pub use payload::encode_payload;

const MAX_NAME_LEN: usize = 120;

/// A token as presented to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenView {
    #[serde(flatten)]
    pub token: Token,
    pub temple_name: Option<String>,
    pub status: Classification,
    pub expires_at: Option<NaiveDateTime>,
    /// Only set for active tokens; expired ones are never encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_payload: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub active: Vec<TokenView>,
    pub expired: Vec<TokenView>,
}

pub struct TokenService {
    store: Arc<dyn TokenStore>,
    registry: Arc<TempleRegistry>,
    clock: Arc<dyn Clock>,
    venue: VenueTime,
}

impl TokenService {
    pub fn new(
        store: Arc<dyn TokenStore>,
        registry: Arc<TempleRegistry>,
        clock: Arc<dyn Clock>,
        venue: VenueTime,
    ) -> Self {
        Self {
            store,
            registry,
            clock,
            venue,
        }
    }

    pub fn registry(&self) -> &TempleRegistry {
        &self.registry
    }

    /// Venue-local "now". Read fresh on every call.
    fn now(&self) -> Result<NaiveDateTime, AppError> {
        Ok(self.venue.now(self.clock.as_ref())?)
    }

    pub async fn book(&self, booking: NewToken) -> Result<Token, AppError> {
        let name = booking.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Visitor name is required".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::ValidationError(format!(
                "Visitor name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }

        if self.registry.find_by_id(&booking.temple).is_none() {
            return Err(AppError::ValidationError(format!(
                "Unknown temple '{}'",
                booking.temple
            )));
        }

        let slot = TimeSlot::parse(&booking.time_slot)
            .map_err(|e| AppError::ValidationError(e.to_string()))?
            .to_string();
        if !self.registry.is_bookable_slot(&slot) {
            return Err(AppError::ValidationError(format!(
                "Time slot '{}' is not offered",
                slot
            )));
        }

        let created_at = self.clock.now()?;
        let token = Token::issue(
            NewToken {
                time_slot: slot,
                ..booking
            },
            created_at,
        );

        if is_expired(&token, self.venue.local(created_at)) {
            return Err(AppError::ValidationError(format!(
                "Time slot {} on {} has already ended",
                token.time_slot, token.date
            )));
        }

        self.store.insert(&token).await?;

        tracing::info!(
            token_id = %token.id,
            temple = %token.temple,
            date = %token.date,
            time_slot = %token.time_slot,
            "Darshan token booked"
        );

        Ok(token)
    }

    async fn partitioned(&self) -> Result<Partition, AppError> {
        let now = self.now()?;
        let tokens = self.store.all().await?;
        Ok(partition(&tokens, now))
    }

    fn view(&self, token: Token, status: Classification) -> TokenView {
        let temple_name = self
            .registry
            .find_by_id(&token.temple)
            .map(|t| t.name.clone());
        let qr_payload = match status {
            Classification::Active => Some(encode_payload(&token, &self.registry)),
            Classification::Expired => None,
        };

        TokenView {
            expires_at: classifier::expires_at(&token),
            temple_name,
            status,
            qr_payload,
            token,
        }
    }

    fn views(&self, tokens: Vec<Token>, status: Classification) -> Vec<TokenView> {
        tokens.into_iter().map(|t| self.view(t, status)).collect()
    }

    pub async fn overview(&self) -> Result<Overview, AppError> {
        let Partition { active, expired } = self.partitioned().await?;
        Ok(Overview {
            active: self.views(active, Classification::Active),
            expired: self.views(expired, Classification::Expired),
        })
    }

    pub async fn active(&self) -> Result<Vec<TokenView>, AppError> {
        let Partition { active, .. } = self.partitioned().await?;
        Ok(self.views(active, Classification::Active))
    }

    pub async fn history(&self) -> Result<Vec<TokenView>, AppError> {
        let Partition { expired, .. } = self.partitioned().await?;
        Ok(self.views(expired, Classification::Expired))
    }

    /// SVG QR code for an active token.
    pub async fn qr_svg(&self, id: Uuid) -> Result<String, AppError> {
        let token = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Token '{}' was not found", id)))?;

        if is_expired(&token, self.now()?) {
            return Err(AppError::Conflict(format!("Token '{}' has expired", id)));
        }

        if self.registry.find_by_id(&token.temple).is_none() {
            tracing::warn!(token_id = %token.id, temple = %token.temple, "Token references unknown temple");
        }

        qr::render_svg(&encode_payload(&token, &self.registry))
    }
}
