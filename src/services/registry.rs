use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::thread_rng;
use uuid::Uuid;

use crate::config::PairingSettings;
use crate::core::codes::{generate_code, length_for_attempt};
use crate::error::CoreError;
use crate::models::{Pair, PairStatus};
use crate::services::store::PairStore;

/// Creates and transitions pairs via unique invite codes
///
/// State machine: `pending → joined → completed`, strictly forward.
/// Expiry is judged at read time against `expires_at`; expired pairs are
/// never mutated in place.
pub struct PairingRegistry<S: PairStore> {
    store: Arc<S>,
    settings: PairingSettings,
}

impl<S: PairStore> PairingRegistry<S> {
    pub fn new(store: Arc<S>, settings: PairingSettings) -> Self {
        Self { store, settings }
    }

    /// Open a new pair for `creator_id` and claim a unique code for it
    ///
    /// Collisions against active codes are retried a bounded number of
    /// times per code length; each exhausted round widens the code space
    /// by one character. Only a fully exhausted budget fails, with
    /// `Conflict`.
    pub fn create(&self, creator_id: &str) -> Result<Pair, CoreError> {
        let now = Utc::now();
        let total_attempts =
            self.settings.max_attempts_per_length * (self.settings.max_widenings + 1);

        let mut rng = thread_rng();
        for attempt in 0..total_attempts {
            let length = length_for_attempt(
                self.settings.code_length,
                self.settings.max_attempts_per_length,
                attempt,
            );
            let code = generate_code(&mut rng, &self.settings.code_alphabet, length);

            let pair = Pair {
                id: Uuid::new_v4(),
                code,
                creator_id: creator_id.to_string(),
                partner_id: None,
                status: PairStatus::Pending,
                created_at: now,
                partner_joined_at: None,
                expires_at: now + Duration::days(self.settings.ttl_days),
            };

            match self.store.insert(pair.clone(), now) {
                Ok(()) => {
                    tracing::info!(
                        "Created pair {} with code {} for {}",
                        pair.id,
                        pair.code,
                        creator_id
                    );
                    return Ok(pair);
                }
                Err(CoreError::Conflict(_)) => {
                    tracing::warn!(
                        "Code collision on attempt {} (length {}), retrying",
                        attempt + 1,
                        length
                    );
                }
                Err(other) => return Err(other),
            }
        }

        Err(CoreError::Conflict(format!(
            "exhausted {} code generation attempts",
            total_attempts
        )))
    }

    /// Join an existing pair by code
    ///
    /// Fails with `NotFound` for an unknown or expired code, `Validation`
    /// for a self join, and `Conflict` when a partner is already set. The
    /// partner slot is claimed with a compare-and-set, so two concurrent
    /// joins on the same code cannot both succeed.
    pub fn join(&self, code: &str, partner_id: &str) -> Result<Pair, CoreError> {
        let now = Utc::now();

        let pair = self
            .store
            .get_by_code(code)?
            .ok_or_else(|| CoreError::NotFound(format!("code {}", code)))?;

        if pair.is_expired(now) {
            return Err(CoreError::NotFound(format!("code {} has expired", code)));
        }
        if pair.creator_id == partner_id {
            return Err(CoreError::Validation(
                "creator cannot join their own pair".to_string(),
            ));
        }

        let joined = self.store.try_set_partner(pair.id, partner_id, now)?;
        tracing::info!("Pair {} joined by {}", joined.id, partner_id);
        Ok(joined)
    }

    /// Find the pair a user currently belongs to, if any
    ///
    /// A user may appear as creator in one pair and partner in another.
    /// Resolution is an explicit, documented tie-break: the creator role
    /// takes precedence over the partner role, and among multiple matches
    /// the most recently created pair wins. This is a policy choice and
    /// must stay exactly this way for reproducibility.
    ///
    /// The returned copy carries the effective status: expiry overrides
    /// the stored field without mutating the pair in place.
    pub fn lookup(&self, user_id: &str) -> Result<Option<Pair>, CoreError> {
        let now = Utc::now();
        let mut pairs = self.store.find_by_user(user_id)?;

        // Most recent first; ids break created_at ties deterministically
        pairs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let as_creator = pairs.iter().find(|pair| pair.creator_id == user_id);
        let as_partner = pairs
            .iter()
            .find(|pair| pair.partner_id.as_deref() == Some(user_id));

        Ok(as_creator.or(as_partner).cloned().map(|mut pair| {
            pair.status = pair.effective_status(now);
            pair
        }))
    }
}
