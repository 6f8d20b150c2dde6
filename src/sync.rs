//! Reconciles mined tokens with the token store.
//!
//! Colors are insert-only: an existing `(project, value)` is left alone so
//! user edits to its name survive a rescan. Typography tokens are created or
//! overwritten, and an overwrite resets `checked`.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::models::{ColorToken, TypographyToken};
use crate::store::TokenStore;

/// Outcome of one synchronization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Color tokens inserted
    pub colors_created: usize,
    /// Color candidates whose value was already stored
    pub colors_existing: usize,
    /// Typography tokens inserted
    pub typography_created: usize,
    /// Typography tokens overwritten
    pub typography_updated: usize,
    /// Store operations that failed
    pub failures: usize,
}

/// Writes mined tokens through a [`TokenStore`].
pub struct TokenSynchronizer<'a, S: TokenStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TokenStore + ?Sized> TokenSynchronizer<'a, S> {
    /// Creates a synchronizer over `store`.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Synchronizes colors then typography.
    pub async fn sync(&self, colors: &[ColorToken], typography: &[TypographyToken]) -> SyncReport {
        let mut report = SyncReport::default();
        self.sync_colors(colors, &mut report).await;
        self.sync_typography(typography, &mut report).await;
        info!(
            colors_created = report.colors_created,
            colors_existing = report.colors_existing,
            typography_created = report.typography_created,
            typography_updated = report.typography_updated,
            failures = report.failures,
            "tokens synchronized"
        );
        report
    }

    async fn sync_colors(&self, colors: &[ColorToken], report: &mut SyncReport) {
        for token in colors {
            match self.store.find_color(token.project_id, &token.value).await {
                Ok(Some(_)) => {
                    debug!(value = %token.value, "color already stored");
                    report.colors_existing += 1;
                }
                Ok(None) => match self.store.create_color(token).await {
                    Ok(()) => report.colors_created += 1,
                    Err(e) => {
                        error!(value = %token.value, error = ?e, "failed to create color");
                        report.failures += 1;
                    }
                },
                Err(e) => {
                    error!(value = %token.value, error = ?e, "failed to look up color");
                    report.failures += 1;
                }
            }
        }
    }

    async fn sync_typography(&self, tokens: &[TypographyToken], report: &mut SyncReport) {
        for token in tokens {
            let mut token = token.clone();
            token.checked = false;

            let result = match self.store.find_typography(token.project_id, token.key).await {
                Ok(Some(_)) => self
                    .store
                    .update_typography(&token)
                    .await
                    .map(|()| report.typography_updated += 1),
                Ok(None) => self
                    .store
                    .create_typography(&token)
                    .await
                    .map(|()| report.typography_created += 1),
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                error!(key = %token.key, error = ?e, "failed to store typography");
                report.failures += 1;
            }
        }
    }
}
