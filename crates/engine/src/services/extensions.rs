use std::collections::HashSet;

use voicestack_core::error::CoreError;
use voicestack_core::extensions::{ExtensionSeries, ExtensionSeriesConfig};

use crate::context::EngineContext;
use crate::error::{EngineError, EngineResult};

/// Extension series per location: creation, candidate generation,
/// availability checks and reservation.
#[derive(Clone)]
pub struct ExtensionAllocator {
    ctx: EngineContext,
}

impl ExtensionAllocator {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Create the location's series, or merge into the existing one.
    pub async fn create_extension_series(
        &self,
        config: ExtensionSeriesConfig,
    ) -> EngineResult<ExtensionSeries> {
        let series = ExtensionSeries::from_config(config)?;
        let series = self.ctx.store.upsert_series(series).await?;

        tracing::info!(
            location_id = %series.location_id,
            start_range = series.start_range,
            end_range = series.end_range,
            reserved = series.reserved_extensions.len(),
            "Extension series saved",
        );
        Ok(series)
    }

    /// The first `count` free extensions. Nothing is reserved; call
    /// [`reserve_extension`](Self::reserve_extension) to claim one.
    pub async fn generate_available_extensions(
        &self,
        location_id: &str,
        count: usize,
    ) -> EngineResult<Vec<String>> {
        let series = self.series(location_id).await?;
        let assigned = self.assigned_extensions(location_id).await?;
        Ok(series.generate_available(count, &assigned)?)
    }

    /// Without a series any extension not held by a phone is available.
    pub async fn is_extension_available(
        &self,
        location_id: &str,
        extension: &str,
    ) -> EngineResult<bool> {
        let assigned = self.assigned_extensions(location_id).await?;
        Ok(match self.ctx.store.get_series(location_id).await? {
            Some(series) => series.is_available(extension, &assigned),
            None => !assigned.contains(extension),
        })
    }

    /// Claim an in-range extension for the location.
    pub async fn reserve_extension(
        &self,
        location_id: &str,
        extension: &str,
    ) -> EngineResult<ExtensionSeries> {
        let series = self.series(location_id).await?;
        if !series.contains(extension) {
            return Err(CoreError::Validation(format!(
                "Extension {extension} is outside the series {}-{} for location {location_id}",
                series.start_range, series.end_range
            ))
            .into());
        }

        let series = self.ctx.store.reserve_extension(location_id, extension).await?;
        tracing::info!(location_id, extension, "Extension reserved");
        Ok(series)
    }

    async fn series(&self, location_id: &str) -> EngineResult<ExtensionSeries> {
        self.ctx
            .store
            .get_series(location_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Extension series", location_id))
    }

    async fn assigned_extensions(&self, location_id: &str) -> EngineResult<HashSet<String>> {
        Ok(self
            .ctx
            .store
            .list_phones(location_id)
            .await?
            .iter()
            .filter_map(|p| p.extension_number().map(str::to_string))
            .collect())
    }
}
