//! `voicestack-provisioner` -- offline onboarding report and payload export.
//!
//! Loads a store snapshot, then for every location (or just one) prints a
//! JSON line with its submission readiness, dashboard warnings and the
//! generated provisioning payload.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default  | Description                        |
//! |------------------------------|----------|----------|------------------------------------|
//! | `VOICESTACK_SNAPSHOT_PATH`   | yes      | --       | Snapshot JSON file to load         |
//! | `VOICESTACK_LOCATION_ID`     | no       | all      | Only report this location          |
//! | `VOICESTACK_YEALINK_MODELS`  | no       | built-in | Comma-separated Yealink models     |
//! | `VOICESTACK_POLYCOM_MODELS`  | no       | built-in | Comma-separated Polycom models     |
//! | `VOICESTACK_PAYLOAD_VERSION` | no       | `1.0.0`  | Payload `version` string           |

use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voicestack_core::provisioning::ProvisioningPayload;
use voicestack_core::session::SubmitCheck;
use voicestack_core::types::SystemClock;
use voicestack_core::warnings::LocationWarnings;
use voicestack_db::{InMemoryStore, Snapshot};
use voicestack_engine::{Engine, EngineConfig};

const ENV_SNAPSHOT_PATH: &str = "VOICESTACK_SNAPSHOT_PATH";
const ENV_LOCATION_ID: &str = "VOICESTACK_LOCATION_ID";

/// One output line per location.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationReport {
    location_id: String,
    location_name: String,
    submission: SubmitCheck,
    warnings: LocationWarnings,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<ProvisioningPayload>,
    payload_errors: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voicestack_provisioner=info,voicestack_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = EngineConfig::from_env()?;
    let snapshot_path = std::env::var(ENV_SNAPSHOT_PATH)
        .with_context(|| format!("{ENV_SNAPSHOT_PATH} environment variable is required"))?;
    let only_location = std::env::var(ENV_LOCATION_ID).ok();

    // --- Store ---
    let raw = tokio::fs::read_to_string(&snapshot_path)
        .await
        .with_context(|| format!("Failed to read snapshot {snapshot_path}"))?;
    let snapshot = Snapshot::from_json(&raw)
        .with_context(|| format!("Failed to parse snapshot {snapshot_path}"))?;

    let mut location_ids: Vec<(String, String)> = snapshot
        .locations
        .iter()
        .map(|l| (l.id.clone(), l.name.clone()))
        .collect();
    if let Some(wanted) = &only_location {
        location_ids.retain(|(id, _)| id == wanted);
        if location_ids.is_empty() {
            bail!("Location {wanted} is not in snapshot {snapshot_path}");
        }
    }

    let clock = Arc::new(SystemClock);
    let store = Arc::new(InMemoryStore::from_snapshot(snapshot, clock.clone()));
    let engine = Engine::new(store, clock, config);
    tracing::info!(
        snapshot = %snapshot_path,
        locations = location_ids.len(),
        "Snapshot loaded",
    );

    // --- Reports ---
    let mut failed = 0usize;
    for (location_id, location_name) in location_ids {
        let submission = engine.sessions.can_submit(&location_id).await?;
        let warnings = engine.warnings.calculate_location_warnings(&location_id).await;

        let (payload, payload_errors) =
            match engine.provisioning.generate_and_validate(&location_id).await {
                Ok(generated) => (Some(generated.payload), generated.validation.errors),
                Err(e) => {
                    tracing::warn!(error = %e, location_id = %location_id, "Payload not generated");
                    (None, vec![e.to_string()])
                }
            };
        if !payload_errors.is_empty() {
            failed += 1;
        }

        let report = LocationReport {
            location_id,
            location_name,
            submission,
            warnings,
            payload,
            payload_errors,
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    if failed > 0 {
        bail!("{failed} location(s) did not produce a valid provisioning payload");
    }
    Ok(())
}
