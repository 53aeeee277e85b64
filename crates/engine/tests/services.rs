//! Integration tests for the per-concern services: skip rules, devices and
//! approvals, extensions, submission validation and payload generation.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use voicestack_core::approval::ApprovalStatus;
use voicestack_core::device::{AssignmentType, Phone};
use voicestack_core::error::CoreError;
use voicestack_core::extensions::ExtensionSeriesConfig;
use voicestack_core::provisioning::{validate::DEVICE_REQUIRED, ExtensionHolder};
use voicestack_core::session::EditAuthority;
use voicestack_core::skip_rules::{FIELD_CALL_FORWARDING, FIELD_WANTS_FAX_IN_VOICE_STACK};
use voicestack_core::validation::call_flow::{DIRECT_TARGET_REQUIRED, IVR_OPTION_REQUIRED};
use voicestack_core::validation::submission::FAX_IN_VOICE_STACK_REQUIRED;
use voicestack_db::{ApprovalStore, DirectoryStore, StoreError};
use voicestack_engine::EngineError;

use common::*;

async fn answer(env: &TestEnv, patch: serde_json::Value) {
    env.engine
        .sessions
        .update_onboarding(LOCATION, patch, EditAuthority::Standard)
        .await
        .unwrap();
}

fn series_config(start: i64, end: i64, reserved: &[&str]) -> ExtensionSeriesConfig {
    ExtensionSeriesConfig {
        location_id: LOCATION.into(),
        prefix: None,
        start_range: start,
        end_range: end,
        reserved_extensions: reserved.iter().map(|s| s.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Skip rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_skip_rules_without_onboarding_hide_nothing_but_fax() {
    let env = setup().await;
    let rules = env.engine.skip_rules.get_skip_rules(LOCATION).await.unwrap();

    for rule in &rules {
        let expected = rule.field == FIELD_WANTS_FAX_IN_VOICE_STACK;
        assert_eq!(rule.should_skip, expected, "field {}", rule.field);
    }
}

#[tokio::test]
async fn test_skip_rules_follow_saved_answers() {
    let env = setup().await;
    answer(
        &env,
        json!({ "phoneSystemType": "VOIP", "voipType": "RINGCENTRAL", "hasIVR": false, "usesFax": false }),
    )
    .await;

    let rules = env.engine.skip_rules.get_skip_rules(LOCATION).await.unwrap();
    assert!(rules.iter().all(|r| r.field != FIELD_WANTS_FAX_IN_VOICE_STACK || !r.should_skip));
    assert!(rules
        .iter()
        .filter(|r| r.field.starts_with("ivr"))
        .all(|r| r.should_skip));
    let cf = rules.iter().find(|r| r.field == FIELD_CALL_FORWARDING).unwrap();
    assert!(cf.should_skip);

    let known = env.engine.skip_rules.known_call_forwarding(LOCATION).await.unwrap();
    assert!(known.is_some());
}

// ---------------------------------------------------------------------------
// Devices and approvals
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_device_support_is_brand_gated() {
    let env = setup().await;
    let devices = &env.engine.devices;

    for brand in ["OTHER", "CISCO", ""] {
        for model in ["T46S", "VVX 450", ""] {
            assert!(!devices.validate_device(brand, model).is_supported);
        }
    }
    assert!(devices.validate_device("YEALINK", "T46S").is_supported);
    assert!(!devices.validate_device("YEALINK", "t46s").is_supported);
}

#[tokio::test]
async fn test_save_phone_overwrites_client_derived_fields() {
    let env = setup().await;
    let phone = env
        .engine
        .devices
        .save_phone(Phone {
            is_unsupported: true,
            has_warnings: true,
            warning_reason: Some("stale".into()),
            ..yealink_for_user("1001")
        })
        .await
        .unwrap();

    assert!(phone.id.starts_with("phone-"));
    assert!(!phone.is_unsupported);
    assert!(!phone.has_warnings);
    assert_eq!(phone.warning_reason, None);
}

#[tokio::test]
async fn test_unsupported_phone_opens_exactly_one_approval() {
    let env = setup().await;
    let phone = env
        .engine
        .devices
        .save_phone(Phone {
            brand: "OTHER".into(),
            model: "Desk 9000".into(),
            ..yealink_for_user("1001")
        })
        .await
        .unwrap();
    assert!(phone.is_unsupported);

    // Re-saving and re-validating must not open a second approval.
    env.engine.devices.save_phone(phone.clone()).await.unwrap();
    let validation = env
        .engine
        .devices
        .validate_and_mark_device(&phone.id)
        .await
        .unwrap();
    assert!(!validation.is_supported);

    let approvals = env.store.list_approvals(LOCATION).await.unwrap();
    assert_eq!(approvals.len(), 1);
    assert!(approvals[0].is_for_phone(&phone.id));
    assert_eq!(approvals[0].status, ApprovalStatus::Pending);
}

#[tokio::test]
async fn test_duplicate_extension_is_rejected() {
    let env = setup().await;
    env.engine.devices.save_phone(yealink_for_user("1001")).await.unwrap();

    let err = env
        .engine
        .devices
        .save_phone(yealink_for_user("1001"))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Store(StoreError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
    assert_eq!(env.store.list_phones(LOCATION).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_resaving_a_phone_keeps_its_extension() {
    let env = setup().await;
    let phone = env.engine.devices.save_phone(yealink_for_user("1001")).await.unwrap();
    let phone = env
        .engine
        .devices
        .save_phone(Phone {
            model: "T54W".into(),
            ..phone
        })
        .await
        .unwrap();
    assert_eq!(phone.extension.as_deref(), Some("1001"));
}

#[tokio::test]
async fn test_unpadded_extension_collides_with_series_spelling() {
    let env = setup().await;
    env.engine
        .extensions
        .create_extension_series(ExtensionSeriesConfig {
            prefix: Some("7".into()),
            ..series_config(1, 50, &[])
        })
        .await
        .unwrap();
    env.engine.devices.save_phone(yealink_for_user("7001")).await.unwrap();

    let err = env
        .engine
        .devices
        .save_phone(yealink_for_user("701"))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Store(StoreError::Conflict(_)));
    assert!(!env.engine.extensions.is_extension_available(LOCATION, "701").await.unwrap());
    assert!(env.engine.extensions.is_extension_available(LOCATION, "702").await.unwrap());
}

#[tokio::test]
async fn test_concurrent_saves_never_share_an_extension() {
    let env = setup_yielding().await;
    let first = Phone {
        id: "phone-a".into(),
        ..yealink_for_user("1001")
    };
    let second = Phone {
        id: "phone-b".into(),
        ..yealink_for_user("1001")
    };

    let (a, b) = tokio::join!(
        env.engine.devices.save_phone(first),
        env.engine.devices.save_phone(second),
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

    let holders = env
        .store
        .list_phones(LOCATION)
        .await
        .unwrap()
        .iter()
        .filter(|p| p.extension_number() == Some("1001"))
        .count();
    assert_eq!(holders, 1);
}

#[tokio::test]
async fn test_concurrent_saves_of_unsupported_phone_open_one_approval() {
    let env = setup_yielding().await;
    let phone = Phone {
        id: "phone-x".into(),
        brand: "OTHER".into(),
        model: "Desk 9000".into(),
        ..yealink_for_user("1001")
    };

    let (a, b) = tokio::join!(
        env.engine.devices.save_phone(phone.clone()),
        env.engine.devices.save_phone(phone.clone()),
    );
    assert!(a.is_ok() && b.is_ok());

    let approvals = env.store.list_approvals(LOCATION).await.unwrap();
    assert_eq!(approvals.iter().filter(|a| a.is_for_phone("phone-x")).count(), 1);
}

#[tokio::test]
async fn test_validate_and_mark_missing_phone() {
    let env = setup().await;
    let err = env
        .engine
        .devices
        .validate_and_mark_device("phone-missing")
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { entity: "Phone", .. }));
}

#[tokio::test]
async fn test_approval_can_only_be_decided_once() {
    let env = setup().await;
    let phone = env
        .engine
        .devices
        .save_phone(Phone {
            brand: "OTHER".into(),
            ..yealink_for_user("1001")
        })
        .await
        .unwrap();
    let approval = env
        .engine
        .approvals
        .pending_approvals(LOCATION)
        .await
        .unwrap()
        .remove(0);
    assert!(approval.is_for_phone(&phone.id));

    let rejected = env
        .engine
        .approvals
        .reject(&approval.id, "lead@voicestack.example", Some("Buy a T46S".into()))
        .await
        .unwrap();
    assert_eq!(rejected.status, ApprovalStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Buy a T46S"));
    assert_eq!(rejected.decided_at, Some(now()));

    let err = env
        .engine
        .approvals
        .approve(&approval.id, "lead@voicestack.example")
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
    assert!(env.engine.approvals.pending_approvals(LOCATION).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Extensions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_series_skips_reserved_extensions() {
    let env = setup().await;
    let extensions = &env.engine.extensions;
    extensions
        .create_extension_series(series_config(1000, 1002, &["1000"]))
        .await
        .unwrap();

    let available = extensions
        .generate_available_extensions(LOCATION, 2)
        .await
        .unwrap();
    assert_eq!(available, vec!["1001", "1002"]);
}

#[tokio::test]
async fn test_generated_extensions_skip_phone_held_numbers() {
    let env = setup().await;
    let extensions = &env.engine.extensions;
    extensions
        .create_extension_series(series_config(100, 110, &[]))
        .await
        .unwrap();
    env.engine.devices.save_phone(yealink_for_user("100")).await.unwrap();

    let available = extensions
        .generate_available_extensions(LOCATION, 3)
        .await
        .unwrap();
    assert_eq!(available, vec!["101", "102", "103"]);
    assert!(!extensions.is_extension_available(LOCATION, "100").await.unwrap());

    let err = extensions
        .generate_available_extensions(LOCATION, 11)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn test_recreating_series_unions_reserved() {
    let env = setup().await;
    let extensions = &env.engine.extensions;
    extensions
        .create_extension_series(series_config(1000, 1010, &["1000"]))
        .await
        .unwrap();
    let series = extensions
        .create_extension_series(series_config(1000, 1010, &["1005"]))
        .await
        .unwrap();

    assert!(series.reserved_extensions.contains(&"1000".to_string()));
    assert!(series.reserved_extensions.contains(&"1005".to_string()));
}

#[tokio::test]
async fn test_invalid_range_is_rejected() {
    let env = setup().await;
    for (start, end) in [(1002, 1000), (1000, 1000), (-5, 10)] {
        let err = env
            .engine
            .extensions
            .create_extension_series(series_config(start, end, &[]))
            .await
            .unwrap_err();
        assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
    }
}

#[tokio::test]
async fn test_reserve_extension_is_exclusive() {
    let env = setup().await;
    let extensions = &env.engine.extensions;
    extensions
        .create_extension_series(series_config(200, 210, &[]))
        .await
        .unwrap();

    extensions.reserve_extension(LOCATION, "205").await.unwrap();
    assert!(!extensions.is_extension_available(LOCATION, "205").await.unwrap());

    let err = extensions.reserve_extension(LOCATION, "205").await.unwrap_err();
    assert_matches!(err, EngineError::Store(StoreError::Conflict(_)));

    let err = extensions.reserve_extension(LOCATION, "999").await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn test_concurrent_reservations_issue_one_winner() {
    let env = setup().await;
    let extensions = Arc::new(env.engine.extensions.clone());
    extensions
        .create_extension_series(series_config(300, 310, &[]))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let extensions = extensions.clone();
        handles.push(tokio::spawn(async move {
            extensions.reserve_extension(LOCATION, "301").await.is_ok()
        }));
    }
    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);
}

#[tokio::test]
async fn test_availability_without_series() {
    let env = setup().await;
    env.engine.devices.save_phone(yealink_for_user("1001")).await.unwrap();

    let extensions = &env.engine.extensions;
    assert!(!extensions.is_extension_available(LOCATION, "1001").await.unwrap());
    assert!(extensions.is_extension_available(LOCATION, "1002").await.unwrap());
    let err = extensions
        .generate_available_extensions(LOCATION, 1)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Submission validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_fax_question_must_be_answered() {
    let env = setup().await;
    answer(&env, json!({ "usesFax": false })).await;

    let result = env
        .engine
        .validator
        .validate_onboarding_for_submission(LOCATION)
        .await
        .unwrap();
    assert!(!result.is_valid);
    assert!(result.has_error(FAX_IN_VOICE_STACK_REQUIRED));
}

#[tokio::test]
async fn test_ivr_needs_an_option() {
    let env = setup().await;
    answer(&env, json!({ "hasIVR": true, "ivrScript": "Welcome", "ivrOptions": [] })).await;

    let result = env
        .engine
        .validator
        .validate_onboarding_for_submission(LOCATION)
        .await
        .unwrap();
    assert!(result.has_error(IVR_OPTION_REQUIRED));
}

#[tokio::test]
async fn test_direct_routing_needs_a_target() {
    let env = setup().await;
    answer(
        &env,
        json!({ "hasIVR": false, "directRingUsers": [], "directRingExtensions": [] }),
    )
    .await;

    let result = env
        .engine
        .validator
        .validate_onboarding_for_submission(LOCATION)
        .await
        .unwrap();
    assert!(result.has_error(DIRECT_TARGET_REQUIRED));
}

#[tokio::test]
async fn test_validation_is_repeatable() {
    let env = setup().await;
    fill_location(&env).await;

    let first = env
        .engine
        .validator
        .validate_onboarding_for_submission(LOCATION)
        .await
        .unwrap();
    let second = env
        .engine
        .validator
        .validate_onboarding_for_submission(LOCATION)
        .await
        .unwrap();
    assert!(first.is_valid, "unexpected errors: {:?}", first.errors);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_onboarding_validates_as_blank() {
    let env = setup().await;
    let result = env
        .engine
        .validator
        .validate_onboarding_for_submission("L-unknown")
        .await
        .unwrap();
    assert!(!result.is_valid);
    assert!(!result.errors.is_empty());
}

// ---------------------------------------------------------------------------
// Provisioning payload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_payload_mirrors_devices_and_users() {
    let env = setup().await;
    fill_location(&env).await;

    let generated = env
        .engine
        .provisioning
        .generate_and_validate(LOCATION)
        .await
        .unwrap();
    assert!(generated.validation.valid, "{:?}", generated.validation.errors);

    let payload = generated.payload;
    assert_eq!(payload.devices.len(), 1);
    assert_eq!(payload.devices[0].extension.as_deref(), Some("1001"));
    assert_eq!(payload.users.len(), 1);
    assert_eq!(payload.users[0].id, USER);
    assert_eq!(payload.users[0].extension.as_deref(), Some("1001"));
    assert_eq!(payload.extensions[0].assigned_to, ExtensionHolder::User);
    assert_eq!(payload.version, "1.0.0");
    assert_eq!(payload.timestamp, now());
    assert_eq!(payload.account_name, "Bright Smiles Dental");
}

#[tokio::test]
async fn test_payload_wire_format() {
    let env = setup().await;
    fill_location(&env).await;
    env.engine
        .devices
        .save_phone(Phone {
            assignment_type: AssignmentType::AssignedToExtension,
            assigned_user_id: None,
            ..yealink_for_user("1002")
        })
        .await
        .unwrap();

    let payload = env.engine.provisioning.generate(LOCATION).await.unwrap();
    let value = serde_json::to_value(&payload).unwrap();

    for key in [
        "locationId", "locationName", "accountId", "accountName", "timestamp", "version",
        "location", "contacts", "phoneSystem", "devices", "users", "extensions",
        "workingHours", "callFlow", "metadata",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["phoneSystem"]["fax"]["usesFax"], json!(false));
    assert_eq!(value["callFlow"]["hasIVR"], json!(false));
    assert_eq!(value["extensions"][1]["assignedTo"], json!("device"));
    assert_eq!(value["devices"][1]["assignmentType"], json!("ASSIGNED_TO_EXTENSION"));
    assert!(value["callFlow"]["voicemail"].is_object());
}

#[tokio::test]
async fn test_payload_requires_onboarding() {
    let env = setup().await;
    let err = env.engine.provisioning.generate(LOCATION).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { entity: "Onboarding", .. }));
    assert_eq!(err.status_code(), 404);

    let err = env.engine.provisioning.generate("L404").await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { entity: "Location", .. }));
}

#[tokio::test]
async fn test_payload_without_devices_fails_validation() {
    let env = setup().await;
    answer(&env, complete_answers()).await;

    let generated = env
        .engine
        .provisioning
        .generate_and_validate(LOCATION)
        .await
        .unwrap();
    assert!(!generated.validation.valid);
    assert_eq!(generated.validation.errors, vec![DEVICE_REQUIRED.to_string()]);
    assert!(env.store.list_phones(LOCATION).await.unwrap().is_empty());
}
