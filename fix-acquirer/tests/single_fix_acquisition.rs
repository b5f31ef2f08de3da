/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

mod support;

use fix_acquirer::{
    FailureReason, Fix, FixReply, FixRequest, FixService, FixServiceConfig, ListenerId,
    ProviderEvent, ProviderKind, ProviderStatus,
};
use integration_test_utils::{
    ClosedReplyTarget, RecordingGateway, RecordingReplyTarget, StalledReplyTarget, Subscription,
};
use std::sync::Arc;
use std::time::Duration;
use support::{make_service, settle, submit, REPLY_TIMEOUT};

#[tokio::test(flavor = "multi_thread")]
async fn network_fix_is_replied_with_payload_and_released() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("network-only", &[ProviderKind::Network]));
    let service = make_service("network-fix", gateway.clone());
    let handle = service.handle();

    let replies = submit(&handle, 7, "x");
    assert_eq!(settle(&handle).await, 1);
    assert_eq!(
        gateway.subscriptions(),
        vec![Subscription {
            provider: ProviderKind::Network,
            request_id: 7,
            listener_id: ListenerId::new(1),
        }]
    );

    assert!(
        gateway
            .emit_for_request(7, ProviderEvent::FixObtained(Fix::new(1.0, 2.0, 100)))
            .await
    );
    assert_eq!(settle(&handle).await, 0);

    assert_eq!(
        replies.replies(),
        vec![FixReply::fixed(7, Fix::new(1.0, 2.0, 100), b"x".to_vec())]
    );
    assert_eq!(gateway.unsubscriptions(), vec![ListenerId::new(1)]);
    assert_eq!(gateway.active_listener_count(), 0);

    service.shutdown().await.expect("shutdown should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn no_enabled_provider_fails_without_registering() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("nothing-enabled", &[]));
    let service = make_service("no-provider", gateway.clone());
    let handle = service.handle();

    let replies = submit(&handle, 11, "x");
    assert_eq!(settle(&handle).await, 0);

    assert_eq!(
        replies.replies(),
        vec![FixReply::failed(11, FailureReason::NoProviderAvailable)]
    );
    assert!(gateway.subscriptions().is_empty());
    assert!(gateway.unsubscriptions().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn satellite_is_preferred_over_network() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new(
        "both-enabled",
        &[ProviderKind::Satellite, ProviderKind::Network],
    ));
    let service = make_service("priority", gateway.clone());
    let handle = service.handle();

    let _first = submit(&handle, 1, "");
    settle(&handle).await;
    gateway.set_enabled(ProviderKind::Satellite, false);
    let _second = submit(&handle, 2, "");
    settle(&handle).await;

    let providers: Vec<_> = gateway
        .subscriptions()
        .into_iter()
        .map(|subscription| subscription.provider)
        .collect();
    assert_eq!(providers, vec![ProviderKind::Satellite, ProviderKind::Network]);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_subscription_rolls_back_registration() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("rejecting", &[ProviderKind::Network]));
    gateway.fail_subscriptions();
    let service = make_service("rollback", gateway.clone());
    let handle = service.handle();

    let replies = submit(&handle, 5, "x");
    assert_eq!(settle(&handle).await, 0);

    assert_eq!(
        replies.replies(),
        vec![FixReply::failed(5, FailureReason::NoProviderAvailable)]
    );
    assert_eq!(gateway.unsubscriptions(), vec![ListenerId::new(1)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn provider_failures_map_to_failure_replies() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("network-only", &[ProviderKind::Network]));
    let service = make_service("provider-failures", gateway.clone());
    let handle = service.handle();

    let disabled = submit(&handle, 1, "");
    let unavailable = submit(&handle, 2, "");
    settle(&handle).await;

    gateway
        .emit_for_request(1, ProviderEvent::ProviderDisabled("gps".to_string()))
        .await;
    gateway
        .emit_for_request(
            2,
            ProviderEvent::StatusChanged("network".to_string(), ProviderStatus::Available),
        )
        .await;
    gateway
        .emit_for_request(1, ProviderEvent::ProviderEnabled("network".to_string()))
        .await;
    assert_eq!(settle(&handle).await, 2);
    assert!(disabled.is_empty());
    assert!(unavailable.is_empty());

    gateway
        .emit_for_request(1, ProviderEvent::ProviderDisabled("network".to_string()))
        .await;
    gateway
        .emit_for_request(
            2,
            ProviderEvent::StatusChanged(
                "network".to_string(),
                ProviderStatus::TemporarilyUnavailable,
            ),
        )
        .await;
    assert_eq!(settle(&handle).await, 0);

    assert_eq!(
        disabled.replies(),
        vec![FixReply::failed(1, FailureReason::ProviderDisabled)]
    );
    assert_eq!(
        unavailable.replies(),
        vec![FixReply::failed(2, FailureReason::ProviderUnavailable)]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn events_after_terminal_transition_produce_no_second_reply() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("network-only", &[ProviderKind::Network]));
    let service = make_service("terminal-once", gateway.clone());
    let handle = service.handle();

    let replies = submit(&handle, 3, "x");
    settle(&handle).await;
    let listener = gateway
        .listener_for_request(3)
        .expect("listener should be subscribed");

    listener
        .on_event(ProviderEvent::FixObtained(Fix::new(1.0, 2.0, 100)))
        .await;
    listener
        .on_event(ProviderEvent::ProviderDisabled("network".to_string()))
        .await;
    listener
        .on_event(ProviderEvent::FixObtained(Fix::new(5.0, 6.0, 200)))
        .await;
    assert_eq!(settle(&handle).await, 0);

    assert_eq!(
        replies.replies(),
        vec![FixReply::fixed(3, Fix::new(1.0, 2.0, 100), b"x".to_vec())]
    );
    assert_eq!(gateway.unsubscriptions(), vec![ListenerId::new(1)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn callback_from_finished_listener_does_not_touch_reused_request_id() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("network-only", &[ProviderKind::Network]));
    let service = make_service("reused-id", gateway.clone());
    let handle = service.handle();

    let first = submit(&handle, 7, "first");
    settle(&handle).await;
    let stale = gateway
        .listener_for_request(7)
        .expect("first listener should be subscribed");
    gateway
        .emit_for_request(
            7,
            ProviderEvent::StatusChanged("network".to_string(), ProviderStatus::OutOfService),
        )
        .await;
    assert_eq!(settle(&handle).await, 0);

    let second = submit(&handle, 7, "second");
    assert_eq!(settle(&handle).await, 1);
    stale
        .on_event(ProviderEvent::FixObtained(Fix::new(9.0, 9.0, 1)))
        .await;
    assert_eq!(settle(&handle).await, 1);
    assert!(second.is_empty());

    gateway
        .emit_for_request(7, ProviderEvent::FixObtained(Fix::new(1.0, 2.0, 100)))
        .await;
    assert_eq!(settle(&handle).await, 0);

    assert_eq!(
        first.replies(),
        vec![FixReply::failed(7, FailureReason::ProviderUnavailable)]
    );
    assert_eq!(
        second.replies(),
        vec![FixReply::fixed(7, Fix::new(1.0, 2.0, 100), b"second".to_vec())]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_reply_target_goes_to_dead_letter_only() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("network-only", &[ProviderKind::Network]));
    let dead_letter = RecordingReplyTarget::new();
    let service = FixService::with_config(
        FixServiceConfig {
            name: "dead-letter".to_string(),
            dead_letter: Some(Arc::new(dead_letter.clone())),
            ..Default::default()
        },
        gateway.clone(),
    )
    .expect("fix service creation should succeed");
    let handle = service.handle();

    handle
        .acquire_fix(FixRequest::without_reply_target(9, b"x".to_vec()))
        .expect("fix service should accept requests");
    assert_eq!(settle(&handle).await, 0);

    assert_eq!(
        dead_letter.replies(),
        vec![FixReply::failed(9, FailureReason::NoReplyTarget)]
    );
    assert!(gateway.subscriptions().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_reply_target_without_dead_letter_is_dropped() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("network-only", &[ProviderKind::Network]));
    let service = make_service("no-dead-letter", gateway.clone());
    let handle = service.handle();

    handle
        .acquire_fix(FixRequest::without_reply_target(9, Vec::new()))
        .expect("fix service should accept requests");

    assert_eq!(settle(&handle).await, 0);
    assert!(gateway.subscriptions().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_reply_channel_does_not_stop_later_requests() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("network-only", &[ProviderKind::Network]));
    let service = make_service("closed-reply", gateway.clone());
    let handle = service.handle();

    let closed = ClosedReplyTarget::new();
    handle
        .acquire_fix(FixRequest::new(1, Vec::new(), Arc::new(closed.clone())))
        .expect("fix service should accept requests");
    settle(&handle).await;
    gateway
        .emit_for_request(1, ProviderEvent::FixObtained(Fix::new(1.0, 2.0, 100)))
        .await;
    assert_eq!(settle(&handle).await, 0);
    assert_eq!(closed.attempts(), 1);
    assert_eq!(gateway.unsubscriptions(), vec![ListenerId::new(1)]);

    let replies = submit(&handle, 2, "");
    settle(&handle).await;
    gateway
        .emit_for_request(2, ProviderEvent::FixObtained(Fix::new(3.0, 4.0, 300)))
        .await;
    assert_eq!(settle(&handle).await, 0);

    assert_eq!(
        replies.replies(),
        vec![FixReply::fixed(2, Fix::new(3.0, 4.0, 300), Vec::new())]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn stalled_reply_target_does_not_block_later_requests() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(RecordingGateway::new("network-only", &[ProviderKind::Network]));
    let service = FixService::with_config(
        FixServiceConfig {
            name: "stalled-reply".to_string(),
            reply_timeout: Duration::from_millis(50),
            ..Default::default()
        },
        gateway.clone(),
    )
    .expect("fix service creation should succeed");
    let handle = service.handle();

    let stalled = StalledReplyTarget::new();
    handle
        .acquire_fix(FixRequest::new(1, Vec::new(), Arc::new(stalled.clone())))
        .expect("fix service should accept requests");
    settle(&handle).await;
    gateway
        .emit_for_request(1, ProviderEvent::FixObtained(Fix::new(1.0, 2.0, 100)))
        .await;

    let in_flight = tokio::time::timeout(REPLY_TIMEOUT, settle(&handle))
        .await
        .expect("dispatcher should give up on the stalled reply");
    assert_eq!(in_flight, 0);
    assert_eq!(stalled.attempts(), 1);
    assert_eq!(gateway.unsubscriptions(), vec![ListenerId::new(1)]);

    let replies = submit(&handle, 2, "y");
    assert_eq!(settle(&handle).await, 1);
    gateway
        .emit_for_request(2, ProviderEvent::FixObtained(Fix::new(3.0, 4.0, 300)))
        .await;

    assert_eq!(
        replies.wait_for_replies(1, REPLY_TIMEOUT).await,
        vec![FixReply::fixed(2, Fix::new(3.0, 4.0, 300), b"y".to_vec())]
    );
    assert_eq!(settle(&handle).await, 0);

    tokio::time::timeout(REPLY_TIMEOUT, service.shutdown())
        .await
        .expect("shutdown should not wait on the stalled reply")
        .expect("shutdown should succeed");
}
