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

use async_trait::async_trait;
use fix_acquirer::{
    GatewayError, ListenerId, PositioningGateway, ProviderEvent, ProviderKind, ProviderListener,
    RequestId,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// One recorded `subscribe` call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Subscription {
    pub provider: ProviderKind,
    pub request_id: RequestId,
    pub listener_id: ListenerId,
}

#[derive(Default)]
struct GatewayState {
    enabled: HashSet<ProviderKind>,
    fail_subscribe: bool,
    failing_unsubscribe: HashSet<RequestId>,
    stalled_unsubscribe: HashSet<RequestId>,
    active: HashMap<ListenerId, Arc<dyn ProviderListener>>,
    subscriptions: Vec<Subscription>,
    unsubscriptions: Vec<ListenerId>,
}

/// In-memory gateway recording every call, with events pushed by the test.
pub struct RecordingGateway {
    name: Arc<String>,
    state: Mutex<GatewayState>,
}

impl RecordingGateway {
    pub fn new(name: &str, enabled: &[ProviderKind]) -> Self {
        Self {
            name: Arc::new(name.to_string()),
            state: Mutex::new(GatewayState {
                enabled: enabled.iter().copied().collect(),
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, GatewayState> {
        self.state
            .lock()
            .expect("gateway state should not be poisoned")
    }

    pub fn set_enabled(&self, provider: ProviderKind, enabled: bool) {
        let mut state = self.state();
        if enabled {
            state.enabled.insert(provider);
        } else {
            state.enabled.remove(&provider);
        }
    }

    /// Makes every following `subscribe` call fail.
    pub fn fail_subscriptions(&self) {
        self.state().fail_subscribe = true;
    }

    /// Makes `unsubscribe` fail for listeners of `request_id`. The call is
    /// still recorded and the listener is still dropped.
    pub fn fail_unsubscribe_for(&self, request_id: RequestId) {
        self.state().failing_unsubscribe.insert(request_id);
    }

    /// Makes `unsubscribe` for listeners of `request_id` record the call and
    /// then never complete.
    pub fn stall_unsubscribe_for(&self, request_id: RequestId) {
        self.state().stalled_unsubscribe.insert(request_id);
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.state().subscriptions.clone()
    }

    pub fn unsubscriptions(&self) -> Vec<ListenerId> {
        self.state().unsubscriptions.clone()
    }

    pub fn active_listener_count(&self) -> usize {
        self.state().active.len()
    }

    pub fn listener_for_request(&self, request_id: RequestId) -> Option<Arc<dyn ProviderListener>> {
        self.state()
            .active
            .values()
            .find(|listener| listener.request_id() == request_id)
            .cloned()
    }

    /// Delivers `event` to the active listener of `request_id`.
    /// Returns `false` when no such listener is subscribed.
    pub async fn emit_for_request(&self, request_id: RequestId, event: ProviderEvent) -> bool {
        let Some(listener) = self.listener_for_request(request_id) else {
            debug!(
                "{}: no active listener for request {request_id}, dropping {event:?}",
                self.name
            );
            return false;
        };

        listener.on_event(event).await;
        true
    }

    /// Delivers `event` to every active listener, returning how many got it.
    pub async fn emit_to_all(&self, event: ProviderEvent) -> usize {
        let listeners: Vec<Arc<dyn ProviderListener>> =
            self.state().active.values().cloned().collect();

        for listener in &listeners {
            listener.on_event(event.clone()).await;
        }
        listeners.len()
    }
}

#[async_trait]
impl PositioningGateway for RecordingGateway {
    async fn is_provider_enabled(&self, provider: ProviderKind) -> bool {
        self.state().enabled.contains(&provider)
    }

    async fn subscribe(
        &self,
        provider: ProviderKind,
        listener: Arc<dyn ProviderListener>,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        debug!(
            "{}: subscribing {} for request {} on {provider}",
            self.name,
            listener.listener_id(),
            listener.request_id()
        );

        if state.fail_subscribe {
            return Err(GatewayError::SubscriptionRejected(format!(
                "{} refuses subscriptions",
                self.name
            )));
        }

        state.subscriptions.push(Subscription {
            provider,
            request_id: listener.request_id(),
            listener_id: listener.listener_id(),
        });
        state.active.insert(listener.listener_id(), listener);
        Ok(())
    }

    async fn unsubscribe(&self, listener: Arc<dyn ProviderListener>) -> Result<(), GatewayError> {
        let stalled = {
            let mut state = self.state();
            debug!(
                "{}: unsubscribing {} for request {}",
                self.name,
                listener.listener_id(),
                listener.request_id()
            );

            state.unsubscriptions.push(listener.listener_id());
            state.active.remove(&listener.listener_id());

            if state.failing_unsubscribe.contains(&listener.request_id()) {
                return Err(GatewayError::Internal(format!(
                    "{} failed to unsubscribe {}",
                    self.name,
                    listener.listener_id()
                )));
            }
            state.stalled_unsubscribe.contains(&listener.request_id())
        };

        if stalled {
            debug!(
                "{}: unsubscribe of {} hangs",
                self.name,
                listener.listener_id()
            );
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}
