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

//! Sequential command processor owning the request registry.

use crate::dispatch::command::{Command, CommandSender};
use crate::dispatch::registry::{ListenerEntry, RequestRegistry};
use crate::gateway::{GatewayError, ListenerId, PositioningGateway, ProviderListener};
use crate::listener::fix_listener::Transition;
use crate::listener::provider_callback::ProviderCallbackListener;
use crate::observability::events;
use crate::observability::fields::{self, WorkerContext};
use crate::provider::{ProviderEvent, ProviderKind};
use crate::reply::{FailureReason, FixReply, ReplyError, ReplyTarget};
use crate::request::{FixRequest, RequestId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use tracing::{debug, info, warn, Level};

const COMPONENT: &str = "dispatcher";

pub(crate) const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(5);

/// What the worker abandoned when it stopped.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ShutdownReport {
    /// Registered requests removed and unsubscribed without a reply.
    pub abandoned_requests: usize,
    /// Commands still queued when the stop signal arrived.
    pub dropped_commands: usize,
}

pub(crate) struct Dispatcher {
    service: String,
    gateway: Arc<dyn PositioningGateway>,
    dead_letter: Option<Arc<dyn ReplyTarget>>,
    command_sender: CommandSender,
    registry: RequestRegistry,
    next_listener_id: u64,
    reply_timeout: Duration,
    gateway_timeout: Duration,
}

impl Dispatcher {
    pub(crate) fn new(
        service: &str,
        gateway: Arc<dyn PositioningGateway>,
        dead_letter: Option<Arc<dyn ReplyTarget>>,
        command_sender: CommandSender,
    ) -> Self {
        Self {
            service: service.to_string(),
            gateway,
            dead_letter,
            command_sender,
            registry: RequestRegistry::new(),
            next_listener_id: 0,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    /// Bounds each reply delivery and each gateway subscribe/unsubscribe call,
    /// so a stalled peer only costs its own request.
    pub(crate) fn with_timeouts(
        mut self,
        reply_timeout: Duration,
        gateway_timeout: Duration,
    ) -> Self {
        self.reply_timeout = reply_timeout;
        self.gateway_timeout = gateway_timeout;
        self
    }

    /// Drains `commands` in arrival order until `shutdown` fires or is dropped,
    /// then tears down every registered request.
    pub(crate) async fn run(
        mut self,
        worker_id: String,
        mut commands: UnboundedReceiver<Command>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> ShutdownReport {
        let worker_context = WorkerContext::with_current_thread(worker_id);
        info!(
            event = events::DISPATCHER_START,
            component = COMPONENT,
            service = self.service.as_str(),
            worker_id = worker_context.worker_id.as_str(),
            worker_thread = worker_context.worker_thread.as_str(),
            "dispatcher started"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
            }
        }

        commands.close();
        let mut dropped_commands = 0;
        while let Ok(command) = commands.try_recv() {
            dropped_commands += 1;
            debug!(
                event = events::COMMANDS_DROPPED,
                component = COMPONENT,
                service = self.service.as_str(),
                command = command.label(),
                "dropping queued command at shutdown"
            );
        }

        let abandoned_requests = self.teardown().await;

        info!(
            event = events::DISPATCHER_STOP,
            component = COMPONENT,
            service = self.service.as_str(),
            worker_id = worker_context.worker_id.as_str(),
            worker_thread = worker_context.worker_thread.as_str(),
            abandoned_requests,
            dropped_commands,
            "dispatcher stopped"
        );

        ShutdownReport {
            abandoned_requests,
            dropped_commands,
        }
    }

    pub(crate) async fn handle(&mut self, command: Command) {
        match command {
            Command::AcquireFix(request) => self.acquire_fix(request).await,
            Command::ProviderCallback {
                request_id,
                listener_id,
                event,
            } => self.provider_callback(request_id, listener_id, event).await,
            Command::InFlight(answer) => {
                let _ = answer.send(self.registry.len());
            }
        }
    }

    async fn acquire_fix(&mut self, request: FixRequest) {
        let FixRequest {
            request_id,
            payload,
            reply_target,
        } = request;

        if tracing::enabled!(Level::DEBUG) {
            debug!(
                event = events::REQUEST_RECEIVED,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id,
                payload = %fields::format_payload(&payload),
                "received fix request"
            );
        }

        let Some(reply_target) = reply_target else {
            warn!(
                event = events::REQUEST_REJECTED,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id,
                reason = %FailureReason::NoReplyTarget,
                "request has no reply target"
            );
            let reply = FixReply::failed(request_id, FailureReason::NoReplyTarget);
            match self.dead_letter.clone() {
                Some(dead_letter) => self.deliver(&dead_letter, reply).await,
                None => debug!(
                    event = events::REPLY_DROPPED,
                    component = COMPONENT,
                    service = self.service.as_str(),
                    request_id,
                    reason = %FailureReason::NoReplyTarget,
                    "no dead-letter target configured"
                ),
            }
            return;
        };

        if let Some(existing) = self.registry.get(request_id) {
            warn!(
                event = events::REQUEST_REJECTED,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id,
                listener_id = existing.listener_id.as_u64(),
                provider = existing.provider().name(),
                reason = %FailureReason::DuplicateRequestId,
                "request id already in flight"
            );
            self.deliver(
                &reply_target,
                FixReply::failed(request_id, FailureReason::DuplicateRequestId),
            )
            .await;
            return;
        }

        let Some(provider) = self.select_provider().await else {
            warn!(
                event = events::REQUEST_REJECTED,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id,
                reason = %FailureReason::NoProviderAvailable,
                "no positioning provider enabled"
            );
            self.deliver(
                &reply_target,
                FixReply::failed(request_id, FailureReason::NoProviderAvailable),
            )
            .await;
            return;
        };

        let listener_id = self.allocate_listener_id();
        let callback = Arc::new(ProviderCallbackListener::new(
            request_id,
            listener_id,
            self.command_sender.clone(),
        ));
        let entry = ListenerEntry::new(
            request_id,
            provider,
            reply_target,
            payload,
            callback.clone(),
        );

        // Duplicates were answered above and only this worker touches the registry.
        let inserted = self.registry.insert(entry);
        debug_assert!(inserted.is_ok(), "{inserted:?}");

        debug!(
            event = events::PROVIDER_SELECTED,
            component = COMPONENT,
            service = self.service.as_str(),
            request_id,
            listener_id = listener_id.as_u64(),
            provider = provider.name(),
            in_flight = self.registry.len(),
            "registered listener"
        );

        let subscribed = tokio::time::timeout(
            self.gateway_timeout,
            self.gateway.subscribe(provider, callback),
        )
        .await
        .unwrap_or_else(|_| Err(GatewayError::TimedOut(self.gateway_timeout)));

        match subscribed {
            Ok(()) => {
                debug!(
                    event = events::LISTENER_SUBSCRIBE_OK,
                    component = COMPONENT,
                    service = self.service.as_str(),
                    request_id,
                    listener_id = listener_id.as_u64(),
                    provider = provider.name(),
                    "subscribed listener"
                );
            }
            Err(err) => {
                warn!(
                    event = events::LISTENER_SUBSCRIBE_FAILED,
                    component = COMPONENT,
                    service = self.service.as_str(),
                    request_id,
                    listener_id = listener_id.as_u64(),
                    provider = provider.name(),
                    err = %err,
                    "unable to subscribe listener"
                );
                if let Some(entry) = self.registry.remove(request_id) {
                    self.release(&entry, "rollback_after_subscribe_failure")
                        .await;
                    self.deliver(
                        &entry.reply_target,
                        FixReply::failed(request_id, FailureReason::NoProviderAvailable),
                    )
                    .await;
                }
            }
        }
    }

    async fn provider_callback(
        &mut self,
        request_id: RequestId,
        listener_id: ListenerId,
        event: ProviderEvent,
    ) {
        let Some(entry) = self
            .registry
            .get_mut(request_id)
            .filter(|entry| entry.listener_id == listener_id)
        else {
            debug!(
                event = events::CALLBACK_STALE,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id,
                listener_id = listener_id.as_u64(),
                provider_event = event.kind(),
                "discarding callback for listener no longer registered"
            );
            return;
        };

        let outcome = match entry.listener.on_event(&event) {
            Transition::Stay => {
                debug!(
                    event = events::CALLBACK_IGNORED,
                    component = COMPONENT,
                    service = self.service.as_str(),
                    request_id,
                    listener_id = listener_id.as_u64(),
                    provider_event = event.kind(),
                    provider = fields::format_event_provider(&event),
                    state = ?entry.listener.state(),
                    "provider event does not end the request"
                );
                return;
            }
            Transition::Terminal(outcome) => outcome,
        };

        let Some(entry) = self.registry.remove(request_id) else {
            return;
        };

        let reply = outcome.into_reply(request_id, entry.payload.clone());
        info!(
            event = events::LISTENER_TERMINAL,
            component = COMPONENT,
            service = self.service.as_str(),
            request_id,
            listener_id = listener_id.as_u64(),
            provider = entry.provider().name(),
            provider_event = event.kind(),
            ok = reply.is_ok(),
            in_flight = self.registry.len(),
            "request finished"
        );

        self.deliver(&entry.reply_target, reply).await;
        self.release(&entry, "terminal").await;
    }

    async fn select_provider(&self) -> Option<ProviderKind> {
        for provider in ProviderKind::PRIORITY {
            if self.gateway.is_provider_enabled(provider).await {
                return Some(provider);
            }
        }
        None
    }

    fn allocate_listener_id(&mut self) -> ListenerId {
        self.next_listener_id += 1;
        ListenerId::new(self.next_listener_id)
    }

    /// Unsubscribes an entry's listener; failures are logged, never propagated.
    async fn release(&self, entry: &ListenerEntry, reason: &str) {
        let listener: Arc<dyn ProviderListener> = entry.callback.clone();

        let unsubscribed =
            tokio::time::timeout(self.gateway_timeout, self.gateway.unsubscribe(listener))
                .await
                .unwrap_or_else(|_| Err(GatewayError::TimedOut(self.gateway_timeout)));

        match unsubscribed {
            Ok(()) => debug!(
                event = events::LISTENER_UNSUBSCRIBE_OK,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id = entry.request_id,
                listener_id = entry.listener_id.as_u64(),
                provider = entry.provider().name(),
                reason,
                "unsubscribed listener"
            ),
            Err(err) => warn!(
                event = events::LISTENER_UNSUBSCRIBE_FAILED,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id = entry.request_id,
                listener_id = entry.listener_id.as_u64(),
                provider = entry.provider().name(),
                reason,
                err = %err,
                "unable to unsubscribe listener"
            ),
        }
    }

    /// Delivers a reply; a failing or stalled return path is logged and swallowed.
    async fn deliver(&self, reply_target: &Arc<dyn ReplyTarget>, reply: FixReply) {
        let request_id = reply.request_id;
        let ok = reply.is_ok();

        let delivered = tokio::time::timeout(self.reply_timeout, reply_target.deliver(reply))
            .await
            .unwrap_or_else(|_| Err(ReplyError::TimedOut(self.reply_timeout)));

        match delivered {
            Ok(()) => debug!(
                event = events::REPLY_SEND_OK,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id,
                ok,
                "reply delivered"
            ),
            Err(err) => warn!(
                event = events::REPLY_SEND_FAILED,
                component = COMPONENT,
                service = self.service.as_str(),
                request_id,
                ok,
                err = %err,
                "unable to deliver reply"
            ),
        }
    }

    /// Removes and unsubscribes every registered request without replying.
    pub(crate) async fn teardown(&mut self) -> usize {
        if self.registry.is_empty() {
            return 0;
        }

        info!(
            event = events::TEARDOWN_START,
            component = COMPONENT,
            service = self.service.as_str(),
            in_flight = self.registry.len(),
            "abandoning in-flight requests"
        );

        let entries = self.registry.drain();
        for entry in &entries {
            self.release(entry, "teardown").await;
        }

        info!(
            event = events::TEARDOWN_DONE,
            component = COMPONENT,
            service = self.service.as_str(),
            abandoned = entries.len(),
            "teardown complete"
        );
        entries.len()
    }
}
