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

//! Gateway-facing listener adapter that feeds provider events into the dispatcher queue.

use crate::dispatch::command::{Command, CommandSender};
use crate::gateway::{ListenerId, ProviderListener};
use crate::observability::{events, fields};
use crate::provider::ProviderEvent;
use crate::request::RequestId;
use async_trait::async_trait;
use tracing::{debug, Level};

const COMPONENT: &str = "provider_callback";

#[derive(Clone)]
pub(crate) struct ProviderCallbackListener {
    request_id: RequestId,
    listener_id: ListenerId,
    sender: CommandSender,
}

impl ProviderCallbackListener {
    pub(crate) fn new(request_id: RequestId, listener_id: ListenerId, sender: CommandSender) -> Self {
        Self {
            request_id,
            listener_id,
            sender,
        }
    }
}

#[async_trait]
impl ProviderListener for ProviderCallbackListener {
    fn listener_id(&self) -> ListenerId {
        self.listener_id
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    async fn on_event(&self, event: ProviderEvent) {
        let request_id = self.request_id;
        let listener_id = self.listener_id.as_u64();

        if tracing::enabled!(Level::DEBUG) {
            debug!(
                event = events::CALLBACK_RECEIVED,
                component = COMPONENT,
                request_id,
                listener_id,
                provider_event = event.kind(),
                provider = fields::format_event_provider(&event),
                "received provider callback"
            );
        }

        // The queue only closes once the dispatcher has stopped; the listener
        // is being torn down and the event has nobody left to serve.
        if let Err(err) = self.sender.send(Command::ProviderCallback {
            request_id,
            listener_id: self.listener_id,
            event,
        }) {
            debug!(
                event = events::CALLBACK_ENQUEUE_FAILED,
                component = COMPONENT,
                request_id,
                listener_id,
                command = err.0.label(),
                reason = "dispatcher_stopped",
                "dropping provider callback"
            );
        }
    }
}
