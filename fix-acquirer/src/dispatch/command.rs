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

//! Messages accepted by the dispatcher queue.

use crate::gateway::ListenerId;
use crate::provider::ProviderEvent;
use crate::request::{FixRequest, RequestId};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

pub(crate) type CommandSender = UnboundedSender<Command>;

#[derive(Debug)]
pub(crate) enum Command {
    AcquireFix(FixRequest),
    ProviderCallback {
        request_id: RequestId,
        listener_id: ListenerId,
        event: ProviderEvent,
    },
    /// Answers with the number of registered requests.
    InFlight(oneshot::Sender<usize>),
}

impl Command {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Command::AcquireFix(_) => "acquire_fix",
            Command::ProviderCallback { .. } => "provider_callback",
            Command::InFlight(_) => "in_flight",
        }
    }
}
