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

//! Per-request state machine turning provider events into one terminal outcome.

use crate::provider::{Fix, ProviderEvent, ProviderKind, ProviderStatus};
use crate::reply::{FailureReason, FixReply};
use crate::request::RequestId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ListenerState {
    Subscribed,
    Terminal,
}

/// Terminal result of a listener, before the payload is attached.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TerminalOutcome {
    Fixed(Fix),
    Failed(FailureReason),
}

impl TerminalOutcome {
    pub(crate) fn into_reply(self, request_id: RequestId, payload: Vec<u8>) -> FixReply {
        match self {
            TerminalOutcome::Fixed(fix) => FixReply::fixed(request_id, fix, payload),
            TerminalOutcome::Failed(reason) => FixReply::failed(request_id, reason),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Transition {
    /// Event was informational or arrived after the terminal transition.
    Stay,
    Terminal(TerminalOutcome),
}

#[derive(Debug)]
pub(crate) struct FixListener {
    provider: ProviderKind,
    state: ListenerState,
}

impl FixListener {
    pub(crate) fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            state: ListenerState::Subscribed,
        }
    }

    pub(crate) fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub(crate) fn state(&self) -> ListenerState {
        self.state
    }

    /// Applies one provider event. At most one call ever returns `Terminal`.
    pub(crate) fn on_event(&mut self, event: &ProviderEvent) -> Transition {
        if self.state == ListenerState::Terminal {
            return Transition::Stay;
        }

        let outcome = match event {
            ProviderEvent::FixObtained(fix) => TerminalOutcome::Fixed(*fix),
            ProviderEvent::ProviderDisabled(name) if name == self.provider.name() => {
                TerminalOutcome::Failed(FailureReason::ProviderDisabled)
            }
            ProviderEvent::StatusChanged(
                _,
                ProviderStatus::OutOfService | ProviderStatus::TemporarilyUnavailable,
            ) => TerminalOutcome::Failed(FailureReason::ProviderUnavailable),
            ProviderEvent::ProviderDisabled(_)
            | ProviderEvent::ProviderEnabled(_)
            | ProviderEvent::StatusChanged(_, ProviderStatus::Available) => {
                return Transition::Stay;
            }
        };

        self.state = ListenerState::Terminal;
        Transition::Terminal(outcome)
    }
}
