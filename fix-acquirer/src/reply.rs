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

//! Terminal replies and the return path they are delivered on.

use crate::provider::{Coordinates, Fix};
use crate::request::RequestId;
use async_trait::async_trait;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Why a request ended without a fix.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum FailureReason {
    NoReplyTarget,
    NoProviderAvailable,
    DuplicateRequestId,
    ProviderDisabled,
    ProviderUnavailable,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::NoReplyTarget => "no_reply_target",
            FailureReason::NoProviderAvailable => "no_provider_available",
            FailureReason::DuplicateRequestId => "duplicate_request_id",
            FailureReason::ProviderDisabled => "provider_disabled",
            FailureReason::ProviderUnavailable => "provider_unavailable",
        }
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum FixOutcome {
    #[serde(rename = "OK")]
    Ok {
        coordinates: Coordinates,
        timestamp: i64,
        /// Observation text for the coordinates, see [`Coordinates::observation_value`].
        value: String,
        payload: Vec<u8>,
    },
    #[serde(rename = "FAILED")]
    Failed { reason: FailureReason },
}

/// The single terminal message that ends a request's lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FixReply {
    pub request_id: RequestId,
    #[serde(flatten)]
    pub outcome: FixOutcome,
}

impl FixReply {
    pub fn fixed(request_id: RequestId, fix: Fix, payload: Vec<u8>) -> Self {
        Self {
            request_id,
            outcome: FixOutcome::Ok {
                coordinates: fix.coordinates,
                timestamp: fix.timestamp,
                value: fix.coordinates.observation_value(),
                payload,
            },
        }
    }

    pub fn failed(request_id: RequestId, reason: FailureReason) -> Self {
        Self {
            request_id,
            outcome: FixOutcome::Failed { reason },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, FixOutcome::Ok { .. })
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self.outcome {
            FixOutcome::Failed { reason } => Some(reason),
            FixOutcome::Ok { .. } => None,
        }
    }
}

/// Reply delivery failures. The service logs these and moves on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReplyError {
    /// The receiving side of the return path is gone.
    ChannelClosed,
    Rejected(String),
    /// The target did not accept the reply within the service's reply timeout.
    TimedOut(Duration),
}

impl Display for ReplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ReplyError::ChannelClosed => write!(f, "reply channel closed"),
            ReplyError::Rejected(reason) => write!(f, "reply rejected: {reason}"),
            ReplyError::TimedOut(limit) => write!(f, "reply delivery timed out after {limit:?}"),
        }
    }
}

impl Error for ReplyError {}

/// Return path to the original requester.
#[async_trait]
pub trait ReplyTarget: Send + Sync {
    async fn deliver(&self, reply: FixReply) -> Result<(), ReplyError>;
}

#[async_trait]
impl ReplyTarget for UnboundedSender<FixReply> {
    async fn deliver(&self, reply: FixReply) -> Result<(), ReplyError> {
        self.send(reply).map_err(|_| ReplyError::ChannelClosed)
    }
}
