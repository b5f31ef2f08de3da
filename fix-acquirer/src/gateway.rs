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

//! Positioning gateway seam consumed by the service.

use crate::provider::{ProviderEvent, ProviderKind};
use crate::request::RequestId;
use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Identity of one subscribed listener. Never reused within a service instance.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for ListenerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Gateway failures on subscribe or unsubscribe.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GatewayError {
    ProviderNotFound(String),
    SubscriptionRejected(String),
    Internal(String),
    /// The call did not complete within the service's gateway timeout.
    TimedOut(Duration),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::ProviderNotFound(provider) => {
                write!(f, "positioning provider not found: {provider}")
            }
            GatewayError::SubscriptionRejected(reason) => {
                write!(f, "subscription rejected: {reason}")
            }
            GatewayError::Internal(reason) => write!(f, "gateway failure: {reason}"),
            GatewayError::TimedOut(limit) => write!(f, "gateway call timed out after {limit:?}"),
        }
    }
}

impl Error for GatewayError {}

/// Receiver of provider callbacks for exactly one request.
#[async_trait]
pub trait ProviderListener: Send + Sync {
    fn listener_id(&self) -> ListenerId;

    /// Request this listener acquires a fix for.
    fn request_id(&self) -> RequestId;

    async fn on_event(&self, event: ProviderEvent);
}

/// Abstract positioning capability.
///
/// Implementations deliver [`ProviderEvent`]s to subscribed listeners from any
/// task or thread. `unsubscribe` of an unknown listener should succeed; the
/// service logs and swallows errors it returns either way.
#[async_trait]
pub trait PositioningGateway: Send + Sync {
    async fn is_provider_enabled(&self, provider: ProviderKind) -> bool;

    async fn subscribe(
        &self,
        provider: ProviderKind,
        listener: Arc<dyn ProviderListener>,
    ) -> Result<(), GatewayError>;

    async fn unsubscribe(&self, listener: Arc<dyn ProviderListener>) -> Result<(), GatewayError>;
}
