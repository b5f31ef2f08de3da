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

//! # fix-acquirer
//!
//! `fix-acquirer` is an asynchronous single-fix acquisition service. Callers
//! submit [`FixRequest`]s; the service picks an enabled positioning provider,
//! subscribes one listener per request and delivers exactly one [`FixReply`]
//! to the request's [`ReplyTarget`]: a fix, or an explicit failure.
//!
//! Positioning providers live behind the [`PositioningGateway`] trait, so the
//! same service runs against a platform location API, a static file
//! (`positioning-static-file`) or a test double.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use fix_acquirer::{
//!     FailureReason, FixRequest, FixReply, FixService, GatewayError, PositioningGateway,
//!     ProviderKind, ProviderListener,
//! };
//!
//! struct NothingEnabled;
//!
//! #[async_trait]
//! impl PositioningGateway for NothingEnabled {
//!     async fn is_provider_enabled(&self, _provider: ProviderKind) -> bool {
//!         false
//!     }
//!     async fn subscribe(
//!         &self,
//!         _provider: ProviderKind,
//!         _listener: Arc<dyn ProviderListener>,
//!     ) -> Result<(), GatewayError> {
//!         Ok(())
//!     }
//!     async fn unsubscribe(&self, _listener: Arc<dyn ProviderListener>) -> Result<(), GatewayError> {
//!         Ok(())
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = FixService::new("quick-start", Arc::new(NothingEnabled)).unwrap();
//! let (reply_target, mut replies) = tokio::sync::mpsc::unbounded_channel::<FixReply>();
//!
//! service
//!     .acquire_fix(FixRequest::new(1, b"visit-42".to_vec(), Arc::new(reply_target)))
//!     .unwrap();
//!
//! let reply = replies.recv().await.unwrap();
//! assert_eq!(reply.failure_reason(), Some(FailureReason::NoProviderAvailable));
//! service.shutdown().await.unwrap();
//! # });
//! ```
//!
//! ## Layers
//!
//! - `dispatch`: command queue, single dispatcher worker and request registry.
//! - `listener`: gateway-facing callback adapter and per-request state machine.
//! - `runtime`: dedicated thread and Tokio runtime hosting the dispatcher.
//! - [`observability`]: canonical `tracing` event names and field keys.
//!
//! Shutdown abandons in-flight requests: every registered listener is
//! unsubscribed and no reply is sent for them.

mod dispatch;
mod gateway;
mod listener;
mod provider;
mod reply;
mod request;
mod runtime;
mod service;

#[doc(hidden)]
pub mod observability;

pub use dispatch::ShutdownReport;
pub use gateway::{GatewayError, ListenerId, PositioningGateway, ProviderListener};
pub use provider::{Coordinates, Fix, ProviderEvent, ProviderKind, ProviderStatus, UnknownProvider};
pub use reply::{FailureReason, FixOutcome, FixReply, ReplyError, ReplyTarget};
pub use request::{FixRequest, RequestAction, RequestId, ACTION_RECORD_GPS};
pub use service::{FixService, FixServiceConfig, FixServiceHandle, ServiceError};
