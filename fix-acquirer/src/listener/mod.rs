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

//! Listener layer.
//!
//! The gateway-facing [`ProviderCallbackListener`] only enqueues provider
//! events; the per-request [`FixListener`] state machine is driven from the
//! dispatcher worker once the event is dequeued.
//!
//! [`ProviderCallbackListener`]: provider_callback::ProviderCallbackListener
//! [`FixListener`]: fix_listener::FixListener

pub(crate) mod fix_listener;
pub(crate) mod provider_callback;
