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

//! Dispatch layer.
//!
//! Commands from callers and from provider callbacks share one FIFO queue.
//! A single worker drains it, so registry mutation and state transitions
//! are never concurrent.

pub(crate) mod command;
pub(crate) mod dispatcher;
pub(crate) mod registry;

pub use dispatcher::ShutdownReport;
