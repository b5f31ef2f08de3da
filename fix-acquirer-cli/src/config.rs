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

use fix_acquirer::ACTION_RECORD_GPS;
use serde::{Deserialize, Serialize};

const DEFAULT_SHUTDOWN_AFTER_MS: u64 = 5_000;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) service: ServiceConfig,
    pub(crate) gateway: GatewayConfig,
    #[serde(default)]
    pub(crate) requests: Vec<RequestConfig>,
    /// Delay before the service is torn down. Requests still in flight by
    /// then are abandoned.
    #[serde(default = "default_shutdown_after_ms")]
    pub(crate) shutdown_after_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) worker_thread_name: Option<String>,
    /// Print `NoReplyTarget` failures instead of dropping them.
    #[serde(default)]
    pub(crate) print_dead_letters: bool,
    /// Overrides the service's reply delivery timeout.
    #[serde(default)]
    pub(crate) reply_timeout_ms: Option<u64>,
    /// Overrides the service's gateway call timeout.
    #[serde(default)]
    pub(crate) gateway_timeout_ms: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub(crate) file_path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RequestConfig {
    pub(crate) request_id: i32,
    #[serde(default = "default_action")]
    pub(crate) action: String,
    #[serde(default)]
    pub(crate) payload: String,
    /// `false` submits the request without a reply target.
    #[serde(default = "default_reply")]
    pub(crate) reply: bool,
}

fn default_shutdown_after_ms() -> u64 {
    DEFAULT_SHUTDOWN_AFTER_MS
}

fn default_action() -> String {
    ACTION_RECORD_GPS.to_string()
}

fn default_reply() -> bool {
    true
}
