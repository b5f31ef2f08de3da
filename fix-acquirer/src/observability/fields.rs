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

//! Structured field value helpers and the worker context.

use crate::provider::ProviderEvent;

pub const NONE: &str = "none";
pub const DEFAULT_WORKER_THREAD: &str = "unknown-thread";

const PAYLOAD_PREVIEW_MAX_LEN: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkerContext {
    pub worker_id: String,
    pub worker_thread: String,
}

impl WorkerContext {
    pub fn with_current_thread(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            worker_thread: current_thread_name_or_default(),
        }
    }
}

pub fn thread_name_or_default(thread_name: Option<&str>) -> String {
    thread_name.unwrap_or(DEFAULT_WORKER_THREAD).to_string()
}

pub fn current_thread_name_or_default() -> String {
    thread_name_or_default(std::thread::current().name())
}

/// Lossy UTF-8 preview of an opaque payload, truncated for log lines.
pub fn format_payload(payload: &[u8]) -> String {
    if payload.is_empty() {
        return NONE.to_string();
    }

    let text = String::from_utf8_lossy(payload);
    if text.chars().count() <= PAYLOAD_PREVIEW_MAX_LEN {
        text.into_owned()
    } else {
        let preview: String = text.chars().take(PAYLOAD_PREVIEW_MAX_LEN).collect();
        format!("{preview}...")
    }
}

/// Provider name an event refers to, `none` for fixes.
pub fn format_event_provider(event: &ProviderEvent) -> &str {
    match event {
        ProviderEvent::FixObtained(_) => NONE,
        ProviderEvent::ProviderDisabled(name)
        | ProviderEvent::ProviderEnabled(name)
        | ProviderEvent::StatusChanged(name, _) => name.as_str(),
    }
}
