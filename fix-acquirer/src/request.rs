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

use crate::reply::ReplyTarget;
use std::fmt;
use std::sync::Arc;

/// Caller-assigned identifier, unique among in-flight requests.
pub type RequestId = i32;

/// Action name that maps an inbound intent onto [`RequestAction::RecordGps`].
pub const ACTION_RECORD_GPS: &str = "org.sana.android.intent.ACTION_RECORD_GPS";

/// Inbound actions the service understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestAction {
    RecordGps,
}

impl RequestAction {
    /// Maps a platform action name; unknown actions yield `None`.
    pub fn from_action_name(action: &str) -> Option<Self> {
        match action {
            ACTION_RECORD_GPS => Some(RequestAction::RecordGps),
            _ => None,
        }
    }
}

/// [`FixRequest`] asks the service for exactly one position fix.
///
/// `payload` is opaque to the service and is echoed back unchanged in a
/// successful reply. A request without a reply target is rejected at
/// admission with [`FailureReason::NoReplyTarget`][crate::FailureReason].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fix_acquirer::{FixReply, FixRequest, ReplyTarget};
///
/// let (sender, _receiver) = tokio::sync::mpsc::unbounded_channel::<FixReply>();
/// let reply_target: Arc<dyn ReplyTarget> = Arc::new(sender);
///
/// let request = FixRequest::new(7, b"x".to_vec(), reply_target);
/// assert_eq!(request.request_id(), 7);
/// assert!(request.has_reply_target());
///
/// let orphan = FixRequest::without_reply_target(8, Vec::new());
/// assert!(!orphan.has_reply_target());
/// ```
#[derive(Clone)]
pub struct FixRequest {
    pub(crate) request_id: RequestId,
    pub(crate) payload: Vec<u8>,
    pub(crate) reply_target: Option<Arc<dyn ReplyTarget>>,
}

impl FixRequest {
    pub fn new(request_id: RequestId, payload: Vec<u8>, reply_target: Arc<dyn ReplyTarget>) -> Self {
        Self {
            request_id,
            payload,
            reply_target: Some(reply_target),
        }
    }

    pub fn without_reply_target(request_id: RequestId, payload: Vec<u8>) -> Self {
        Self {
            request_id,
            payload,
            reply_target: None,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn has_reply_target(&self) -> bool {
        self.reply_target.is_some()
    }
}

impl fmt::Debug for FixRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixRequest")
            .field("request_id", &self.request_id)
            .field("payload_len", &self.payload.len())
            .field("has_reply_target", &self.reply_target.is_some())
            .finish()
    }
}
