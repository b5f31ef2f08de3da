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

use async_trait::async_trait;
use fix_acquirer::{FixReply, ReplyError, ReplyTarget};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

#[derive(Clone, Default)]
pub struct RecordingReplyTarget {
    replies: Arc<Mutex<Vec<FixReply>>>,
    delivered: Arc<Notify>,
}

impl RecordingReplyTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replies(&self) -> Vec<FixReply> {
        self.replies
            .lock()
            .expect("reply store should not be poisoned")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.replies
            .lock()
            .expect("reply store should not be poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits until at least `count` replies arrived or `timeout` elapsed,
    /// then returns whatever was recorded.
    pub async fn wait_for_replies(&self, count: usize, timeout: Duration) -> Vec<FixReply> {
        let deadline = Instant::now() + timeout;

        loop {
            let delivered = self.delivered.notified();
            if self.len() >= count {
                break;
            }
            if tokio::time::timeout_at(deadline, delivered).await.is_err() {
                break;
            }
        }

        self.replies()
    }
}

#[async_trait]
impl ReplyTarget for RecordingReplyTarget {
    async fn deliver(&self, reply: FixReply) -> Result<(), ReplyError> {
        debug!("within recording_reply_target! reply: {:?}", reply);
        self.replies
            .lock()
            .expect("reply store should not be poisoned")
            .push(reply);
        self.delivered.notify_waiters();
        Ok(())
    }
}

/// Reply target whose return path is already gone.
#[derive(Clone, Default)]
pub struct ClosedReplyTarget {
    attempts: Arc<AtomicUsize>,
}

impl ClosedReplyTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReplyTarget for ClosedReplyTarget {
    async fn deliver(&self, reply: FixReply) -> Result<(), ReplyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        debug!(
            "closed_reply_target dropping reply for request {}",
            reply.request_id
        );
        Err(ReplyError::ChannelClosed)
    }
}

/// Reply target whose `deliver` never completes.
#[derive(Clone, Default)]
pub struct StalledReplyTarget {
    attempts: Arc<AtomicUsize>,
}

impl StalledReplyTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReplyTarget for StalledReplyTarget {
    async fn deliver(&self, reply: FixReply) -> Result<(), ReplyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        debug!(
            "stalled_reply_target holding reply for request {}",
            reply.request_id
        );
        std::future::pending::<()>().await;
        Ok(())
    }
}
