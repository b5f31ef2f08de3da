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

//! In-flight request bookkeeping owned by the dispatcher worker.

use crate::gateway::{ListenerId, ProviderListener};
use crate::listener::fix_listener::FixListener;
use crate::listener::provider_callback::ProviderCallbackListener;
use crate::provider::ProviderKind;
use crate::reply::ReplyTarget;
use crate::request::RequestId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Insert failure: the request id already has a subscribed listener.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DuplicateRequestId(pub(crate) RequestId);

impl Display for DuplicateRequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "request id {} is already in flight", self.0)
    }
}

impl Error for DuplicateRequestId {}

/// Everything the service keeps for one in-flight request.
pub(crate) struct ListenerEntry {
    pub(crate) request_id: RequestId,
    pub(crate) listener_id: ListenerId,
    pub(crate) reply_target: Arc<dyn ReplyTarget>,
    pub(crate) payload: Vec<u8>,
    pub(crate) listener: FixListener,
    pub(crate) callback: Arc<ProviderCallbackListener>,
}

impl ListenerEntry {
    pub(crate) fn new(
        request_id: RequestId,
        provider: ProviderKind,
        reply_target: Arc<dyn ReplyTarget>,
        payload: Vec<u8>,
        callback: Arc<ProviderCallbackListener>,
    ) -> Self {
        Self {
            request_id,
            listener_id: callback.listener_id(),
            reply_target,
            payload,
            listener: FixListener::new(provider),
            callback,
        }
    }

    pub(crate) fn provider(&self) -> ProviderKind {
        self.listener.provider()
    }
}

/// Maps request ids to their single listener entry.
///
/// Not synchronized: only the dispatcher worker touches it.
#[derive(Default)]
pub(crate) struct RequestRegistry {
    entries: HashMap<RequestId, ListenerEntry>,
}

impl RequestRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry under its request id; an occupied id is left untouched.
    pub(crate) fn insert(&mut self, entry: ListenerEntry) -> Result<(), DuplicateRequestId> {
        match self.entries.entry(entry.request_id) {
            Entry::Occupied(occupied) => Err(DuplicateRequestId(*occupied.key())),
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(())
            }
        }
    }

    pub(crate) fn remove(&mut self, request_id: RequestId) -> Option<ListenerEntry> {
        self.entries.remove(&request_id)
    }

    pub(crate) fn get(&self, request_id: RequestId) -> Option<&ListenerEntry> {
        self.entries.get(&request_id)
    }

    pub(crate) fn get_mut(&mut self, request_id: RequestId) -> Option<&mut ListenerEntry> {
        self.entries.get_mut(&request_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry, ordered by request id.
    pub(crate) fn drain(&mut self) -> Vec<ListenerEntry> {
        let mut drained: Vec<ListenerEntry> = self.entries.drain().map(|(_, entry)| entry).collect();
        drained.sort_by_key(|entry| entry.request_id);
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::{DuplicateRequestId, ListenerEntry, RequestRegistry};
    use crate::gateway::ListenerId;
    use crate::listener::provider_callback::ProviderCallbackListener;
    use crate::provider::ProviderKind;
    use crate::reply::{FixReply, ReplyTarget};
    use crate::request::RequestId;
    use std::sync::Arc;

    fn entry(request_id: RequestId, listener_id: u64, payload: &str) -> ListenerEntry {
        let (command_sender, _) = tokio::sync::mpsc::unbounded_channel();
        let (reply_sender, _) = tokio::sync::mpsc::unbounded_channel::<FixReply>();
        let reply_target: Arc<dyn ReplyTarget> = Arc::new(reply_sender);
        let callback = Arc::new(ProviderCallbackListener::new(
            request_id,
            ListenerId::new(listener_id),
            command_sender,
        ));

        ListenerEntry::new(
            request_id,
            ProviderKind::Network,
            reply_target,
            payload.as_bytes().to_vec(),
            callback,
        )
    }

    #[test]
    fn insert_rejects_duplicate_and_keeps_original_entry() {
        let mut registry = RequestRegistry::new();

        assert!(registry.insert(entry(7, 1, "first")).is_ok());
        assert_eq!(
            registry.insert(entry(7, 2, "second")).err(),
            Some(DuplicateRequestId(7))
        );

        let kept = registry.get(7).expect("original entry should remain");
        assert_eq!(kept.payload, b"first".to_vec());
        assert_eq!(kept.listener_id, ListenerId::new(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = RequestRegistry::new();
        registry.insert(entry(3, 1, "x")).expect("insert should succeed");

        assert!(registry.remove(3).is_some());
        assert!(registry.remove(3).is_none());
        assert!(registry.get(3).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn entries_are_keyed_independently() {
        let mut registry = RequestRegistry::new();
        registry.insert(entry(1, 1, "a")).expect("insert should succeed");
        registry.insert(entry(2, 2, "b")).expect("insert should succeed");

        registry.remove(1);

        assert!(registry.get(1).is_none());
        assert_eq!(
            registry.get_mut(2).map(|entry| entry.provider()),
            Some(ProviderKind::Network)
        );
    }

    #[test]
    fn drain_empties_registry_in_request_order() {
        let mut registry = RequestRegistry::new();
        for request_id in [5, 1, 3] {
            registry
                .insert(entry(request_id, request_id as u64, "x"))
                .expect("insert should succeed");
        }

        let drained: Vec<_> = registry
            .drain()
            .into_iter()
            .map(|entry| entry.request_id)
            .collect();

        assert_eq!(drained, vec![1, 3, 5]);
        assert!(registry.is_empty());
    }
}
