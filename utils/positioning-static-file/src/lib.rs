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

//! `PositioningGateway` backed by a static JSON file.
//!
//! The file names which providers are enabled and scripts the events each
//! provider emits after a listener subscribes:
//!
//! ```json
//! {
//!   "providers": { "gps": { "enabled": false }, "network": { "enabled": true } },
//!   "events": {
//!     "network": [
//!       { "delay_ms": 10, "event": { "type": "fix_obtained", "latitude": 1.0, "longitude": 2.0, "timestamp": 100 } }
//!     ]
//!   }
//! }
//! ```
//!
//! The file is re-read on every call, so edits apply to the next request.

use async_trait::async_trait;
use fix_acquirer::{
    Fix, GatewayError, ListenerId, PositioningGateway, ProviderEvent, ProviderKind,
    ProviderListener, ProviderStatus,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs::{self, canonicalize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ScriptedEvent {
    FixObtained {
        latitude: f64,
        longitude: f64,
        timestamp: i64,
    },
    /// `provider` defaults to the provider the listener subscribed to.
    ProviderDisabled {
        #[serde(default)]
        provider: Option<String>,
    },
    ProviderEnabled {
        #[serde(default)]
        provider: Option<String>,
    },
    StatusChanged {
        #[serde(default)]
        provider: Option<String>,
        status: ProviderStatus,
    },
}

impl ScriptedEvent {
    pub fn to_provider_event(&self, subscribed: ProviderKind) -> ProviderEvent {
        let name_or_subscribed =
            |provider: &Option<String>| provider.clone().unwrap_or_else(|| subscribed.to_string());

        match self {
            ScriptedEvent::FixObtained {
                latitude,
                longitude,
                timestamp,
            } => ProviderEvent::FixObtained(Fix::new(*latitude, *longitude, *timestamp)),
            ScriptedEvent::ProviderDisabled { provider } => {
                ProviderEvent::ProviderDisabled(name_or_subscribed(provider))
            }
            ScriptedEvent::ProviderEnabled { provider } => {
                ProviderEvent::ProviderEnabled(name_or_subscribed(provider))
            }
            ScriptedEvent::StatusChanged { provider, status } => {
                ProviderEvent::StatusChanged(name_or_subscribed(provider), *status)
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScriptedStep {
    #[serde(default)]
    pub delay_ms: u64,
    pub event: ScriptedEvent,
}

/// Parsed contents of a static positioning file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PositioningScript {
    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,
    #[serde(default)]
    pub events: HashMap<String, Vec<ScriptedStep>>,
}

impl PositioningScript {
    pub fn is_enabled(&self, provider: ProviderKind) -> bool {
        self.providers
            .get(provider.name())
            .is_some_and(|settings| settings.enabled)
    }

    pub fn steps_for(&self, provider: ProviderKind) -> &[ScriptedStep] {
        self.events
            .get(provider.name())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug)]
pub enum StaticFileError {
    NotFound(String),
    Read(String),
    Parse(String),
}

impl Display for StaticFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StaticFileError::NotFound(reason) => {
                write!(f, "static positioning file not found: {reason}")
            }
            StaticFileError::Read(reason) => write!(f, "unable to read file: {reason}"),
            StaticFileError::Parse(reason) => write!(f, "unable to parse JSON: {reason}"),
        }
    }
}

impl Error for StaticFileError {}

pub struct PositioningStaticFile {
    static_file: String,
    scripts: Mutex<HashMap<ListenerId, JoinHandle<()>>>,
}

impl PositioningStaticFile {
    pub fn new(static_file: String) -> Self {
        PositioningStaticFile {
            static_file,
            scripts: Mutex::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<PositioningScript, StaticFileError> {
        let positioning_json_file = PathBuf::from(self.static_file.clone());
        debug!("positioning_json_file: {positioning_json_file:?}");

        let positioning_json_file = canonicalize(positioning_json_file)
            .map_err(|e| StaticFileError::NotFound(format!("{e:?}")))?;

        let data = fs::read_to_string(positioning_json_file)
            .map_err(|e| StaticFileError::Read(format!("{e:?}")))?;

        serde_json::from_str(&data).map_err(|e| StaticFileError::Parse(format!("{e}")))
    }

    /// Number of listeners whose script is still being played.
    pub fn active_scripts(&self) -> usize {
        self.scripts
            .lock()
            .map(|mut scripts| {
                scripts.retain(|_, script| !script.is_finished());
                scripts.len()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl PositioningGateway for PositioningStaticFile {
    async fn is_provider_enabled(&self, provider: ProviderKind) -> bool {
        match self.load() {
            Ok(script) => {
                let enabled = script.is_enabled(provider);
                debug!("provider {provider} enabled: {enabled}");
                enabled
            }
            Err(e) => {
                error!("Unable to load '{}': {e}", self.static_file);
                false
            }
        }
    }

    async fn subscribe(
        &self,
        provider: ProviderKind,
        listener: Arc<dyn ProviderListener>,
    ) -> Result<(), GatewayError> {
        let script = self
            .load()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        if !script.is_enabled(provider) {
            return Err(GatewayError::ProviderNotFound(provider.to_string()));
        }

        let steps = script.steps_for(provider).to_vec();
        let listener_id = listener.listener_id();
        debug!(
            "{listener_id} subscribed to {provider}, playing {} scripted events",
            steps.len()
        );

        let playback = tokio::spawn(async move {
            for step in steps {
                tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
                listener.on_event(step.event.to_provider_event(provider)).await;
            }
        });

        let mut scripts = self
            .scripts
            .lock()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;
        if let Some(previous) = scripts.insert(listener_id, playback) {
            warn!("{listener_id} subscribed twice, restarting its script");
            previous.abort();
        }
        Ok(())
    }

    async fn unsubscribe(&self, listener: Arc<dyn ProviderListener>) -> Result<(), GatewayError> {
        let listener_id = listener.listener_id();
        let mut scripts = self
            .scripts
            .lock()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        match scripts.remove(&listener_id) {
            Some(playback) => {
                debug!("{listener_id} unsubscribed, stopping its script");
                playback.abort();
            }
            None => debug!("{listener_id} was not subscribed"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PositioningStaticFile, ScriptedEvent};
    use async_trait::async_trait;
    use fix_acquirer::{
        Fix, GatewayError, ListenerId, PositioningGateway, ProviderEvent, ProviderKind,
        ProviderListener, ProviderStatus, RequestId,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

    const TESTDATA: &str = "static-configs/testdata.json";
    const NETWORK_OUTAGE: &str = "static-configs/network-outage.json";

    struct ForwardingListener {
        listener_id: ListenerId,
        events: UnboundedSender<ProviderEvent>,
    }

    fn listener(listener_id: u64) -> (Arc<dyn ProviderListener>, UnboundedReceiver<ProviderEvent>) {
        let (events, receiver) = unbounded_channel();
        let listener = Arc::new(ForwardingListener {
            listener_id: ListenerId::new(listener_id),
            events,
        });
        (listener, receiver)
    }

    #[async_trait]
    impl ProviderListener for ForwardingListener {
        fn listener_id(&self) -> ListenerId {
            self.listener_id
        }

        fn request_id(&self) -> RequestId {
            0
        }

        async fn on_event(&self, event: ProviderEvent) {
            let _ = self.events.send(event);
        }
    }

    #[tokio::test]
    async fn enablement_follows_file() {
        let gateway = PositioningStaticFile::new(TESTDATA.to_string());

        assert!(!gateway.is_provider_enabled(ProviderKind::Satellite).await);
        assert!(gateway.is_provider_enabled(ProviderKind::Network).await);
    }

    #[tokio::test]
    async fn missing_file_disables_everything_and_rejects_subscribe() {
        let gateway = PositioningStaticFile::new("static-configs/missing.json".to_string());
        let (listener, _events) = listener(1);

        assert!(!gateway.is_provider_enabled(ProviderKind::Network).await);
        assert!(matches!(
            gateway.subscribe(ProviderKind::Network, listener).await,
            Err(GatewayError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn subscribe_to_disabled_provider_is_rejected() {
        let gateway = PositioningStaticFile::new(TESTDATA.to_string());
        let (listener, _events) = listener(1);

        assert_eq!(
            gateway.subscribe(ProviderKind::Satellite, listener).await,
            Err(GatewayError::ProviderNotFound("gps".to_string()))
        );
    }

    #[tokio::test]
    async fn subscribe_plays_script_in_order() {
        let gateway = PositioningStaticFile::new(TESTDATA.to_string());
        let (listener, mut events) = listener(1);

        gateway
            .subscribe(ProviderKind::Network, listener)
            .await
            .expect("network is enabled");

        let first = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("first event in time");
        let second = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("second event in time");

        assert_eq!(
            first,
            Some(ProviderEvent::StatusChanged(
                "network".to_string(),
                ProviderStatus::Available
            ))
        );
        assert_eq!(
            second,
            Some(ProviderEvent::FixObtained(Fix::new(1.0, 2.0, 100)))
        );
    }

    #[tokio::test]
    async fn unsubscribe_stops_script_and_is_idempotent() {
        let gateway = PositioningStaticFile::new(NETWORK_OUTAGE.to_string());
        let (listener, mut events) = listener(4);

        gateway
            .subscribe(ProviderKind::Satellite, listener.clone())
            .await
            .expect("gps is enabled");
        assert_eq!(gateway.active_scripts(), 1);

        gateway
            .unsubscribe(listener.clone())
            .await
            .expect("unsubscribe succeeds");
        gateway
            .unsubscribe(listener)
            .await
            .expect("second unsubscribe succeeds");

        assert_eq!(gateway.active_scripts(), 0);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn scripted_events_default_to_subscribed_provider() {
        let event: ScriptedEvent =
            serde_json::from_str(r#"{ "type": "provider_disabled" }"#).expect("valid event");

        assert_eq!(
            event.to_provider_event(ProviderKind::Satellite),
            ProviderEvent::ProviderDisabled("gps".to_string())
        );
    }

    #[test]
    fn scripted_events_keep_explicit_provider() {
        let event: ScriptedEvent = serde_json::from_str(
            r#"{ "type": "status_changed", "provider": "network", "status": "out_of_service" }"#,
        )
        .expect("valid event");

        assert_eq!(
            event.to_provider_event(ProviderKind::Satellite),
            ProviderEvent::StatusChanged("network".to_string(), ProviderStatus::OutOfService)
        );
    }
}
