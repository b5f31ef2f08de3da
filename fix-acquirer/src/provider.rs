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

//! Positioning provider identities, fixes and the events providers emit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SATELLITE_PROVIDER_NAME: &str = "gps";
const NETWORK_PROVIDER_NAME: &str = "network";

/// A source of position fixes the service knows how to select.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Satellite-based positioning.
    Satellite,
    /// Network-based positioning (cell towers, Wi-Fi).
    Network,
}

impl ProviderKind {
    /// Selection order: the first enabled entry wins.
    pub const PRIORITY: [ProviderKind; 2] = [ProviderKind::Satellite, ProviderKind::Network];

    /// Name the platform uses for this provider.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Satellite => SATELLITE_PROVIDER_NAME,
            ProviderKind::Network => NETWORK_PROVIDER_NAME,
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a provider name outside of [`ProviderKind::PRIORITY`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownProvider(pub String);

impl Display for UnknownProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown positioning provider: {}", self.0)
    }
}

impl std::error::Error for UnknownProvider {}

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SATELLITE_PROVIDER_NAME => Ok(ProviderKind::Satellite),
            NETWORK_PROVIDER_NAME => Ok(ProviderKind::Network),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Availability reported by a provider while a listener is subscribed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Available,
    OutOfService,
    TemporarilyUnavailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Observation text recorded for a fix, e.g. `( 1.5, -2.25 )`.
    pub fn observation_value(&self) -> String {
        format!("( {}, {} )", self.latitude, self.longitude)
    }
}

/// One positioning result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub coordinates: Coordinates,
    /// Provider timestamp of the fix, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self {
            coordinates: Coordinates::new(latitude, longitude),
            timestamp,
        }
    }
}

/// Asynchronous callback delivered by a gateway to one subscribed listener.
///
/// Provider names are carried as plain strings: gateways may report on
/// providers the service never selects.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderEvent {
    FixObtained(Fix),
    ProviderDisabled(String),
    ProviderEnabled(String),
    StatusChanged(String, ProviderStatus),
}

impl ProviderEvent {
    /// Short label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderEvent::FixObtained(_) => "fix_obtained",
            ProviderEvent::ProviderDisabled(_) => "provider_disabled",
            ProviderEvent::ProviderEnabled(_) => "provider_enabled",
            ProviderEvent::StatusChanged(_, _) => "status_changed",
        }
    }
}
