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

use crate::dispatch::command::{Command, CommandSender};
use crate::dispatch::dispatcher::{
    Dispatcher, ShutdownReport, DEFAULT_GATEWAY_TIMEOUT, DEFAULT_REPLY_TIMEOUT,
};
use crate::gateway::PositioningGateway;
use crate::observability::events;
use crate::reply::ReplyTarget;
use crate::request::FixRequest;
use crate::runtime::worker_runtime::{spawn_dispatch_loop, DispatchLoopHandle};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

const COMPONENT: &str = "service";
const DEFAULT_SERVICE_NAME: &str = "fix-acquirer";

/// Errors returned by the service surface itself.
///
/// Per-request failures never show up here; they travel as
/// [`FixReply`](crate::FixReply) values to the request's reply target.
#[derive(Debug)]
pub enum ServiceError {
    /// The dispatcher has stopped and no longer accepts commands.
    ServiceStopped,
    /// The dispatcher thread or its runtime could not be created.
    WorkerSpawn(io::Error),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ServiceStopped => write!(f, "fix service has stopped"),
            ServiceError::WorkerSpawn(err) => {
                write!(f, "unable to start fix service worker: {err}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServiceError::ServiceStopped => None,
            ServiceError::WorkerSpawn(err) => Some(err),
        }
    }
}

#[derive(Clone)]
pub struct FixServiceConfig {
    pub name: String,
    /// Name of the dispatcher thread. Defaults to `fix-acquirer-dispatch-runtime`.
    pub worker_thread_name: Option<String>,
    /// Receives `NoReplyTarget` failures, which have no requester to go to.
    pub dead_letter: Option<Arc<dyn ReplyTarget>>,
    /// Upper bound on one reply delivery. An expired delivery is logged and dropped.
    pub reply_timeout: Duration,
    /// Upper bound on one gateway subscribe or unsubscribe call.
    pub gateway_timeout: Duration,
}

impl Default for FixServiceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVICE_NAME.to_string(),
            worker_thread_name: None,
            dead_letter: None,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }
}

impl Debug for FixServiceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixServiceConfig")
            .field("name", &self.name)
            .field("worker_thread_name", &self.worker_thread_name)
            .field("dead_letter", &self.dead_letter.is_some())
            .field("reply_timeout", &self.reply_timeout)
            .field("gateway_timeout", &self.gateway_timeout)
            .finish()
    }
}

/// Cloneable submission side of a running [`FixService`].
#[derive(Clone)]
pub struct FixServiceHandle {
    name: Arc<str>,
    sender: CommandSender,
}

impl FixServiceHandle {
    /// Queues a request. Returns once the command is enqueued; the outcome
    /// arrives later on the request's reply target.
    pub fn acquire_fix(&self, request: FixRequest) -> Result<(), ServiceError> {
        let request_id = request.request_id();
        self.sender
            .send(Command::AcquireFix(request))
            .map_err(|_| {
                debug!(
                    event = events::REQUEST_REJECTED,
                    component = COMPONENT,
                    service = &*self.name,
                    request_id,
                    reason = "service_stopped",
                    "dispatcher queue closed"
                );
                ServiceError::ServiceStopped
            })
    }

    /// Number of registered requests, as seen once every command queued
    /// before this call has been processed.
    pub async fn in_flight(&self) -> Result<usize, ServiceError> {
        let (answer, response) = oneshot::channel();
        self.sender
            .send(Command::InFlight(answer))
            .map_err(|_| ServiceError::ServiceStopped)?;
        response.await.map_err(|_| ServiceError::ServiceStopped)
    }
}

impl Debug for FixServiceHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixServiceHandle")
            .field("name", &self.name)
            .field("stopped", &self.sender.is_closed())
            .finish()
    }
}

/// Owner of the dispatcher worker.
///
/// Dropping the service stops the worker the same way [`FixService::shutdown`]
/// does, without waiting for it.
pub struct FixService {
    name: String,
    worker_id: String,
    handle: FixServiceHandle,
    shutdown: Option<oneshot::Sender<()>>,
    done: Option<oneshot::Receiver<ShutdownReport>>,
    worker: Option<DispatchLoopHandle>,
}

impl FixService {
    pub fn new(name: &str, gateway: Arc<dyn PositioningGateway>) -> Result<Self, ServiceError> {
        Self::with_config(
            FixServiceConfig {
                name: name.to_string(),
                ..Default::default()
            },
            gateway,
        )
    }

    pub fn with_config(
        config: FixServiceConfig,
        gateway: Arc<dyn PositioningGateway>,
    ) -> Result<Self, ServiceError> {
        let FixServiceConfig {
            name,
            worker_thread_name,
            dead_letter,
            reply_timeout,
            gateway_timeout,
        } = config;

        let worker_id = uuid::Uuid::new_v4().to_string();
        let (sender, commands) = unbounded_channel();
        let (shutdown, shutdown_signal) = oneshot::channel();
        let (done_sender, done) = oneshot::channel();

        let dispatcher = Dispatcher::new(&name, gateway, dead_letter, sender.clone())
            .with_timeouts(reply_timeout, gateway_timeout);
        let run_worker_id = worker_id.clone();
        let worker = spawn_dispatch_loop(worker_thread_name.as_deref(), move || async move {
            let report = dispatcher
                .run(run_worker_id, commands, shutdown_signal)
                .await;
            let _ = done_sender.send(report);
        })
        .map_err(ServiceError::WorkerSpawn)?;

        info!(
            event = events::SERVICE_START,
            component = COMPONENT,
            service = name.as_str(),
            worker_id = worker_id.as_str(),
            worker_thread = worker.thread_name(),
            "fix service started"
        );

        Ok(Self {
            handle: FixServiceHandle {
                name: Arc::from(name.as_str()),
                sender,
            },
            name,
            worker_id,
            shutdown: Some(shutdown),
            done: Some(done),
            worker: Some(worker),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> FixServiceHandle {
        self.handle.clone()
    }

    pub fn acquire_fix(&self, request: FixRequest) -> Result<(), ServiceError> {
        self.handle.acquire_fix(request)
    }

    /// Stops intake, abandons queued commands and unsubscribes every
    /// in-flight request without replying.
    pub async fn shutdown(mut self) -> Result<ShutdownReport, ServiceError> {
        info!(
            event = events::SERVICE_SHUTDOWN,
            component = COMPONENT,
            service = self.name.as_str(),
            worker_id = self.worker_id.as_str(),
            "shutting down fix service"
        );

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let report = match self.done.take() {
            Some(done) => done.await.map_err(|_| ServiceError::ServiceStopped)?,
            None => return Err(ServiceError::ServiceStopped),
        };

        if let Some(worker) = self.worker.take() {
            if tokio::task::spawn_blocking(move || worker.join())
                .await
                .is_err()
            {
                warn!(
                    event = events::RUNTIME_JOIN_FAILED,
                    component = COMPONENT,
                    service = self.name.as_str(),
                    worker_id = self.worker_id.as_str(),
                    "unable to join dispatcher thread"
                );
            }
        }

        Ok(report)
    }
}

impl Drop for FixService {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            debug!(
                event = events::SERVICE_DROPPED,
                component = COMPONENT,
                service = self.name.as_str(),
                worker_id = self.worker_id.as_str(),
                "fix service dropped, stopping dispatcher"
            );
            let _ = shutdown.send(());
        }
    }
}
