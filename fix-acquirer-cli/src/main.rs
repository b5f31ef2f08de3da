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

mod config;
mod stdout_reply;

use crate::config::Config;
use crate::stdout_reply::StdoutReplyTarget;
use clap::Parser;
use fix_acquirer::{FixRequest, FixService, FixServiceConfig, ReplyTarget, RequestAction};
use positioning_static_file::PositioningStaticFile;
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command()]
struct FixAcquirerArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started fix-acquirer");

    // Get the config file.
    let args = FixAcquirerArgs::parse();
    let mut file = File::open(&args.config)
        .map_err(|e| format!("Config file '{}' not found: {e:?}", args.config))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| format!("Unable to read config file: {e:?}"))?;

    let config: Config =
        json5::from_str(&contents).map_err(|e| format!("Unable to parse config file: {e:?}"))?;

    let gateway = Arc::new(PositioningStaticFile::new(config.gateway.file_path));
    let dead_letter = config
        .service
        .print_dead_letters
        .then(|| Arc::new(StdoutReplyTarget::dead_letters()) as Arc<dyn ReplyTarget>);

    let defaults = FixServiceConfig::default();
    let service = FixService::with_config(
        FixServiceConfig {
            name: config.service.name,
            worker_thread_name: config.service.worker_thread_name,
            dead_letter,
            reply_timeout: config
                .service
                .reply_timeout_ms
                .map_or(defaults.reply_timeout, Duration::from_millis),
            gateway_timeout: config
                .service
                .gateway_timeout_ms
                .map_or(defaults.gateway_timeout, Duration::from_millis),
        },
        gateway,
    )?;

    let replies: Arc<StdoutReplyTarget> = Arc::new(StdoutReplyTarget::replies());
    for request in config.requests {
        if RequestAction::from_action_name(&request.action).is_none() {
            warn!(
                "Skipping request {}: unsupported action '{}'",
                request.request_id, request.action
            );
            continue;
        }

        let payload = request.payload.into_bytes();
        let fix_request = if request.reply {
            FixRequest::new(request.request_id, payload, replies.clone())
        } else {
            FixRequest::without_reply_target(request.request_id, payload)
        };
        service.acquire_fix(fix_request)?;
    }

    tokio::time::sleep(Duration::from_millis(config.shutdown_after_ms)).await;

    let report = service.shutdown().await?;
    info!(
        "fix-acquirer stopped: {} requests abandoned, {} commands dropped",
        report.abandoned_requests, report.dropped_commands
    );

    Ok(())
}
