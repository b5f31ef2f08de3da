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

mod integration_test_logging;
pub use integration_test_logging::init_logging;
mod recording_gateway;
pub use recording_gateway::{RecordingGateway, Subscription};
mod integration_test_reply_targets;
pub use integration_test_reply_targets::{
    ClosedReplyTarget, RecordingReplyTarget, StalledReplyTarget,
};
