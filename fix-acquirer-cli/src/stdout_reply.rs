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
use serde::Serialize;

/// Writes each reply as one JSON line on stdout.
pub struct StdoutReplyTarget {
    channel: &'static str,
}

#[derive(Serialize)]
struct ReplyLine<'a> {
    channel: &'a str,
    #[serde(flatten)]
    reply: &'a FixReply,
}

impl StdoutReplyTarget {
    pub fn replies() -> Self {
        Self { channel: "reply" }
    }

    pub fn dead_letters() -> Self {
        Self {
            channel: "dead_letter",
        }
    }

    fn render(&self, reply: &FixReply) -> Result<String, ReplyError> {
        serde_json::to_string(&ReplyLine {
            channel: self.channel,
            reply,
        })
        .map_err(|e| ReplyError::Rejected(e.to_string()))
    }
}

#[async_trait]
impl ReplyTarget for StdoutReplyTarget {
    async fn deliver(&self, reply: FixReply) -> Result<(), ReplyError> {
        println!("{}", self.render(&reply)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StdoutReplyTarget;
    use fix_acquirer::{FailureReason, FixReply};

    #[test]
    fn dead_letter_lines_carry_channel_and_reason() {
        let line = StdoutReplyTarget::dead_letters()
            .render(&FixReply::failed(9, FailureReason::NoReplyTarget))
            .expect("reply should render");

        let value: serde_json::Value = serde_json::from_str(&line).expect("line is JSON");
        assert_eq!(value["channel"], "dead_letter");
        assert_eq!(value["request_id"], 9);
        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["reason"], "NoReplyTarget");
    }
}
