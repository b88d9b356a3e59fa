// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Single-segment SMS payload limit.

use serde::{Deserialize, Serialize};

/// Payload bytes the device accepts in one message.
pub const SMS_BYTE_LIMIT: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitCheck {
    /// UTF-8 length of the message.
    pub byte_length: usize,
    pub limit: usize,
    pub within_limit: bool,
}

impl LimitCheck {
    /// Number of single-segment payloads the message would need.
    ///
    /// Informational only, messages are never split.
    pub fn segments(&self) -> usize {
        self.byte_length.div_ceil(self.limit.max(1)).max(1)
    }
}

pub fn check_limit(raw: &str) -> LimitCheck {
    check_limit_with(raw, SMS_BYTE_LIMIT)
}

pub fn check_limit_with(raw: &str, limit: usize) -> LimitCheck {
    let byte_length = raw.len();
    LimitCheck {
        byte_length,
        limit,
        within_limit: byte_length <= limit,
    }
}
