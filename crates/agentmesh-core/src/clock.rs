// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//! ISO-8601 timestamps, centralized so every record stamps the same way.

pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}
