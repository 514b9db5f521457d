// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Owner recorded for tasks when `default_args.owner` is not set
pub const DEFAULT_OWNER: &str = "airflow";
/// Wait between two tries of a failed task (one minute)
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 60;
/// Concurrency used when neither the config nor the host reports a value
pub const FALLBACK_MAX_CONCURRENCY: usize = 4;
