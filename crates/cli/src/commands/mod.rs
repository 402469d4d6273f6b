// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod alerts;
pub mod analytics;
pub mod audit;
pub mod board;
pub mod lead;
pub mod stages;
