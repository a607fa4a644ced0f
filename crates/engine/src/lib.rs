// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Sheetsync engine: foreground table views with background flush and reload

mod engine;
mod error;
mod gate;
mod view;

pub use engine::Engine;
pub use error::EngineError;
pub use gate::{BusyGate, BusyGuard};
pub use view::TableView;
