// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Archive-and-verify workflow: enumeration, writing, conversion, verification, orchestration.

pub mod convert;
pub mod enumerate;
pub mod error;
pub mod eta;
pub mod event_log;
pub mod verify;
pub mod workflow;
pub mod writer;

pub use convert::SevenZip;
pub use eta::SystemCpu;
pub use workflow::{Notification, Stage, WorkflowEvent, execute};
pub use writer::CancelFlag;
