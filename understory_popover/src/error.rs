// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! The controller has almost no runtime failure modes: redundant opens and
//! closes, stale focus targets, and overlay-initiated detachments are all
//! reconciled silently. What remains are programmer errors (opening without a
//! panel, using a destroyed controller) and rejected attribute spellings.

use alloc::string::String;

use thiserror::Error;

/// Errors returned by [`TriggerController`](crate::controller::TriggerController).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TriggerError {
    /// An open was requested but no panel is bound to the trigger.
    #[error("popover trigger has no panel bound")]
    MissingPanel,
    /// The controller was used after [`destroy`](crate::controller::TriggerController::destroy).
    #[error("popover trigger was destroyed")]
    Destroyed,
}

/// An attribute value that does not name any variant of the target enum.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid {kind} value `{value}`")]
pub struct ParseValueError {
    /// Name of the attribute being parsed, for example `"trigger"`.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
