// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Command catalog and SMS encoder for Eview GPS trackers.
//!
//! The catalog maps every supported device command to a parameter schema and
//! a fixed text template. [`encode`] renders a parameter set into the exact
//! string sent to the device, [`validate`] checks it against the schema and
//! [`limit`] decides whether the result fits a single SMS segment.

pub mod catalog;
pub mod command;
pub mod encode;
pub mod error;
pub mod limit;
pub mod submission;
pub mod validate;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use catalog::{default_params, find_command, get_command, list_commands};
pub use command::value::{Literal, ParamValue, Params};
pub use command::{Category, CommandParam, CommandSpec, ParamKind, ParamOption};
pub use encode::{encode, Fields};
pub use error::ComposeError;
pub use limit::{check_limit, check_limit_with, LimitCheck, SMS_BYTE_LIMIT};
pub use submission::{
    compose, draft, draft_command, DeliveryStatus, Dispatch, Draft, Receipt, SimulatedTransport,
    SinkError, SubmissionPolicy, SubmissionRequest, SubmissionSink, SubmitError, Submitter, Transport,
};
pub use validate::validate;
