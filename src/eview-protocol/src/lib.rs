// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! JSON interface types for the Eview gateway.
//!
//! This crate holds the request and response shapes used by the HTTP API
//! and the CLI, plus the conversions between them and `eview-core`.

pub mod codec;
pub mod mapping;
pub mod types;

// Re-export commonly used items
pub use codec::{parse_param_arg, parse_preview, parse_submit};
pub use mapping::{
    describe_command, detail_command, draft_to_preview, error_to_field, receipt_to_response,
    submit_error_to_response, submit_request_to_core,
};
pub use types::{
    CommandDescriptor, CommandDetail, ErrorResponse, FieldError, OptionDescriptor,
    ParamDescriptor, PreviewRequest, PreviewResponse, SubmitRequest, SubmitResponse,
};
