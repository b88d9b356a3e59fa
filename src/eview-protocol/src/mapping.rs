// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Conversions between core types and the JSON DTOs.

use eview_core::{
    default_params, CommandParam, CommandSpec, ComposeError, Draft, Receipt, SubmissionRequest,
    SubmitError,
};

use crate::types::{
    CommandDescriptor, CommandDetail, FieldError, OptionDescriptor, ParamDescriptor,
    PreviewResponse, SubmitRequest, SubmitResponse,
};

fn describe_param(param: &CommandParam) -> ParamDescriptor {
    ParamDescriptor {
        name: param.name.to_string(),
        label: param.label.to_string(),
        kind: param.kind,
        options: param
            .options
            .iter()
            .map(|opt| OptionDescriptor {
                label: opt.label.to_string(),
                value: opt.value.to_value(),
            })
            .collect(),
        placeholder: param.placeholder.map(str::to_string),
        default_value: param.default.map(|d| d.to_value()),
        description: param.description.map(str::to_string),
        suffix: param.suffix.map(str::to_string),
    }
}

pub fn describe_command(spec: &CommandSpec) -> CommandDescriptor {
    CommandDescriptor {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        category: spec.category,
        structure: spec.structure.to_string(),
        params: spec.params.iter().map(describe_param).collect(),
    }
}

/// Descriptor plus the values a fresh form starts with.
pub fn detail_command(spec: &CommandSpec) -> CommandDetail {
    CommandDetail {
        command: describe_command(spec),
        defaults: default_params(spec),
    }
}

/// Attach a core error to the request field it concerns.
pub fn error_to_field(err: &ComposeError) -> FieldError {
    let field = match err {
        ComposeError::UnknownCommand(_) => "command",
        ComposeError::EmptyDestination => "phoneNumber",
        ComposeError::EmptyMessage | ComposeError::MessageTooLong { .. } => "rawMessage",
        ComposeError::PersistenceFailure(_) => "history",
        other => other.param().unwrap_or("params"),
    };
    FieldError {
        field: field.to_string(),
        code: err.code().to_string(),
        reason: err.to_string(),
    }
}

pub fn submit_request_to_core(req: SubmitRequest) -> SubmissionRequest {
    SubmissionRequest {
        device_name: req.device_name,
        phone_number: req.phone_number,
        command: req.command,
        params: req.params,
    }
}

pub fn receipt_to_response(receipt: Receipt) -> SubmitResponse {
    SubmitResponse {
        accepted: true,
        raw_message: receipt.raw_message,
        byte_length: receipt.byte_length,
        errors: Vec::new(),
        id: Some(receipt.id),
        status: Some(receipt.status),
    }
}

pub fn submit_error_to_response(err: SubmitError) -> SubmitResponse {
    SubmitResponse {
        accepted: false,
        errors: err.errors.iter().map(error_to_field).collect(),
        raw_message: err.raw_message,
        byte_length: err.byte_length,
        id: None,
        status: None,
    }
}

pub fn draft_to_preview(draft: &Draft<'_>) -> PreviewResponse {
    PreviewResponse {
        command: draft.command.id.to_string(),
        raw_message: draft.raw_message.clone(),
        byte_length: draft.limit.byte_length,
        limit: draft.limit.limit,
        within_limit: draft.limit.within_limit,
        segments: draft.limit.segments(),
        errors: draft.errors.iter().map(error_to_field).collect(),
    }
}
