// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Transport DTOs for the JSON API.

use serde::{Deserialize, Serialize};

use eview_core::{Category, DeliveryStatus, ParamKind, ParamValue, Params};

/// Body of `POST /api/send-command`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub phone_number: String,
    /// Command id or display name.
    #[serde(alias = "commandId", alias = "commandName")]
    pub command: String,
    #[serde(default)]
    pub params: Params,
}

/// One reason a request was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Request field the error belongs to (parameter name or top-level key).
    pub field: String,
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub accepted: bool,
    pub raw_message: String,
    pub byte_length: usize,
    #[serde(default)]
    pub errors: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub command: String,
    #[serde(default)]
    pub params: Params,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// Resolved command id.
    pub command: String,
    pub raw_message: String,
    pub byte_length: usize,
    pub limit: usize,
    pub within_limit: bool,
    pub segments: usize,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    pub label: String,
    pub value: ParamValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDescriptor {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

/// Listing entry for one catalog command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub structure: String,
    pub params: Vec<ParamDescriptor>,
}

/// A command descriptor together with its pre-populated form values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDetail {
    #[serde(flatten)]
    pub command: CommandDescriptor,
    pub defaults: Params,
}

/// Generic error body for requests that never reached composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
}
