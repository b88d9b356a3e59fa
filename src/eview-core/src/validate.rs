// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use crate::command::value::{ParamValue, Params};
use crate::command::{CommandParam, CommandSpec, ParamKind};
use crate::error::ComposeError;

/// Check `params` against the schema of `spec`.
///
/// Reports one error per offending parameter, in declaration order.
/// Parameters the command does not declare are ignored.
pub fn validate(spec: &CommandSpec, params: &Params) -> Result<(), Vec<ComposeError>> {
    let errors: Vec<ComposeError> = spec
        .params
        .iter()
        .filter_map(|param| check_param(param, params.get(param.name)))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_param(param: &CommandParam, value: Option<&ParamValue>) -> Option<ComposeError> {
    let Some(value) = value else {
        return match param.default {
            Some(_) => None,
            None => Some(ComposeError::MissingParameter(param.name.to_string())),
        };
    };

    match param.kind {
        ParamKind::Text => None,
        ParamKind::Number if value.as_number().is_none() => Some(ComposeError::InvalidNumber {
            param: param.name.to_string(),
            value: value.render(),
        }),
        ParamKind::Boolean if value.as_bool().is_none() => Some(ComposeError::InvalidBoolean {
            param: param.name.to_string(),
            value: value.render(),
        }),
        ParamKind::Select if !param.is_option(value) => Some(ComposeError::InvalidOption {
            param: param.name.to_string(),
            value: value.render(),
        }),
        _ => None,
    }
}
