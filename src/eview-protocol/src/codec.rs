// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Parsing helpers for request bodies and command-line parameters.

use serde_json;

use eview_core::ParamValue;

use crate::types::{PreviewRequest, SubmitRequest};

/// Parse a JSON string into a SubmitRequest.
pub fn parse_submit(input: &str) -> Result<SubmitRequest, serde_json::Error> {
    serde_json::from_str(input)
}

/// Parse a JSON string into a PreviewRequest.
///
/// A full SubmitRequest is accepted too, its destination fields are ignored.
pub fn parse_preview(input: &str) -> Result<PreviewRequest, serde_json::Error> {
    match serde_json::from_str::<PreviewRequest>(input) {
        Ok(req) => Ok(req),
        Err(_) => {
            let submit = parse_submit(input)?;
            Ok(PreviewRequest {
                command: submit.command,
                params: submit.params,
            })
        }
    }
}

/// Split a `name=value` argument.
///
/// Values stay text so they reach the device exactly as typed; the
/// validator accepts numeric and boolean text.
pub fn parse_param_arg(arg: &str) -> Result<(String, ParamValue), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{}'", arg));
    }
    Ok((name.to_string(), ParamValue::Text(value.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submit() {
        let req = parse_submit(
            r#"{"phoneNumber":"123","command":"no_motion","params":{"on":1,"time":60,"call":1}}"#,
        )
        .unwrap();
        assert_eq!(req.command, "no_motion");
        assert_eq!(req.params.len(), 3);
        assert_eq!(req.params.get("time"), Some(&ParamValue::Number(60.0)));
    }

    #[test]
    fn test_parse_submit_requires_command() {
        assert!(parse_submit(r#"{"phoneNumber":"123"}"#).is_err());
    }

    #[test]
    fn test_parse_preview() {
        let req = parse_preview(r#"{"command":"timezone","params":{"zone":"-5"}}"#).unwrap();
        assert_eq!(req.command, "timezone");
        assert_eq!(req.params.get("zone"), Some(&ParamValue::from("-5")));
    }

    #[test]
    fn test_parse_preview_invalid() {
        assert!(parse_preview("not json").is_err());
    }

    #[test]
    fn test_parse_param_arg() {
        assert_eq!(
            parse_param_arg("zone=+8").unwrap(),
            ("zone".to_string(), ParamValue::from("+8"))
        );
        assert_eq!(
            parse_param_arg("apn=internet=fast").unwrap(),
            ("apn".to_string(), ParamValue::from("internet=fast"))
        );
        assert_eq!(
            parse_param_arg("phone=").unwrap(),
            ("phone".to_string(), ParamValue::from(""))
        );
    }

    #[test]
    fn test_parse_param_arg_rejects_malformed() {
        assert!(parse_param_arg("zone").is_err());
        assert!(parse_param_arg("=5").is_err());
    }
}
