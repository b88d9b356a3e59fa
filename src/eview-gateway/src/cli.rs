// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Plain-text rendering for the command-line front end.

use std::fmt::Write;

use eview_core::{CommandSpec, DynResult, Params};
use eview_history::HistoryRecord;
use eview_protocol::{parse_param_arg, PreviewResponse, SubmitResponse};

/// Collect `name=value` arguments into a parameter set.
pub fn collect_params(args: &[String]) -> DynResult<Params> {
    let mut params = Params::new();
    for arg in args {
        let (name, value) = parse_param_arg(arg)?;
        params.insert(name, value);
    }
    Ok(params)
}

pub fn format_command_list(commands: &[CommandSpec]) -> String {
    let mut out = String::new();
    for spec in commands {
        let names: Vec<&str> = spec.params.iter().map(|p| p.name).collect();
        let _ = writeln!(
            out,
            "{:<16} {:<11} {:<22} {}",
            spec.id,
            spec.category.as_str(),
            spec.name,
            if names.is_empty() {
                "-".to_string()
            } else {
                names.join(" ")
            }
        );
    }
    out
}

pub fn format_preview(preview: &PreviewResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", preview.raw_message);
    let _ = writeln!(
        out,
        "{} / {} bytes{}",
        preview.byte_length,
        preview.limit,
        if preview.within_limit {
            String::new()
        } else {
            format!(" (over limit, {} segments)", preview.segments)
        }
    );
    for err in &preview.errors {
        let _ = writeln!(out, "error: {}: {}", err.field, err.reason);
    }
    out
}

pub fn format_submit(resp: &SubmitResponse) -> String {
    let mut out = String::new();
    if resp.accepted {
        let _ = writeln!(
            out,
            "{} ({} bytes) logged as #{}",
            resp.raw_message,
            resp.byte_length,
            resp.id.unwrap_or_default()
        );
    } else {
        for err in &resp.errors {
            let _ = writeln!(out, "error: {}: {}", err.field, err.reason);
        }
    }
    out
}

pub fn format_history(records: &[HistoryRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "#{:<5} {} {:<14} {:<16} {:<7} {}",
            record.id,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.phone_number,
            record.device_name,
            record.status.as_str(),
            record.raw_message
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use eview_core::{get_command, ParamValue};
    use eview_protocol::FieldError;

    #[test]
    fn test_collect_params() {
        let args = vec!["zone=-5".to_string(), "min=30".to_string()];
        let params = collect_params(&args).unwrap();
        assert_eq!(params.get("zone"), Some(&ParamValue::from("-5")));
        assert_eq!(params.get("min"), Some(&ParamValue::from("30")));
        assert!(collect_params(&["bogus".to_string()]).is_err());
    }

    #[test]
    fn test_format_command_list() {
        let specs = [*get_command("loc").unwrap(), *get_command("timezone").unwrap()];
        let list = format_command_list(&specs);
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("loc"));
        assert!(lines[0].ends_with('-'));
        assert!(lines[1].ends_with("zone min"));
    }

    #[test]
    fn test_format_rejected_submit() {
        let resp = SubmitResponse {
            accepted: false,
            raw_message: "SOS1,20".into(),
            byte_length: 7,
            errors: vec![FieldError {
                field: "phoneNumber".into(),
                code: "empty_destination".into(),
                reason: "phone number is required".into(),
            }],
            id: None,
            status: None,
        };
        assert_eq!(
            format_submit(&resp),
            "error: phoneNumber: phone number is required\n"
        );
    }

    #[test]
    fn test_format_preview_over_limit() {
        let preview = PreviewResponse {
            command: "apn".into(),
            raw_message: "S1,x".into(),
            byte_length: 200,
            limit: 150,
            within_limit: false,
            segments: 2,
            errors: vec![],
        };
        assert_eq!(
            format_preview(&preview),
            "S1,x\n200 / 150 bytes (over limit, 2 segments)\n"
        );
    }
}
