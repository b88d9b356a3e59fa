// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Submission workflow: compose, gate on policy, deliver, record.
//!
//! A request is first turned into a [`Draft`] which carries the encoded
//! message together with every reason it may not be sent. Only admissible
//! drafts reach the [`Transport`] and the [`SubmissionSink`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::catalog::find_command;
use crate::command::value::Params;
use crate::command::CommandSpec;
use crate::encode::encode;
use crate::error::ComposeError;
use crate::limit::{check_limit_with, LimitCheck, SMS_BYTE_LIMIT};
use crate::validate::validate;

/// Outcome of handing a message to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Pending,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "Sent",
            DeliveryStatus::Failed => "Failed",
            DeliveryStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's request to send one command to one device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionRequest {
    /// Free-text label, recorded as-is.
    pub device_name: String,
    pub phone_number: String,
    /// Command id or display name.
    pub command: String,
    pub params: Params,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionPolicy {
    pub max_message_bytes: usize,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            max_message_bytes: SMS_BYTE_LIMIT,
        }
    }
}

/// An encoded message and everything that blocks it from being sent.
#[derive(Debug, Clone)]
pub struct Draft<'a> {
    pub command: &'a CommandSpec,
    /// Empty when encoding failed.
    pub raw_message: String,
    pub limit: LimitCheck,
    pub errors: Vec<ComposeError>,
}

impl Draft<'_> {
    pub fn is_admissible(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compose `params` for `spec` without a destination.
pub fn compose<'a>(spec: &'a CommandSpec, params: &Params, policy: &SubmissionPolicy) -> Draft<'a> {
    let mut errors = validate(spec, params).err().unwrap_or_default();

    let raw_message = match encode(spec, params) {
        Ok(raw) => raw,
        Err(err) => {
            if !errors.contains(&err) {
                errors.push(err);
            }
            String::new()
        }
    };

    if raw_message.is_empty() && errors.is_empty() {
        errors.push(ComposeError::EmptyMessage);
    }

    let limit = check_limit_with(&raw_message, policy.max_message_bytes);
    if !limit.within_limit {
        errors.push(ComposeError::MessageTooLong {
            length: limit.byte_length,
            limit: limit.limit,
        });
    }

    Draft {
        command: spec,
        raw_message,
        limit,
        errors,
    }
}

/// Resolve the requested command and compose a draft for it.
///
/// Only an unresolvable command is an `Err`; every other problem is
/// collected on the draft.
pub fn draft(
    request: &SubmissionRequest,
    policy: &SubmissionPolicy,
) -> Result<Draft<'static>, ComposeError> {
    let spec = find_command(&request.command)?;
    Ok(draft_command(spec, request, policy))
}

pub fn draft_command<'a>(
    spec: &'a CommandSpec,
    request: &SubmissionRequest,
    policy: &SubmissionPolicy,
) -> Draft<'a> {
    let mut draft = compose(spec, &request.params, policy);
    if request.phone_number.trim().is_empty() {
        draft.errors.insert(0, ComposeError::EmptyDestination);
    }
    draft
}

/// Carrier that takes an encoded message to the device.
pub trait Transport: Send + Sync {
    fn deliver(&self, phone_number: &str, raw_message: &str) -> DeliveryStatus;
}

/// Transport that only logs. Every message is reported as sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTransport;

impl Transport for SimulatedTransport {
    fn deliver(&self, phone_number: &str, raw_message: &str) -> DeliveryStatus {
        info!("Sending SMS to {}: {}", phone_number, raw_message);
        DeliveryStatus::Sent
    }
}

/// One delivered message, as handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub device_name: String,
    pub phone_number: String,
    pub command_name: String,
    pub raw_message: String,
    pub status: DeliveryStatus,
}

/// Failure reported by a [`SubmissionSink`].
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Append-only record of delivered messages.
pub trait SubmissionSink: Send + Sync {
    /// Record `dispatch` and return the id assigned to it.
    fn append(&self, dispatch: &Dispatch) -> Result<u64, SinkError>;
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: u64,
    pub command_name: String,
    pub raw_message: String,
    pub byte_length: usize,
    pub status: DeliveryStatus,
}

/// A submission that was rejected or could not be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub raw_message: String,
    pub byte_length: usize,
    pub errors: Vec<ComposeError>,
}

impl SubmitError {
    fn from_draft(draft: Draft<'_>) -> Self {
        Self {
            byte_length: draft.limit.byte_length,
            raw_message: draft.raw_message,
            errors: draft.errors,
        }
    }

    /// True when the input was fine but the history write failed.
    pub fn is_persistence_failure(&self) -> bool {
        self.errors
            .iter()
            .any(|err| matches!(err, ComposeError::PersistenceFailure(_)))
    }
}

impl From<ComposeError> for SubmitError {
    fn from(err: ComposeError) -> Self {
        Self {
            raw_message: String::new(),
            byte_length: 0,
            errors: vec![err],
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "submission failed: {}", reasons.join("; "))
    }
}

impl std::error::Error for SubmitError {}

/// Drives requests through composition, delivery and recording.
pub struct Submitter {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn SubmissionSink>,
    policy: SubmissionPolicy,
}

impl Submitter {
    pub fn new(
        transport: Arc<dyn Transport>,
        sink: Arc<dyn SubmissionSink>,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            transport,
            sink,
            policy,
        }
    }

    pub fn policy(&self) -> &SubmissionPolicy {
        &self.policy
    }

    /// Compose a message without sending or recording it.
    pub fn preview(&self, command: &str, params: &Params) -> Result<Draft<'static>, ComposeError> {
        let spec = find_command(command)?;
        Ok(compose(spec, params, &self.policy))
    }

    pub fn submit(&self, request: &SubmissionRequest) -> Result<Receipt, SubmitError> {
        let spec = find_command(&request.command)?;
        self.submit_command(spec, request)
    }

    /// Submit `request` for an already resolved command.
    pub fn submit_command(
        &self,
        spec: &CommandSpec,
        request: &SubmissionRequest,
    ) -> Result<Receipt, SubmitError> {
        let draft = draft_command(spec, request, &self.policy);
        if !draft.is_admissible() {
            warn!(
                "Rejected '{}' for {:?}: {} problem(s)",
                spec.id,
                request.device_name,
                draft.errors.len()
            );
            return Err(SubmitError::from_draft(draft));
        }

        let phone_number = request.phone_number.trim();
        let status = self.transport.deliver(phone_number, &draft.raw_message);
        let dispatch = Dispatch {
            device_name: request.device_name.clone(),
            phone_number: phone_number.to_string(),
            command_name: spec.name.to_string(),
            raw_message: draft.raw_message.clone(),
            status,
        };

        let id = match self.sink.append(&dispatch) {
            Ok(id) => id,
            Err(err) => {
                error!("Failed to log command '{}': {}", spec.id, err);
                return Err(SubmitError {
                    raw_message: draft.raw_message,
                    byte_length: draft.limit.byte_length,
                    errors: vec![ComposeError::PersistenceFailure(err.to_string())],
                });
            }
        };

        info!("Logged '{}' as #{} ({})", spec.id, id, status);
        Ok(Receipt {
            id,
            command_name: dispatch.command_name,
            raw_message: dispatch.raw_message,
            byte_length: draft.limit.byte_length,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::command::Category;

    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    impl Transport for CountingTransport {
        fn deliver(&self, _phone_number: &str, _raw_message: &str) -> DeliveryStatus {
            self.calls.fetch_add(1, Ordering::SeqCst);
            DeliveryStatus::Sent
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        rows: Mutex<Vec<Dispatch>>,
    }

    impl SubmissionSink for RecordingSink {
        fn append(&self, dispatch: &Dispatch) -> Result<u64, SinkError> {
            let mut rows = self.rows.lock().map_err(|e| e.to_string())?;
            rows.push(dispatch.clone());
            Ok(rows.len() as u64)
        }
    }

    struct FailingSink;

    impl SubmissionSink for FailingSink {
        fn append(&self, _dispatch: &Dispatch) -> Result<u64, SinkError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    const LONG_COMMAND: CommandSpec = CommandSpec {
        id: "long",
        name: "Long Command",
        category: Category::Control,
        structure: "x*200",
        params: &[],
        encode: |_| Ok("x".repeat(200)),
    };

    fn setup() -> (Arc<CountingTransport>, Arc<RecordingSink>, Submitter) {
        let transport = Arc::new(CountingTransport::default());
        let sink = Arc::new(RecordingSink::default());
        let submitter = Submitter::new(
            transport.clone(),
            sink.clone(),
            SubmissionPolicy::default(),
        );
        (transport, sink, submitter)
    }

    fn request(command: &str, phone: &str, params: Params) -> SubmissionRequest {
        SubmissionRequest {
            device_name: "Grandpa".to_string(),
            phone_number: phone.to_string(),
            command: command.to_string(),
            params,
        }
    }

    #[test]
    fn test_location_request_is_accepted_and_logged() {
        let (transport, sink, submitter) = setup();
        let receipt = submitter
            .submit(&request("loc", "639171234567", Params::new()))
            .unwrap();
        assert_eq!(receipt.raw_message, "loc");
        assert_eq!(receipt.byte_length, 3);
        assert_eq!(receipt.status, DeliveryStatus::Sent);
        assert_eq!(receipt.command_name, "Request Location");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].raw_message, "loc");
        assert_eq!(rows[0].device_name, "Grandpa");
    }

    #[test]
    fn test_empty_phone_is_rejected_without_log() {
        let (transport, sink, submitter) = setup();
        let params = Params::new().with("mode", 1).with("time", 20);
        let err = submitter
            .submit(&request("sos_button", "   ", params))
            .unwrap_err();
        assert_eq!(err.errors, vec![ComposeError::EmptyDestination]);
        assert_eq!(err.raw_message, "SOS1,20");
        assert!(!err.is_persistence_failure());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(sink.rows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_oversized_message_is_blocked() {
        let (transport, sink, submitter) = setup();
        let err = submitter
            .submit_command(&LONG_COMMAND, &request("long", "123", Params::new()))
            .unwrap_err();
        assert_eq!(err.byte_length, 200);
        assert_eq!(
            err.errors,
            vec![ComposeError::MessageTooLong {
                length: 200,
                limit: 150
            }]
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(sink.rows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failures_are_reported_together() {
        let draft = draft_command(
            &LONG_COMMAND,
            &request("long", "", Params::new()),
            &SubmissionPolicy::default(),
        );
        assert_eq!(draft.errors.len(), 2);
        assert_eq!(draft.errors[0], ComposeError::EmptyDestination);
        assert_eq!(draft.errors[1].code(), "message_too_long");
    }

    #[test]
    fn test_persistence_failure_is_distinct() {
        let submitter = Submitter::new(
            Arc::new(SimulatedTransport),
            Arc::new(FailingSink),
            SubmissionPolicy::default(),
        );
        let err = submitter
            .submit(&request("reboot", "123", Params::new()))
            .unwrap_err();
        assert!(err.is_persistence_failure());
        assert_eq!(err.raw_message, "reboot");
        assert_eq!(
            err.errors,
            vec![ComposeError::PersistenceFailure("disk full".into())]
        );
    }

    #[test]
    fn test_unknown_command() {
        let (_, sink, submitter) = setup();
        let err = submitter
            .submit(&request("teleport", "123", Params::new()))
            .unwrap_err();
        assert_eq!(
            err.errors,
            vec![ComposeError::UnknownCommand("teleport".into())]
        );
        assert!(sink.rows.lock().unwrap().is_empty());
        assert!(draft(&request("teleport", "123", Params::new()), &SubmissionPolicy::default()).is_err());
    }

    #[test]
    fn test_missing_param_reported_once() {
        let (_, _, submitter) = setup();
        let err = submitter
            .submit(&request("apn", "123", Params::new()))
            .unwrap_err();
        assert_eq!(
            err.errors,
            vec![ComposeError::MissingParameter("apn".into())]
        );
        assert_eq!(err.raw_message, "");
    }

    #[test]
    fn test_loose_numeric_text_never_reaches_transport() {
        let (transport, sink, submitter) = setup();
        for time in [" 7 ", "1e2"] {
            let err = submitter
                .submit(&request("sos_loops", "123", Params::new().with("time", time)))
                .unwrap_err();
            assert_eq!(err.errors[0].code(), "invalid_number", "{:?}", time);
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(sink.rows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_preview_ignores_destination() {
        let (transport, sink, submitter) = setup();
        let draft = submitter
            .preview("Set Time Zone", &Params::new().with("zone", "-5"))
            .unwrap();
        assert!(draft.is_admissible());
        assert_eq!(draft.raw_message, "tz-5:00");
        assert_eq!(draft.limit.byte_length, 7);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(sink.rows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_policy_limit_override() {
        let submitter = Submitter::new(
            Arc::new(SimulatedTransport),
            Arc::new(RecordingSink::default()),
            SubmissionPolicy {
                max_message_bytes: 4,
            },
        );
        let err = submitter
            .submit(&request("status", "123", Params::new()))
            .unwrap_err();
        assert_eq!(
            err.errors,
            vec![ComposeError::MessageTooLong {
                length: 6,
                limit: 4
            }]
        );
    }

    #[test]
    fn test_submit_error_display() {
        let err = SubmitError::from(ComposeError::EmptyDestination);
        assert_eq!(
            err.to_string(),
            "submission failed: phone number is required"
        );
    }
}
