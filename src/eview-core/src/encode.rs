// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Template substitution over a command's declared parameters.

use std::borrow::Cow;

use crate::command::value::{ParamValue, Params};
use crate::command::{CommandSpec, ParamKind};
use crate::error::ComposeError;

/// Read-only view of the submitted params, restricted to what a command
/// declares.
pub struct Fields<'a> {
    spec: &'a CommandSpec,
    params: &'a Params,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(spec: &'a CommandSpec, params: &'a Params) -> Self {
        Self { spec, params }
    }

    /// Wire token for `name`.
    ///
    /// Absent values fall back to the declared default; an undeclared name
    /// or an absent value without a default is a `MissingParameter`.
    /// Boolean params always render as `1`/`0`.
    pub fn token(&self, name: &str) -> Result<String, ComposeError> {
        let param = self
            .spec
            .param(name)
            .ok_or_else(|| ComposeError::MissingParameter(name.to_string()))?;
        let value = match (self.params.get(name), param.default) {
            (Some(value), _) => Cow::Borrowed(value),
            (None, Some(default)) => Cow::Owned(default.to_value()),
            (None, None) => return Err(ComposeError::MissingParameter(name.to_string())),
        };
        Ok(match (param.kind, value.as_bool()) {
            (ParamKind::Boolean, Some(flag)) => ParamValue::Bool(flag).render(),
            _ => value.render(),
        })
    }
}

/// Render `params` into the exact string sent to the device.
pub fn encode(spec: &CommandSpec, params: &Params) -> Result<String, ComposeError> {
    (spec.encode)(&Fields::new(spec, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_command;
    use crate::command::value::Literal;
    use crate::command::{Category, CommandParam};

    const FLAGGED: CommandSpec = CommandSpec {
        id: "flagged",
        name: "Flagged",
        category: Category::Control,
        structure: "F(flag)",
        params: &[CommandParam::boolean("flag", "Flag").with_default(Literal::Bool(false))],
        encode: |f| Ok(format!("F{}", f.token("flag")?)),
    };

    #[test]
    fn test_absent_param_uses_default() {
        let spec = get_command("no_motion").unwrap();
        let params = Params::new().with("on", 0);
        assert_eq!(encode(spec, &params).unwrap(), "NMO0,60M,1");
    }

    #[test]
    fn test_absent_param_without_default_is_missing() {
        let spec = get_command("apn").unwrap();
        assert_eq!(
            encode(spec, &Params::new()),
            Err(ComposeError::MissingParameter("apn".into()))
        );
    }

    #[test]
    fn test_undeclared_name_is_not_readable() {
        let spec = get_command("loc").unwrap();
        let params = Params::new().with("secret", "x");
        let fields = Fields::new(spec, &params);
        assert_eq!(
            fields.token("secret"),
            Err(ComposeError::MissingParameter("secret".into()))
        );
    }

    #[test]
    fn test_values_substituted_verbatim() {
        let spec = get_command("server").unwrap();
        let params = Params::new()
            .with("ip", "tracker.example.com")
            .with("port", "06060");
        assert_eq!(
            encode(spec, &params).unwrap(),
            "IP1,tracker.example.com,06060"
        );
    }

    #[test]
    fn test_boolean_renders_as_flag_whatever_the_input() {
        for (value, expected) in [
            (ParamValue::Bool(true), "F1"),
            (ParamValue::from("true"), "F1"),
            (ParamValue::from("TRUE"), "F1"),
            (ParamValue::from("0"), "F0"),
            (ParamValue::Number(1.0), "F1"),
        ] {
            let params = Params::new().with("flag", value.clone());
            assert_eq!(encode(&FLAGGED, &params).unwrap(), expected, "{:?}", value);
        }
        assert_eq!(encode(&FLAGGED, &Params::new()).unwrap(), "F0");
    }
}
