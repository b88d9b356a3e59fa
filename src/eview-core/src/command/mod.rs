// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Command and parameter schema types.

pub mod value;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encode::Fields;
use crate::error::ComposeError;
use value::{Literal, ParamValue};

/// Input widget kind of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Text,
    Number,
    Select,
    Boolean,
}

/// Organizational grouping of commands. Has no effect on encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Basic,
    Control,
    Alarms,
    Monitoring,
    Network,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Basic => "Basic",
            Category::Control => "Control",
            Category::Alarms => "Alarms",
            Category::Monitoring => "Monitoring",
            Category::Network => "Network",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a select parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamOption {
    pub label: &'static str,
    pub value: Literal,
}

impl ParamOption {
    pub const fn new(label: &'static str, value: Literal) -> Self {
        Self { label, value }
    }
}

/// Schema of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandParam {
    /// Token name used by the command template.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ParamKind,
    /// Non-empty for [`ParamKind::Select`], empty otherwise.
    pub options: &'static [ParamOption],
    pub placeholder: Option<&'static str>,
    pub default: Option<Literal>,
    pub description: Option<&'static str>,
    /// Display-only unit hint. Never appended to the encoded message.
    pub suffix: Option<&'static str>,
}

impl CommandParam {
    const fn base(name: &'static str, label: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            label,
            kind,
            options: &[],
            placeholder: None,
            default: None,
            description: None,
            suffix: None,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::base(name, label, ParamKind::Text)
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::base(name, label, ParamKind::Number)
    }

    pub const fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::base(name, label, ParamKind::Boolean)
    }

    pub const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [ParamOption],
    ) -> Self {
        Self {
            options,
            ..Self::base(name, label, ParamKind::Select)
        }
    }

    pub const fn with_default(self, default: Literal) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub const fn with_placeholder(self, placeholder: &'static str) -> Self {
        Self {
            placeholder: Some(placeholder),
            ..self
        }
    }

    pub const fn with_description(self, description: &'static str) -> Self {
        Self {
            description: Some(description),
            ..self
        }
    }

    pub const fn with_suffix(self, suffix: &'static str) -> Self {
        Self {
            suffix: Some(suffix),
            ..self
        }
    }

    /// Value the form starts with before the user edits it.
    pub fn initial_value(&self) -> ParamValue {
        if let Some(default) = self.default {
            return default.to_value();
        }
        match self.kind {
            ParamKind::Text => ParamValue::Text(String::new()),
            ParamKind::Number => ParamValue::Number(0.0),
            ParamKind::Select => self
                .options
                .first()
                .map(|opt| opt.value.to_value())
                .unwrap_or_else(|| ParamValue::Text(String::new())),
            ParamKind::Boolean => ParamValue::Bool(false),
        }
    }

    /// Whether `value` matches one of the declared options (by wire token).
    pub fn is_option(&self, value: &ParamValue) -> bool {
        let token = value.render();
        self.options.iter().any(|opt| opt.value.render() == token)
    }
}

/// Renders a command's wire message from its declared parameters.
pub type EncodeFn = fn(&Fields<'_>) -> Result<String, ComposeError>;

/// One device command: schema plus its fixed template.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    /// Stable lookup key.
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    /// Human-readable grammar, informational only.
    pub structure: &'static str,
    /// Form order. Encoding order is fixed by `encode`.
    pub params: &'static [CommandParam],
    pub encode: EncodeFn,
}

impl CommandSpec {
    pub fn param(&self, name: &str) -> Option<&CommandParam> {
        self.params.iter().find(|p| p.name == name)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("structure", &self.structure)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
