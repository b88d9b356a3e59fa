// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A value submitted for one form field.
///
/// Deserializes untagged, so JSON `true`, `60` and `"+8"` all map naturally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Render the value as it appears in the wire message.
    ///
    /// Text is passed through verbatim, whole numbers lose their fractional
    /// part and booleans become `1`/`0`.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Number(n) => format_number(*n),
            ParamValue::Bool(true) => "1".to_string(),
            ParamValue::Bool(false) => "0".to_string(),
        }
    }

    /// Numeric interpretation. Text must be a plain base-10 literal
    /// (`-12`, `060`, `0.5`); whitespace, signs other than a leading `-` and
    /// exponents are rejected since the text is sent as-is.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            ParamValue::Text(s) => parse_decimal(s),
            ParamValue::Bool(_) => None,
        }
    }

    /// Boolean interpretation: `true`/`false`, `1`/`0` as number or text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Number(n) if *n == 1.0 => Some(true),
            ParamValue::Number(n) if *n == 0.0 => Some(false),
            ParamValue::Number(_) => None,
            ParamValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (whole, frac) = match unsigned.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !frac.map_or(true, digits) {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Number(f64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Compile-time value used for catalog defaults and option values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Text(&'static str),
    Bool(bool),
}

impl Literal {
    pub fn to_value(self) -> ParamValue {
        match self {
            Literal::Int(n) => ParamValue::from(n),
            Literal::Text(s) => ParamValue::from(s),
            Literal::Bool(b) => ParamValue::Bool(b),
        }
    }

    pub fn render(self) -> String {
        self.to_value().render()
    }
}

/// Parameter name to value mapping for one command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_whole_numbers_without_fraction() {
        assert_eq!(ParamValue::Number(60.0).render(), "60");
        assert_eq!(ParamValue::Number(-5.0).render(), "-5");
        assert_eq!(ParamValue::Number(0.5).render(), "0.5");
    }

    #[test]
    fn test_render_text_verbatim() {
        assert_eq!(ParamValue::from("060").render(), "060");
        assert_eq!(ParamValue::from("+8").render(), "+8");
        assert_eq!(ParamValue::from("").render(), "");
    }

    #[test]
    fn test_render_bool_as_flag() {
        assert_eq!(ParamValue::Bool(true).render(), "1");
        assert_eq!(ParamValue::Bool(false).render(), "0");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(ParamValue::from("42").as_number(), Some(42.0));
        assert_eq!(ParamValue::from("-5").as_number(), Some(-5.0));
        assert_eq!(ParamValue::from("060").as_number(), Some(60.0));
        assert_eq!(ParamValue::from("0.5").as_number(), Some(0.5));
        assert_eq!(ParamValue::from("abc").as_number(), None);
        assert_eq!(ParamValue::from("inf").as_number(), None);
        assert_eq!(ParamValue::Number(f64::NAN).as_number(), None);
        assert_eq!(ParamValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_as_number_rejects_non_plain_text() {
        for text in [" 7 ", "1e2", "+5", "", "-", "5.", ".5", "1_000", "0x10"] {
            assert_eq!(ParamValue::from(text).as_number(), None, "{:?}", text);
        }
    }

    #[test]
    fn test_as_bool() {
        assert_eq!(ParamValue::from("TRUE").as_bool(), Some(true));
        assert_eq!(ParamValue::from("0").as_bool(), Some(false));
        assert_eq!(ParamValue::Number(1.0).as_bool(), Some(true));
        assert_eq!(ParamValue::Number(2.0).as_bool(), None);
        assert_eq!(ParamValue::from("yes").as_bool(), None);
    }

    #[test]
    fn test_params_deserialize_untagged() {
        let params: Params =
            serde_json::from_str(r#"{"n":1,"phone":"639171234567","on":true}"#).unwrap();
        assert_eq!(params.get("n"), Some(&ParamValue::Number(1.0)));
        assert_eq!(params.get("phone"), Some(&ParamValue::from("639171234567")));
        assert_eq!(params.get("on"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn test_literal_to_value() {
        assert_eq!(Literal::Int(6060).render(), "6060");
        assert_eq!(Literal::Text("00").render(), "00");
        assert_eq!(Literal::Bool(false).to_value(), ParamValue::Bool(false));
    }
}
