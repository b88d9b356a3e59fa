// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Static registry of supported EV-07B commands.

use crate::command::value::{Literal, Params};
use crate::command::{Category, CommandParam, CommandSpec, ParamOption};
use crate::encode::Fields;
use crate::error::ComposeError;

const YES_NO: &[ParamOption] = &[
    ParamOption::new("Yes", Literal::Int(1)),
    ParamOption::new("No", Literal::Int(0)),
];

const ON_OFF: &[ParamOption] = &[
    ParamOption::new("On", Literal::Int(1)),
    ParamOption::new("Off", Literal::Int(0)),
];

const WORKING_MODES: &[ParamOption] = &[
    ParamOption::new("Mode 1: Only in events", Literal::Int(1)),
    ParamOption::new("Mode 2: Events & interval", Literal::Int(2)),
    ParamOption::new("Mode 3: Always on", Literal::Int(3)),
    ParamOption::new("Mode 4: Events & interval (data only)", Literal::Int(4)),
    ParamOption::new("Mode 5: SOS Only", Literal::Int(5)),
    ParamOption::new("Mode 6: Events & Activated", Literal::Int(6)),
];

const SOS_TRIGGERS: &[ParamOption] = &[
    ParamOption::new("Long Press", Literal::Int(1)),
    ParamOption::new("Double Click", Literal::Int(2)),
];

const WHITELIST_MODES: &[ParamOption] = &[
    ParamOption::new("Off (All numbers)", Literal::Int(0)),
    ParamOption::new("On (Authorized only)", Literal::Int(1)),
];

const MINUTE_OFFSETS: &[ParamOption] = &[
    ParamOption::new("00", Literal::Text("00")),
    ParamOption::new("15", Literal::Text("15")),
    ParamOption::new("30", Literal::Text("30")),
    ParamOption::new("45", Literal::Text("45")),
];

const ALARM_CALL: CommandParam =
    CommandParam::select("call", "Call on Alarm", YES_NO).with_default(Literal::Int(1));

const ALARM_STATUS: CommandParam =
    CommandParam::select("on", "Status", ON_OFF).with_default(Literal::Int(1));

static CATALOG: &[CommandSpec] = &[
    CommandSpec {
        id: "set_contacts",
        name: "Set Contact Numbers",
        category: Category::Basic,
        structure: "A(n),(SMS Yes/No),(call Yes/No),(phone number)",
        params: &[
            CommandParam::number("n", "Contact Slot")
                .with_default(Literal::Int(1))
                .with_description("1-10"),
            CommandParam::select("sms", "Receive SMS", YES_NO).with_default(Literal::Int(1)),
            CommandParam::select("call", "Receive Call", YES_NO).with_default(Literal::Int(1)),
            CommandParam::text("phone", "Phone Number").with_placeholder("e.g. 123456789"),
        ],
        encode: encode_set_contacts,
    },
    CommandSpec {
        id: "loc",
        name: "Request Location",
        category: Category::Monitoring,
        structure: "loc",
        params: &[],
        encode: |_| Ok("loc".to_string()),
    },
    CommandSpec {
        id: "fall_down",
        name: "Fall Down Alarm",
        category: Category::Alarms,
        structure: "fl(on/off),(sensitivity),(call yes/no)",
        params: &[
            ALARM_STATUS,
            CommandParam::number("sensitivity", "Sensitivity")
                .with_default(Literal::Int(5))
                .with_description("1-9 (1=least, 9=most)"),
            ALARM_CALL,
        ],
        encode: encode_fall_down,
    },
    CommandSpec {
        id: "no_motion",
        name: "No Motion Alarm",
        category: Category::Alarms,
        structure: "nmo(on/off),(time),(call yes/no)",
        params: &[
            ALARM_STATUS,
            CommandParam::number("time", "Static Time")
                .with_default(Literal::Int(60))
                .with_suffix("min")
                .with_description("Minutes of no motion"),
            ALARM_CALL,
        ],
        encode: encode_no_motion,
    },
    CommandSpec {
        id: "working_mode",
        name: "Set Working Mode",
        category: Category::Control,
        structure: "mode(n)",
        params: &[CommandParam::select("mode", "Mode", WORKING_MODES).with_default(Literal::Int(1))],
        encode: |f| Ok(format!("mode{}", f.token("mode")?)),
    },
    CommandSpec {
        id: "sos_button",
        name: "SOS Button Mode",
        category: Category::Alarms,
        structure: "SOS(mode),(time)",
        params: &[
            CommandParam::select("mode", "Trigger Type", SOS_TRIGGERS)
                .with_default(Literal::Int(1)),
            CommandParam::number("time", "Press Time")
                .with_default(Literal::Int(20))
                .with_suffix("x0.1s")
                .with_description("20 = 2 seconds"),
        ],
        encode: encode_sos_button,
    },
    CommandSpec {
        id: "sos_loops",
        name: "SOS Call Loops",
        category: Category::Alarms,
        structure: "Loop(time)",
        params: &[CommandParam::number("time", "Cycles")
            .with_default(Literal::Int(5))
            .with_description("0=infinite, 1-10=times")],
        encode: |f| Ok(format!("Loop{}", f.token("time")?)),
    },
    CommandSpec {
        id: "whitelist",
        name: "SMS White List",
        category: Category::Network,
        structure: "sms(n)",
        params: &[CommandParam::select("n", "Status", WHITELIST_MODES).with_default(Literal::Int(0))],
        encode: |f| Ok(format!("sms{}", f.token("n")?)),
    },
    CommandSpec {
        id: "timezone",
        name: "Set Time Zone",
        category: Category::Basic,
        structure: "tz(zone):(minute)",
        params: &[
            CommandParam::text("zone", "Zone")
                .with_default(Literal::Text("+8"))
                .with_placeholder("+8 or -5"),
            CommandParam::select("min", "Minute Offset", MINUTE_OFFSETS)
                .with_default(Literal::Text("00")),
        ],
        encode: encode_timezone,
    },
    CommandSpec {
        id: "apn",
        name: "Set APN",
        category: Category::Network,
        structure: "S1,(apn)",
        params: &[CommandParam::text("apn", "APN Name").with_placeholder("e.g. internet")],
        encode: |f| Ok(format!("S1,{}", f.token("apn")?)),
    },
    CommandSpec {
        id: "server",
        name: "Set Server IP",
        category: Category::Network,
        structure: "IP1,(ip),(port)",
        params: &[
            CommandParam::text("ip", "Server IP/Domain").with_placeholder("e.g. 1.2.3.4"),
            CommandParam::number("port", "Port").with_default(Literal::Int(6060)),
        ],
        encode: encode_server,
    },
    CommandSpec {
        id: "status",
        name: "Check Status",
        category: Category::Monitoring,
        structure: "status",
        params: &[],
        encode: |_| Ok("status".to_string()),
    },
    CommandSpec {
        id: "reboot",
        name: "Reboot Device",
        category: Category::Control,
        structure: "reboot",
        params: &[],
        encode: |_| Ok("reboot".to_string()),
    },
    CommandSpec {
        id: "findme",
        name: "Find My Device",
        category: Category::Control,
        structure: "findme",
        params: &[],
        encode: |_| Ok("findme".to_string()),
    },
    CommandSpec {
        id: "mic_volume",
        name: "Microphone Volume",
        category: Category::Control,
        structure: "Micvolume(level)",
        params: &[CommandParam::number("level", "Volume Level")
            .with_default(Literal::Int(10))
            .with_description("0-15")],
        encode: |f| Ok(format!("Micvolume{}", f.token("level")?)),
    },
    CommandSpec {
        id: "speaker_volume",
        name: "Speaker Volume",
        category: Category::Control,
        structure: "speakervolume(level)",
        params: &[CommandParam::number("level", "Volume Level")
            .with_default(Literal::Int(90))
            .with_description("0-100")],
        encode: |f| Ok(format!("speakervolume{}", f.token("level")?)),
    },
];

fn encode_set_contacts(f: &Fields<'_>) -> Result<String, ComposeError> {
    Ok(format!(
        "A{},{},{},{}",
        f.token("n")?,
        f.token("sms")?,
        f.token("call")?,
        f.token("phone")?
    ))
}

fn encode_fall_down(f: &Fields<'_>) -> Result<String, ComposeError> {
    Ok(format!(
        "fl{},{},{}",
        f.token("on")?,
        f.token("sensitivity")?,
        f.token("call")?
    ))
}

fn encode_no_motion(f: &Fields<'_>) -> Result<String, ComposeError> {
    // The minute unit is part of the grammar, not the display suffix.
    Ok(format!(
        "NMO{},{}M,{}",
        f.token("on")?,
        f.token("time")?,
        f.token("call")?
    ))
}

fn encode_sos_button(f: &Fields<'_>) -> Result<String, ComposeError> {
    Ok(format!("SOS{},{}", f.token("mode")?, f.token("time")?))
}

fn encode_timezone(f: &Fields<'_>) -> Result<String, ComposeError> {
    Ok(format!("tz{}:{}", f.token("zone")?, f.token("min")?))
}

fn encode_server(f: &Fields<'_>) -> Result<String, ComposeError> {
    Ok(format!("IP1,{},{}", f.token("ip")?, f.token("port")?))
}

/// All commands in display order.
pub fn list_commands() -> &'static [CommandSpec] {
    CATALOG
}

/// Look a command up by its stable id.
pub fn get_command(id: &str) -> Result<&'static CommandSpec, ComposeError> {
    CATALOG
        .iter()
        .find(|spec| spec.id == id)
        .ok_or_else(|| ComposeError::UnknownCommand(id.to_string()))
}

/// Look a command up by id, then by display name (case-insensitive).
pub fn find_command(key: &str) -> Result<&'static CommandSpec, ComposeError> {
    let key = key.trim();
    CATALOG
        .iter()
        .find(|spec| spec.id == key)
        .or_else(|| {
            CATALOG
                .iter()
                .find(|spec| spec.name.eq_ignore_ascii_case(key))
        })
        .ok_or_else(|| ComposeError::UnknownCommand(key.to_string()))
}

/// The values a fresh form for `spec` is pre-populated with.
pub fn default_params(spec: &CommandSpec) -> Params {
    spec.params
        .iter()
        .map(|param| (param.name, param.initial_value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::command::value::ParamValue;
    use crate::command::ParamKind;
    use crate::encode::encode;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = list_commands().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), list_commands().len());
        assert_eq!(list_commands().len(), 16);
    }

    #[test]
    fn test_listing_order_is_stable() {
        let ids: Vec<_> = list_commands().iter().map(|c| c.id).collect();
        assert_eq!(ids.first(), Some(&"set_contacts"));
        assert_eq!(ids.get(1), Some(&"loc"));
        assert_eq!(ids.last(), Some(&"speaker_volume"));
    }

    #[test]
    fn test_defaults_encode_non_empty_and_deterministic() {
        for spec in list_commands() {
            let params = default_params(spec);
            let first = encode(spec, &params).unwrap();
            let second = encode(spec, &params).unwrap();
            assert!(!first.is_empty(), "{} encoded empty", spec.id);
            assert_eq!(first, second, "{} is not deterministic", spec.id);
        }
    }

    #[test]
    fn test_select_params_have_options_and_valid_defaults() {
        for spec in list_commands() {
            for param in spec.params.iter().filter(|p| p.kind == ParamKind::Select) {
                assert!(!param.options.is_empty(), "{}.{}", spec.id, param.name);
                if let Some(default) = param.default {
                    assert!(
                        param.is_option(&default.to_value()),
                        "{}.{} default not among options",
                        spec.id,
                        param.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_get_unknown_command() {
        assert_eq!(
            get_command("self_destruct").unwrap_err(),
            ComposeError::UnknownCommand("self_destruct".into())
        );
    }

    #[test]
    fn test_find_command_by_id_or_name() {
        assert_eq!(find_command("timezone").unwrap().id, "timezone");
        assert_eq!(find_command("set time zone").unwrap().id, "timezone");
        assert_eq!(find_command("  Request Location ").unwrap().id, "loc");
        assert!(find_command("Set Timezone").is_err());
    }

    #[test]
    fn test_default_params_fill_every_declared_param() {
        let spec = get_command("set_contacts").unwrap();
        let params = default_params(spec);
        assert_eq!(params.len(), 4);
        assert_eq!(params.get("n"), Some(&ParamValue::Number(1.0)));
        assert_eq!(params.get("phone"), Some(&ParamValue::Text(String::new())));
        assert_eq!(encode(spec, &params).unwrap(), "A1,1,1,");
    }

    #[test]
    fn test_request_location() {
        let spec = get_command("loc").unwrap();
        assert_eq!(encode(spec, &Params::new()).unwrap(), "loc");
    }

    #[test]
    fn test_set_contacts() {
        let spec = get_command("set_contacts").unwrap();
        let params = Params::new()
            .with("n", 1)
            .with("sms", 1)
            .with("call", 0)
            .with("phone", "639171234567");
        assert_eq!(encode(spec, &params).unwrap(), "A1,1,0,639171234567");
    }

    #[test]
    fn test_no_motion_embeds_unit() {
        let spec = get_command("no_motion").unwrap();
        let params = Params::new().with("on", 1).with("time", 60).with("call", 1);
        assert_eq!(encode(spec, &params).unwrap(), "NMO1,60M,1");
    }

    #[test]
    fn test_timezone() {
        let spec = get_command("timezone").unwrap();
        let params = Params::new().with("zone", "+8").with("min", "00");
        assert_eq!(encode(spec, &params).unwrap(), "tz+8:00");
    }

    #[test]
    fn test_literal_commands() {
        for (id, expected) in [("status", "status"), ("reboot", "reboot"), ("findme", "findme")] {
            let spec = get_command(id).unwrap();
            assert_eq!(encode(spec, &Params::new()).unwrap(), expected);
        }
    }

    #[test]
    fn test_volume_commands() {
        let mic = get_command("mic_volume").unwrap();
        assert_eq!(encode(mic, &default_params(mic)).unwrap(), "Micvolume10");
        let speaker = get_command("speaker_volume").unwrap();
        let params = Params::new().with("level", 45);
        assert_eq!(encode(speaker, &params).unwrap(), "speakervolume45");
    }
}
