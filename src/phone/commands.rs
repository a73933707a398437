//! Command builders for every phone operation.
//!
//! Each builder validates its typed parameters and returns the
//! [`CommandSpec`] to send. Optional flags come from the declarative tables
//! below, so the flag order and naming for an operation live in one place.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::types::{
    GetSmsOptions, HelpSection, Locations, MemoryType, MmsFormat, NetmonitorMode, ResetMode,
    SaveSmsOptions, SecurityCodeType, SendSmsOptions,
};
use super::ShellError;
use crate::command::{CommandSpec, FlagRender, OptionalFlag};

/// Timestamp format accepted by `--datetime`.
pub const DATETIME_FORMAT: &str = "%y%m%d%H%M%S";

const GETSMS_FLAGS: &[OptionalFlag<GetSmsOptions>] = &[
    OptionalFlag {
        name: "--append-file",
        render: FlagRender::Value(|o| {
            o.file
                .as_ref()
                .filter(|_| o.append)
                .map(|p| p.display().to_string())
        }),
    },
    OptionalFlag {
        name: "--force-file",
        render: FlagRender::Value(|o| {
            o.file
                .as_ref()
                .filter(|_| !o.append)
                .map(|p| p.display().to_string())
        }),
    },
    OptionalFlag {
        name: "--delete",
        render: FlagRender::Switch(|o| o.delete),
    },
];

const SENDSMS_FLAGS: &[OptionalFlag<SendSmsOptions>] = &[
    OptionalFlag {
        name: "--smsc",
        render: FlagRender::Value(|o| o.smsc.clone()),
    },
    OptionalFlag {
        name: "--smscno",
        render: FlagRender::Value(|o| o.smscno.filter(|_| o.smsc.is_none()).map(|n| n.to_string())),
    },
    OptionalFlag {
        name: "--report",
        render: FlagRender::Switch(|o| o.report),
    },
    OptionalFlag {
        name: "--8bit",
        render: FlagRender::Switch(|o| o.eight_bit),
    },
    OptionalFlag {
        name: "--class",
        render: FlagRender::Value(|o| o.class.map(|c| c.to_string())),
    },
    OptionalFlag {
        name: "--validity",
        render: FlagRender::Value(|o| o.validity.map(|v| v.to_string())),
    },
    OptionalFlag {
        name: "--imelody",
        render: FlagRender::Switch(|o| o.imelody),
    },
    OptionalFlag {
        name: "--animation",
        render: FlagRender::Value(|o| o.animation.clone()),
    },
    OptionalFlag {
        name: "--concat",
        render: FlagRender::Value(|o| o.concat.clone()),
    },
    OptionalFlag {
        name: "--wappush",
        render: FlagRender::Value(|o| o.wappush.clone()),
    },
];

const SAVESMS_FLAGS: &[OptionalFlag<SaveSmsOptions>] = &[
    OptionalFlag {
        name: "--sender",
        render: FlagRender::Value(|o| o.sender.clone()),
    },
    OptionalFlag {
        name: "--smsc",
        render: FlagRender::Value(|o| o.smsc.clone()),
    },
    OptionalFlag {
        name: "--smscno",
        render: FlagRender::Value(|o| o.smscno.filter(|_| o.smsc.is_none()).map(|n| n.to_string())),
    },
    OptionalFlag {
        name: "--folder",
        render: FlagRender::Value(|o| o.folder.as_ref().map(ToString::to_string)),
    },
    OptionalFlag {
        name: "--location",
        render: FlagRender::Value(|o| o.location.map(|l| l.to_string())),
    },
    OptionalFlag {
        name: "--sent",
        render: FlagRender::Switch(|o| o.read && !o.deliver),
    },
    OptionalFlag {
        name: "--read",
        render: FlagRender::Switch(|o| o.read && o.deliver),
    },
    OptionalFlag {
        name: "--deliver",
        render: FlagRender::Switch(|o| o.deliver),
    },
    OptionalFlag {
        name: "--datetime",
        render: FlagRender::Value(|o| o.datetime.map(|d| d.format(DATETIME_FORMAT).to_string())),
    },
];

fn is_concat_spec(value: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\d+:\d+:\d+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

fn with_locations(spec: CommandSpec, locations: Locations) -> CommandSpec {
    locations
        .tokens()
        .into_iter()
        .fold(spec, |spec, token| spec.arg(token))
}

/// Usage text, optionally for one section.
#[must_use]
pub fn help(section: Option<HelpSection>) -> CommandSpec {
    CommandSpec::new("--help").opt_arg(section.map(HelpSection::as_str))
}

/// Version of the gnokii tool.
#[must_use]
pub fn version() -> CommandSpec {
    CommandSpec::new("--version")
}

/// One-shot phone status.
#[must_use]
pub fn monitor() -> CommandSpec {
    CommandSpec::new("--monitor").arg("once")
}

/// Number and memory stored under speed-dial `location`.
#[must_use]
pub fn get_speed_dial(location: u32) -> CommandSpec {
    CommandSpec::new("--getspeeddial").arg(location)
}

/// Bind speed-dial `number` to an entry in `memory` at `location`.
#[must_use]
pub fn set_speed_dial(number: u32, memory: &MemoryType, location: u32) -> CommandSpec {
    CommandSpec::new("--setspeeddial")
        .arg(number)
        .arg(memory)
        .arg(location)
}

/// Start a voice call to `number`.
#[must_use]
pub fn dial_voice(number: &str) -> CommandSpec {
    CommandSpec::new("--dialvoice").arg(number)
}

/// Send DTMF tones during an active call.
#[must_use]
pub fn send_dtmf(sequence: &str) -> CommandSpec {
    CommandSpec::new("--senddtmf").arg(sequence)
}

/// Answer the incoming call `call_id`.
#[must_use]
pub fn answer_call(call_id: u32) -> CommandSpec {
    CommandSpec::new("--answercall").arg(call_id)
}

/// Hang up the call `call_id`.
#[must_use]
pub fn hangup(call_id: u32) -> CommandSpec {
    CommandSpec::new("--hangup").arg(call_id)
}

/// Call diverting.
///
/// # Errors
///
/// Always `ShellError::NotImplemented`: the tool's syntax for it is
/// self-contradictory.
pub fn divert() -> Result<CommandSpec, ShellError> {
    Err(ShellError::NotImplemented {
        command: "--divert",
        reason: "command-line syntax is ambiguous",
    })
}

/// Indicators shown on the phone display.
#[must_use]
pub fn get_display_status() -> CommandSpec {
    CommandSpec::new("--getdisplaystatus")
}

/// Mirror text written to the phone display.
#[must_use]
pub fn display_output() -> CommandSpec {
    CommandSpec::new("--displayoutput")
}

/// Settings of one profile, or all of them.
#[must_use]
pub fn get_profile(number: Option<u32>) -> CommandSpec {
    CommandSpec::new("--getprofile").opt_arg(number)
}

/// Profile settings.
///
/// # Errors
///
/// Always `ShellError::NotImplemented`: the command is undocumented.
pub fn set_profile() -> Result<CommandSpec, ShellError> {
    Err(ShellError::NotImplemented {
        command: "--setprofile",
        reason: "command-line syntax is undocumented",
    })
}

/// The active profile.
#[must_use]
pub fn get_active_profile() -> CommandSpec {
    CommandSpec::new("--getactiveprofile")
}

/// Make profile `number` active.
#[must_use]
pub fn set_active_profile(number: u32) -> CommandSpec {
    CommandSpec::new("--setactiveprofile").arg(number)
}

/// Query or set netmonitor mode.
///
/// # Errors
///
/// Returns `InvalidArgument` for a page outside 1..=239.
pub fn netmonitor(mode: Option<NetmonitorMode>) -> Result<CommandSpec, ShellError> {
    if let Some(NetmonitorMode::Page(page)) = mode {
        if page == 0 || page > NetmonitorMode::MAX_PAGE {
            return Err(ShellError::invalid(
                "--netmonitor",
                format!("page {page} outside 1..={}", NetmonitorMode::MAX_PAGE),
            ));
        }
    }
    Ok(CommandSpec::new("--netmonitor").opt_arg(mode))
}

/// Soft or hard reset of the phone.
#[must_use]
pub fn reset(mode: ResetMode) -> CommandSpec {
    CommandSpec::new("--reset").arg(mode.as_str())
}

/// ToDo notes in a location range, optionally as vCalendar.
#[must_use]
pub fn get_todo(locations: Locations, vcal: bool) -> CommandSpec {
    with_locations(CommandSpec::new("--gettodo"), locations).switch("--vCal", vcal)
}

/// Write ToDo notes from a vCalendar file.
#[must_use]
pub fn write_todo(vcal_file: &Path, locations: Locations) -> CommandSpec {
    let spec = CommandSpec::new("--writetodo").arg(vcal_file.display());
    with_locations(spec, locations)
}

/// Delete every ToDo note.
#[must_use]
pub fn delete_all_todos() -> CommandSpec {
    CommandSpec::new("--deletealltodos")
}

/// Calendar notes in a location range, optionally as vCalendar.
#[must_use]
pub fn get_calendar_note(locations: Locations, vcal: bool) -> CommandSpec {
    with_locations(CommandSpec::new("--getcalendarnote"), locations).switch("--vCal", vcal)
}

/// Write calendar notes from a vCalendar file.
#[must_use]
pub fn write_calendar_note(vcal_file: &Path, locations: Locations) -> CommandSpec {
    let spec = CommandSpec::new("--writecalendarnote").arg(vcal_file.display());
    with_locations(spec, locations)
}

/// Delete calendar notes in a location range.
#[must_use]
pub fn delete_calendar_note(locations: Locations) -> CommandSpec {
    with_locations(CommandSpec::new("--deletecalendarnote"), locations)
}

/// Read SMS messages from `memory`, optionally saving or deleting them.
#[must_use]
pub fn get_sms(memory: &MemoryType, locations: Locations, options: &GetSmsOptions) -> CommandSpec {
    let spec = CommandSpec::new("--getsms").arg(memory);
    with_locations(spec, locations).flags(GETSMS_FLAGS, options)
}

/// Delete SMS messages from `memory`.
#[must_use]
pub fn delete_sms(memory: &MemoryType, locations: Locations) -> CommandSpec {
    with_locations(CommandSpec::new("--deletesms").arg(memory), locations)
}

/// Send `message` to `destination`.
///
/// # Errors
///
/// Returns `InvalidArgument` for a class above 3 or a concat part that is
/// not `this:total:serial`.
pub fn send_sms(
    destination: &str,
    message: &str,
    options: &SendSmsOptions,
) -> Result<CommandSpec, ShellError> {
    if let Some(class) = options.class {
        if class > 3 {
            return Err(ShellError::invalid(
                "--sendsms",
                format!("class {class} outside 0..=3"),
            ));
        }
    }
    if let Some(concat) = &options.concat {
        if !is_concat_spec(concat) {
            return Err(ShellError::invalid(
                "--sendsms",
                format!("concat {concat:?} is not this:total:serial"),
            ));
        }
    }

    Ok(CommandSpec::new("--sendsms")
        .arg(destination)
        .flags(SENDSMS_FLAGS, options)
        .payload(message))
}

/// Save `message` to the phone.
///
/// # Errors
///
/// Returns `InvalidArgument` when sender or message-center options are given
/// for a message that is not saved as deliver-type.
pub fn save_sms(message: &str, options: &SaveSmsOptions) -> Result<CommandSpec, ShellError> {
    if !options.deliver
        && (options.sender.is_some() || options.smsc.is_some() || options.smscno.is_some())
    {
        return Err(ShellError::invalid(
            "--savesms",
            "sender and SMSC options require deliver",
        ));
    }

    Ok(CommandSpec::new("--savesms")
        .flags(SAVESMS_FLAGS, options)
        .payload(message))
}

/// SMSC parameters for a location range, or all of them.
///
/// # Errors
///
/// Returns `InvalidArgument` when `end` is given without `start`.
pub fn get_smsc(
    start: Option<u32>,
    end: Option<u32>,
    raw: bool,
) -> Result<CommandSpec, ShellError> {
    if start.is_none() && end.is_some() {
        return Err(ShellError::invalid(
            "--getsmsc",
            "end location given without start",
        ));
    }
    Ok(CommandSpec::new("--getsmsc")
        .opt_arg(start)
        .opt_arg(end)
        .switch("--raw", raw))
}

/// Set SMSC parameters from the `--raw` output format of `--getsmsc`.
#[must_use]
pub fn set_smsc(settings: &str) -> CommandSpec {
    CommandSpec::new("--setsmsc").payload(settings)
}

/// Create an SMS folder called `name`.
#[must_use]
pub fn create_sms_folder(name: &str) -> CommandSpec {
    CommandSpec::new("--createsmsfolder").arg(name)
}

/// Delete SMS folder `number`.
#[must_use]
pub fn delete_sms_folder(number: u32) -> CommandSpec {
    CommandSpec::new("--deletesmsfolder").arg(number)
}

/// SMS folders and their message counts.
#[must_use]
pub fn sms_folder_status() -> CommandSpec {
    CommandSpec::new("--showsmsfolderstatus")
}

/// Print incoming messages as they arrive.
#[must_use]
pub fn sms_reader() -> CommandSpec {
    CommandSpec::new("--smsreader")
}

/// Fetch MMS messages from `memory`.
///
/// File formats write to `file` and replace it; the human-readable format is
/// printed in the response and takes no file.
///
/// # Errors
///
/// Returns `InvalidArgument` when a file format has no file, or the
/// human-readable format is given one.
pub fn get_mms(
    memory: &MemoryType,
    locations: Locations,
    format: MmsFormat,
    file: Option<&Path>,
) -> Result<CommandSpec, ShellError> {
    let spec = with_locations(CommandSpec::new("--getmms").arg(memory), locations);
    match (format.flag(), file) {
        (None, None) => Ok(spec),
        (None, Some(_)) => Err(ShellError::invalid(
            "--getmms",
            "human-readable output is not written to a file",
        )),
        (Some(_), None) => Err(ShellError::invalid(
            "--getmms",
            format!("{format:?} output needs a file"),
        )),
        (Some(flag), Some(file)) => Ok(spec.arg(flag).arg(file.display()).arg("--overwrite")),
    }
}

/// IMEI, manufacturer, model, product name and revision.
#[must_use]
pub fn identify() -> CommandSpec {
    CommandSpec::new("--identify")
}

/// Enter a PIN, PUK or security code.
#[must_use]
pub fn enter_security_code(kind: SecurityCodeType, code: &str) -> CommandSpec {
    CommandSpec::new("--entersecuritycode")
        .arg(kind.as_str())
        .arg(code)
}

/// The phone security code.
#[must_use]
pub fn get_security_code() -> CommandSpec {
    CommandSpec::new("--getsecuritycode")
}

/// Which security code the phone is waiting for.
#[must_use]
pub fn get_security_code_status() -> CommandSpec {
    CommandSpec::new("--getsecuritycodestatus")
}

/// SIM lock state.
#[must_use]
pub fn get_locks_info() -> CommandSpec {
    CommandSpec::new("--getlocksinfo")
}
