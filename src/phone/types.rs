//! Typed parameters for phone operations.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Help section accepted by `--help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpSection {
    All,
    Monitor,
    Sms,
    Mms,
    Phonebook,
    Calendar,
    Todo,
    Dial,
    Profile,
    Settings,
    Wap,
    Logo,
    Ringtone,
    Security,
    File,
    Other,
}

impl HelpSection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Monitor => "monitor",
            Self::Sms => "sms",
            Self::Mms => "mms",
            Self::Phonebook => "phonebook",
            Self::Calendar => "calendar",
            Self::Todo => "todo",
            Self::Dial => "dial",
            Self::Profile => "profile",
            Self::Settings => "settings",
            Self::Wap => "wap",
            Self::Logo => "logo",
            Self::Ringtone => "ringtone",
            Self::Security => "security",
            Self::File => "file",
            Self::Other => "other",
        }
    }
}

/// Message memory.
///
/// `SM`, `ME` and `MT` work on most phones; the folder codes are used by the
/// nk7110/nk6510 drivers. `--showsmsfolderstatus` lists what a phone offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryType {
    /// SIM card.
    Sim,
    /// Phone memory.
    Phone,
    /// Mixed phone and SIM memory.
    Mixed,
    Inbox,
    Outbox,
    Archive,
    Templates,
    /// "My Folders" entry `F<n>`.
    Folder(u8),
    /// Any other code reported by the phone.
    Other(String),
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sim => f.write_str("SM"),
            Self::Phone => f.write_str("ME"),
            Self::Mixed => f.write_str("MT"),
            Self::Inbox => f.write_str("IN"),
            Self::Outbox => f.write_str("OU"),
            Self::Archive => f.write_str("AR"),
            Self::Templates => f.write_str("TE"),
            Self::Folder(n) => write!(f, "F{n}"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

impl FromStr for MemoryType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.to_ascii_uppercase();
        Ok(match code.as_str() {
            "SM" => Self::Sim,
            "ME" => Self::Phone,
            "MT" => Self::Mixed,
            "IN" => Self::Inbox,
            "OU" => Self::Outbox,
            "AR" => Self::Archive,
            "TE" => Self::Templates,
            _ => match code.strip_prefix('F').and_then(|n| n.parse().ok()) {
                Some(n) => Self::Folder(n),
                None => Self::Other(s.to_string()),
            },
        })
    }
}

/// Last location of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Location(u32),
    /// Everything up to the last entry (the `end` keyword).
    End,
}

impl fmt::Display for RangeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(n) => write!(f, "{n}"),
            Self::End => f.write_str("end"),
        }
    }
}

/// A `start [end]` location range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locations {
    pub start: u32,
    pub end: Option<RangeEnd>,
}

impl Locations {
    /// Only the entry at `start`.
    #[must_use]
    pub fn single(start: u32) -> Self {
        Self { start, end: None }
    }

    /// Entries `start..=end`.
    #[must_use]
    pub fn between(start: u32, end: u32) -> Self {
        Self {
            start,
            end: Some(RangeEnd::Location(end)),
        }
    }

    /// Entries from `start` to the last one.
    #[must_use]
    pub fn to_end(start: u32) -> Self {
        Self {
            start,
            end: Some(RangeEnd::End),
        }
    }

    /// Positional tokens: start, then end when given.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = vec![self.start.to_string()];
        if let Some(end) = self.end {
            tokens.push(end.to_string());
        }
        tokens
    }
}

/// Phone reset kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetMode {
    #[default]
    Soft,
    Hard,
}

impl ResetMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Hard => "hard",
        }
    }
}

/// Netmonitor setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetmonitorMode {
    Reset,
    Off,
    /// "Operator field tests".
    Field,
    /// "R&D field tests".
    Devel,
    /// Show the next page.
    Next,
    /// Show page 1..=239.
    Page(u8),
}

impl NetmonitorMode {
    /// Highest page number the phone accepts.
    pub const MAX_PAGE: u8 = 239;
}

impl fmt::Display for NetmonitorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => f.write_str("reset"),
            Self::Off => f.write_str("off"),
            Self::Field => f.write_str("field"),
            Self::Devel => f.write_str("devel"),
            Self::Next => f.write_str("next"),
            Self::Page(n) => write!(f, "{n}"),
        }
    }
}

/// Security code kind for `--entersecuritycode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecurityCodeType {
    Pin,
    Pin2,
    Puk,
    Puk2,
    Sec,
}

impl SecurityCodeType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pin => "PIN",
            Self::Pin2 => "PIN2",
            Self::Puk => "PUK",
            Self::Puk2 => "PUK2",
            Self::Sec => "SEC",
        }
    }
}

impl FromStr for SecurityCodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PIN" => Ok(Self::Pin),
            "PIN2" => Ok(Self::Pin2),
            "PUK" => Ok(Self::Puk),
            "PUK2" => Ok(Self::Puk2),
            "SEC" => Ok(Self::Sec),
            _ => Err(format!("unknown security code type: {s}")),
        }
    }
}

/// MMS output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MmsFormat {
    /// Human readable.
    #[default]
    Human,
    /// MIME encoded.
    Mime,
    /// Binary, as received by the phone.
    Pdu,
    /// As read from the phone.
    Raw,
}

impl MmsFormat {
    /// Flag that writes this format to the file named after it. The
    /// human-readable format is printed instead and has none.
    #[must_use]
    pub fn flag(self) -> Option<&'static str> {
        match self {
            Self::Human => None,
            Self::Mime => Some("--mime"),
            Self::Pdu => Some("--pdu"),
            Self::Raw => Some("--raw"),
        }
    }
}

/// Options for `--getsms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSmsOptions {
    /// Save messages to this mbox file.
    pub file: Option<PathBuf>,
    /// Append to `file` instead of replacing it.
    pub append: bool,
    /// Delete each message from the phone after reading it.
    pub delete: bool,
}

impl Default for GetSmsOptions {
    fn default() -> Self {
        Self {
            file: None,
            append: true,
            delete: false,
        }
    }
}

/// Options for `--sendsms`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendSmsOptions {
    /// Message center number.
    pub smsc: Option<String>,
    /// Message center index in phone memory; ignored when `smsc` is set.
    pub smscno: Option<u32>,
    /// Request a delivery report.
    pub report: bool,
    /// Use 8-bit encoding.
    pub eight_bit: bool,
    /// Message class, 0..=3.
    pub class: Option<u8>,
    /// Validity in minutes.
    pub validity: Option<u32>,
    /// Send iMelody within the SMS.
    pub imelody: bool,
    /// Animation to send.
    pub animation: Option<String>,
    /// `this:total:serial` concatenation part.
    pub concat: Option<String>,
    /// WAP push URL.
    pub wappush: Option<String>,
}

/// Options for `--savesms`.
///
/// `sender`, `smsc` and `smscno` only make sense for deliver-type messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveSmsOptions {
    pub sender: Option<String>,
    pub smsc: Option<String>,
    /// Ignored when `smsc` is set.
    pub smscno: Option<u32>,
    pub folder: Option<MemoryType>,
    pub location: Option<u32>,
    /// Mark as sent (submit) or read (deliver) instead of new.
    pub read: bool,
    /// Save as SMS_Deliver rather than SMS_Submit.
    pub deliver: bool,
    /// Delivery timestamp.
    pub datetime: Option<NaiveDateTime>,
}
