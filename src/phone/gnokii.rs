//! Domain facade: one method per phone operation over a supervised shell.

use std::path::{Path, PathBuf};

use super::commands;
use super::types::{
    GetSmsOptions, HelpSection, Locations, MemoryType, MmsFormat, NetmonitorMode, ResetMode,
    SaveSmsOptions, SecurityCodeType, SendSmsOptions,
};
use super::ShellError;
use crate::command::CommandSpec;
use crate::config::ShellConfig;
use crate::shell::ShellSupervisor;
use crate::transport::Response;

/// A phone reached through `gnokii --shell`.
///
/// Operations return the shell's response text. A response cut short by a
/// timeout or by the shell exiting is still returned; check
/// [`is_alive`](Self::is_alive) when the text looks incomplete.
#[derive(Debug)]
pub struct Gnokii {
    supervisor: ShellSupervisor,
}

impl Gnokii {
    /// Create a facade; the shell is not launched until [`start`](Self::start).
    #[must_use]
    pub fn new(config: ShellConfig) -> Self {
        Self {
            supervisor: ShellSupervisor::new(config),
        }
    }

    /// The underlying process supervisor.
    #[must_use]
    pub fn supervisor(&self) -> &ShellSupervisor {
        &self.supervisor
    }

    /// Mutable access to the process supervisor.
    pub fn supervisor_mut(&mut self) -> &mut ShellSupervisor {
        &mut self.supervisor
    }

    /// True iff the shell process is running.
    pub fn is_alive(&mut self) -> bool {
        self.supervisor.is_alive()
    }

    /// Launch the shell. Returns `false` if it was already running.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Launch` if the binary cannot be started.
    pub async fn start(&mut self) -> Result<bool, ShellError> {
        Ok(self.supervisor.start().await?)
    }

    /// Stop the shell. Returns `false` if it was not running.
    pub async fn stop(&mut self) -> bool {
        self.supervisor.stop().await
    }

    /// Stop, then start again.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Launch` if the relaunch fails.
    pub async fn restart(&mut self) -> Result<bool, ShellError> {
        Ok(self.supervisor.restart().await?)
    }

    /// Send a prepared command and return the full response.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Transport` when nothing can be exchanged.
    pub async fn send(&mut self, command: &CommandSpec) -> Result<Response, ShellError> {
        Ok(self.supervisor.send(command).await?)
    }

    /// Send an arbitrary command, e.g. `command("--getphonebook", ["SM", "1"])`.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Transport` when nothing can be exchanged.
    pub async fn command<I, S>(&mut self, name: &str, args: I) -> Result<String, ShellError>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let spec = args
            .into_iter()
            .fold(CommandSpec::new(name), |spec, arg| spec.arg(arg));
        self.text(spec).await
    }

    async fn text(&mut self, command: CommandSpec) -> Result<String, ShellError> {
        Ok(self.send(&command).await?.into_text())
    }
}

// Every operation below fails with `ShellError::Transport` when no shell is
// running, and with `InvalidArgument` or `NotImplemented` before sending.
#[allow(clippy::missing_errors_doc)]
impl Gnokii {
    /// Usage text, optionally for one section.
    pub async fn help(&mut self, section: Option<HelpSection>) -> Result<String, ShellError> {
        self.text(commands::help(section)).await
    }

    /// Version of the gnokii tool.
    pub async fn version(&mut self) -> Result<String, ShellError> {
        self.text(commands::version()).await
    }

    /// One-shot status report.
    pub async fn monitor(&mut self) -> Result<String, ShellError> {
        self.text(commands::monitor()).await
    }

    /// Number and memory stored under speed-dial `location`.
    pub async fn get_speed_dial(&mut self, location: u32) -> Result<String, ShellError> {
        self.text(commands::get_speed_dial(location)).await
    }

    /// Bind speed-dial `number` to an entry in `memory` at `location`.
    pub async fn set_speed_dial(
        &mut self,
        number: u32,
        memory: &MemoryType,
        location: u32,
    ) -> Result<String, ShellError> {
        self.text(commands::set_speed_dial(number, memory, location)).await
    }

    /// Start a voice call to `number`.
    pub async fn dial_voice(&mut self, number: &str) -> Result<String, ShellError> {
        self.text(commands::dial_voice(number)).await
    }

    /// Send DTMF tones during an active call.
    pub async fn send_dtmf(&mut self, sequence: &str) -> Result<String, ShellError> {
        self.text(commands::send_dtmf(sequence)).await
    }

    /// Answer the incoming call `call_id`.
    pub async fn answer_call(&mut self, call_id: u32) -> Result<String, ShellError> {
        self.text(commands::answer_call(call_id)).await
    }

    /// Hang up the call `call_id`.
    pub async fn hangup(&mut self, call_id: u32) -> Result<String, ShellError> {
        self.text(commands::hangup(call_id)).await
    }

    /// Always fails with `NotImplemented`.
    pub async fn divert(&mut self) -> Result<String, ShellError> {
        self.text(commands::divert()?).await
    }

    /// Indicators shown on the phone display.
    pub async fn get_display_status(&mut self) -> Result<String, ShellError> {
        self.text(commands::get_display_status()).await
    }

    /// Mirror text written to the phone display.
    pub async fn display_output(&mut self) -> Result<String, ShellError> {
        self.text(commands::display_output()).await
    }

    /// Settings of one profile, or all of them.
    pub async fn get_profile(&mut self, number: Option<u32>) -> Result<String, ShellError> {
        self.text(commands::get_profile(number)).await
    }

    /// Always fails with `NotImplemented`.
    pub async fn set_profile(&mut self) -> Result<String, ShellError> {
        self.text(commands::set_profile()?).await
    }

    /// The active profile.
    pub async fn get_active_profile(&mut self) -> Result<String, ShellError> {
        self.text(commands::get_active_profile()).await
    }

    /// Make profile `number` active.
    pub async fn set_active_profile(&mut self, number: u32) -> Result<String, ShellError> {
        self.text(commands::set_active_profile(number)).await
    }

    /// Query or set netmonitor mode.
    pub async fn netmonitor(&mut self, mode: Option<NetmonitorMode>) -> Result<String, ShellError> {
        self.text(commands::netmonitor(mode)?).await
    }

    /// Soft or hard reset of the phone.
    pub async fn reset(&mut self, mode: ResetMode) -> Result<String, ShellError> {
        self.text(commands::reset(mode)).await
    }

    /// ToDo notes in a location range, optionally as vCalendar.
    pub async fn get_todo(
        &mut self,
        locations: Locations,
        vcal: bool,
    ) -> Result<String, ShellError> {
        self.text(commands::get_todo(locations, vcal)).await
    }

    /// Write ToDo notes from a vCalendar file.
    pub async fn write_todo(
        &mut self,
        vcal_file: &Path,
        locations: Locations,
    ) -> Result<String, ShellError> {
        self.text(commands::write_todo(vcal_file, locations)).await
    }

    /// Delete every ToDo note.
    pub async fn delete_all_todos(&mut self) -> Result<String, ShellError> {
        self.text(commands::delete_all_todos()).await
    }

    /// Calendar notes in a location range, optionally as vCalendar.
    pub async fn get_calendar_note(
        &mut self,
        locations: Locations,
        vcal: bool,
    ) -> Result<String, ShellError> {
        self.text(commands::get_calendar_note(locations, vcal)).await
    }

    /// Write calendar notes from a vCalendar file.
    pub async fn write_calendar_note(
        &mut self,
        vcal_file: &Path,
        locations: Locations,
    ) -> Result<String, ShellError> {
        self.text(commands::write_calendar_note(vcal_file, locations)).await
    }

    /// Delete calendar notes in a location range.
    pub async fn delete_calendar_note(
        &mut self,
        locations: Locations,
    ) -> Result<String, ShellError> {
        self.text(commands::delete_calendar_note(locations)).await
    }

    /// Read SMS messages from `memory`, optionally saving or deleting them.
    pub async fn get_sms(
        &mut self,
        memory: &MemoryType,
        locations: Locations,
        options: &GetSmsOptions,
    ) -> Result<String, ShellError> {
        self.text(commands::get_sms(memory, locations, options)).await
    }

    /// Delete SMS messages from `memory`.
    pub async fn delete_sms(
        &mut self,
        memory: &MemoryType,
        locations: Locations,
    ) -> Result<String, ShellError> {
        self.text(commands::delete_sms(memory, locations)).await
    }

    /// Send `message` to `destination`.
    pub async fn send_sms(
        &mut self,
        destination: &str,
        message: &str,
        options: &SendSmsOptions,
    ) -> Result<String, ShellError> {
        self.text(commands::send_sms(destination, message, options)?).await
    }

    /// Save `message` to the phone.
    pub async fn save_sms(
        &mut self,
        message: &str,
        options: &SaveSmsOptions,
    ) -> Result<String, ShellError> {
        self.text(commands::save_sms(message, options)?).await
    }

    /// SMSC parameters for a location range, or all of them.
    pub async fn get_smsc(
        &mut self,
        start: Option<u32>,
        end: Option<u32>,
        raw: bool,
    ) -> Result<String, ShellError> {
        self.text(commands::get_smsc(start, end, raw)?).await
    }

    /// Set SMSC parameters from the `--raw` output format of `--getsmsc`.
    pub async fn set_smsc(&mut self, settings: &str) -> Result<String, ShellError> {
        self.text(commands::set_smsc(settings)).await
    }

    /// Create an SMS folder called `name`.
    pub async fn create_sms_folder(&mut self, name: &str) -> Result<String, ShellError> {
        self.text(commands::create_sms_folder(name)).await
    }

    /// Delete SMS folder `number`.
    pub async fn delete_sms_folder(&mut self, number: u32) -> Result<String, ShellError> {
        self.text(commands::delete_sms_folder(number)).await
    }

    /// SMS folders and their message counts.
    pub async fn sms_folder_status(&mut self) -> Result<String, ShellError> {
        self.text(commands::sms_folder_status()).await
    }

    /// Print incoming messages as they arrive.
    pub async fn sms_reader(&mut self) -> Result<String, ShellError> {
        self.text(commands::sms_reader()).await
    }

    /// Fetch MMS messages and return their contents.
    ///
    /// File formats go to `file` when given (replacing it), otherwise to a
    /// temporary file removed afterwards, and the file's bytes are returned.
    /// The human-readable format takes no file and returns the response text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a file with the human-readable format,
    /// and `ShellError::Io` if the output file cannot be created or read.
    pub async fn get_mms(
        &mut self,
        memory: &MemoryType,
        locations: Locations,
        format: MmsFormat,
        file: Option<&Path>,
    ) -> Result<Vec<u8>, ShellError> {
        if format.flag().is_none() {
            let command = commands::get_mms(memory, locations, format, file)?;
            return Ok(self.text(command).await?.into_bytes());
        }

        // Keeps the temporary file alive until its contents are read back.
        let mut scratch = None;
        let path: PathBuf = match file {
            Some(path) => path.to_path_buf(),
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("gnokii-mms-")
                    .suffix(".mms")
                    .tempfile()?;
                let path = temp.path().to_path_buf();
                scratch = Some(temp);
                path
            }
        };

        let command = commands::get_mms(memory, locations, format, Some(&path))?;
        let response = self.send(&command).await?;
        tracing::debug!(
            path = %path.display(),
            outcome = ?response.outcome,
            text = %response.text,
            "MMS fetched"
        );

        let bytes = tokio::fs::read(&path).await?;
        drop(scratch);
        Ok(bytes)
    }

    /// IMEI, manufacturer, model, product name and revision.
    pub async fn identify(&mut self) -> Result<String, ShellError> {
        self.text(commands::identify()).await
    }

    /// Enter a PIN, PUK or security code.
    pub async fn enter_security_code(
        &mut self,
        kind: SecurityCodeType,
        code: &str,
    ) -> Result<String, ShellError> {
        self.text(commands::enter_security_code(kind, code)).await
    }

    /// The phone security code.
    pub async fn get_security_code(&mut self) -> Result<String, ShellError> {
        self.text(commands::get_security_code()).await
    }

    /// Which security code the phone is waiting for.
    pub async fn get_security_code_status(&mut self) -> Result<String, ShellError> {
        self.text(commands::get_security_code_status()).await
    }

    /// SIM lock state.
    pub async fn get_locks_info(&mut self) -> Result<String, ShellError> {
        self.text(commands::get_locks_info()).await
    }
}
