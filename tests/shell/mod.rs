//! Shell supervision tests against a scripted stand-in for gnokii.

#[cfg(unix)]
mod process_test;

use gnokii_supervisor::config::ShellConfig;

/// A `sh` script that behaves like `gnokii --shell` for a few commands.
///
/// - `--version` prints a version line
/// - `--identify` echoes the command before answering
/// - `--stderr` answers on stderr
/// - `--silent` never answers
/// - `--crash` prints partial output and exits
/// - `--getmms` writes a fixed body to the file after the format flag,
///   refusing to replace it without `--overwrite`, or prints the message
/// - `--sendsms` reads a payload block up to the end-of-text line
/// - anything else is echoed back
pub(crate) const FAKE_GNOKII: &str = r#"
printf 'GNOKII Version 0.6.31\ngnokii> '
while IFS= read -r line; do
  set -- $line
  case "$1" in
    --version) printf 'GNOKII Version 0.6.31\ngnokii> ' ;;
    --identify)
      printf '%s\nIMEI         : 350000000000000\nModel        : RH-12\ngnokii> ' "$line" ;;
    --stderr) printf 'Error: no phone\n' >&2; printf 'gnokii> ' ;;
    --silent) ;;
    --crash) printf 'partial'; exit 3 ;;
    --getmms)
      file=''; overwrite=''; prev=''
      for arg in "$@"; do
        case "$prev" in --mime|--pdu|--raw) file="$arg" ;; esac
        [ "$arg" = --overwrite ] && overwrite=1
        prev="$arg"
      done
      if [ -z "$file" ]; then
        printf 'MMS at %s %s: Hello\ngnokii> ' "$2" "$3"
      elif [ -e "$file" ] && [ -z "$overwrite" ]; then
        printf 'File %s exists\ngnokii> ' "$file"
      else
        printf 'MMS-PDU' > "$file"
        printf 'Saved MMS to %s\ngnokii> ' "$file"
      fi ;;
    --sendsms)
      body=''
      while IFS= read -r part; do
        [ "$part" = "$(printf '\003')" ] && break
        body="$body$part"
      done
      printf 'Sending to %s: %s\nSend succeeded!\ngnokii> ' "$2" "$body" ;;
    *) printf 'got: %s\ngnokii> ' "$line" ;;
  esac
done
"#;

/// Config launching [`FAKE_GNOKII`] through `sh -c` with short timeouts.
pub(crate) fn fake_gnokii_config() -> ShellConfig {
    ShellConfig {
        binary: "sh".to_string(),
        shell_args: vec!["-c".to_string(), FAKE_GNOKII.to_string()],
        read_timeout_ms: 400,
        poll_interval_ms: 20,
        stop_timeout_ms: 1000,
        ..ShellConfig::default()
    }
}
