//! Launch, exchange and teardown with real child processes.

use std::time::Duration;

use gnokii_supervisor::command::CommandSpec;
use gnokii_supervisor::config::{OutputMode, ShellConfig};
use gnokii_supervisor::shell::{ShellSupervisor, SpawnError};
use gnokii_supervisor::transport::{FrameOutcome, TransportError};

use super::fake_gnokii_config;

#[tokio::test]
async fn start_twice_keeps_first_process() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());

    assert!(shell.start().await.unwrap());
    let pid = shell.id();
    assert!(pid.is_some());

    assert!(!shell.start().await.unwrap());
    assert_eq!(shell.id(), pid);

    assert!(shell.stop().await);
}

#[tokio::test]
async fn send_round_trip() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    shell.start().await.unwrap();

    let response = shell.send(&CommandSpec::new("--version")).await.unwrap();
    assert_eq!(response.text, "GNOKII Version 0.6.31");
    assert_eq!(response.outcome, FrameOutcome::Matched);

    let response = shell.send(&CommandSpec::new("--identify")).await.unwrap();
    assert_eq!(
        response.text,
        "IMEI         : 350000000000000\nModel        : RH-12"
    );

    let stats = shell.stats().unwrap();
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.matched, 2);

    shell.stop().await;
}

#[tokio::test]
async fn quoted_arguments_reach_the_shell_as_one_line() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    shell.start().await.unwrap();

    let command = CommandSpec::new("--createsmsfolder").arg("Work Stuff");
    let response = shell.send(&command).await.unwrap();
    assert_eq!(response.text, "got: --createsmsfolder \"Work Stuff\"");

    shell.stop().await;
}

#[tokio::test]
async fn payload_block_is_delivered() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    shell.start().await.unwrap();

    let command = CommandSpec::new("--sendsms")
        .arg("600111222")
        .payload("Hola");
    let response = shell.send(&command).await.unwrap();
    assert_eq!(response.text, "Sending to 600111222: Hola\nSend succeeded!");

    shell.stop().await;
}

#[tokio::test]
async fn stderr_is_merged_into_responses() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    shell.start().await.unwrap();

    let response = shell.send(&CommandSpec::new("--stderr")).await.unwrap();
    assert_eq!(response.text, "Error: no phone");
    assert!(response.is_complete());

    shell.stop().await;
}

#[tokio::test]
async fn separate_stderr_is_not_captured() {
    let config = ShellConfig {
        output: OutputMode::Separate,
        ..fake_gnokii_config()
    };
    let mut shell = ShellSupervisor::new(config);
    shell.start().await.unwrap();

    let response = shell.send(&CommandSpec::new("--stderr")).await.unwrap();
    assert_eq!(response.text, "");
    assert!(response.is_complete());

    shell.stop().await;
}

#[tokio::test]
async fn silent_command_times_out_but_shell_survives() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    shell.start().await.unwrap();

    let response = shell.send(&CommandSpec::new("--silent")).await.unwrap();
    assert!(response.is_timeout());
    assert!(response.text.is_empty());
    assert!(shell.is_alive());

    let response = shell.send(&CommandSpec::new("--version")).await.unwrap();
    assert_eq!(response.text, "GNOKII Version 0.6.31");

    shell.stop().await;
}

#[tokio::test]
async fn exit_mid_response_returns_partial_text() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    shell.start().await.unwrap();

    let response = shell.send(&CommandSpec::new("--crash")).await.unwrap();
    assert_eq!(response.text, "partial");
    assert_eq!(response.outcome, FrameOutcome::ProcessExited);
    assert!(!shell.is_alive());

    let err = shell.send(&CommandSpec::new("--version")).await.unwrap_err();
    assert!(matches!(err, TransportError::NotRunning));
}

#[tokio::test]
async fn restart_after_crash() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    shell.start().await.unwrap();
    shell.send(&CommandSpec::new("--crash")).await.unwrap();
    assert!(!shell.is_alive());

    assert!(shell.restart().await.unwrap());
    let response = shell.send(&CommandSpec::new("--version")).await.unwrap();
    assert!(response.is_complete());

    shell.stop().await;
}

#[tokio::test]
async fn stop_is_idempotent() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    assert!(!shell.stop().await);

    shell.start().await.unwrap();
    assert!(shell.stop().await);
    assert!(!shell.is_alive());
    assert!(!shell.stop().await);
}

#[tokio::test]
async fn stop_kills_a_shell_that_ignores_eof_and_term() {
    let config = ShellConfig {
        binary: "sh".to_string(),
        shell_args: vec![
            "-c".to_string(),
            "trap '' TERM; printf 'gnokii> '; while :; do sleep 1; done".to_string(),
        ],
        stop_timeout_ms: 200,
        poll_interval_ms: 20,
        read_timeout_ms: 400,
        ..ShellConfig::default()
    };
    let mut shell = ShellSupervisor::new(config);
    shell.start().await.unwrap();

    let stopped = tokio::time::timeout(Duration::from_secs(5), shell.stop())
        .await
        .unwrap();
    assert!(stopped);
    assert!(!shell.is_alive());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn drop_kills_running_shell() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    shell.start().await.unwrap();
    let pid = shell.id().unwrap();
    drop(shell);

    tokio::time::sleep(Duration::from_millis(200)).await;
    // Gone, or a zombie waiting to be reaped.
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).unwrap_or_default();
    assert!(stat.is_empty() || stat.contains(") Z"), "still running: {stat}");
}

#[tokio::test]
async fn missing_binary_is_reported() {
    let config = ShellConfig {
        binary: "gnokii-definitely-not-installed".to_string(),
        ..ShellConfig::default()
    };
    let mut shell = ShellSupervisor::new(config);

    let err = shell.start().await.unwrap_err();
    assert!(matches!(err, SpawnError::NotFound { .. }));
    assert!(!shell.is_alive());
}

#[tokio::test]
async fn send_before_start_is_not_running() {
    let mut shell = ShellSupervisor::new(fake_gnokii_config());
    let err = shell.send(&CommandSpec::new("--version")).await.unwrap_err();
    assert!(matches!(err, TransportError::NotRunning));
}
