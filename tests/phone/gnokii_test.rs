//! Facade operations against the scripted shell.

use gnokii_supervisor::batch::{run_batch, OutputFormat};
use gnokii_supervisor::phone::{
    Gnokii, Locations, MemoryType, MmsFormat, SendSmsOptions, ShellError,
};

use crate::shell::fake_gnokii_config;

async fn started() -> Gnokii {
    let mut phone = Gnokii::new(fake_gnokii_config());
    assert!(phone.start().await.unwrap());
    phone
}

#[tokio::test]
async fn version_and_identify() {
    let mut phone = started().await;

    assert_eq!(phone.version().await.unwrap(), "GNOKII Version 0.6.31");
    let identity = phone.identify().await.unwrap();
    assert!(identity.starts_with("IMEI"));
    assert!(identity.contains("RH-12"));

    phone.stop().await;
}

#[tokio::test]
async fn domain_methods_send_their_flags() {
    let mut phone = started().await;

    assert_eq!(
        phone.get_speed_dial(2).await.unwrap(),
        "got: --getspeeddial 2"
    );
    assert_eq!(
        phone
            .get_sms(&MemoryType::Inbox, Locations::to_end(1), &Default::default())
            .await
            .unwrap(),
        "got: --getsms IN 1 end"
    );
    assert_eq!(
        phone.create_sms_folder("Work Stuff").await.unwrap(),
        "got: --createsmsfolder \"Work Stuff\""
    );
    assert_eq!(
        phone.command("--getphonebook", ["SM", "1"]).await.unwrap(),
        "got: --getphonebook SM 1"
    );

    phone.stop().await;
}

#[tokio::test]
async fn send_sms_payload() {
    let mut phone = started().await;

    let text = phone
        .send_sms("600111222", "Hola", &SendSmsOptions::default())
        .await
        .unwrap();
    assert_eq!(text, "Sending to 600111222: Hola\nSend succeeded!");

    phone.stop().await;
}

#[tokio::test]
async fn invalid_arguments_send_nothing() {
    let mut phone = started().await;

    let options = SendSmsOptions {
        concat: Some("one:two".to_string()),
        ..Default::default()
    };
    let err = phone.send_sms("1", "x", &options).await.unwrap_err();
    assert!(matches!(err, ShellError::InvalidArgument { .. }));
    assert_eq!(phone.supervisor().stats().unwrap().requests, 0);

    phone.stop().await;
}

#[tokio::test]
async fn get_mms_returns_file_contents() {
    let mut phone = started().await;

    let bytes = phone
        .get_mms(&MemoryType::Inbox, Locations::single(1), MmsFormat::Pdu, None)
        .await
        .unwrap();
    assert_eq!(bytes, b"MMS-PDU");

    phone.stop().await;
}

#[tokio::test]
async fn get_mms_replaces_existing_caller_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inbox.mms");
    std::fs::write(&path, b"stale").unwrap();
    let mut phone = started().await;

    let bytes = phone
        .get_mms(
            &MemoryType::Inbox,
            Locations::single(1),
            MmsFormat::Raw,
            Some(&path),
        )
        .await
        .unwrap();
    assert_eq!(bytes, b"MMS-PDU");
    assert_eq!(std::fs::read(&path).unwrap(), b"MMS-PDU");

    phone.stop().await;
}

#[tokio::test]
async fn get_mms_human_returns_response_text() {
    let mut phone = started().await;

    let bytes = phone
        .get_mms(&MemoryType::Inbox, Locations::single(3), MmsFormat::Human, None)
        .await
        .unwrap();
    assert_eq!(bytes, b"MMS at IN 3: Hello");
    assert_eq!(phone.supervisor().stats().unwrap().requests, 1);

    phone.stop().await;
}

#[tokio::test]
async fn not_running_after_stop() {
    let mut phone = started().await;
    assert!(phone.stop().await);

    let err = phone.version().await.unwrap_err();
    assert!(err.is_not_running());
}

#[tokio::test]
async fn batch_runs_each_line() {
    let mut phone = started().await;
    let input: &[u8] = b"# session\nversion\n\ngetsms SM 1\n";
    let mut output = Vec::new();

    let summary = run_batch(&mut phone, input, &mut output, OutputFormat::Text)
        .await
        .unwrap();

    assert_eq!(summary.commands, 2);
    assert_eq!(summary.incomplete, 0);
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "GNOKII Version 0.6.31\ngot: --getsms SM 1\n"
    );

    phone.stop().await;
}

#[tokio::test]
async fn batch_json_lines() {
    let mut phone = started().await;
    let input: &[u8] = b"--version\n";
    let mut output = Vec::new();

    run_batch(&mut phone, input, &mut output, OutputFormat::JsonLines)
        .await
        .unwrap();

    let record: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(record["command"], "--version");
    assert_eq!(record["outcome"], "matched");
    assert_eq!(record["text"], "GNOKII Version 0.6.31");

    phone.stop().await;
}
