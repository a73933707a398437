//! Command lines produced for phone operations.

use std::path::Path;

use gnokii_supervisor::phone::commands;
use gnokii_supervisor::phone::{
    GetSmsOptions, Locations, MemoryType, NetmonitorMode, SaveSmsOptions, SendSmsOptions,
    ShellError,
};

#[test]
fn getsms_line() {
    let spec = commands::get_sms(
        &MemoryType::Sim,
        Locations::between(1, 3),
        &GetSmsOptions::default(),
    );
    assert_eq!(spec.render().unwrap(), "--getsms SM 1 3\n");
}

#[test]
fn deletesms_to_end() {
    let spec = commands::delete_sms(&MemoryType::Folder(2), Locations::to_end(5));
    assert_eq!(spec.line(), "--deletesms F2 5 end");
}

#[test]
fn sendsms_wire_form_carries_payload_block() {
    let options = SendSmsOptions {
        report: true,
        ..Default::default()
    };
    let spec = commands::send_sms("+34600111222", "Line one\nLine two", &options).unwrap();
    assert_eq!(
        spec.render().unwrap(),
        "--sendsms +34600111222 --report\nLine one\nLine two\n\u{3}\n"
    );
}

#[test]
fn sendsms_rejects_end_of_text_in_message() {
    let spec = commands::send_sms("1", "bad\u{3}text", &SendSmsOptions::default()).unwrap();
    assert!(spec.render().is_err());
}

#[test]
fn sendsms_class_bounds() {
    for class in 0..=3 {
        let options = SendSmsOptions {
            class: Some(class),
            ..Default::default()
        };
        assert!(commands::send_sms("1", "x", &options).is_ok());
    }
    let options = SendSmsOptions {
        class: Some(7),
        ..Default::default()
    };
    assert!(matches!(
        commands::send_sms("1", "x", &options),
        Err(ShellError::InvalidArgument { command: "--sendsms", .. })
    ));
}

#[test]
fn savesms_smsc_needs_deliver() {
    let options = SaveSmsOptions {
        smscno: Some(1),
        ..Default::default()
    };
    assert!(commands::save_sms("x", &options).is_err());

    let options = SaveSmsOptions {
        smscno: Some(1),
        deliver: true,
        ..Default::default()
    };
    let spec = commands::save_sms("x", &options).unwrap();
    assert_eq!(spec.line(), "--savesms --smscno 1 --deliver");
}

#[test]
fn netmonitor_modes() {
    let spec = commands::netmonitor(Some(NetmonitorMode::Next)).unwrap();
    assert_eq!(spec.line(), "--netmonitor next");
    assert!(commands::netmonitor(Some(NetmonitorMode::Page(250))).is_err());
}

#[test]
fn calendar_write_uses_file_then_range() {
    let spec = commands::write_calendar_note(Path::new("/tmp/my notes.vcs"), Locations::single(2));
    assert_eq!(spec.line(), "--writecalendarnote \"/tmp/my notes.vcs\" 2");
}

#[test]
fn raw_getsmsc_and_setsmsc() {
    let spec = commands::get_smsc(Some(1), None, true).unwrap();
    assert_eq!(spec.line(), "--getsmsc 1 --raw");

    let spec = commands::set_smsc("1 0 0 0 +34607003110");
    assert_eq!(spec.command(), "--setsmsc");
    assert_eq!(spec.payload_text(), Some("1 0 0 0 +34607003110"));
}

#[test]
fn unimplemented_commands() {
    assert!(matches!(
        commands::divert(),
        Err(ShellError::NotImplemented { .. })
    ));
    assert!(matches!(
        commands::set_profile(),
        Err(ShellError::NotImplemented { .. })
    ));
}
