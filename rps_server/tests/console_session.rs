//! Drives the server binary over stdin/stdout with the console transport.

use std::{
    io::Write,
    process::{Command, Stdio},
};

fn run_console(input: &str) -> (bool, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rps_server"))
        .args(["--transport", "console"])
        .env("RPS_TRANSPORT", "console")
        .env("CONSOLE_SENDER_ID", "1")
        .env("DELIVERY_POLICY", "abort")
        .env("TABLE_INBOX_CAPACITY", "8")
        .env("INBOUND_CAPACITY", "256")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start server");

    // Closing stdin ends the session
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    (
        output.status.success(),
        String::from_utf8(output.stdout).unwrap(),
    )
}

fn is_result(line: &str) -> bool {
    let text = line.strip_prefix("[1] ").unwrap_or(line);
    ["Victory: ", "Defeat: ", "Draw: "]
        .iter()
        .any(|prefix| text.starts_with(prefix))
}

#[test]
fn test_console_round_trip() {
    let (success, stdout) = run_console("/join\n/rock\n/exit\n");
    assert!(success);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected output: {stdout}");
    assert_eq!(lines[0], "[1] You are now seated at table 1");

    // The result is printed on its own or folded into the exit reply
    assert!(lines[1..].contains(&"[1] You left table 1"), "{stdout}");
    assert!(lines[1..].iter().any(|line| is_result(line)), "{stdout}");
}

#[test]
fn test_console_named_senders() {
    let (success, stdout) = run_console("5 /join\n6 /join\n\n7 /dance\n5 /exit\n");
    assert!(success);

    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec![
            "[5] You are now seated at table 1",
            "[6] You are now seated at table 2",
            "[7] This command does not exist",
            "[5] You left table 1",
        ]
    );
}
