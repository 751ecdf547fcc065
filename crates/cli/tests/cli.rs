use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("db-check"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("reindex")
        .assert()
        .failure();
}
