use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn dz_help_works() {
    Command::cargo_bin("dz")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("DoneZo board"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add", "move", "edit", "rm", "ls", "status", "log", "login", "logout",
    ];

    for cmd in subcommands {
        Command::cargo_bin("dz")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("dz")
        .expect("binary")
        .arg("--version")
        .assert()
        .success();
}
