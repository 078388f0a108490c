//! Tests for `confseal encrypt-file` and `confseal decrypt-file`.

use crate::support::*;

const CERT: &str = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

#[test]
fn test_file_roundtrip() {
    let t = Test::with_file("cert.pem", CERT);

    let output = t
        .cmd_with_passphrase()
        .args(["encrypt-file", "-i", "cert.pem", "-o", "cert.pem.enc"])
        .output()
        .unwrap();
    assert_success(&output);

    let sealed = t.read("cert.pem.enc");
    assert!(sealed.ends_with('\n'));
    assert_envelope(sealed.trim_end());

    let output = t
        .cmd_with_passphrase()
        .args(["decrypt-file", "-i", "cert.pem.enc", "-o", "-"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), CERT);
}

#[test]
fn test_decrypt_file_wrong_passphrase() {
    let t = Test::with_file("notes.txt", "hello");
    let output = t
        .cmd_with_passphrase()
        .args(["encrypt-file", "-i", "notes.txt", "-o", "notes.enc"])
        .output()
        .unwrap();
    assert_success(&output);

    let output = t
        .cmd()
        .args(["decrypt-file", "-i", "notes.enc", "-o", "notes.out"])
        .args(["--unsafe-passphrase", "other"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
    assert!(!t.exists("notes.out"));
}

#[test]
fn test_encrypt_file_needs_no_keys() {
    let t = Test::with_file("blob.bin.txt", "anything");
    let output = t
        .cmd_with_passphrase()
        .args(["encrypt-file", "-i", "blob.bin.txt", "-o", "/dev/stdout"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_envelope(stdout(&output).trim_end());
}
