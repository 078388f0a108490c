//! Command helper methods for Test.

use super::{Test, PASSPHRASE};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a confseal command running in the test directory.
    ///
    /// The inherited environment is scrubbed of variables that change
    /// behavior: `PASSPHRASE`, `CONFSEAL_LOG`, `VISUAL`, and `EDITOR`.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("confseal").expect("failed to find confseal binary");
        cmd.env_remove("PASSPHRASE");
        cmd.env_remove("CONFSEAL_LOG");
        cmd.env_remove("VISUAL");
        cmd.env_remove("EDITOR");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// A command with the test passphrase set through the environment.
    pub fn cmd_with_passphrase(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("PASSPHRASE", PASSPHRASE);
        cmd
    }

    /// Shortcut for `confseal encrypt -i <input> -o <output> -k <key>...`.
    pub fn encrypt(&self, input: &str, output: &str, keys: &[&str]) -> Output {
        self.transform("encrypt", input, output, keys, PASSPHRASE)
    }

    /// Shortcut for `confseal decrypt -i <input> -o <output> -k <key>...`.
    pub fn decrypt(&self, input: &str, output: &str, keys: &[&str]) -> Output {
        self.transform("decrypt", input, output, keys, PASSPHRASE)
    }

    /// Decrypt with a specific passphrase.
    pub fn decrypt_with(&self, input: &str, output: &str, keys: &[&str], passphrase: &str) -> Output {
        self.transform("decrypt", input, output, keys, passphrase)
    }

    fn transform(
        &self,
        command: &str,
        input: &str,
        output: &str,
        keys: &[&str],
        passphrase: &str,
    ) -> Output {
        let mut cmd = self.cmd();
        cmd.args([command, "-i", input, "-o", output]);
        for key in keys {
            cmd.args(["-k", key]);
        }
        cmd.args(["--unsafe-passphrase", passphrase])
            .output()
            .unwrap_or_else(|_| panic!("failed to run confseal {}", command))
    }
}
