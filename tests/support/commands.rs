//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a repl-topology command running in the project directory.
    ///
    /// Colors and inherited log filters are disabled for stable output.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd =
            Command::cargo_bin("repl-topology").expect("failed to find repl-topology binary");
        cmd.current_dir(self.dir.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("REPL_TOPOLOGY_LOG");
        cmd.env_remove("REPL_TOPOLOGY_STACK");
        cmd
    }

    /// Shortcut for `repl-topology init`.
    pub fn init_cmd(&self) -> Output {
        self.cmd()
            .arg("init")
            .output()
            .expect("failed to run repl-topology init")
    }

    /// Shortcut for `repl-topology check`.
    pub fn check(&self) -> Output {
        self.cmd()
            .arg("check")
            .output()
            .expect("failed to run repl-topology check")
    }

    /// Shortcut for `repl-topology plan`.
    pub fn plan(&self) -> Output {
        self.cmd()
            .arg("plan")
            .output()
            .expect("failed to run repl-topology plan")
    }

    /// Shortcut for `repl-topology plan --json`, parsed.
    pub fn plan_json(&self) -> serde_json::Value {
        let output = self
            .cmd()
            .args(["plan", "--json"])
            .output()
            .expect("failed to run repl-topology plan --json");
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("plan output is not json")
    }

    /// Shortcut for `repl-topology outputs --json`, parsed.
    pub fn outputs_json(&self, show_secrets: bool) -> serde_json::Value {
        let mut cmd = self.cmd();
        cmd.args(["outputs", "--json"]);
        if show_secrets {
            cmd.arg("--show-secrets");
        }
        let output = cmd.output().expect("failed to run repl-topology outputs");
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("outputs are not json")
    }

    /// Shortcut for `repl-topology teardown --json`, parsed.
    pub fn teardown_json(&self) -> Vec<String> {
        let output = self
            .cmd()
            .args(["teardown", "--json"])
            .output()
            .expect("failed to run repl-topology teardown");
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("teardown output is not json")
    }
}
