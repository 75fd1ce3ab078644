//! Test fixtures and constants.

/// A syntactically valid OpenSSH public key.
pub const PUBLIC_KEY: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIHq0dUqnZxVd9Yg6r4ZnV5d1Xq5cXzC3Jm0Qk3mW6Tq7 repl-test";

/// Build a topology.toml with the given toggles.
///
/// `None` leaves the toggle out entirely.
pub fn config_toml(stack: &str, clusters: Option<bool>, compute: Option<bool>) -> String {
    let mut toml = format!(
        "[project]\nname = \"iup-replication-experiment\"\nstack = \"{}\"\n",
        stack
    );
    if let Some(enabled) = clusters {
        toml.push_str(&format!("\n[clusters]\nenabled = {}\n", enabled));
    }
    toml.push_str("\n[compute]\n");
    if let Some(enabled) = compute {
        toml.push_str(&format!("enabled = {}\n", enabled));
    }
    toml.push_str(&format!("public_key = \"{}\"\n", PUBLIC_KEY));
    toml
}

/// Both feature groups enabled on the `dev` stack.
pub fn full_config() -> String {
    config_toml("dev", Some(true), Some(true))
}
