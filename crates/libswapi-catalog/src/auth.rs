// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login stub gating access to the catalog. Not a security boundary.

const DEFAULT_USERNAME: &str = "jedi";
const DEFAULT_PASSWORD: &str = "force123";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginGate {
    expected: Credentials,
}

impl LoginGate {
    pub fn new(expected: Credentials) -> Self {
        Self { expected }
    }

    /// Returns `true` when both fields match exactly.
    pub fn accepts(&self, username: &str, password: &str) -> bool {
        let accepted = username == self.expected.username && password == self.expected.password;
        if !accepted {
            log::info!(target: "auth", "rejected login for '{username}'");
        }
        accepted
    }

    pub fn hint(&self) -> String {
        format!("try: {} / {}", self.expected.username, self.expected.password)
    }
}
