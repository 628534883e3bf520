//! Machine and user identity queries.
//!
//! Kept behind a trait so tests can substitute fixed values instead of
//! depending on the real host.

pub trait Environment {
    /// Display name of the current machine/user identity, in the
    /// `DOMAIN\user` form the domain check expects.
    fn identity_name(&self) -> String;

    /// Local machine network name, substituted for `localhost`.
    fn machine_name(&self) -> String;
}

/// Reads the identity from the process environment and the machine name from
/// the OS.
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn identity_name(&self) -> String {
        let user = std::env::var("USERNAME")
            .or_else(|_| std::env::var("USER"))
            .unwrap_or_default();
        match std::env::var("USERDOMAIN") {
            Ok(domain) => format!("{domain}\\{user}"),
            Err(_) => format!("{}\\{user}", self.machine_name()),
        }
    }

    fn machine_name(&self) -> String {
        hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown-host".to_string())
    }
}
