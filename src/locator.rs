//! Backup location resolution.

use std::path::PathBuf;

use crate::environment::Environment;
use crate::error::Result;
use crate::master_config::{self, MASTER_CONFIG_CANDIDATES};
use crate::settings::SettingsStore;

/// Domain the backup machines are expected to live on. A mismatch is only
/// worth a warning.
pub const EXPECTED_DOMAIN_PREFIX: &str = "TTLIVE";

type InformationHandler = Box<dyn Fn(&str)>;

/// The two directories a backup run writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPaths {
    /// Backup root joined with the owning user.
    pub user_root: PathBuf,
    /// `user_root` joined with the resolved database-server folder.
    pub user_and_server: PathBuf,
}

/// Resolves where backups for one user belong, filling in the database
/// server from a legacy `master.config` when settings leave it blank.
pub struct BackupLocator<S, E> {
    username: String,
    store: S,
    environment: E,
    candidates: Vec<PathBuf>,
    handlers: Vec<InformationHandler>,
}

impl<S: SettingsStore, E: Environment> BackupLocator<S, E> {
    /// `username` identifies the backup-owning user and is fixed for the
    /// lifetime of the locator.
    pub fn new(username: impl Into<String>, store: S, environment: E) -> Self {
        Self {
            username: username.into(),
            store,
            environment,
            candidates: MASTER_CONFIG_CANDIDATES.iter().map(PathBuf::from).collect(),
            handlers: Vec::new(),
        }
    }

    /// Overrides the probed `master.config` locations.
    pub fn with_master_config_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Subscribes to advisory messages. These are warnings only; resolution
    /// always continues past them.
    pub fn on_information(&mut self, handler: impl Fn(&str) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    fn emit(&self, message: &str) {
        tracing::warn!("{message}");
        for handler in &self.handlers {
            handler(message);
        }
    }

    /// Resolves the per-user backup root and the per-user-per-server
    /// directory beneath it.
    ///
    /// May mutate and persist settings when a legacy config is discovered.
    /// When the server name stays blank the second path is still returned
    /// with a blank final segment; subscribers are warned instead.
    pub fn resolve_backup_paths(&self) -> Result<BackupPaths> {
        let identity = self.environment.identity_name();
        if !identity.starts_with(EXPECTED_DOMAIN_PREFIX) {
            self.emit(&format!(
                "This machine is not on the {EXPECTED_DOMAIN_PREFIX} domain. Please ensure \
                 your settings are correct before attempting to backup to a different domain!"
            ));
        }

        let mut settings = self.store.load()?;
        let user_root = settings.backup_location_root.join(&self.username);

        if settings.database_server_unset() {
            match master_config::discover(&self.candidates)? {
                Some(config) => {
                    settings.database_server_name = config.server_name;
                    settings.database_name = config.database_name;
                    self.store.save(&settings)?;
                }
                None => self.emit("Unable to find PMS installation on local machine"),
            }

            if settings.database_server_unset() {
                self.emit("Database Server is not set - database backup will fail!");
            }
        }

        let server_folder = if settings.database_server_name.eq_ignore_ascii_case("localhost") {
            self.environment.machine_name()
        } else {
            settings.database_server_name.clone()
        };

        let user_and_server = user_root.join(&server_folder);
        Ok(BackupPaths {
            user_root,
            user_and_server,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemorySettingsStore, Settings};
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;

    struct FakeEnvironment {
        identity: &'static str,
        machine: &'static str,
    }

    impl Environment for FakeEnvironment {
        fn identity_name(&self) -> String {
            self.identity.to_string()
        }

        fn machine_name(&self) -> String {
            self.machine.to_string()
        }
    }

    fn on_domain() -> FakeEnvironment {
        FakeEnvironment {
            identity: "TTLIVE\\jsmith",
            machine: "WORKSTATION-07",
        }
    }

    fn settings_with_server(server: &str) -> Settings {
        Settings {
            backup_location_root: PathBuf::from("/srv/backups"),
            database_server_name: server.to_string(),
            database_name: "practice".to_string(),
        }
    }

    fn write_master_config(dir: &Path) -> PathBuf {
        let path = dir.join("master.config");
        fs::write(
            &path,
            r#"<appSettings>
  <add key="ServerName" value="sql-legacy" />
  <add key="DatabaseName" value="alb" />
</appSettings>"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn composes_user_and_server_paths() {
        let store = MemorySettingsStore::new(settings_with_server("sql-01"));
        let locator = BackupLocator::new("jsmith", &store, on_domain());

        let paths = locator.resolve_backup_paths().unwrap();

        assert_eq!(paths.user_root, PathBuf::from("/srv/backups/jsmith"));
        assert_eq!(
            paths.user_and_server,
            PathBuf::from("/srv/backups/jsmith/sql-01")
        );
    }

    #[test]
    fn configured_server_skips_discovery() {
        let store = MemorySettingsStore::new(settings_with_server("sql-01"));
        let dir = tempfile::tempdir().unwrap();
        let candidate = write_master_config(dir.path());

        let locator = BackupLocator::new("jsmith", &store, on_domain())
            .with_master_config_candidates(vec![candidate]);
        locator.resolve_backup_paths().unwrap();

        assert_eq!(store.save_count(), 0);
        assert_eq!(store.current().database_server_name, "sql-01");
    }

    #[test]
    fn blank_server_triggers_discovery_and_persists() {
        let store = MemorySettingsStore::new(settings_with_server(""));
        let dir = tempfile::tempdir().unwrap();
        let candidate = write_master_config(dir.path());

        let locator = BackupLocator::new("jsmith", &store, on_domain())
            .with_master_config_candidates(vec![dir.path().join("missing.config"), candidate]);
        let paths = locator.resolve_backup_paths().unwrap();

        assert_eq!(store.save_count(), 1);
        let saved = store.current();
        assert_eq!(saved.database_server_name, "sql-legacy");
        assert_eq!(saved.database_name, "alb");
        assert_eq!(
            paths.user_and_server,
            PathBuf::from("/srv/backups/jsmith/sql-legacy")
        );
    }

    #[test]
    fn localhost_resolves_to_machine_name_any_casing() {
        for spelling in ["localhost", "LOCALHOST", "LocalHost"] {
            let store = MemorySettingsStore::new(settings_with_server(spelling));
            let locator = BackupLocator::new("jsmith", &store, on_domain());

            let paths = locator.resolve_backup_paths().unwrap();

            assert_eq!(
                paths.user_and_server,
                PathBuf::from("/srv/backups/jsmith/WORKSTATION-07")
            );
        }
    }

    #[test]
    fn off_domain_identity_warns_but_resolves() {
        let store = MemorySettingsStore::new(settings_with_server("sql-01"));
        let env = FakeEnvironment {
            identity: "HOMEOFFICE\\jsmith",
            machine: "WORKSTATION-07",
        };
        let mut locator = BackupLocator::new("jsmith", &store, env);
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&messages);
        locator.on_information(move |m| sink.borrow_mut().push(m.to_string()));

        let paths = locator.resolve_backup_paths().unwrap();

        assert_eq!(messages.borrow().len(), 1);
        assert!(messages.borrow()[0].contains("TTLIVE"));
        assert_eq!(paths.user_root, PathBuf::from("/srv/backups/jsmith"));
    }

    #[test]
    fn no_installation_found_warns_twice_and_degrades() {
        let store = MemorySettingsStore::new(settings_with_server(""));
        let dir = tempfile::tempdir().unwrap();

        let mut locator = BackupLocator::new("jsmith", &store, on_domain())
            .with_master_config_candidates(vec![dir.path().join("missing.config")]);
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&messages);
        locator.on_information(move |m| sink.borrow_mut().push(m.to_string()));

        let paths = locator.resolve_backup_paths().unwrap();

        let messages = messages.borrow();
        assert!(messages.iter().any(|m| m.contains("Unable to find")));
        assert!(messages.iter().any(|m| m.contains("backup will fail")));
        assert_eq!(store.save_count(), 0);
        // Blank server folder: the path degrades to the user root.
        assert_eq!(paths.user_and_server, paths.user_root.join(""));
    }

    #[test]
    fn malformed_master_config_propagates_and_leaves_settings_alone() {
        let store = MemorySettingsStore::new(settings_with_server(""));
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("master.config");
        fs::write(&broken, "<appSettings><add key=").unwrap();

        let locator = BackupLocator::new("jsmith", &store, on_domain())
            .with_master_config_candidates(vec![broken]);

        assert!(locator.resolve_backup_paths().is_err());
        assert_eq!(store.save_count(), 0);
        assert!(store.current().database_server_unset());
    }
}
