//! Service container for dependency injection
//!
//! Wires the group tree service to its data layer and admin check.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::GroupTreeService;
use crate::config::Settings;
use crate::domain::PackageCounts;
use crate::infrastructure::catalog::Catalog;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{AdminCheck, GroupRepository, SysadminList};

/// Container holding the collaborators of one invocation.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Group data layer
    pub repo: Arc<dyn GroupRepository>,

    /// Admin predicate for the current user
    pub admin: Arc<dyn AdminCheck>,

    /// Direct package counts known to the data layer
    pub pkg_count: PackageCounts,
}

impl ServiceContainer {
    /// Create a container backed by the catalog file named in `settings`.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let path = settings.catalog.clone().ok_or_else(|| InfraError::Catalog {
            message: "no catalog configured (use --catalog or GROUPTREE_CATALOG)".to_string(),
        })?;
        debug!("loading catalog {}", path.display());
        let catalog = Catalog::load(&path)?;
        let admin = SysadminList::new(settings.sysadmins.clone(), settings.user.clone());

        Ok(Self::with_deps(
            settings,
            Arc::new(catalog.repository),
            Arc::new(admin),
            catalog.pkg_count,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        repo: Arc<dyn GroupRepository>,
        admin: Arc<dyn AdminCheck>,
        pkg_count: PackageCounts,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            repo,
            admin,
            pkg_count,
        }
    }

    /// Replace the admin predicate, e.g. for an explicit `--admin` flag.
    pub fn with_admin(mut self, admin: Arc<dyn AdminCheck>) -> Self {
        self.admin = admin;
        self
    }

    pub fn group_tree_service(&self) -> GroupTreeService {
        GroupTreeService::new(Arc::clone(&self.repo), Arc::clone(&self.admin))
            .with_default_type(self.settings.default_group_type.clone())
    }
}
