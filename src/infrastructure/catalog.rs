//! TOML catalog backend
//!
//! A catalog file declares groups and the packages attached to them:
//!
//! ```toml
//! [[group]]
//! id = "g-health"
//! name = "health"
//! title = "Health"
//! type = "organization"
//!
//! [[group]]
//! id = "g-district-a"
//! name = "district-a"
//! title = "District A"
//! type = "organization"
//! parent = "health"
//!
//! [[package]]
//! name = "clinic-locations"
//! groups = ["district-a"]
//! ```
//!
//! `parent` and package `groups` entries accept a group id or name.
//! Loading yields an [`InMemoryGroupRepository`] and the direct package
//! counts per group name.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::{Group, PackageCounts, DEFAULT_GROUP_TYPE};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::memory::InMemoryGroupRepository;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default, rename = "group")]
    groups: Vec<RawGroup>,
    #[serde(default, rename = "package")]
    packages: Vec<RawPackage>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    id: String,
    name: String,
    title: Option<String>,
    #[serde(rename = "type")]
    group_type: Option<String>,
    parent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    #[serde(default)]
    groups: Vec<String>,
}

/// Loaded catalog: repository plus package counts.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub repository: InMemoryGroupRepository,
    pub pkg_count: PackageCounts,
}

impl Catalog {
    /// Read and validate a catalog file.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read catalog {}", path.display()), e))?;
        Self::parse(&content).map_err(|e| match e {
            InfraError::Catalog { message } => InfraError::Catalog {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse and validate catalog TOML.
    pub fn parse(content: &str) -> InfraResult<Self> {
        let raw: RawCatalog = toml::from_str(content).map_err(|e| InfraError::Catalog {
            message: e.to_string(),
        })?;

        // name or id -> id
        let mut lookup: HashMap<&str, &str> = HashMap::new();
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for group in &raw.groups {
            if !ids.insert(group.id.as_str()) {
                return Err(catalog_err(format!("duplicate group id: {}", group.id)));
            }
            if !names.insert(group.name.as_str()) {
                return Err(catalog_err(format!("duplicate group name: {}", group.name)));
            }
        }
        for group in &raw.groups {
            lookup.insert(group.name.as_str(), group.id.as_str());
        }
        // ids win over names on collision
        for group in &raw.groups {
            lookup.insert(group.id.as_str(), group.id.as_str());
        }

        let mut parent_ids: HashMap<&str, &str> = HashMap::new();
        for group in &raw.groups {
            if let Some(parent) = &group.parent {
                let parent_id = lookup.get(parent.as_str()).copied().ok_or_else(|| {
                    catalog_err(format!(
                        "group {} references unknown parent {}",
                        group.name, parent
                    ))
                })?;
                if parent_id == group.id {
                    return Err(catalog_err(format!("group {} is its own parent", group.name)));
                }
                parent_ids.insert(group.id.as_str(), parent_id);
            }
        }
        check_acyclic(&parent_ids)?;

        let mut repository = InMemoryGroupRepository::new();
        for group in &raw.groups {
            let entity = Group::new(
                group.id.clone(),
                group.name.clone(),
                group.title.clone().unwrap_or_else(|| group.name.clone()),
                group
                    .group_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GROUP_TYPE.to_string()),
            );
            repository.insert(entity, parent_ids.get(group.id.as_str()).copied());
        }

        let name_by_id: HashMap<&str, &str> = raw
            .groups
            .iter()
            .map(|g| (g.id.as_str(), g.name.as_str()))
            .collect();
        let mut pkg_count = PackageCounts::new();
        for package in &raw.packages {
            // A package listed twice under one group still counts once
            let mut seen = HashSet::new();
            for group_ref in &package.groups {
                let name = lookup
                    .get(group_ref.as_str())
                    .and_then(|id| name_by_id.get(id))
                    .copied()
                    .ok_or_else(|| {
                        catalog_err(format!(
                            "package {} references unknown group {}",
                            package.name, group_ref
                        ))
                    })?;
                if seen.insert(name) {
                    pkg_count.increment(name);
                }
            }
        }

        debug!(
            "catalog: {} groups, {} packages",
            raw.groups.len(),
            raw.packages.len()
        );
        Ok(Self {
            repository,
            pkg_count,
        })
    }
}

fn catalog_err(message: String) -> InfraError {
    InfraError::Catalog { message }
}

fn check_acyclic(parent_ids: &HashMap<&str, &str>) -> InfraResult<()> {
    for &start in parent_ids.keys() {
        let mut seen = HashSet::from([start]);
        let mut current = start;
        while let Some(&parent) = parent_ids.get(current) {
            if !seen.insert(parent) {
                return Err(catalog_err(format!("cycle in group hierarchy at {}", parent)));
            }
            current = parent;
        }
    }
    Ok(())
}
