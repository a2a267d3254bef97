//! Command dispatch

use std::io;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::error_ext::RepositoryResultExt;
use crate::application::{ApplicationError, GroupTreeRequest, GroupTreeSectionRequest};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::TreeNodeConvert;
use crate::config::Settings;
use crate::domain::{Group, GroupNode};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::StaticAdminCheck;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { group_type, top }) => cmd_tree(cli, group_type.as_deref(), top),
        Some(Commands::Section { id, group_type }) => {
            cmd_section(cli, id, group_type.as_deref())
        }
        Some(Commands::Config) => cmd_config(cli),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `grouptree --help`".to_string(),
        )),
    }
}

/// Settings from config layers plus command line overrides.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(catalog) = &cli.catalog {
        settings.catalog = Some(catalog.clone());
    }
    if let Some(user) = &cli.user {
        settings.user = Some(user.clone());
    }
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let container = ServiceContainer::new(load_settings(cli)?)?;
    if cli.admin {
        return Ok(container.with_admin(Arc::new(StaticAdminCheck(true))));
    }
    Ok(container)
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, group_type: Option<&str>, top: &[String]) -> CliResult<()> {
    let container = container(cli)?;
    let forest_type =
        group_type.unwrap_or(container.settings.default_group_type.as_str());

    let top_groups = if top.is_empty() {
        container
            .repo
            .top_groups(forest_type)
            .with_group_context("top groups", forest_type)?
    } else {
        resolve_all(&container, top)?
    };
    debug!("tree: {} top groups", top_groups.len());

    let mut request =
        GroupTreeRequest::new(top_groups).with_pkg_count(container.pkg_count.clone());
    if let Some(t) = group_type {
        request = request.with_type(t);
    }

    let forest = container.group_tree_service().group_tree(&request)?;
    if forest.is_empty() {
        output::warning("no groups to show");
    }
    print_nodes(cli, &forest)
}

#[instrument(skip(cli))]
fn cmd_section(cli: &Cli, id: &str, group_type: Option<&str>) -> CliResult<()> {
    let container = container(cli)?;

    let mut request =
        GroupTreeSectionRequest::new(id).with_pkg_count(container.pkg_count.clone());
    if let Some(t) = group_type {
        request = request.with_type(t);
    }

    let section = container.group_tree_service().group_tree_section(&request)?;
    if cli.json {
        return print_json(&section);
    }
    print_nodes(cli, std::slice::from_ref(&section))
}

fn cmd_config(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    output::header("Effective settings");
    output::info(&settings.to_toml()?);
    Ok(())
}

fn resolve_all(container: &ServiceContainer, names: &[String]) -> CliResult<Vec<Group>> {
    names
        .iter()
        .map(|name| -> CliResult<Group> {
            container
                .repo
                .resolve(name)
                .with_group_context("resolve group", name)?
                .ok_or_else(|| ApplicationError::ObjectNotFound(name.clone()).into())
        })
        .collect()
}

fn print_nodes(cli: &Cli, nodes: &[GroupNode]) -> CliResult<()> {
    if cli.json {
        return print_json(nodes);
    }
    for node in nodes {
        output::info(&node.to_tree_string());
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(InfraError::from)?;
    output::info(&json);
    Ok(())
}
