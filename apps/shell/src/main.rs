mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use cli::Cli;
use geonav::client::RegionClient;
use geonav::domain::config::{LogConfig, NavigatorConfig};
use geonav::domain::{BreadcrumbTrail, Region, RegionRef};
use geonav::kernel::config::load_config;
use geonav::navigation::NavigationSession;
use geonav_logger::{LevelFilter, Logger};
use tracing::info;

type Session = NavigationSession<RegionClient>;

#[geonav_runtime::main(cooperative)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config: NavigatorConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(base_url) = cli.base_url.clone() {
        config.service.base_url = base_url;
    }
    if let Some(hierarchy) = cli.hierarchy {
        config.navigation.default_hierarchy = Some(hierarchy);
    }

    let _logger = init_logger(&config.log)?;

    let session = geonav::connect(&config).await?;
    let result = navigate(&session, &cli).await;
    session.shutdown();
    result
}

/// Maps the `[log]` section onto the logger builder.
fn init_logger(config: &LogConfig) -> anyhow::Result<Logger> {
    let level = parse_level(&config.level)?;

    let mut builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).console(config.console);
    for directive in &config.directives {
        builder = builder.directive(directive.clone());
    }

    let logger = match &config.directory {
        Some(directory) => builder.path(directory).json(config.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

fn parse_level(raw: &str) -> anyhow::Result<LevelFilter> {
    raw.parse::<LevelFilter>().with_context(|| format!("Invalid log.level '{raw}'"))
}

async fn navigate(session: &Session, cli: &Cli) -> anyhow::Result<()> {
    if cli.hierarchies {
        for hierarchy in session.hierarchies() {
            print_line(&format!("{}\t{}", hierarchy.hierarchy_id, hierarchy.name));
        }
        return Ok(());
    }

    for &id in &cli.path {
        let children = session.children().await.unwrap_or_default();
        let Some(child) = children.into_iter().find(|region| region.id == RegionRef::from(id)) else {
            bail!("Region {id} is not a child of '{}'", session.selection().region.name);
        };
        session.drill_down(child).await?;
        session.settled().await?;
    }

    if let Some(index) = cli.crumb {
        let selected = session.select_crumb(index).await?;
        info!(region = %selected.region, name = %selected.name, "Crumb selected");
    }

    let snapshot = session.settled().await?;
    print_trail(&snapshot.trail);

    if cli.children {
        match session.children().await {
            Some(children) => children.iter().for_each(print_region),
            None => print_line("(no subregions)"),
        }
    }

    if cli.geometry {
        match session.geometry(false).await? {
            Some(geometry) => print_line(&geometry.to_string()),
            None => print_line("(no geometry)"),
        }
    }

    Ok(())
}

fn print_trail(trail: &BreadcrumbTrail) {
    for (index, entry) in trail.entries().iter().enumerate() {
        print_line(&format!("[{index}] {} ({})", entry.name, entry.region));
    }
    print_line(&trail.to_string());
}

fn print_region(region: &Region) {
    let marker = if region.has_subregions.allows_drill_down() { "+" } else { " " };
    print_line(&format!("{marker} {}\t{}", region.id, region.name));
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
