//! CLI command implementations.

use crate::config::Workspace;
use crate::error::CommandError;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use outclass_core::{Card, CardLookup, ScryfallCatalog};
use outclass_graph::{
    read_snapshot_file, write_snapshot_file, CardGraph, CardStore, NodeId, RelationError,
    Snapshot, Upgrade, Visibility,
};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// An open workspace with its collection loaded.
struct Session {
    workspace: Workspace,
    store: CardStore,
    graph: CardGraph,
}

impl Session {
    fn open(path: &Path) -> Result<Self> {
        let workspace = Workspace::open(path)?;
        let store_path = workspace.store_path();
        let store =
            CardStore::open_existing(&store_path)?.ok_or(CommandError::MissingStore(store_path))?;
        let graph = store.load()?.unwrap_or_default();
        debug!("Loaded {} cards", graph.len());
        Ok(Self {
            workspace,
            store,
            graph,
        })
    }

    fn save(&self) -> Result<()> {
        self.store.save(&self.graph)?;
        Ok(())
    }

    fn resolve(&self, key: &str) -> Result<NodeId> {
        self.graph
            .resolve(key)
            .ok_or_else(|| CommandError::UnknownCard(key.to_string()).into())
    }

    fn label(&self, index: NodeId) -> String {
        self.graph
            .card(index)
            .map(|card| card.to_string())
            .unwrap_or_default()
    }
}

/// Initialize Outclass in a directory.
pub fn init(path: &Path) -> Result<()> {
    let Some(workspace) = Workspace::init(path)? else {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    };
    CardStore::open(workspace.store_path())?.save(&CardGraph::new())?;

    println!("{} Initialized Outclass in {}", "✓".green(), path.display());
    println!("  Run {} to register a card", "outclass add <card>".cyan());

    Ok(())
}

/// Register a card by identifier.
pub fn add(path: &Path, id: &str, name: Option<&str>) -> Result<()> {
    let mut session = Session::open(path)?;

    if session.graph.contains_id(id) {
        println!("{} {} is already registered", "✓".green(), id.cyan());
        return Ok(());
    }

    let card = match name {
        Some(name) => Card::new(id).with_name(name),
        None => Card::new(id),
    };
    let label = card.to_string();
    session.graph.add_card(card);
    session.save()?;

    println!("{} Added {}", "✓".green(), label.cyan());
    Ok(())
}

/// Look a card up by name in the catalog, optionally registering it.
pub fn lookup(path: &Path, name: &str, register: bool) -> Result<()> {
    let workspace = Workspace::open(path)?;
    let catalog_path = workspace.catalog_path().ok_or(CommandError::NoCatalog)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Loading catalog...");

    let catalog = ScryfallCatalog::from_path(&catalog_path)?;

    spinner.finish_and_clear();

    let Some(card) = catalog.find_by_name(name) else {
        println!("No card named \"{}\" in {} catalog entries", name, catalog.len());
        return Ok(());
    };

    println!("  {} {}", card.name.cyan().bold(), card.id.dimmed());
    if let Some(ref uri) = card.image_uri {
        println!("    {}", uri.dimmed());
    }

    if register {
        let mut session = Session::open(path)?;
        if session.graph.contains(&card) {
            println!("{} Already registered", "✓".green());
        } else {
            session.graph.add_card(card);
            session.save()?;
            println!("{} Added to collection", "✓".green());
        }
    }

    Ok(())
}

/// Declare that `better` outclasses `worse`.
pub fn upgrade(path: &Path, worse: &str, better: &str) -> Result<()> {
    let mut session = Session::open(path)?;
    let low = session.resolve(worse)?;
    let high = session.resolve(better)?;

    match session.graph.add_upgrade(low, high) {
        Ok(outcome) => {
            session.save()?;
            let message = match outcome {
                Upgrade::Linked => "is now outclassed by",
                Upgrade::Implied => "was already outclassed (through a chain) by",
                Upgrade::Existing => "was already outclassed by",
            };
            println!(
                "{} {} {} {}",
                "✓".green(),
                session.label(low).cyan(),
                message,
                session.label(high).cyan()
            );
        }
        Err(RelationError::WouldCreateCycle { .. }) => {
            println!(
                "{} {}; nothing changed",
                "⚠".yellow(),
                cycle_message(&session, low, high)
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn cycle_message(session: &Session, low: NodeId, high: NodeId) -> String {
    if low == high {
        format!("{} cannot outclass itself", session.label(low))
    } else {
        format!(
            "{} is already better than {}",
            session.label(low),
            session.label(high)
        )
    }
}

/// Retract a declared upgrade.
pub fn unlink(path: &Path, worse: &str, better: &str) -> Result<()> {
    let mut session = Session::open(path)?;
    let low = session.resolve(worse)?;
    let high = session.resolve(better)?;

    if session.graph.remove_upgrade(low, high)? {
        session.save()?;
        println!(
            "{} {} is no longer declared worse than {}",
            "✓".green(),
            session.label(low).cyan(),
            session.label(high).cyan()
        );
    } else {
        println!(
            "{} No upgrade from {} to {} was declared",
            "⚠".yellow(),
            session.label(low),
            session.label(high)
        );
    }

    Ok(())
}

/// Remove a card and every upgrade that mentions it.
pub fn remove(path: &Path, key: &str) -> Result<()> {
    let mut session = Session::open(path)?;
    let index = session.resolve(key)?;
    let id = session.graph.card(index).map(|card| card.id.clone()).unwrap_or_default();

    if let Some(card) = session.graph.remove_card(&id) {
        session.save()?;
        println!("{} Removed {}", "✓".green(), card.to_string().cyan());
    }

    Ok(())
}

/// Show one card's place in the order.
pub fn show(path: &Path, key: &str) -> Result<()> {
    let session = Session::open(path)?;
    let graph = &session.graph;
    let index = session.resolve(key)?;

    println!("{}", session.label(index).cyan().bold());
    if let Some(uri) = graph.card(index).and_then(|card| card.image_uri.as_ref()) {
        println!("  {}", uri.dimmed());
    }

    let standing = if graph.is_orphaned(index) {
        "unranked".dimmed()
    } else if graph.is_outclassed(index) {
        "outclassed".yellow()
    } else {
        "best in its chain".green()
    };
    println!("  {} {}", "Standing:".dimmed(), standing);
    println!();

    print_list(
        &session,
        "Directly outclassed by:",
        &graph.direct_upgrades(index),
    );
    print_list(&session, "Directly outclasses:", &graph.direct_downgrades(index));

    let declared = graph.declared_upgrades(index);
    if !declared.is_empty() {
        println!("{}", "Declared upgrades:".dimmed());
        for &better in declared {
            let visibility = if graph.is_directly_worse_than(index, better) {
                Visibility::Visible
            } else {
                Visibility::Hidden
            };
            println!(
                "  {} {}",
                session.label(better),
                format!("({})", visibility).dimmed()
            );
        }
    }

    Ok(())
}

fn print_list(session: &Session, title: &str, nodes: &[NodeId]) {
    if nodes.is_empty() {
        return;
    }
    println!("{}", title.dimmed());
    for &node in nodes {
        println!("  {}", session.label(node));
    }
    println!();
}

/// Compare two cards.
pub fn compare(path: &Path, a: &str, b: &str) -> Result<()> {
    let session = Session::open(path)?;
    let graph = &session.graph;
    let first = session.resolve(a)?;
    let second = session.resolve(b)?;
    let (left, right) = (session.label(first).cyan(), session.label(second).cyan());

    if graph.is_worse_than(first, second) {
        let how = if graph.is_directly_worse_than(first, second) {
            "directly"
        } else {
            "transitively"
        };
        println!("{} is {} outclassed by {}", left, how, right);
    } else if graph.is_better_than(first, second) {
        let how = if graph.is_directly_better_than(first, second) {
            "directly"
        } else {
            "transitively"
        };
        println!("{} {} outclasses {}", left, how, right);
    } else if graph.is_related(first, second) {
        println!("{} and {} are related but incomparable", left, right);
    } else {
        println!("{} and {} are unrelated", left, right);
    }

    Ok(())
}

/// List registered cards.
pub fn list(path: &Path, best: bool, orphaned: bool) -> Result<()> {
    let session = Session::open(path)?;
    let graph = &session.graph;

    let mut nodes: Vec<NodeId> = graph
        .node_ids()
        .filter(|&index| !best || !graph.is_outclassed(index))
        .filter(|&index| !orphaned || graph.is_orphaned(index))
        .collect();
    nodes.sort_by_key(|&index| session.label(index));

    if nodes.is_empty() {
        println!("No cards");
        return Ok(());
    }

    for index in nodes {
        let marker = if graph.is_orphaned(index) {
            "·".dimmed()
        } else if graph.is_outclassed(index) {
            "↑".yellow()
        } else {
            "★".green()
        };
        println!("  {} {}", marker, session.label(index));
    }

    Ok(())
}

/// Export the collection to a JSON snapshot.
pub fn export(path: &Path, output: &Path) -> Result<()> {
    let session = Session::open(path)?;
    let snapshot = Snapshot::capture(&session.graph);
    write_snapshot_file(output, &snapshot)?;

    println!(
        "{} Exported {} cards to {}",
        "✓".green(),
        snapshot.cards.len(),
        output.display()
    );
    Ok(())
}

/// Merge a JSON snapshot into the collection.
///
/// Cards already registered keep their metadata; imported upgrades are
/// replayed on top of the existing ones.
pub fn import(path: &Path, file: &Path) -> Result<()> {
    let mut session = Session::open(path)?;

    let Some(snapshot) = read_snapshot_file(file)? else {
        println!("{} Nothing imported from {}", "⚠".yellow(), file.display());
        return Ok(());
    };

    let rejected = session.graph.merge(snapshot);
    session.save()?;
    println!(
        "{} Imported from {} ({} cards total)",
        "✓".green(),
        file.display(),
        session.graph.len()
    );
    if rejected > 0 {
        println!("  {} {} upgrades skipped", "⚠".yellow(), rejected);
    }

    Ok(())
}

/// Show collection statistics.
pub fn status(path: &Path) -> Result<()> {
    let session = match Session::open(path) {
        Ok(session) => session,
        Err(e) if matches!(
            e.downcast_ref::<CommandError>(),
            Some(CommandError::NotInitialized(_))
        ) => {
            println!("{} Outclass not initialized in this directory", "✗".red());
            println!("  Run {} to initialize", "outclass init".cyan());
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let stats = session.graph.stats();

    println!("{}", "Outclass Status".cyan().bold());
    println!();
    println!("  {} {}", "Cards:".dimmed(), stats.card_count);
    println!("  {} {}", "Declared upgrades:".dimmed(), stats.declared_edges);
    println!("  {} {}", "Visible upgrades:".dimmed(), stats.visible_edges);
    println!("  {} {}", "Outclassed:".dimmed(), stats.outclassed);
    println!("  {} {}", "Unranked:".dimmed(), stats.orphaned);
    println!();
    println!(
        "  {} {}",
        "Store:".dimmed(),
        session.workspace.store_path().display()
    );
    match session.workspace.catalog_path() {
        Some(catalog) => println!("  {} {}", "Catalog:".dimmed(), catalog.display()),
        None => println!("  {} {}", "Catalog:".dimmed(), "none".dimmed()),
    }

    Ok(())
}
