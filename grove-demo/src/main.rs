mod fetcher;
mod render;

use std::time::Duration;

use anyhow::{Context, Result};
use env_logger::Env;
use grove_store::{
    Applied, Forest, Loader, NodeId, StoreOptions, TreeNode, TreeStore,
};

use crate::fetcher::SlowFetcher;
use crate::render::outline;

const CONFIG_ENV: &str = "GROVE_CONFIG";
const FETCH_LATENCY: Duration = Duration::from_millis(1000);

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let options = load_options()?;
    let mut store = TreeStore::new(Forest::from_nodes([
        TreeNode::with_children("1", "File", [TreeNode::new("2", "Sub File")]),
    ]))
    .with_options(options);
    let loader = Loader::new(SlowFetcher::new(FETCH_LATENCY), store.options());

    let file = NodeId::from("1");
    let sub_file = NodeId::from("2");
    show("initial", &store);

    report(store.toggle(&file));
    report(store.add_child(&file, "New Node"));
    let added = last_child(&store, &file)?;
    report(store.rename(&added, "Renamed Node"));
    show("after add and rename", &store);

    let opened = store.toggle(&sub_file);
    loader.dispatch(&opened.effects);
    report(opened);
    show("while loading", &store);
    for applied in loader.settle(&mut store).await {
        report(applied);
    }
    show("after load", &store);

    report(store.move_node(&added, &sub_file));
    report(store.move_node(&file, &sub_file));
    show("after moves", &store);

    report(store.delete(&sub_file));
    show("after delete", &store);

    println!("{}", store.forest().to_json_pretty()?);
    Ok(())
}

/// Read store options from the file named by `GROVE_CONFIG`, if set.
fn load_options() -> Result<StoreOptions> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(StoreOptions::default());
    };
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config `{path}`"))?;
    let options = StoreOptions::from_json(&source)
        .with_context(|| format!("invalid config `{path}`"))?;
    log::info!("loaded store options from `{path}`");
    Ok(options)
}

fn last_child(store: &TreeStore, parent: &NodeId) -> Result<NodeId> {
    store
        .forest()
        .find(parent)
        .and_then(TreeNode::children)
        .and_then(|children| children.last())
        .map(|child| child.id().clone())
        .with_context(|| format!("node `{parent}` has no children"))
}

fn report(applied: Applied) {
    match applied.skip() {
        Some(reason) => log::info!("unchanged: {reason}"),
        None => log::debug!("changed"),
    }
}

fn show(title: &str, store: &TreeStore) {
    println!("-- {title}");
    print!("{}", outline(store));
}
