//! Offline training run: loads historical customer activity, grid-searches
//! the candidate families, and publishes the winning model for the API to
//! load at its next startup. One-shot; must not run concurrently with
//! itself since both runs would publish to the same path.

use std::fs;
use std::path::Path;

use anyhow::Context;
use db::models::customer_activity::Model as CustomerActivity;
use util::config;

mod dataset;
mod search;

const TEST_FRACTION: f64 = 0.2;
const SPLIT_SEED: u64 = 42;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let db = db::connect().await;
    let rows = CustomerActivity::fetch_all(&db)
        .await
        .context("failed to load customer_activity")?;
    // A single row cannot be split into train and test sides, and an empty
    // test side would turn every MSE into NaN downstream.
    anyhow::ensure!(
        rows.len() >= 2,
        "customer_activity has {} row(s); need at least two to make a train/test split",
        rows.len()
    );
    tracing::info!("loaded {} historical rows", rows.len());

    let (x, y) = dataset::to_matrix(&rows);
    let split = dataset::train_test_split(x.view(), y.view(), TEST_FRACTION, SPLIT_SEED);
    tracing::info!(
        "split: {} train / {} test rows",
        split.x_train.nrows(),
        split.x_test.nrows()
    );

    let mut results = Vec::new();
    for (name, grid) in search::candidate_grids() {
        tracing::info!("grid search for {name} ({} combinations)", grid.len());
        let outcome = search::grid_search(name, &grid, &split)?;
        tracing::info!(
            "{name} best params: {}; test MSE: {:.2}",
            outcome.best_params,
            outcome.test_mse
        );
        results.push(outcome);
    }

    let results_path = config::results_path();
    write_results_csv(&results, Path::new(&results_path))?;
    tracing::info!("candidate summary written to {results_path}");

    let best = results
        .iter()
        .min_by(|a, b| a.test_mse.total_cmp(&b.test_mse))
        .expect("candidate table is non-empty");

    let model_path = config::model_path();
    model::artifact::save(&best.model, Path::new(&model_path))
        .context("failed to publish model artifact")?;
    tracing::info!(
        "best model: {} (MSE {:.2}) saved to {model_path}",
        best.name,
        best.test_mse
    );

    Ok(())
}

/// One line per family: its best hyperparameters and test error.
fn write_results_csv(results: &[search::FamilyResult], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut out = String::from("model,best_params,test_mse\n");
    for r in results {
        // best_params holds commas, so it is the one quoted field.
        out.push_str(&format!("{},\"{}\",{}\n", r.name, r.best_params, r.test_mse));
    }

    fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("trainer=info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
