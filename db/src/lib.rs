pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use util::config;

pub async fn connect() -> DatabaseConnection {
    let url = database_url(config::database_path());

    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// Accepts either a `sqlite:` DSN as-is or a SQLite file path. Only SQLite
/// is compiled in, so anything else is rejected at the URL level rather
/// than failing deep inside the driver.
fn database_url(path_or_url: String) -> String {
    if path_or_url.starts_with("sqlite:") {
        path_or_url
    } else {
        // Ensure parent directory exists (SQLite won't create intermediate dirs).
        if let Some(parent) = Path::new(&path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    }
}

#[cfg(test)]
mod tests {
    use super::database_url;

    #[test]
    fn bare_paths_become_sqlite_urls() {
        assert_eq!(
            database_url("app.sqlite".into()),
            "sqlite://app.sqlite?mode=rwc"
        );
    }

    #[test]
    fn sqlite_dsns_pass_through_unchanged() {
        assert_eq!(database_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            database_url("sqlite:///tmp/app.sqlite".into()),
            "sqlite:///tmp/app.sqlite"
        );
    }
}
