use std::path::PathBuf;

use directories::ProjectDirs;

/// Directory holding the database and any other runtime assets.
///
/// ✔ macOS → ~/Library/Application Support/kanban
/// ✔ Linux → ~/.local/share/kanban (respects XDG_DATA_HOME)
/// ✔ Windows → %APPDATA%\kanban
pub fn asset_dir() -> PathBuf {
    let path = ProjectDirs::from("dev", "kanban", "kanban")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"));

    if !path.exists() {
        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!("Failed to create asset directory {:?}: {}", path, e);
        }
    }

    path
}

/// Get the database file path.
///
/// Respects the `KANBAN_DB_PATH` environment variable for custom locations.
///
/// Default: `{asset_dir}/kanban.db`
pub fn database_path() -> PathBuf {
    if let Ok(path) = std::env::var("KANBAN_DB_PATH") {
        return PathBuf::from(path);
    }
    asset_dir().join("kanban.db")
}
