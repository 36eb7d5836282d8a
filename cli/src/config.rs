use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the default snapshot location.
pub const SNAPSHOT_ENV: &str = "FORAGE_SNAPSHOT";

pub struct Config {
    pub data_dir: PathBuf,
    pub snapshot_path: PathBuf,
}

impl Config {
    /// Resolve paths. The `--snapshot` flag wins over `FORAGE_SNAPSHOT`,
    /// which wins over `<data dir>/snapshot.json`.
    pub fn load(snapshot_flag: Option<PathBuf>) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "forage").context("Could not determine home directory")?;
        let data_dir = proj_dirs.data_dir().to_path_buf();

        let env = std::env::var_os(SNAPSHOT_ENV).map(PathBuf::from);
        let snapshot_path = resolve_snapshot_path(snapshot_flag, env, &data_dir);

        Ok(Config {
            data_dir,
            snapshot_path,
        })
    }
}

fn resolve_snapshot_path(
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    data_dir: &Path,
) -> PathBuf {
    flag.or(env)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| data_dir.join("snapshot.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let path = resolve_snapshot_path(
            Some(PathBuf::from("/tmp/flag.json")),
            Some(PathBuf::from("/tmp/env.json")),
            Path::new("/data"),
        );
        assert_eq!(path, PathBuf::from("/tmp/flag.json"));
    }

    #[test]
    fn test_env_over_default() {
        let path = resolve_snapshot_path(None, Some(PathBuf::from("/tmp/env.json")), Path::new("/data"));
        assert_eq!(path, PathBuf::from("/tmp/env.json"));
    }

    #[test]
    fn test_default_in_data_dir() {
        let path = resolve_snapshot_path(None, None, Path::new("/data"));
        assert_eq!(path, PathBuf::from("/data/snapshot.json"));

        let path = resolve_snapshot_path(None, Some(PathBuf::new()), Path::new("/data"));
        assert_eq!(path, PathBuf::from("/data/snapshot.json"));
    }
}
