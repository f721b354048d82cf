//! Worker configuration and game data loading.

use anyhow::{Context, Result};
use mrprog_autotrade::{Catalog, Catalogs, ScreenLayout, Timings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of the worker's TOML config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Name this worker reports in trade responses.
    pub worker_id: String,
    /// Game data file, JSON or TOML. Relative paths resolve against the
    /// config file's directory.
    pub catalog: PathBuf,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default)]
    pub layout: ScreenLayout,
}

impl WorkerConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid worker config")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config = Self::parse(&text).with_context(|| format!("in {}", path.display()))?;

        if config.catalog.is_relative() {
            if let Some(dir) = path.parent() {
                config.catalog = dir.join(&config.catalog);
            }
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFormat {
    Json,
    Toml,
}

impl DataFormat {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(DataFormat::Json),
            Some("toml") => Ok(DataFormat::Toml),
            _ => anyhow::bail!("{}: game data must be a .json or .toml file", path.display()),
        }
    }
}

fn parse_catalogs(text: &str, format: DataFormat) -> Result<Catalogs> {
    let catalogs: Catalogs = match format {
        DataFormat::Json => serde_json::from_str(text)?,
        DataFormat::Toml => toml::from_str(text)?,
    };
    catalogs.catalogs.iter().try_for_each(Catalog::validate)?;
    Ok(catalogs)
}

pub async fn load_catalogs(path: &Path) -> Result<Catalogs> {
    let format = DataFormat::of(path)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let catalogs = parse_catalogs(&text, format).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        games = ?catalogs.games().collect::<Vec<_>>(),
        "Loaded game data"
    );
    Ok(catalogs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrprog_autotrade::Sort;
    use std::time::Duration;

    const CONFIG: &str = r#"
worker_id = "switch-1"
catalog = "data/games.json"

[timings]
peer_wait_ms = 120000

[layout.lobby_full]
pattern = { exact = "1/4" }
region = { x = 785, y = 123, width = 160, height = 60 }
"#;

    #[test]
    fn parses_config() {
        let config = WorkerConfig::parse(CONFIG).unwrap();
        assert_eq!(config.worker_id, "switch-1");
        assert_eq!(config.catalog, PathBuf::from("data/games.json"));
        assert_eq!(config.timings.peer_wait, Duration::from_secs(120));
        assert_eq!(config.timings.peer_poll, Duration::from_secs(1));
        assert!(config.layout.lobby_full.invert);
        assert_eq!(config.layout.main_menu, ScreenLayout::default().main_menu);
    }

    #[test]
    fn tables_are_optional() {
        let config = WorkerConfig::parse("worker_id = \"w\"\ncatalog = \"games.toml\"\n").unwrap();
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.layout, ScreenLayout::default());
    }

    #[test]
    fn worker_id_is_required() {
        assert!(WorkerConfig::parse("catalog = \"games.toml\"\n").is_err());
    }

    #[tokio::test]
    async fn resolves_catalog_next_to_config() {
        let dir = std::env::temp_dir().join(format!("mrprog-config-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("worker.toml");
        tokio::fs::write(&path, CONFIG).await.unwrap();

        let config = WorkerConfig::load(&path).await.unwrap();
        assert_eq!(config.catalog, dir.join("data/games.json"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    fn orders(chip: &str) -> String {
        Sort::ALL
            .iter()
            .map(|sort| {
                let key = serde_json::to_string(sort).unwrap();
                format!(r#"{key}: [{{ "name": "{chip}", "code": "A" }}]"#)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[test]
    fn parses_json_catalogs() {
        let text = format!(
            r#"{{ "catalogs": [{{
                "game": 6,
                "chip_orders": {{ {} }},
                "parts": [{{ "name": "SuprArmr", "color": "White" }}],
                "nothing": {{ "name": "Nothing", "color": "None" }},
                "starting_part": "SuprArmr"
            }}] }}"#,
            orders("Cannon")
        );
        let catalogs = parse_catalogs(&text, DataFormat::Json).unwrap();
        assert_eq!(catalogs.for_game(6).unwrap().tradable_chips().len(), 1);
    }

    #[test]
    fn parses_toml_catalogs() {
        let mut text = String::from(
            "[[catalogs]]\ngame = 3\nstarting_part = \"SprArmor\"\nparts = []\n\
             nothing = { name = \"Nothing\", color = \"None\" }\n",
        );
        for sort in Sort::ALL {
            let key = serde_json::to_string(&sort).unwrap();
            text.push_str(&format!(
                "[[catalogs.chip_orders.{}]]\nname = \"Cannon\"\ncode = \"A\"\n",
                key.trim_matches('"')
            ));
        }
        let catalogs = parse_catalogs(&text, DataFormat::Toml).unwrap();
        assert_eq!(catalogs.for_game(3).unwrap().starting_part, "SprArmor");
    }

    #[test]
    fn rejects_incomplete_catalogs() {
        let text = r#"{ "catalogs": [{
            "game": 6,
            "chip_orders": { "id": [{ "name": "Cannon", "code": "A" }] },
            "parts": [],
            "nothing": { "name": "Nothing", "color": "None" },
            "starting_part": "SuprArmr"
        }] }"#;
        let err = parse_catalogs(text, DataFormat::Json).unwrap_err();
        assert!(err.to_string().contains("no ABCDE ordering"));
    }

    #[test]
    fn data_format_from_extension() {
        assert_eq!(DataFormat::of(Path::new("a/games.json")).unwrap(), DataFormat::Json);
        assert_eq!(DataFormat::of(Path::new("games.toml")).unwrap(), DataFormat::Toml);
        assert!(DataFormat::of(Path::new("games.yaml")).is_err());
    }
}
