use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::DepthBandTable;
use crate::error::Error;
use crate::io::{FloodFields, NetworkFields};

/// Default file names, relative to the working directory
pub mod defaults {
    pub const NETWORK: &str = "network.geojson";
    pub const FLOODS: &str = "depth30.geojson";
    pub const DEPTH_TABLE: &str = "floods.csv";
    pub const CORRIDOR_LAYER: &str = "network_buf.geojson";

    pub const ID_FIELD: &str = "edgeID";
    pub const WIDTH_FIELD: &str = "avg_wdt_mp";
    pub const BAND_FIELD: &str = "depth";

    /// British National Grid, the working CRS of the network layer
    pub const CRS: &str = "EPSG:27700";
}

fn default_network() -> PathBuf {
    PathBuf::from(defaults::NETWORK)
}
fn default_floods() -> PathBuf {
    PathBuf::from(defaults::FLOODS)
}
fn default_depth_table() -> PathBuf {
    PathBuf::from(defaults::DEPTH_TABLE)
}
fn default_corridor_layer() -> PathBuf {
    PathBuf::from(defaults::CORRIDOR_LAYER)
}
fn default_id_field() -> String {
    defaults::ID_FIELD.to_string()
}
fn default_width_field() -> String {
    defaults::WIDTH_FIELD.to_string()
}
fn default_band_field() -> String {
    defaults::BAND_FIELD.to_string()
}
fn default_crs() -> String {
    defaults::CRS.to_string()
}
fn default_verbose() -> bool {
    false
}

/// Settings read from `floodjoin.toml`
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default = "default_network")]
    pub network: PathBuf,
    #[serde(default = "default_floods")]
    pub floods: PathBuf,
    #[serde(default = "default_depth_table")]
    pub depth_table: PathBuf,
    #[serde(default = "default_corridor_layer")]
    pub corridor_layer: PathBuf,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_width_field")]
    pub width_field: String,
    #[serde(default = "default_band_field")]
    pub band_field: String,
    #[serde(default = "default_crs")]
    pub crs: String,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    /// Representative depth overrides, keyed by exact band label
    #[serde(default)]
    pub depths: HashMap<String, f64>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            floods: default_floods(),
            depth_table: default_depth_table(),
            corridor_layer: default_corridor_layer(),
            id_field: default_id_field(),
            width_field: default_width_field(),
            band_field: default_band_field(),
            crs: default_crs(),
            verbose: default_verbose(),
            depths: HashMap::new(),
        }
    }
}

impl FileConfig {
    /// Load the first config file found in the search paths
    ///
    /// Returns the file that was used alongside its settings.
    pub fn load() -> Result<Option<(PathBuf, Self)>, Error> {
        for path in get_config_paths() {
            if path.is_file() {
                let config = Self::from_path(&path)?;
                return Ok(Some((path, config)));
            }
        }
        Ok(None)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve into the settings used by a run
    pub fn into_run_config(self) -> Result<RunConfig, Error> {
        Ok(RunConfig {
            depths: DepthBandTable::with_overrides(&self.depths)?,
            network: self.network,
            floods: self.floods,
            depth_table: self.depth_table,
            corridor_layer: self.corridor_layer,
            network_fields: NetworkFields {
                id: self.id_field,
                width: self.width_field,
            },
            flood_fields: FloodFields {
                band: self.band_field,
            },
            crs: self.crs,
        })
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub network: PathBuf,
    pub floods: PathBuf,
    pub depth_table: PathBuf,
    pub corridor_layer: PathBuf,
    pub network_fields: NetworkFields,
    pub flood_fields: FloodFields,
    /// CRS written to the corridor layer; must match the network's planar CRS
    pub crs: String,
    pub depths: DepthBandTable,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            floods: default_floods(),
            depth_table: default_depth_table(),
            corridor_layer: default_corridor_layer(),
            network_fields: NetworkFields::default(),
            flood_fields: FloodFields::default(),
            crs: default_crs(),
            depths: DepthBandTable::default(),
        }
    }
}

impl RunConfig {
    /// Place all four files in `dir`, keeping their default names
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            network: dir.join(defaults::NETWORK),
            floods: dir.join(defaults::FLOODS),
            depth_table: dir.join(defaults::DEPTH_TABLE),
            corridor_layer: dir.join(defaults::CORRIDOR_LAYER),
            ..Self::default()
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("floodjoin.toml"));
    paths.push(PathBuf::from(".floodjoin.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("floodjoin").join("config.toml"));
        paths.push(config_dir.join("floodjoin.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DepthBand;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::parse("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.network, PathBuf::from("network.geojson"));
        assert_eq!(config.id_field, "edgeID");
        assert_eq!(config.crs, "EPSG:27700");
    }

    #[test]
    fn test_parse_overrides() {
        let config = FileConfig::parse(
            r#"
            network = "data/links.geojson"
            width_field = "width"
            verbose = true

            [depths]
            "> 1.20" = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.network, PathBuf::from("data/links.geojson"));
        assert_eq!(config.floods, PathBuf::from("depth30.geojson"));
        assert!(config.verbose);

        let run = config.into_run_config().unwrap();
        assert_eq!(run.network_fields.width, "width");
        assert_eq!(run.network_fields.id, "edgeID");
        assert_eq!(run.depths.depth(DepthBand::Over1_20), 2.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            FileConfig::parse("netwrok = \"x\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unknown_band_override_rejected() {
        let config = FileConfig::parse("[depths]\n\"deep\" = 3.0\n").unwrap();
        assert!(matches!(
            config.into_run_config(),
            Err(Error::UnknownBand { .. })
        ));
    }

    #[test]
    fn test_in_dir() {
        let run = RunConfig::in_dir(Path::new("/tmp/run"));
        assert_eq!(run.depth_table, PathBuf::from("/tmp/run/floods.csv"));
        assert_eq!(run.crs, "EPSG:27700");
    }
}
