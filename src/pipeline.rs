//! Single-pass batch run: load, index, join, emit.
//!
//! All inputs are read into memory before the join starts and both outputs
//! are rendered before either is written, so any input error leaves the
//! output files untouched.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::RunConfig;
use crate::domain::NetworkLink;
use crate::error::Error;
use crate::geometry::{Corridor, FloodIndex};
use crate::io::{read_floods, read_network, render_corridor_layer, render_depth_table, write_artifact};
use crate::join::{ResultSink, join};

/// Inputs fully materialized for the join phase
#[derive(Debug)]
pub struct LoadedInputs {
    pub links: Vec<NetworkLink>,
    pub index: FloodIndex,
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub links: usize,
    pub floods: usize,
    pub flooded: usize,
    pub duplicates: usize,
    pub depth_table: PathBuf,
    pub corridor_layer: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Read the network, read the floods and build the flood index
    pub fn load(&self) -> Result<LoadedInputs, Error> {
        let links = read_network(&self.config.network, &self.config.network_fields)?;
        let floods = read_floods(&self.config.floods, &self.config.flood_fields)?;

        info!("Creating spatial index");
        let index = FloodIndex::build(floods)?;
        info!(links = links.len(), floods = index.len(), "inputs loaded");

        Ok(LoadedInputs { links, index })
    }

    /// Buffer and join every link, in network order
    pub fn join_all(&self, inputs: &LoadedInputs) -> ResultSink {
        let mut sink = ResultSink::with_capacity(inputs.links.len());

        for link in &inputs.links {
            let corridor = Corridor::build(link);
            let max_depth = join(&corridor, &inputs.index, &self.config.depths);
            debug!(link_id = link.link_id, max_depth, "joined link");
            sink.record(corridor.link_id, max_depth, corridor.geometry);
        }

        sink
    }

    /// Write the depth table, then the corridor layer
    pub fn emit(&self, sink: &ResultSink) -> Result<(), Error> {
        let table = render_depth_table(sink.depth_table())?;
        let layer = render_corridor_layer(sink.corridor_layer(), &self.config.crs)?;

        write_artifact(&self.config.depth_table, &table)?;
        write_artifact(&self.config.corridor_layer, &layer)?;
        Ok(())
    }

    pub fn run(&self) -> Result<RunSummary, Error> {
        let inputs = self.load()?;
        let sink = self.join_all(&inputs);
        self.emit(&sink)?;

        Ok(self.summarize(&inputs, &sink))
    }

    pub fn summarize(&self, inputs: &LoadedInputs, sink: &ResultSink) -> RunSummary {
        RunSummary {
            links: sink.len(),
            floods: inputs.index.len(),
            flooded: sink.flooded(),
            duplicates: sink.duplicates(),
            depth_table: self.config.depth_table.clone(),
            corridor_layer: self.config.corridor_layer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
            features.join(",")
        )
    }

    fn link(id: i64, width: f64, coords: &str) -> String {
        format!(
            r#"{{"type": "Feature", "properties": {{"edgeID": {id}, "avg_wdt_mp": {width}}}, "geometry": {{"type": "LineString", "coordinates": {coords}}}}}"#
        )
    }

    fn flood(band: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> String {
        format!(
            r#"{{"type": "Feature", "properties": {{"depth": "{band}"}}, "geometry": {{"type": "Polygon", "coordinates": [[[{x0}, {y0}], [{x1}, {y0}], [{x1}, {y1}], [{x0}, {y1}], [{x0}, {y0}]]]}}}}"#
        )
    }

    fn setup(dir: &Path, links: &[String], floods: &[String]) -> Pipeline {
        let config = RunConfig::in_dir(dir);
        fs::write(&config.network, collection(links)).unwrap();
        fs::write(&config.floods, collection(floods)).unwrap();
        Pipeline::new(config)
    }

    fn depth_table(pipeline: &Pipeline) -> String {
        fs::read_to_string(&pipeline.config().depth_table).unwrap()
    }

    const STRAIGHT: &str = "[[0, 0], [100, 0]]";

    #[test]
    fn test_no_intersecting_flood_gives_zero() {
        let dir = tempdir().unwrap();
        let pipeline = setup(
            dir.path(),
            &[link(1, 4.0, STRAIGHT)],
            &[flood("> 1.20", 500.0, 500.0, 600.0, 600.0)],
        );

        let summary = pipeline.run().unwrap();
        assert_eq!(depth_table(&pipeline), "edgeID,depth\n1,0\n");
        assert_eq!(summary.links, 1);
        assert_eq!(summary.flooded, 0);
    }

    #[test]
    fn test_fully_covered_link() {
        let dir = tempdir().unwrap();
        let pipeline = setup(
            dir.path(),
            &[link(1, 4.0, STRAIGHT)],
            &[flood("0.30 - 0.60", -50.0, -50.0, 150.0, 50.0)],
        );

        pipeline.run().unwrap();
        assert_eq!(depth_table(&pipeline), "edgeID,depth\n1,0.6\n");
    }

    #[test]
    fn test_two_bands_take_maximum() {
        let dir = tempdir().unwrap();
        let pipeline = setup(
            dir.path(),
            &[link(1, 4.0, STRAIGHT)],
            &[
                flood("0.15 - 0.30", 10.0, -10.0, 30.0, 10.0),
                flood("> 1.20", 60.0, -10.0, 80.0, 10.0),
                flood("0.15 - 0.30", 85.0, -10.0, 95.0, 10.0),
            ],
        );

        let summary = pipeline.run().unwrap();
        assert_eq!(depth_table(&pipeline), "edgeID,depth\n1,1.5\n");
        assert_eq!(summary.flooded, 1);
    }

    #[test]
    fn test_empty_flood_geometry_aborts_without_output() {
        let dir = tempdir().unwrap();
        let empty = r#"{"type": "Feature", "id": "hole", "properties": {"depth": "> 1.20"}, "geometry": {"type": "MultiPolygon", "coordinates": []}}"#;
        let pipeline = setup(
            dir.path(),
            &[link(1, 4.0, STRAIGHT)],
            &[flood("0.30 - 0.60", -50.0, -50.0, 150.0, 50.0), empty.to_string()],
        );

        match pipeline.run() {
            Err(Error::EmptyGeometry { flood }) => assert_eq!(flood, "hole"),
            other => panic!("expected EmptyGeometry, got {other:?}"),
        }
        assert!(!pipeline.config().depth_table.exists());
        assert!(!pipeline.config().corridor_layer.exists());
    }

    #[test]
    fn test_unknown_band_aborts_without_output() {
        let dir = tempdir().unwrap();
        let pipeline = setup(
            dir.path(),
            &[link(1, 4.0, STRAIGHT)],
            &[flood("0.30-0.60", 500.0, 500.0, 600.0, 600.0)],
        );

        assert!(matches!(pipeline.run(), Err(Error::UnknownBand { .. })));
        assert!(!pipeline.config().depth_table.exists());
        assert!(!pipeline.config().corridor_layer.exists());
    }

    #[test]
    fn test_missing_input_aborts() {
        let dir = tempdir().unwrap();
        let pipeline = Pipeline::new(RunConfig::in_dir(dir.path()));
        assert!(matches!(pipeline.run(), Err(Error::InputNotFound(_))));
        assert!(!pipeline.config().depth_table.exists());
    }

    #[test]
    fn test_one_row_per_link_in_input_order() {
        let dir = tempdir().unwrap();
        let links: Vec<String> = [9, 3, 7, 1]
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let y = i as f64 * 50.0;
                link(id, 2.0, &format!("[[0, {y}], [40, {y}]]"))
            })
            .collect();
        let pipeline = setup(
            dir.path(),
            &links,
            &[flood("0.60 - 0.90", 10.0, 45.0, 20.0, 55.0)],
        );

        let summary = pipeline.run().unwrap();
        assert_eq!(
            depth_table(&pipeline),
            "edgeID,depth\n9,0\n3,0.9\n7,0\n1,0\n"
        );
        assert_eq!(summary.links, 4);
        assert_eq!(summary.floods, 1);
    }

    #[test]
    fn test_duplicate_link_ids_collapse_to_one_row() {
        let dir = tempdir().unwrap();
        let pipeline = setup(
            dir.path(),
            &[
                link(5, 4.0, STRAIGHT),
                link(6, 4.0, "[[0, 500], [100, 500]]"),
                link(5, 4.0, "[[0, 1000], [100, 1000]]"),
            ],
            &[flood("0.90 - 1.20", -50.0, -50.0, 150.0, 50.0)],
        );

        let summary = pipeline.run().unwrap();
        assert_eq!(depth_table(&pipeline), "edgeID,depth\n5,0\n6,0\n");
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.links, 2);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempdir().unwrap();
        let pipeline = setup(
            dir.path(),
            &[
                link(1, 4.0, STRAIGHT),
                link(2, 3.0, "[[0, 20], [50, 60], [120, 60]]"),
            ],
            &[
                flood("0.00 - 0.15", 40.0, 40.0, 70.0, 70.0),
                flood("0.60 - 0.90", 90.0, -5.0, 110.0, 5.0),
            ],
        );

        pipeline.run().unwrap();
        let first_table = fs::read(&pipeline.config().depth_table).unwrap();
        let first_layer = fs::read(&pipeline.config().corridor_layer).unwrap();

        pipeline.run().unwrap();
        assert_eq!(fs::read(&pipeline.config().depth_table).unwrap(), first_table);
        assert_eq!(
            fs::read(&pipeline.config().corridor_layer).unwrap(),
            first_layer
        );
    }

    #[test]
    fn test_corridor_layer_written() {
        let dir = tempdir().unwrap();
        let pipeline = setup(dir.path(), &[link(4, 4.0, STRAIGHT)], &[]);

        pipeline.run().unwrap();
        let layer = fs::read_to_string(&pipeline.config().corridor_layer).unwrap();
        let geojson: geojson::GeoJson = layer.parse().unwrap();
        let geojson::GeoJson::FeatureCollection(collection) = geojson else {
            panic!("expected a FeatureCollection");
        };
        assert_eq!(collection.features.len(), 1);
        assert_eq!(
            collection.features[0]
                .property("edgeID")
                .and_then(|v| v.as_i64()),
            Some(4)
        );
    }
}
