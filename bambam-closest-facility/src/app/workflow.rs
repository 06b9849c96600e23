use super::{table_reader, writers};
use crate::{
    algorithm::{centroid, proximity, summary},
    config::WorkflowConfiguration,
    model::{
        analysis::ClosestFacilityLayer,
        network::{shapefile_ops, RoadNetwork},
        CfAppError,
    },
};
use std::path::{Path, PathBuf};

/// runs the full restaurant count workflow: builds the road network, filters
/// facilities near it, derives one incident per segment, solves the closest
/// facility layer and writes the route table and per-segment counts.
///
/// # Returns
///
/// the path of the written counts file.
pub fn run(conf: &WorkflowConfiguration) -> Result<PathBuf, CfAppError> {
    let output_directory = Path::new(&conf.output_directory);
    let outputs = OutputFiles::new(output_directory, conf);
    outputs.prepare(output_directory, conf.overwrite)?;

    log::info!("  (((1))) loading road network and facilities");
    let segments =
        shapefile_ops::read_road_segments(&conf.network_file, &conf.segment_field, &conf.network)?;
    let network = RoadNetwork::new(segments, &conf.network, conf.coordinate_system)?;
    let facilities = shapefile_ops::read_point_features(
        &conf.facilities_file,
        conf.facility_name_field.as_deref(),
    )?;

    log::info!(
        "  (((2))) selecting facilities within {} of the network",
        conf.proximity_filter
    );
    let nearby = proximity::select_within_distance(&facilities, &network, &conf.proximity_filter);

    log::info!("  (((3))) deriving segment centroids ({})", conf.centroid_mode);
    let centroids = centroid::segment_centroids(&network.segments, conf.centroid_mode);
    writers::write_centroids(&outputs.centroids, &centroids, &conf.segment_field)?;

    log::info!("  (((4))) creating closest facility layer");
    let mut layer = ClosestFacilityLayer::new(&network, &conf.analysis)?;

    log::info!("  (((5))) adding facilities and incidents");
    layer.add_facilities(&nearby);
    layer.add_incidents(&centroids);

    log::info!("  (((6))) solving");
    let routes = layer.solve(conf.parallelize)?;

    log::info!("  (((7))) exporting route table");
    writers::write_routes_csv(&outputs.routes_csv, &routes)?;
    writers::write_routes_dbf(&outputs.routes_dbf, &routes)?;

    log::info!("  (((8))) counting facilities per segment");
    let summaries = summary::count_by_incident(routes.iter().map(|r| r.incident_id));
    let segment_ids = network
        .segments
        .iter()
        .map(|s| s.segment_id.clone())
        .collect::<Vec<_>>();
    let counts = summary::join_positional(&segment_ids, &summaries)?;

    log::info!("  (((9))) writing segment counts");
    writers::write_segment_counts(
        &outputs.counts_csv,
        &counts,
        &conf.segment_field,
        &conf.count_column,
    )?;
    Ok(outputs.counts_csv)
}

/// runs only the post-processing steps over an existing route table and network table.
pub fn summarize(
    routes_file: &str,
    network_file: &str,
    output_file: &str,
    segment_field: &str,
    count_column: &str,
) -> Result<(), CfAppError> {
    log::info!("  (((1))) reading route table {routes_file}");
    let incident_ids = table_reader::read_route_incident_ids(routes_file)?;
    log::info!("  (((2))) reading network table {network_file}");
    let segment_ids = table_reader::read_segment_ids(network_file, segment_field)?;
    log::info!("  (((3))) counting {} routes", incident_ids.len());
    let summaries = summary::count_by_incident(incident_ids);
    let counts = summary::join_positional(&segment_ids, &summaries)?;
    writers::write_segment_counts(Path::new(output_file), &counts, segment_field, count_column)?;
    Ok(())
}

/// writes the centroid of every segment of a network shapefile.
pub fn centroids(
    network_file: &str,
    output_file: &str,
    segment_field: &str,
    mode: centroid::CentroidMode,
) -> Result<(), CfAppError> {
    let segments = shapefile_ops::read_road_segments(
        network_file,
        segment_field,
        &Default::default(),
    )?;
    let features = centroid::segment_centroids(&segments, mode);
    writers::write_centroids(Path::new(output_file), &features, segment_field)?;
    Ok(())
}

struct OutputFiles {
    centroids: PathBuf,
    routes_csv: PathBuf,
    routes_dbf: PathBuf,
    counts_csv: PathBuf,
}

impl OutputFiles {
    fn new(directory: &Path, conf: &WorkflowConfiguration) -> OutputFiles {
        OutputFiles {
            centroids: directory.join(&conf.filenames.centroids),
            routes_csv: directory.join(&conf.filenames.routes_csv),
            routes_dbf: directory.join(&conf.filenames.routes_dbf),
            counts_csv: directory.join(&conf.filenames.counts_csv),
        }
    }

    /// creates the output directory and fails before any work is done if an
    /// output exists and may not be replaced.
    fn prepare(&self, directory: &Path, overwrite: bool) -> Result<(), CfAppError> {
        if !directory.is_dir() {
            std::fs::create_dir_all(directory)?;
        }
        if overwrite {
            return Ok(());
        }
        for path in [
            &self.centroids,
            &self.routes_csv,
            &self.routes_dbf,
            &self.counts_csv,
        ] {
            if path.exists() {
                return Err(CfAppError::OutputExists(path.to_string_lossy().to_string()));
            }
        }
        Ok(())
    }
}
