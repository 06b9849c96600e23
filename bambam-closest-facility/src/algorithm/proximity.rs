use crate::model::{
    network::{shapefile_ops::PointFeature, RoadNetwork},
    unit::DistanceConfig,
};
use kdam::tqdm;

/// selects the point features lying within a distance of any network edge.
/// features without geometry are never selected. selection preserves the
/// original order and row indices of the features.
pub fn select_within_distance(
    features: &[PointFeature],
    network: &RoadNetwork,
    radius: &DistanceConfig,
) -> Vec<PointFeature> {
    let meters = radius.meters();
    let iter = tqdm!(
        features.iter(),
        total = features.len(),
        desc = "select features near network"
    );
    let selected = iter
        .filter(|f| match &f.point {
            Some(p) => network.is_within_distance(p, meters),
            None => false,
        })
        .cloned()
        .collect::<Vec<_>>();
    eprintln!();
    log::info!(
        "selected {} of {} features within {} of the network",
        selected.len(),
        features.len(),
        radius
    );
    selected
}
