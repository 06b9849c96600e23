pub mod centroid;
pub mod proximity;
pub mod search;
pub mod summary;
