pub mod raster;
pub mod vector;
