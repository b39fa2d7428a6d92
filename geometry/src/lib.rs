/// Defines the `BBox` bounding-box type.
pub mod bvh;
/// Defines the `Ray` type with a bounded `[t_min, t_max)` extent.
pub mod ray;
