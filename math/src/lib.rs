/// Defines useful functions for common math operations, tools and constants:
/// - Barycentric interpolation on not only primitive types,
/// - Signed triangle area in the UV plane and the barycentric solve built on it.
pub mod float;

/// Homogeneous-coordinate maths module.
/// - Types: 2D texture coordinates, 3D points and vectors, 3x3 matrices.
/// - Macro `assert_close!` to check if two vectors are close to each other.
pub mod hcm;
