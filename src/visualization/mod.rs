pub mod renderer;
pub mod sphere_geometry;
pub mod viewport;
