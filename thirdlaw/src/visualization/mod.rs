pub mod surface;
pub mod vectors;
pub mod style;
pub mod contact_scene;
pub mod orbit_scene;
pub mod headless;
pub mod lab_vis2d;
