//! Tiling instance model and file I/O

pub mod io;
pub mod model;

pub use io::{create_example_instances, load_instance_from_file, parse_instance_from_str};
pub use model::{ColorId, Instance, TileType};
