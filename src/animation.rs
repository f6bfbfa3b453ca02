pub mod ease;
pub mod frame_loop;
pub mod paths;
pub mod preview;
pub mod timing;
pub mod waypoints;
