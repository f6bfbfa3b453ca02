pub mod controller;
pub mod markers;
pub mod transient;
pub mod traveler;
pub mod viewport;
