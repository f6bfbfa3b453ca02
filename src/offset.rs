pub mod traveler_paths;
