pub mod cognitive_map;
