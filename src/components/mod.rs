pub mod network_map;
