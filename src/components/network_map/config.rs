/// Tunables for layout, drawing cadence and persistence.
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
	pub server_label: String,
	pub server_radius: f64,
	pub proxy_radius: f64,
	/// Satellites closer than `proxy_radius * separation_factor` overlap.
	pub separation_factor: f64,
	/// Extra gap kept between the server disc and any satellite disc.
	pub server_clearance: f64,
	pub padding_factor: f64,
	/// Fraction of the canvas extent used as the spiral's outer ellipse.
	pub spread: f64,
	pub max_attempts: u32,
	pub idle_repaint_ms: f64,
	pub pulse_cycle_ms: f64,
	pub storage_prefix: String,
}

impl Default for MapConfig {
	fn default() -> Self {
		Self {
			server_label: "Zabbix Server".into(),
			server_radius: 35.0,
			proxy_radius: 24.0,
			separation_factor: 2.8,
			server_clearance: 10.0,
			padding_factor: 1.2,
			spread: 0.40,
			max_attempts: 10,
			idle_repaint_ms: 1000.0,
			pulse_cycle_ms: 2000.0,
			storage_prefix: "networkMap".into(),
		}
	}
}

impl MapConfig {
	pub fn min_separation(&self) -> f64 {
		self.proxy_radius * self.separation_factor
	}

	pub fn server_min_distance(&self) -> f64 {
		self.server_radius + self.proxy_radius + self.server_clearance
	}

	pub fn padding(&self) -> f64 {
		self.proxy_radius * self.padding_factor
	}
}
