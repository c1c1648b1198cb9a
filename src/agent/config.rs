pub const DEFAULT_MAX_ITERATIONS: usize = 10;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Maximum engine/tool round-trips per task
    pub max_iterations: usize,
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.temperature, 0.7);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AgentConfig::new()
            .with_max_iterations(3)
            .with_temperature(0.0);

        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.temperature, 0.0);
    }
}
