//! Expression configuration.

/// Celsius-space and Kelvin-space names of one temperature variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperatureAlias {
    /// Name used in SPICE text and in declared variable lists, e.g. `temp`
    pub celsius: String,
    /// Name used inside the COMSOL idiom, e.g. `T`
    pub kelvin: String,
}

/// Configuration shared by the parsers and the generator.
#[derive(Debug, Clone)]
pub struct ExprConfig {
    aliases: Vec<TemperatureAlias>,
}

impl Default for ExprConfig {
    fn default() -> Self {
        Self {
            aliases: vec![TemperatureAlias {
                celsius: "temp".to_string(),
                kelvin: "T".to_string(),
            }],
        }
    }
}

impl ExprConfig {
    /// Create a new configuration with the default `temp`/`T` alias.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with no temperature aliases at all.
    pub fn without_aliases() -> Self {
        Self { aliases: Vec::new() }
    }

    /// Add a temperature alias.
    ///
    /// Any existing pair that uses either name is replaced.
    pub fn with_temperature_alias(mut self, celsius: impl Into<String>, kelvin: impl Into<String>) -> Self {
        let alias = TemperatureAlias {
            celsius: celsius.into(),
            kelvin: kelvin.into(),
        };
        self.aliases
            .retain(|a| a.celsius != alias.celsius && a.kelvin != alias.kelvin);
        self.aliases.push(alias);
        self
    }

    /// Configured aliases, in insertion order.
    pub fn aliases(&self) -> &[TemperatureAlias] {
        &self.aliases
    }

    /// Kelvin-space name for a Celsius-space variable.
    pub fn kelvin_name(&self, celsius: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|a| a.celsius == celsius)
            .map(|a| a.kelvin.as_str())
    }

    /// Celsius-space name for a Kelvin-space identifier.
    pub fn celsius_name(&self, kelvin: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|a| a.kelvin == kelvin)
            .map(|a| a.celsius.as_str())
    }
}
