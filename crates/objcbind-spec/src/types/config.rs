use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default build-time symbol guarding the token-based resolution path.
pub const DEFAULT_TOGGLE_SYMBOL: &str = "TOKENLOOKUP";

/// Binding configuration (objcbind.config.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BindingConfig {
    /// Which class-resolution path is active in the generated build
    #[serde(default)]
    pub resolution: ResolutionStrategy,

    /// Symbol tested by the generated `#if` around the token path
    #[serde(default = "default_toggle_symbol", skip_serializing_if = "is_default_toggle")]
    pub toggle_symbol: String,

    /// Indentation of generated source
    #[serde(default)]
    pub indent: IndentStyle,
}

/// How generated code resolves the managed class behind a proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    /// By metadata token: fast, but tied to the token numbering of one build
    Token,
    /// By namespace and type name: survives assembly rebuilds
    #[default]
    Name,
}

/// Indentation style configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Spaces(usize),
    #[default]
    Tabs,
}

fn default_toggle_symbol() -> String {
    DEFAULT_TOGGLE_SYMBOL.to_string()
}

fn is_default_toggle(symbol: &str) -> bool {
    symbol == DEFAULT_TOGGLE_SYMBOL
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self::new(ResolutionStrategy::default())
    }
}

impl BindingConfig {
    pub fn new(resolution: ResolutionStrategy) -> Self {
        Self {
            resolution,
            toggle_symbol: default_toggle_symbol(),
            indent: IndentStyle::default(),
        }
    }

    /// Value the toggle symbol must be defined to for this configuration.
    pub fn toggle_value(&self) -> u8 {
        match self.resolution {
            ResolutionStrategy::Token => 1,
            ResolutionStrategy::Name => 0,
        }
    }
}
