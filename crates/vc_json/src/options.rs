use serde::{Deserialize, Serialize};

use crate::AssemblyStyle;
use crate::protocol::{ContextStates, StreamingContext};

/// The plain-data settings of a [`JsonFormatter`](crate::JsonFormatter).
///
/// Missing fields take their default, so a host can keep the settings in
/// its own configuration file and give only what it changes.
///
/// # Examples
///
/// ```
/// use vc_json::{AssemblyStyle, ContextStates, FormatterConfig};
///
/// let config: FormatterConfig = serde_json::from_str(r#"{ "assembly_style": "full" }"#).unwrap();
/// assert_eq!(config.assembly_style, AssemblyStyle::Full);
/// assert!(config.pretty);
/// assert_eq!(config.context_states, ContextStates::ALL);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub assembly_style: AssemblyStyle,
    /// Indent text output.
    pub pretty: bool,
    pub context_states: ContextStates,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            assembly_style: AssemblyStyle::Simple,
            pretty: true,
            context_states: ContextStates::ALL,
        }
    }
}

impl FormatterConfig {
    #[inline]
    pub fn context(&self) -> StreamingContext {
        StreamingContext::new(self.context_states)
    }
}

#[cfg(test)]
mod tests {
    use super::FormatterConfig;
    use crate::protocol::ContextStates;

    #[test]
    fn config_round_trip() {
        let config = FormatterConfig {
            pretty: false,
            context_states: ContextStates::FILE | ContextStates::PERSISTENCE,
            ..FormatterConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let back: FormatterConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
        assert!(config.context().states().contains(ContextStates::FILE));
    }
}
