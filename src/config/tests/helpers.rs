//! Layer composition for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::PrStatusConfig;

/// Configuration source, listed from lowest to highest precedence.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Defaults,
    File,
    Environment,
    Cli,
}

/// Merges `layers` in the order given, as the loader would.
pub fn merged(layers: Vec<(Source, Value)>) -> PrStatusConfig {
    let mut composer = MergeComposer::new();
    for (source, value) in layers {
        match source {
            Source::Defaults => composer.push_defaults(value),
            Source::File => composer.push_file(value, None),
            Source::Environment => composer.push_environment(value),
            Source::Cli => composer.push_cli(value),
        }
    }
    PrStatusConfig::merge_from_layers(composer.layers())
        .unwrap_or_else(|error| panic!("layers should merge: {error:?}"))
}
