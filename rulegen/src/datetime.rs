//! Internet timestamps such as `1985-04-12T23:20:50.52Z`.

use derive::Parser;
use parsegen::{Config, Error, Registry};

/// The rules [`DateTimeParser`] is derived from.
pub const GRAMMAR: &str = include_str!("../grammars/datetime.abnf");

#[derive(Parser)]
#[abnf_file = "grammars/datetime.abnf"]
pub struct DateTimeParser;

/// The same rules, declared at runtime.
pub fn registry() -> Result<Registry, Error> {
    let mut registry = Registry::with_config(Config::default());
    registry.declare_rulelist(GRAMMAR)?;
    Ok(registry)
}
