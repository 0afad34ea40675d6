use anyhow::{anyhow, bail, Result};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Flags that never take a value.
const SWITCHES: &[&str] = &["auction-only", "auction", "help"];

/// Parsed command line: `<command> [positionals] [--flag value] [--switch]`.
#[derive(Debug, Default)]
pub struct Args {
    pub command: Option<String>,
    pub positionals: Vec<String>,
    values: HashMap<String, String>,
    switches: HashSet<String>,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(raw: I) -> Result<Self> {
        let mut args = Args::default();
        let mut iter = raw.into_iter();

        while let Some(token) = iter.next() {
            if let Some(name) = token.strip_prefix("--") {
                if let Some((k, v)) = name.split_once('=') {
                    args.values.insert(k.to_string(), v.to_string());
                } else if SWITCHES.contains(&name) {
                    args.switches.insert(name.to_string());
                } else {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("--{name} expects a value"))?;
                    args.values.insert(name.to_string(), value);
                }
            } else if args.command.is_none() {
                args.command = Some(token);
            } else {
                args.positionals.push(token);
            }
        }

        Ok(args)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn parsed<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.value(name)
            .map(|v| v.parse::<T>().map_err(|e| anyhow!("--{name}: {e}")))
            .transpose()
    }

    pub fn positional(&self, index: usize, what: &str) -> Result<&str> {
        match self.positionals.get(index) {
            Some(v) => Ok(v),
            None => bail!("missing <{what}>"),
        }
    }
}
