use anyhow::{Result, bail};
use std::path::PathBuf;

pub const USAGE: &str =
    "Usage: autocomplete-entry [--config <path>] [--vocabulary <file>] [--log-file <path>] [--deferred]";

#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub vocabulary: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub deferred: bool,
    pub help: bool,
}

impl CliArgs {
    /// Parse arguments without the program name
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(value_for(&arg, args.next())?),
                "--vocabulary" => parsed.vocabulary = Some(value_for(&arg, args.next())?),
                "--log-file" => parsed.log_file = Some(value_for(&arg, args.next())?),
                "--deferred" => parsed.deferred = true,
                "-h" | "--help" => parsed.help = true,
                other => bail!("Unexpected argument '{other}'"),
            }
        }

        Ok(parsed)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<PathBuf> {
    match value {
        Some(value) if !value.starts_with("--") => Ok(PathBuf::from(value)),
        _ => bail!("Missing value for {flag}"),
    }
}
