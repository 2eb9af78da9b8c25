/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

use crate::cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Info,
    Debug,
}

/// Filter directive for the given flags and configured level.
pub fn filter_directive<'a>(cli: &Cli, configured: &'a str) -> &'a str {
    if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        configured
    }
}

/// Initialise tracing on stderr so command output stays parseable.
///
/// `RUST_LOG` wins over the configured level unless `--verbose` or `--quiet`
/// was given.
pub fn init_logging(cli: &Cli, configured: &str) {
    let directive = filter_directive(cli, configured);
    let filter = if cli.quiet || cli.verbose {
        EnvFilter::new(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    };

    // a subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

pub fn should_print(cli: &Cli, level: LogLevel) -> bool {
    match level {
        LogLevel::Error => true,
        LogLevel::Info => !cli.quiet,
        LogLevel::Debug => cli.verbose && !cli.quiet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_flags_override_configured_level() {
        assert_eq!(filter_directive(&parse(&["md-ctl", "plugins"]), "warn"), "warn");
        assert_eq!(filter_directive(&parse(&["md-ctl", "-v", "plugins"]), "warn"), "debug");
        assert_eq!(filter_directive(&parse(&["md-ctl", "-q", "plugins"]), "warn"), "error");
    }

    #[test]
    fn test_should_print() {
        let quiet = parse(&["md-ctl", "--quiet", "plugins"]);
        assert!(should_print(&quiet, LogLevel::Error));
        assert!(!should_print(&quiet, LogLevel::Info));

        let verbose = parse(&["md-ctl", "--verbose", "plugins"]);
        assert!(should_print(&verbose, LogLevel::Debug));
    }
}
