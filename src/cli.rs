use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-config",
    version,
    about = "Fetch, validate and serve the portfolio configuration document",
    long_about = "Loads the portfolio configuration document through the shared fetch-once store, validates local documents, and serves a document at its fixed resource path."
)]
pub struct Cli {
    /// Settings file path
    #[arg(short, long, value_name = "FILE", env = "PORTFOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable JSON logging
    #[arg(long, env = "PORTFOLIO_JSON_LOGS")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the document and print one section (or all of it) as JSON
    Show {
        /// Section to print
        #[arg(value_enum)]
        section: Option<Section>,

        /// Base URL of the site, overriding the settings file
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Parse a local document and summarize its sections
    Validate {
        /// Document to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Serve a document at the configured resource path
    Serve {
        /// Document to serve, overriding the settings file
        #[arg(short, long, value_name = "FILE")]
        document: Option<PathBuf>,

        /// Server port, overriding the settings file
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Personal,
    Brand,
    Social,
    Planets,
    Certifications,
    Experience,
    Projects,
    Skills,
    Education,
    Community,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_section() {
        let cli =
            Cli::try_parse_from(["portfolio-config", "show", "planets", "--url", "http://x"])
                .unwrap();
        match cli.command {
            Commands::Show { section, url } => {
                assert_eq!(section, Some(Section::Planets));
                assert_eq!(url.as_deref(), Some("http://x"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn validate_requires_a_file() {
        assert!(Cli::try_parse_from(["portfolio-config", "validate"]).is_err());
    }
}
