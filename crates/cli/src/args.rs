//! Command line arguments.

use clap::Parser;

use torrengo_core::{SearchRequest, TargetSource, ValidationError};

/// Search torrent websites and open the chosen result in your torrent client.
#[derive(Debug, Parser)]
#[command(name = "torrengo", version)]
pub struct Args {
    /// Website to search: a configured source name, or "all" [default: from config]
    #[arg(short = 'w', long = "website", value_name = "SOURCE")]
    pub website: Option<String>,

    /// Search terms, joined with single spaces
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    pub query: Vec<String>,
}

impl Args {
    /// Validate the arguments into a search, falling back to
    /// `default_source` when `-w` was not given.
    pub fn to_request(&self, default_source: &str) -> Result<SearchRequest, ValidationError> {
        let target = TargetSource::parse(self.website.as_deref().unwrap_or(default_source))?;
        SearchRequest::new(&self.query.join(" "), target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("torrengo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_named_source_and_joined_query() {
        let args = parse(&["-w", "archive", "ubuntu", "22.04"]);
        let request = args.to_request("all").unwrap();

        assert_eq!(request.query(), "ubuntu 22.04");
        assert_eq!(request.target(), &TargetSource::Named("archive".to_string()));
    }

    #[test]
    fn test_long_flag() {
        let args = parse(&["--website", "all", "debian"]);
        let request = args.to_request("archive").unwrap();
        assert_eq!(request.target(), &TargetSource::All);
    }

    #[test]
    fn test_default_source_from_config() {
        let args = parse(&["debian"]);
        assert!(args.website.is_none());

        let request = args.to_request("archive").unwrap();
        assert_eq!(request.target(), &TargetSource::Named("archive".to_string()));
    }

    #[test]
    fn test_query_is_trimmed() {
        let args = parse(&["  ubuntu  "]);
        assert_eq!(args.to_request("all").unwrap().query(), "ubuntu");
    }

    #[test]
    fn test_missing_query_fails_validation() {
        let args = parse(&["-w", "archive"]);
        assert_eq!(
            args.to_request("all").unwrap_err(),
            ValidationError::EmptyQuery
        );
    }

    #[test]
    fn test_blank_query_fails_validation() {
        let args = parse(&["   ", " "]);
        assert_eq!(
            args.to_request("all").unwrap_err(),
            ValidationError::EmptyQuery
        );
    }

    #[test]
    fn test_empty_source_fails_validation() {
        let args = parse(&["-w", "", "ubuntu"]);
        assert_eq!(
            args.to_request("all").unwrap_err(),
            ValidationError::EmptySource
        );
    }
}
