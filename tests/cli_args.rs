//! Integration tests for CLI argument handling
//!
//! Tests subcommand parsing and configuration errors from the command line.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_beritaportal"))
        .args(args)
        .env_remove("BERITA_API_URL")
        .env_remove("BERITA_IMAGE_URL")
        .env_remove("BERITA_TIMEOUT_SECS")
        .output()
        .expect("Failed to execute beritaportal")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("beritaportal"), "Help should mention beritaportal");
    assert!(stdout.contains("category"), "Help should list the category subcommand");
    assert!(stdout.contains("api-url"), "Help should mention --api-url");
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_api_url_prints_error_and_exits() {
    let output = run_cli(&["categories"]);
    assert!(
        !output.status.success(),
        "Expected a missing API URL to fail"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("BERITA_API_URL"),
        "Should name the missing variable: {}",
        stderr
    );
}

#[test]
fn test_invalid_page_prints_error_and_exits() {
    let output = run_cli(&["page", "karir", "--api-url", "http://127.0.0.1:9"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid page"),
        "Should print error message about invalid page: {}",
        stderr
    );
}

#[test]
fn test_subcommand_help_is_valid() {
    let output = run_cli(&["category", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("start-date"));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use beritaportal::cli::{parse_page_arg, Cli, Command};
    use beritaportal::data::StaticPage;
    use clap::Parser;

    #[test]
    fn test_cli_search_defaults() {
        let cli = Cli::parse_from(["beritaportal", "search", "banjir"]);
        assert_eq!(
            cli.command,
            Command::Search {
                query: "banjir".to_string(),
                page: 1,
                limit: 10,
            }
        );
    }

    #[test]
    fn test_cli_banners_with_position() {
        let cli = Cli::parse_from(["beritaportal", "banners", "--position", "di headline"]);
        assert_eq!(
            cli.command,
            Command::Banners {
                position: Some("di headline".to_string()),
            }
        );
    }

    #[test]
    fn test_cli_article_galeri_flag() {
        let cli = Cli::parse_from(["beritaportal", "article", "12", "--galeri"]);
        assert_eq!(
            cli.command,
            Command::Article {
                id: "12".to_string(),
                galeri: true,
            }
        );
    }

    #[test]
    fn test_cli_videos_paging() {
        let cli = Cli::parse_from(["beritaportal", "videos", "--page", "3", "--limit", "6"]);
        assert_eq!(cli.command, Command::Videos { page: 3, limit: 6 });
    }

    #[test]
    fn test_cli_unknown_subcommand_is_error() {
        assert!(Cli::try_parse_from(["beritaportal", "weather"]).is_err());
    }

    #[test]
    fn test_parse_page_arg_tentang_kami() {
        let result = parse_page_arg("tentang-kami");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), StaticPage::TentangKami);
    }

    #[test]
    fn test_portal_config_from_flags_only() {
        let cli = Cli::parse_from([
            "beritaportal",
            "--api-url",
            "http://localhost:3000/api",
            "--image-url",
            "http://localhost:3000/",
            "home",
        ]);
        let config = cli.portal_config(|_| None).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/api");
        assert_eq!(config.image_base, "http://localhost:3000");
    }
}
