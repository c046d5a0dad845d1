//! Library integration tests.

use stagecraft::pipeline::PipelineStep;
use stagecraft::StagecraftError;

#[test]
fn error_types_are_public() {
    let err = StagecraftError::NotAnAssetStep {
        step: PipelineStep::Channel,
    };
    assert!(err.to_string().contains("channel"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> stagecraft::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use stagecraft::cli::{Cli, Commands, LibrarySubcommand};

    let cli = Cli::parse_from(["stagecraft", "library", "list", "--json"]);

    if let Some(Commands::Library(args)) = cli.command {
        assert!(matches!(args.command, LibrarySubcommand::List { json: true }));
    } else {
        panic!("Expected Library command");
    }
}

#[test]
fn cargo_toml_has_release_profile() {
    let cargo_toml = include_str!("../Cargo.toml");
    assert!(cargo_toml.contains("[profile.release]"));
    assert!(cargo_toml.contains("lto = true"));
}
