use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod check_config;
pub mod dispatch;
pub mod mint;
pub mod run;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Run => run::cmd_run(&args[1..]),
        CliVerb::Dispatch => dispatch::cmd_dispatch(&args[1..]),
        CliVerb::CheckConfig => check_config::cmd_check_config(&args[1..]),
        CliVerb::Mint => mint::cmd_mint(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
