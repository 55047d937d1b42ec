#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Run,
    Dispatch,
    CheckConfig,
    Mint,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "run" => CliVerb::Run,
        "dispatch" => CliVerb::Dispatch,
        "check-config" => CliVerb::CheckConfig,
        "mint" => CliVerb::Mint,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  run [--config PATH] <invocation.json|->  Set vault metadata for one step invocation"
            .to_string(),
        "  dispatch [--config PATH]                 Run invocations read as JSON lines from stdin"
            .to_string(),
        "  check-config [--config PATH]             Load and validate the configuration"
            .to_string(),
        "  mint bag-id|nbn                          Print a freshly minted identifier".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}

/// Arguments left after `--config PATH` is taken out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonArgs {
    pub config: Option<String>,
    pub positional: Vec<String>,
}

pub fn split_common_args(args: &[String]) -> Result<CommonArgs, String> {
    let mut parsed = CommonArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter
                .next()
                .ok_or_else(|| "`--config` requires a path".to_string())?;
            parsed.config = Some(path.clone());
        } else if let Some(path) = arg.strip_prefix("--config=") {
            parsed.config = Some(path.to_string());
        } else if arg.starts_with("--") {
            return Err(format!("unknown option `{arg}`"));
        } else {
            parsed.positional.push(arg.clone());
        }
    }
    Ok(parsed)
}
