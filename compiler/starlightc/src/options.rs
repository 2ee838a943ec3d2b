//! Command-line options, parsed by hand from the argument list.

use std::path::PathBuf;

use starlight_codegen::CodegenConfig;
use starlight_diagnostic::emitter::ColorMode;
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Compile to JavaScript.
    Compile,
    /// Dump the token list.
    Tokens,
    /// Dump the syntax tree.
    Ast,
    /// Parse and generate, reporting errors only.
    Check,
}

impl Command {
    pub fn parse(name: &str) -> Option<Command> {
        match name {
            "compile" => Some(Command::Compile),
            "tokens" => Some(Command::Tokens),
            "ast" => Some(Command::Ast),
            "check" => Some(Command::Check),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Compile => "compile",
            Command::Tokens => "tokens",
            Command::Ast => "ast",
            Command::Check => "check",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub command: Command,
    pub input: PathBuf,
    /// Where `compile` writes its output. Standard output when absent.
    pub output: Option<PathBuf>,
    pub color: ColorMode,
    pub codegen: CodegenConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("missing command")]
    MissingCommand,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing input file")]
    MissingInput,
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error("'{flag}' needs a value")]
    MissingValue { flag: String },
    #[error("invalid value '{value}' for '{flag}'")]
    InvalidValue { flag: String, value: String },
    #[error("'{flag}' only applies to the compile command")]
    NotForCommand { flag: String },
}

impl CliOptions {
    /// Parse the arguments that follow the program name.
    ///
    /// `-o` takes the next argument; every other option is `--name=value`.
    pub fn parse(args: &[String]) -> Result<CliOptions, UsageError> {
        let (name, rest) = args.split_first().ok_or(UsageError::MissingCommand)?;
        let command =
            Command::parse(name).ok_or_else(|| UsageError::UnknownCommand(name.clone()))?;

        let mut input = None;
        let mut output = None;
        let mut color = ColorMode::Auto;
        let mut codegen = CodegenConfig::default();

        let mut i = 0;
        while i < rest.len() {
            let arg = rest[i].as_str();
            if arg == "-o" {
                let path = rest.get(i + 1).ok_or_else(|| UsageError::MissingValue {
                    flag: "-o".to_string(),
                })?;
                output = Some(PathBuf::from(path));
                i += 2;
                continue;
            }
            if let Some(value) = arg.strip_prefix("--color=") {
                color = ColorMode::parse(value).ok_or_else(|| invalid("--color", value))?;
            } else if let Some(value) = arg.strip_prefix("--print-binding=") {
                if value.is_empty() {
                    return Err(invalid("--print-binding", value));
                }
                codegen.print_binding = value.to_string();
            } else if let Some(value) = arg.strip_prefix("--indent=") {
                codegen.indent_width = value.parse().map_err(|_| invalid("--indent", value))?;
            } else if arg.starts_with('-') || input.is_some() {
                return Err(UsageError::UnexpectedArgument(arg.to_string()));
            } else {
                input = Some(PathBuf::from(arg));
            }
            i += 1;
        }

        if command != Command::Compile && output.is_some() {
            return Err(UsageError::NotForCommand {
                flag: "-o".to_string(),
            });
        }

        Ok(CliOptions {
            command,
            input: input.ok_or(UsageError::MissingInput)?,
            output,
            color,
            codegen,
        })
    }
}

fn invalid(flag: &str, value: &str) -> UsageError {
    UsageError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    }
}
