//! octext - Ocarina of Time message table editor
//!
//! Usage:
//!   octext dump <ROM> [-o messages.toml]
//!   octext build <ROM> -m messages.toml -t <rom|relocated|patch|files> [-o OUT]
//!   octext codes

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ocarina_text::codes::{CodeDisplay, ControlCode};
use ocarina_text::{
    Config, DiagnosticReporter, MessageFile, MessageWarnings, PatchOutput, Session, TextError,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Output type for `build`
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum OutputType {
    /// Overwrite the table and bank inside the ROM
    #[default]
    Rom,
    /// Overwrite the ROM and redirect the character table references
    Relocated,
    /// Write a PPF 3.0 patch
    Patch,
    /// Write MessageTable.tbl and StringData.bin into a directory
    Files,
}

impl From<OutputType> for PatchOutput {
    fn from(value: OutputType) -> Self {
        match value {
            OutputType::Rom => PatchOutput::FullRomOverwrite,
            OutputType::Relocated => PatchOutput::RelocatedRomWithCodeFix,
            OutputType::Patch => PatchOutput::DiffPatch,
            OutputType::Files => PatchOutput::DirectoryFiles,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "octext")]
#[command(version)]
#[command(about = "Message table editor for the Ocarina of Time N64 ROM", long_about = None)]
struct Args {
    /// Configuration file (code overrides, ROM layout)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract every message into a TOML message file
    Dump {
        /// Input ROM
        rom: PathBuf,

        /// Message file to write
        #[arg(short, long, default_value = "messages.toml")]
        output: PathBuf,
    },
    /// Pack a message file and write it out
    Build {
        /// ROM the messages belong to
        rom: PathBuf,

        /// Message file to read
        #[arg(short, long, default_value = "messages.toml")]
        messages: PathBuf,

        /// Output type
        #[arg(short = 't', long, value_enum, default_value = "rom")]
        output_type: OutputType,

        /// Output path (defaults to the ROM for rom/relocated)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the configured control codes
    Codes,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut session = Session::from_config(&config)?;

    match &args.command {
        Command::Dump { rom, output } => dump(&mut session, rom, output),
        Command::Build {
            rom,
            messages,
            output_type,
            output,
        } => build(&mut session, rom, messages, *output_type, output.as_deref()),
        Command::Codes => {
            list_codes(&session);
            Ok(())
        }
    }
}

fn dump(session: &mut Session, rom: &Path, output: &Path) -> Result<()> {
    session
        .import_file(rom)
        .with_context(|| format!("reading messages from {}", rom.display()))?;
    report_warnings(session.import_warnings());

    let file = MessageFile::new(session.messages().to_vec());
    let text = file.to_toml()?;
    fs::write(output, text).with_context(|| format!("writing {}", output.display()))?;

    eprintln!("Dumped {} messages to {}", session.messages().len(), output.display());
    Ok(())
}

fn build(
    session: &mut Session,
    rom: &Path,
    messages: &Path,
    output_type: OutputType,
    output: Option<&Path>,
) -> Result<()> {
    let source = fs::read_to_string(messages)
        .with_context(|| format!("reading {}", messages.display()))?;
    let file = MessageFile::from_toml(&source)
        .with_context(|| format!("parsing {}", messages.display()))?;
    session.set_messages(file.messages);

    let strategy = PatchOutput::from(output_type);
    let target = match (output, strategy.patches_rom()) {
        (Some(path), _) => path.to_path_buf(),
        (None, true) => rom.to_path_buf(),
        (None, false) => anyhow::bail!("--output is required for {strategy}"),
    };

    let packed = session.pack(session.control_code_table());
    report_warnings(&packed.warnings);
    if !packed.is_clean() {
        report_failures(session, &packed.failures);
        anyhow::bail!("{} message(s) could not be encoded", packed.failures.len());
    }

    let written = if strategy.patches_rom() && target != rom {
        session.export_packed_copy(&packed, rom, &target, strategy)
    } else {
        session.export_packed(&packed, &target, strategy)
    };
    written.with_context(|| format!("writing {}", target.display()))?;

    eprintln!(
        "Wrote {} messages ({} bank bytes) to {} as {strategy}",
        packed.records.len(),
        packed.bank.len(),
        target.display()
    );
    Ok(())
}

fn report_warnings(warnings: &[MessageWarnings]) {
    if warnings.is_empty() {
        return;
    }
    let mut reporter = DiagnosticReporter::new();
    for entry in warnings {
        let file_id = reporter.add_message(entry.id, entry.text.clone());
        for warning in &entry.warnings {
            reporter.report_warning(file_id, warning);
        }
    }
}

fn report_failures(session: &Session, failures: &[TextError]) {
    let mut reporter = DiagnosticReporter::new();
    for failure in failures {
        let id = match failure {
            TextError::MalformedTag {
                message_id: Some(id),
                ..
            } => *id,
            other => {
                eprintln!("error: {other}");
                continue;
            }
        };
        let text = session
            .messages()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.text.clone())
            .unwrap_or_default();
        let file_id = reporter.add_message(id, text);
        reporter.report_error(file_id, failure);
    }
}

fn list_codes(session: &Session) {
    let table = session.control_code_table();
    println!("{:<6} {:<16} {:<10} display", "code", "tag", "operand");
    for code in ControlCode::ALL {
        let display = match table.display_for(code) {
            CodeDisplay::Literal(ch) => format!("'{ch}'"),
            CodeDisplay::Tag(name) => format!("<{name}>"),
        };
        println!(
            "{:<#6X} {:<16} {:<10} {display}",
            code.byte(),
            code.name(),
            code.operand().describe()
        );
    }
}
