use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use procpeek::config::{load_config, Config, ConfigDefaults};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Read-only inspection of running processes", long_about = None)]
struct Cli {
    /// Configuration file (defaults to procpeek.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List running processes
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the base address of a module loaded in a process
    Base { process: String, module: String },
    /// Hex dump a range of process memory
    Read {
        process: String,
        /// Absolute address, or an offset when --module is given
        address: String,
        length: String,
        /// Resolve the address relative to this module's base
        #[arg(long)]
        module: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).with_context(|| {
        let path = cli
            .config
            .as_deref()
            .unwrap_or(Path::new(ConfigDefaults::CONFIG_FILE));
        format!("failed to load configuration from {}", path.display())
    })?;
    init_logging(&config, cli.verbose);
    debug!(?config, "configuration loaded");

    run(cli.command, &config)
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose { "debug" } else { config.logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(not(windows))]
fn run(_command: Command, _config: &Config) -> Result<()> {
    anyhow::bail!("procpeek only supports Windows");
}

#[cfg(windows)]
fn run(command: Command, config: &Config) -> Result<()> {
    use procpeek::core::types::parse_length;
    use procpeek::process::ProcessEnumerator;
    use procpeek::windows::NativeSystem;
    use procpeek::{with_process_config, Address};

    match command {
        Command::List { json } => {
            let system = NativeSystem::from_config(config);
            let processes = ProcessEnumerator::new(&system).list_processes()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&processes)?);
            } else {
                println!("{:>8}  NAME", "PID");
                for process in &processes {
                    println!("{:>8}  {}", process.pid, process.name);
                }
            }
        }
        Command::Base { process, module } => {
            let base = with_process_config(&process, config, |capability| -> Result<_> {
                Ok(capability.resolve_module_base(&module)?)
            })
            .with_context(|| format!("failed to resolve {} in {}", module, process))?;
            println!("{}", base);
        }
        Command::Read {
            process,
            address,
            length,
            module,
        } => {
            let address: Address = address
                .parse()
                .with_context(|| format!("bad address {:?}", address))?;
            let length = parse_length(&length).with_context(|| format!("bad length {:?}", length))?;

            let buffer = with_process_config(&process, config, |capability| -> Result<_> {
                let start = match &module {
                    Some(module) => capability
                        .resolve_module_base(module)?
                        .checked_add(address.as_usize())?,
                    None => address,
                };
                Ok(capability.read_memory(start, length)?)
            })
            .with_context(|| format!("failed to read memory of {}", process))?;

            print!("{}", hex_dump(buffer.address().as_usize(), buffer.as_bytes()));
        }
    }
    Ok(())
}

/// Classic 16-bytes-per-line dump with an ASCII column
#[cfg_attr(not(windows), allow(dead_code))]
fn hex_dump(start: usize, bytes: &[u8]) -> String {
    let mut out = String::new();
    for (index, chunk) in bytes.chunks(16).enumerate() {
        let encoded = hex::encode_upper(chunk);
        let pairs: Vec<&str> = (0..chunk.len())
            .map(|i| &encoded[i * 2..i * 2 + 2])
            .collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        out.push_str(&format!(
            "{:016X}  {:<47}  {}\n",
            start + index * 16,
            pairs.join(" "),
            ascii
        ));
    }
    out
}
