use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
mod auth;
use sealbox::{CostParams, Header, read_file, write_file_atomic};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

const SEALED_EXT: &str = "sbx";

#[derive(Debug, clap::Args)]
struct BudgetArgs {
    /// Maximum scratch memory for key derivation, in MiB (default: 64)
    #[arg(long = "max-mem")]
    max_mem_mib: Option<usize>,

    /// Maximum time to spend on key derivation, in seconds (default: 2.0)
    #[arg(long = "max-time")]
    max_time: Option<f64>,
}

#[derive(Debug, clap::Args)]
struct CostArgs {
    /// Explicit log2(N); skips budget-based tuning (default: 14)
    #[arg(long = "log-n")]
    log_n: Option<u8>,

    /// Explicit scrypt block size factor r (default: 8)
    #[arg(long)]
    r: Option<u32>,

    /// Explicit scrypt parallelism p (default: 1)
    #[arg(long)]
    p: Option<u32>,
}

impl CostArgs {
    fn is_set(&self) -> bool {
        self.log_n.is_some() || self.r.is_some() || self.p.is_some()
    }

    fn to_cost_params(&self) -> Result<CostParams> {
        CostParams::from_parts(
            self.log_n.unwrap_or(14),
            self.r.unwrap_or(8),
            self.p.unwrap_or(1),
        )
    }
}

#[derive(Debug, Parser)]
#[command(name = "sealbox")]
#[command(
    version,
    about = "Seal and open files with a memory-hard passphrase KDF."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a file into an authenticated container
    #[command(arg_required_else_help = true)]
    Seal {
        input: PathBuf,

        /// Output path (default: INPUT.sbx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        budget: BudgetArgs,

        #[command(flatten)]
        cost: CostArgs,
    },

    /// Decrypts a sealed container
    #[command(arg_required_else_help = true)]
    Open {
        input: PathBuf,

        /// Output path (default: INPUT without the .sbx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Shows the cost parameters stored in a container header
    #[command(arg_required_else_help = true)]
    Info { input: PathBuf },
}

fn sealed_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(SEALED_EXT);
    PathBuf::from(name)
}

fn opened_output_path(input: &Path) -> Result<PathBuf> {
    if input.extension().is_some_and(|ext| ext == SEALED_EXT) {
        return Ok(input.with_extension(""));
    }
    bail!(
        "cannot infer an output name for '{}'; pass --output",
        input.display()
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    match args.command {
        Commands::Seal {
            input,
            output,
            budget,
            cost,
        } => {
            let plaintext = Zeroizing::new(read_file(&input)?);
            let passphrase = auth::read_new_passphrase_with_confirmation()?;

            let sealed = if cost.is_set() {
                let params = cost.to_cost_params()?;
                sealbox::seal_with_params(&plaintext, passphrase.as_bytes(), &params)?
            } else {
                let max_mem = budget.max_mem_mib.unwrap_or(64) * 1024 * 1024;
                let max_time = budget.max_time.unwrap_or(2.0);
                sealbox::seal(&plaintext, passphrase.as_bytes(), max_mem, max_time)?
            };

            let output = output.unwrap_or_else(|| sealed_output_path(&input));
            write_file_atomic(&output, &sealed)?;
            println!("sealed '{}'", output.display());
        }
        Commands::Open { input, output } => {
            let container = read_file(&input)?;
            let passphrase = auth::read_passphrase()?;

            let plaintext = sealbox::open(&container, passphrase.as_bytes())?;

            let output = match output {
                Some(p) => p,
                None => opened_output_path(&input)?,
            };
            write_file_atomic(&output, &plaintext)?;
            println!("opened '{}'", output.display());
        }
        Commands::Info { input } => {
            let container = read_file(&input)?;
            let header = Header::from_bytes(&container)?;
            let params = header.params();

            println!("version: {}", header.version());
            println!("N:       {} (log2 = {})", params.n(), params.log2_n());
            println!("r:       {}", params.r());
            println!("p:       {}", params.p());
            println!(
                "memory:  {:.1} MiB",
                params.scratch_bytes() as f64 / (1024.0 * 1024.0)
            );
        }
    }

    Ok(())
}
