use clap::Parser;
use demodcore::Modulation;
use std::path::PathBuf;
use workflow::config::SessionConfig;
use workflow::runner::Runner;

mod generator;
mod probe;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Builds a demodulator chain and streams synthetic input through it")]
struct Args {
    /// Load a session config from YAML (overrides the flags below)
    #[arg(long)]
    session: Option<PathBuf>,
    /// One of am, nfm, wfm, ssb
    #[arg(long, default_value = "nfm")]
    modulation: Modulation,
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
    /// Wideband FM de-emphasis time constant in seconds
    #[arg(long, default_value_t = 50e-6)]
    tau: f32,
    #[arg(long, default_value_t = 1024)]
    block_size: usize,
    #[arg(long, default_value_t = 16)]
    blocks: usize,
    /// Change the input rate halfway through the run
    #[arg(long)]
    retune_rate: Option<u32>,
    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.session {
        SessionConfig::load(path)?
    } else {
        SessionConfig {
            block_size: args.block_size,
            blocks: args.blocks,
            retune_rate: args.retune_rate,
            ..SessionConfig::from_args(args.modulation, args.sample_rate, args.tau)
        }
    };

    let summary = Runner::new(config).execute()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} chain [{}] -> in {} samples, out {} samples, replacements {}",
            summary.modulation,
            summary.stages.join(" -> "),
            summary.input_samples,
            summary.output_samples,
            summary.replacements
        );
        if let Some(rate) = summary.fixed_if_sample_rate {
            println!("fixed IF sample rate: {} S/s", rate);
        }
        if summary.hd_audio {
            println!("output qualifies as HD audio");
        }
    }

    Ok(())
}
