use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "perf-visualizer")]
#[command(version)]
#[command(about = "Runtime memory, frame-rate and long-task visualizer", long_about = None)]
pub struct Cli {
    #[arg(
        short = 'c',
        long,
        global = true,
        help = "Path to configuration file",
        env = "PERF_VISUALIZER_CONFIG"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sample a running process and chart it live (default)
    Monitor(MonitorArgs),

    /// Open an exported session file in the chart view
    View {
        #[arg(help = "Session file to open")]
        file: PathBuf,
    },

    /// Run trend and spike detection over an exported session
    Analyze {
        #[arg(help = "Session file to analyze")]
        file: PathBuf,

        #[arg(
            short,
            long,
            help = "Detection window (e.g. 30s, 2m)",
            value_parser = parse_duration
        )]
        window: Option<Duration>,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct MonitorArgs {
    #[arg(short, long, help = "Process ID to sample (defaults to this process)")]
    pub pid: Option<u32>,

    #[arg(
        short = 'i',
        long,
        help = "Sampling interval (e.g. 250ms, 1s); clamped to 100ms..2s",
        value_parser = parse_duration
    )]
    pub interval: Option<Duration>,

    #[arg(long, help = "Samples retained per series")]
    pub capacity: Option<usize>,
}

fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}
