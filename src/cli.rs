use std::path::PathBuf;

use clap::Parser;

use crate::settings::ReplaySettings;

#[derive(Parser, Debug, Clone)]
#[command(name = "regionwatch")]
#[command(about = "Replay a regional measurement dataset as a live feed and ask about it")]
pub struct Cli {
    /// Dataset to replay (overrides the settings file)
    pub dataset: Option<PathBuf>,

    /// Path to a JSON settings file
    #[arg(short, long, default_value = "regionwatch.json")]
    pub config: PathBuf,

    /// Pause after each delivered reading, in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Deliver one of every N readings
    #[arg(long)]
    pub stride: Option<usize>,

    /// Readings kept per region
    #[arg(long)]
    pub history_limit: Option<usize>,

    /// Region to select before the replay starts
    #[arg(short, long)]
    pub region: Option<String>,

    /// Question to answer once the replay finishes (repeatable)
    #[arg(short, long)]
    pub ask: Vec<String>,

    /// Read questions and commands from stdin while the replay runs
    #[arg(short, long)]
    pub interactive: bool,

    /// Print published state as JSON lines instead of a summary line
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Fold command-line overrides into `settings`.
    pub fn apply_overrides(&self, settings: &mut ReplaySettings) {
        if let Some(dataset) = &self.dataset {
            settings.dataset_path = dataset.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            settings.interval_ms = interval_ms;
        }
        if let Some(stride) = self.stride {
            settings.sample_stride = stride;
        }
        if let Some(history_limit) = self.history_limit {
            settings.history_limit = history_limit;
        }
    }
}
