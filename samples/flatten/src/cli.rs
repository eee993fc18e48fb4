use std::path::PathBuf;

use clap::ValueHint;
use meshweld::{Precision, Precisions};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,meshweld=info,flatten=info",
        env = "FLATTEN_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    /// Quantization factor for positions; values are cut to `floor(v * P) / P`
    #[arg(long, default_value = "10000", value_parser = parse_precision, env = "FLATTEN_POSITION_PRECISION")]
    pub position_precision: Precision,
    /// Quantization factor for normals
    #[arg(long, default_value = "10000", value_parser = parse_precision, env = "FLATTEN_NORMAL_PRECISION")]
    pub normal_precision: Precision,
    /// Quantization factor for tangents
    #[arg(long, default_value = "10000", value_parser = parse_precision, env = "FLATTEN_TANGENT_PRECISION")]
    pub tangent_precision: Precision,
    /// Quantization factor for binormals
    #[arg(long, default_value = "10000", value_parser = parse_precision, env = "FLATTEN_BINORMAL_PRECISION")]
    pub binormal_precision: Precision,
    /// Quantization factor for vertex colors
    #[arg(long, default_value = "10000", value_parser = parse_precision, env = "FLATTEN_COLOR_PRECISION")]
    pub color_precision: Precision,
    /// Quantization factor for texture coordinates
    #[arg(long, default_value = "10000", value_parser = parse_precision, env = "FLATTEN_TEXCOORD_PRECISION")]
    pub texcoord_precision: Precision,
    /// Weld each attribute kind on its own thread
    #[arg(long)]
    pub parallel: bool,
    /// glTF files to flatten
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn precisions(&self) -> Precisions {
        Precisions {
            position: self.position_precision,
            normal: self.normal_precision,
            tangent: self.tangent_precision,
            binormal: self.binormal_precision,
            color: self.color_precision,
            texcoord: self.texcoord_precision,
        }
    }
}

fn parse_precision(s: &str) -> Result<Precision, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let factor: f32 = s.trim().parse()?;
    Ok(Precision::new(factor)?)
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
