use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use clap::ValueHint;
use shade3d_core::{ConfigError, DepthKey, SceneConfig, ShadeMapping, Viewport};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

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

#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
pub enum DepthKeyArg {
    Legacy,
    Centroid,
}

impl From<DepthKeyArg> for DepthKey {
    fn from(arg: DepthKeyArg) -> Self {
        match arg {
            DepthKeyArg::Legacy => DepthKey::Legacy,
            DepthKeyArg::Centroid => DepthKey::Centroid,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
pub enum ShadeMappingArg {
    Wrap,
    Clamp,
}

impl From<ShadeMappingArg> for ShadeMapping {
    fn from(arg: ShadeMappingArg) -> Self {
        match arg {
            ShadeMappingArg::Wrap => ShadeMapping::Wrap,
            ShadeMappingArg::Clamp => ShadeMapping::Clamp,
        }
    }
}

/// Flat-shaded software renderer for OBJ meshes
#[derive(Debug, clap::Parser)]
#[command(name = "shade3d", author, version, about)]
pub struct Cli {
    /// OBJ model to render; the built-in unit cube when omitted
    #[arg(value_hint = ValueHint::FilePath)]
    pub model: Option<PathBuf>,
    /// Render the built-in unit cube, ignoring any model in the config file
    #[arg(long, conflicts_with = "model")]
    pub cube: bool,
    /// TOML config file
    #[arg(short, long, env = "SHADE3D_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Viewport size in pixels
    #[arg(short, long, value_parser = parse_viewport, value_name = "WIDTHxHEIGHT")]
    pub size: Option<Viewport>,
    /// Painter's ordering key
    #[arg(long, value_enum)]
    pub depth_key: Option<DepthKeyArg>,
    /// Intensity to gray level mapping
    #[arg(long, value_enum)]
    pub shade_mapping: Option<ShadeMappingArg>,
    /// Render into memory instead of the terminal
    #[arg(long)]
    pub headless: bool,
    /// Number of frames to render in headless mode
    #[arg(long, default_value_t = 600)]
    pub frames: u64,
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,shade3d_core=info,shade3d_terminal=info",
        env = "SHADE3D_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Write logs to a file instead of stderr, which the renderer shares
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Resolve the scene config: file first, then command line overrides.
    pub fn scene_config(&self) -> Result<SceneConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load_from_path(path)?,
            None => SceneConfig::default(),
        };

        if self.cube {
            config.model = None;
        } else if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(size) = self.size {
            config.viewport = size;
        }
        if let Some(depth_key) = self.depth_key {
            config.depth_key = depth_key.into();
        }
        if let Some(shade_mapping) = self.shade_mapping {
            config.shade_mapping = shade_mapping.into();
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_viewport(
    s: &str,
) -> Result<Viewport, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let (width, height) = s
        .trim()
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or("expected WIDTHxHEIGHT")?;
    Ok(Viewport::new(
        u32::from_str(width.trim())?,
        u32::from_str(height.trim())?,
    ))
}

/// Set up log output
pub(crate) fn initialize_tracing(cli: &Cli) -> std::io::Result<()> {
    let writer = match &cli.log_file {
        Some(path) => BoxMakeWriter::new(Mutex::new(std::fs::File::create(path)?)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let tsub = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(cli.log_file.is_none())
        .with_env_filter(cli.log_filter.as_str());

    match cli.log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
    Ok(())
}
