use crate::ai::GeminiClient;
use crate::config::{FontOption, LogoConfig, LogoConfigPatch};
use crate::export::{DEFAULT_SUPERSAMPLE, ExportFormat, ExportOptions, Exporter};
use crate::render::CANVAS_WIDTH;
use crate::studio::LogoStudio;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "logoforge", version, about = "Wordmark logo customizer")]
pub struct Args {
    /// Config JSON file; any subset of fields, merged over the defaults
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Per-field overrides applied on top of the config file.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct Overrides {
    #[arg(long, global = true)]
    pub text_main: Option<String>,
    #[arg(long, global = true)]
    pub text_secondary: Option<String>,
    #[arg(long, global = true)]
    pub text_tagline: Option<String>,

    #[arg(long, global = true)]
    pub color_main: Option<String>,
    #[arg(long, global = true)]
    pub color_main_rest: Option<String>,
    #[arg(long, global = true)]
    pub color_secondary: Option<String>,
    #[arg(long, global = true)]
    pub color_tagline: Option<String>,
    #[arg(long, global = true)]
    pub bg_color: Option<String>,

    /// Font stack for all text
    #[arg(long, value_enum, global = true)]
    pub font: Option<FontOption>,

    #[arg(long, global = true, allow_negative_numbers = true)]
    pub letter_spacing_main: Option<f64>,
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub letter_spacing_tagline: Option<f64>,
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub gap_size: Option<f64>,
}

impl Overrides {
    pub fn to_patch(&self) -> LogoConfigPatch {
        LogoConfigPatch {
            text_main: self.text_main.clone(),
            text_secondary: self.text_secondary.clone(),
            text_tagline: self.text_tagline.clone(),
            color_main: self.color_main.clone(),
            color_main_rest: self.color_main_rest.clone(),
            color_secondary: self.color_secondary.clone(),
            color_tagline: self.color_tagline.clone(),
            bg_color: self.bg_color.clone(),
            font_family: self.font.map(|f| f.value().to_string()),
            letter_spacing_main: self.letter_spacing_main,
            letter_spacing_tagline: self.letter_spacing_tagline,
            gap_size: self.gap_size,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the SVG to stdout or write it to a file
    Render {
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Write SVG and/or PNG files named after the logo texts
    Export {
        #[arg(short = 'f', long = "format", value_enum, default_value = "both")]
        format: FormatArg,

        #[arg(short = 'd', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,

        /// Width the logo is displayed at; PNG output is this times the scale
        #[arg(long, default_value_t = CANVAS_WIDTH as f32)]
        display_width: f32,

        #[arg(long, default_value_t = DEFAULT_SUPERSAMPLE)]
        scale: f32,
    },

    /// Ask the AI service to modify the logo
    Generate {
        #[arg(short = 'p', long = "prompt")]
        prompt: String,

        /// Write the resulting config here instead of stdout
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Also export the result
        #[arg(long, value_enum)]
        export: Option<FormatArg>,

        #[arg(short = 'd', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,

        #[arg(long)]
        model: Option<String>,
    },

    /// Print the effective config as JSON
    Show,

    /// List the font options
    Fonts,

    /// Print the default config as JSON
    Defaults,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Svg,
    Png,
    Both,
}

impl FormatArg {
    fn formats(self) -> &'static [ExportFormat] {
        match self {
            FormatArg::Svg => &[ExportFormat::Svg],
            FormatArg::Png => &[ExportFormat::Png],
            FormatArg::Both => &[ExportFormat::Svg, ExportFormat::Png],
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    let mut studio = LogoStudio::with_config(config)?;

    match args.command {
        Command::Render { output } => match output {
            Some(path) => {
                std::fs::write(&path, studio.render().markup())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "wrote svg");
            }
            None => println!("{}", studio.render().markup()),
        },
        Command::Export {
            format,
            out_dir,
            display_width,
            scale,
        } => {
            let opts = ExportOptions::for_display_width(display_width).with_scale(scale);
            export(&studio, format.formats(), &out_dir, &opts)?;
        }
        Command::Generate {
            prompt,
            save_config,
            export: export_format,
            out_dir,
            model,
        } => {
            let mut client = GeminiClient::from_env();
            if let Some(model) = model {
                client = client.with_model(model);
            }
            if !client.has_api_key() {
                warn!("no API key found in GEMINI_API_KEY or API_KEY");
            }

            studio.generate(&client, prompt)?;

            let json = studio.config().to_json_pretty()?;
            match save_config {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "saved generated config");
                }
                None => println!("{json}"),
            }

            if let Some(format) = export_format {
                export(&studio, format.formats(), &out_dir, &ExportOptions::default())?;
            }
        }
        Command::Show => println!("{}", studio.config().to_json_pretty()?),
        Command::Fonts => {
            for option in FontOption::ALL {
                let name = option
                    .to_possible_value()
                    .map(|v| v.get_name().to_string())
                    .unwrap_or_default();
                println!("{name:<16} {:<20} {}", option.label(), option.value());
            }
        }
        Command::Defaults => println!("{}", LogoConfig::default().to_json_pretty()?),
    }

    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => match std::env::var("LOG_LEVEL")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries SVG and JSON output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Defaults, then the config file, then the command-line overrides.
fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<LogoConfig> {
    let file = match path {
        Some(path) => LogoConfigPatch::from_file(path)?,
        None => LogoConfigPatch::new(),
    };
    let config = file
        .overlay(overrides.to_patch())
        .apply_to(&LogoConfig::default());
    config.validate()?;
    Ok(config)
}

fn export(
    studio: &LogoStudio,
    formats: &[ExportFormat],
    out_dir: &Path,
    opts: &ExportOptions,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    for format in formats {
        let artifact = match format {
            ExportFormat::Svg => studio.export_svg(),
            ExportFormat::Png => studio.export_png(&Exporter::new(), opts)?,
        };
        let path = artifact.write_to_dir(out_dir)?;
        println!("{}", path.display());
    }
    Ok(())
}
