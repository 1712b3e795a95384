use clap::Parser;
use imageproc::drawing::draw_hollow_rect_mut;
use maskmatch::io::{load_rgb_image, to_rgb_image};
use maskmatch::{
    BestMatch, LocateConfig, Locator, MatchOutcome, Metric, OwnedImage, Rect, ScaleObserver,
    ScaleRange, ScaleReport, Template,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

const OUTLINE_COLOR: image::Rgb<u8> = image::Rgb([0, 0, 255]);
const OUTLINE_THICKNESS: usize = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "MaskMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output (per-scale scores at debug level).
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    SumSquared,
    L2Norm,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::SumSquared => Metric::SumSquared,
            MetricConfig::L2Norm => Metric::L2Norm,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SearchConfigJson {
    working_dimension: usize,
    lower_fraction: f64,
    upper_fraction: f64,
    metric: MetricConfig,
    parallel: bool,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        Self {
            working_dimension: 200,
            lower_fraction: 0.1,
            upper_fraction: 0.4,
            metric: MetricConfig::SumSquared,
            parallel: false,
        }
    }
}

impl SearchConfigJson {
    fn to_locate_config(&self) -> LocateConfig {
        LocateConfig {
            metric: self.metric.into(),
            parallel: self.parallel,
            ..LocateConfig::from_fractions(
                self.working_dimension,
                self.lower_fraction,
                self.upper_fraction,
            )
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    image_path: String,
    template_path: String,
    output_path: Option<String>,
    annotated_path: Option<String>,
    search: SearchConfigJson,
}

#[derive(Debug, Serialize)]
struct RectRecord {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl From<Rect> for RectRecord {
    fn from(value: Rect) -> Self {
        Self {
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    score: f64,
    scale: usize,
    working_rect: RectRecord,
    source_rect: RectRecord,
    working_scale: f64,
}

impl From<BestMatch> for MatchRecord {
    fn from(value: BestMatch) -> Self {
        Self {
            score: value.score,
            scale: value.scale,
            working_rect: value.rect.into(),
            source_rect: value.source_rect().into(),
            working_scale: value.working_scale,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    best: Option<MatchRecord>,
    scales_scored: usize,
}

/// Forwards per-scale progress to `tracing` and counts scored scales.
#[derive(Default)]
struct ProgressLog {
    scored: usize,
}

impl ScaleObserver for ProgressLog {
    fn on_scale(&mut self, report: &ScaleReport<'_>) {
        self.scored += 1;
        tracing::debug!(
            scale = report.candidate.scale,
            score = report.candidate.score,
            x = report.candidate.rect.x,
            y = report.candidate.rect.y,
            improved = report.improved,
            "scale scored"
        );
    }

    fn on_finish(&mut self, outcome: &MatchOutcome) {
        match outcome {
            MatchOutcome::Found(best) => tracing::info!(
                score = best.score,
                scale = best.scale,
                "all time best"
            ),
            MatchOutcome::NoFeasibleScale => tracing::info!("template never fits the image"),
        }
    }
}

fn save_annotated(
    working: &OwnedImage,
    best: &BestMatch,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut canvas = to_rgb_image(working)?;
    let rect = best.rect;
    for inset in 0..OUTLINE_THICKNESS {
        let width = rect.width.saturating_sub(2 * inset);
        let height = rect.height.saturating_sub(2 * inset);
        if width == 0 || height == 0 {
            break;
        }
        let outline = imageproc::rect::Rect::at((rect.x + inset) as i32, (rect.y + inset) as i32)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(&mut canvas, outline, OUTLINE_COLOR);
    }
    canvas.save(path)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("maskmatch=info".parse()?)
                    .add_directive("maskmatch_cli=debug".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() || config.template_path.is_empty() {
        return Err("image_path and template_path must be set in the config".into());
    }

    let image = load_rgb_image(&config.image_path)?;
    let template = Template::from_image(load_rgb_image(&config.template_path)?);
    let locator = Locator::new(&template).with_config(config.search.to_locate_config());
    let (working, factor) = locator.working_image(image.view())?;
    let scales = ScaleRange::from_config(locator.config());

    let mut progress = ProgressLog::default();
    let outcome = locator.search_scales(working.view(), scales, factor, &mut progress)?;

    if let (Some(path), Some(best)) = (config.annotated_path.as_deref(), outcome.best()) {
        save_annotated(&working, best, path)?;
    }

    let output = Output {
        best: outcome.into_best().map(MatchRecord::from),
        scales_scored: progress.scored,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
