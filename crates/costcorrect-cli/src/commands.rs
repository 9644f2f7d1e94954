//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{output_boq, output_constants};
use costcorrect_app::app::{AnalysisOptions, BoqService};
use costcorrect_app::config::Config;
use costcorrect_app::export::{export_to_excel, load_boq_json};
use costcorrect_app::scanner::display_name;
use costcorrect_domain::{BoqInput, BrickConstants};
use costcorrect_types::{CacheError, Error, OutputFormat, Tier};
use costcorrect_vision::{parse_measurement, Cache, VisionConfig};
use std::error::Error as StdError;
use std::path::PathBuf;
use tracing::{debug, info};

type CmdResult = std::result::Result<(), Box<dyn StdError>>;

/// Execute CLI command
pub fn execute(cli: Cli) -> CmdResult {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref backend) = cli.backend {
        config.backend = backend.clone();
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if let Some(ref tier) = cli.tier {
        config.tier = Tier::from_label(tier);
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    debug!(tier = %config.tier, format = %output_format, "configuration loaded");

    match cli.command {
        Commands::Calculate {
            walls_230,
            walls_110,
            height,
            floors,
            prices,
            scale,
            name,
            constants,
        } => {
            if constants.is_some() {
                config.constants_file = constants;
            }
            let input = BoqInput::new(name, scale, walls_230, walls_110)
                .with_floors(floors)
                .with_prices(prices);
            let input = match height {
                Some(h) => input.with_wall_height(h),
                None => input,
            };
            cmd_calculate(&config, &input, output_format)
        }

        Commands::FromJson {
            measurement,
            height,
            floors,
            prices,
        } => {
            let options = AnalysisOptions::new()
                .with_floors(floors)
                .with_prices(prices)
                .with_wall_height(height);
            cmd_from_json(&config, measurement, &options, output_format)
        }

        Commands::Analyze {
            plan,
            floors,
            prices,
            no_cache,
            height,
        } => {
            // Cache disabled if: --no-cache OR config.cache_enabled=false
            let use_cache = !no_cache && config.cache_enabled;
            let options = AnalysisOptions::new()
                .with_floors(floors)
                .with_prices(prices)
                .with_wall_height(height);
            cmd_analyze(&config, plan, use_cache, &options, output_format)
        }

        Commands::Export { results, output } => cmd_export(results, output),

        Commands::Config {
            show,
            set_backend,
            set_model,
            set_cache,
            set_output,
            set_tier,
            set_constants,
            reset,
        } => cmd_config(ConfigUpdate {
            show,
            set_backend,
            set_model,
            set_cache,
            set_output,
            set_tier,
            set_constants,
            reset,
        }),

        Commands::Cache { clear, stats } => cmd_cache(&config, clear, stats),

        Commands::Constants => {
            let constants = config.resolve_constants()?;
            output_constants(output_format, &constants)?;
            Ok(())
        }
    }
}

fn build_service(config: &Config) -> Result<BoqService, Error> {
    let constants = config.resolve_constants()?;
    Ok(BoqService::new(constants, config.tier))
}

fn cmd_calculate(config: &Config, input: &BoqInput, output_format: OutputFormat) -> CmdResult {
    let service = build_service(config)?;
    let boq = service.calculate(input)?;
    output_boq(output_format, &boq)?;
    Ok(())
}

fn cmd_from_json(
    config: &Config,
    measurement_path: PathBuf,
    options: &AnalysisOptions,
    output_format: OutputFormat,
) -> CmdResult {
    if !measurement_path.exists() {
        return Err(Error::FileNotFound(measurement_path.display().to_string()).into());
    }
    let content = std::fs::read_to_string(&measurement_path)?;
    let measurement = parse_measurement(&content)?;

    let service = build_service(config)?;
    let boq = service.calculate_from_measurement(
        &display_name(&measurement_path),
        &measurement,
        options,
    )?;
    output_boq(output_format, &boq)?;
    Ok(())
}

fn cmd_analyze(
    config: &Config,
    plan: PathBuf,
    use_cache: bool,
    options: &AnalysisOptions,
    output_format: OutputFormat,
) -> CmdResult {
    let service = build_service(config)?;

    let extractor = VisionConfig::default()
        .with_backend(&config.backend)
        .with_model(config.model.clone())
        .with_api_key(config.api_key())
        .build_extractor()?;

    let cache = if use_cache {
        Some(Cache::new(config.cache_dir()?)?)
    } else {
        None
    };

    info!(plan = %plan.display(), backend = extractor.name(), "analyzing plan");
    let boq = service.analyze_plan(&plan, extractor.as_ref(), cache.as_ref(), options)?;
    output_boq(output_format, &boq)?;
    Ok(())
}

fn cmd_export(results_path: PathBuf, output: Option<PathBuf>) -> CmdResult {
    let boq = load_boq_json(&results_path)?;

    // Determine output path
    let output_path = output.unwrap_or_else(|| results_path.with_extension("xlsx"));

    export_to_excel(&boq, &output_path)?;

    println!("Exported to: {}", output_path.display());
    Ok(())
}

struct ConfigUpdate {
    show: bool,
    set_backend: Option<String>,
    set_model: Option<String>,
    set_cache: Option<bool>,
    set_output: Option<OutputFormat>,
    set_tier: Option<String>,
    set_constants: Option<PathBuf>,
    reset: bool,
}

fn cmd_config(update: ConfigUpdate) -> CmdResult {
    if update.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(backend) = update.set_backend {
        config.backend = backend;
        modified = true;
    }

    if let Some(model) = update.set_model {
        config.model = Some(model);
        modified = true;
    }

    if let Some(cache_enabled) = update.set_cache {
        config.cache_enabled = cache_enabled;
        modified = true;
    }

    if let Some(output_format) = update.set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(tier) = update.set_tier {
        config.tier = Tier::from_label(&tier);
        modified = true;
    }

    if let Some(path) = update.set_constants {
        BrickConstants::load_from_file(&path)?.validate()?;
        config.constants_file = Some(path);
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if update.show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn cmd_cache(config: &Config, clear: bool, stats: bool) -> CmdResult {
    if !config.cache_enabled {
        return Err(Error::Cache(CacheError::IoError(
            "Cache is disabled. Enable with: costcorrect config --set-cache true".to_string(),
        ))
        .into());
    }

    let cache = Cache::new(config.cache_dir()?)?;

    if clear {
        let count = cache.clear()?;
        println!("Cleared {} cached entries", count);
    }

    if stats || !clear {
        let stats = cache.stats()?;
        println!("{}", stats);
    }

    Ok(())
}
