//! rdreturns CLI - R&D benefit-cost ratio calculator and policy toolkit

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rdreturns_core::config::{self, ResolvedConfig};
use rdreturns_core::presets::{PrivatePreset, PublicPreset};
use rdreturns_core::report::{render_private_text, render_public_text, render_sensitivity_text};
use rdreturns_core::sensitivity::{private_sweep, public_sweep, Sweep};
use rdreturns_core::terms::link_terms;
use rdreturns_core::toolkit::{ToolFilter, ToolkitLoad};
use rdreturns_core::{render_json, Calculator, PrivateField, PublicField};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "rdreturns")]
#[command(about = "Benefit-cost ratios for private and public R&D investment")]
#[command(version = env!("RDRETURNS_VERSION"))]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to config file (default: auto-discover)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Private R&D BCR from the three-channel spillover model
    Private {
        /// Private preset applied before the field flags
        #[arg(long)]
        preset: Option<String>,

        #[command(flatten)]
        fields: PrivateArgs,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Public R&D BCR, levering the private BCR
    Public {
        /// Public preset applied before the field flags
        #[arg(long)]
        preset: Option<String>,

        /// Private preset for the leveraged component
        #[arg(long)]
        private_preset: Option<String>,

        #[command(flatten)]
        fields: PublicArgs,

        #[command(flatten)]
        private_fields: LeveragedPrivateArgs,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// List the literature presets
    Presets {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Two-parameter sensitivity table
    Sensitivity {
        /// Which engine to sweep
        engine: Engine,

        /// Row sweep, FIELD=START:STEP:COUNT
        #[arg(long)]
        rows: String,

        /// Column sweep, FIELD=START:STEP:COUNT
        #[arg(long)]
        cols: String,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Browse the policy toolkit
    Toolkit {
        /// Directory holding the toolkit YAML files (overrides config)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Only tools carrying this tag (repeatable)
        #[arg(long)]
        filter: Vec<String>,

        /// Case-insensitive search on tool names
        #[arg(long)]
        search: Option<String>,

        /// Show one tool in full
        #[arg(long)]
        tool: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Validate or show a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Private field overrides, taken as text like the calculator inputs
#[derive(Args)]
struct PrivateArgs {
    /// Technology spillover elasticity (ψ₂)
    #[arg(long, allow_hyphen_values = true)]
    tech_spillover: Option<String>,

    /// Product market rivalry elasticity (γ₁)
    #[arg(long, allow_hyphen_values = true)]
    product_rivalry: Option<String>,

    /// Interest rate (i)
    #[arg(long, allow_hyphen_values = true)]
    interest_rate: Option<String>,

    /// R&D capital depreciation rate (δ)
    #[arg(long, allow_hyphen_values = true)]
    depreciation_rate: Option<String>,
}

impl PrivateArgs {
    fn apply(&self, calc: &mut Calculator) {
        apply_private_edits(
            calc,
            [
                (PrivateField::TechSpillover, self.tech_spillover.as_deref()),
                (PrivateField::ProductRivalry, self.product_rivalry.as_deref()),
                (PrivateField::InterestRate, self.interest_rate.as_deref()),
                (PrivateField::DepreciationRate, self.depreciation_rate.as_deref()),
            ],
        );
    }
}

/// Private overrides on the public command, rates prefixed `private-`
#[derive(Args)]
struct LeveragedPrivateArgs {
    /// Technology spillover elasticity for the private BCR (ψ₂)
    #[arg(long, allow_hyphen_values = true)]
    tech_spillover: Option<String>,

    /// Product market rivalry elasticity for the private BCR (γ₁)
    #[arg(long, allow_hyphen_values = true)]
    product_rivalry: Option<String>,

    /// Interest rate for the private BCR
    #[arg(long, allow_hyphen_values = true)]
    private_interest_rate: Option<String>,

    /// Depreciation rate for the private BCR
    #[arg(long, allow_hyphen_values = true)]
    private_depreciation_rate: Option<String>,
}

impl LeveragedPrivateArgs {
    fn apply(&self, calc: &mut Calculator) {
        apply_private_edits(
            calc,
            [
                (PrivateField::TechSpillover, self.tech_spillover.as_deref()),
                (PrivateField::ProductRivalry, self.product_rivalry.as_deref()),
                (PrivateField::InterestRate, self.private_interest_rate.as_deref()),
                (
                    PrivateField::DepreciationRate,
                    self.private_depreciation_rate.as_deref(),
                ),
            ],
        );
    }
}

fn apply_private_edits(calc: &mut Calculator, edits: [(PrivateField, Option<&str>); 4]) {
    for (field, text) in edits {
        if let Some(text) = text {
            calc.set_private_text(field, text);
        }
    }
}

#[derive(Args)]
struct PublicArgs {
    /// Direct return on public R&D (ρ_direct)
    #[arg(long, allow_hyphen_values = true)]
    direct_return: Option<String>,

    /// Private R&D induced per unit of public R&D (λ)
    #[arg(long, allow_hyphen_values = true)]
    leverage_ratio: Option<String>,

    /// Spillover return on public R&D (ρ_spillover)
    #[arg(long, allow_hyphen_values = true)]
    spillover_return: Option<String>,

    /// Interest rate for the public calculation
    #[arg(long, allow_hyphen_values = true)]
    interest_rate: Option<String>,

    /// Depreciation rate for the public calculation
    #[arg(long, allow_hyphen_values = true)]
    depreciation_rate: Option<String>,
}

impl PublicArgs {
    fn apply(&self, calc: &mut Calculator) {
        let edits = [
            (PublicField::DirectReturn, self.direct_return.as_deref()),
            (PublicField::LeverageRatio, self.leverage_ratio.as_deref()),
            (PublicField::SpilloverReturn, self.spillover_return.as_deref()),
            (PublicField::InterestRate, self.interest_rate.as_deref()),
            (PublicField::DepreciationRate, self.depreciation_rate.as_deref()),
        ];
        for (field, text) in edits {
            if let Some(text) = text {
                calc.set_public_text(field, text);
            }
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Engine {
    Private,
    Public,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let project_root = std::env::current_dir()?;

    match cli.command {
        Commands::Private {
            preset,
            fields,
            format,
        } => {
            let resolved = load_config(&project_root, cli.config.as_deref())?;
            let mut calc = resolved.calculator();
            if let Some(name) = preset {
                calc.apply_private_preset(parse_private_preset(&name)?);
            }
            fields.apply(&mut calc);
            warn_if_singular(&calc);

            match format {
                OutputFormat::Text => print!(
                    "{}",
                    render_private_text(
                        calc.private_params(),
                        calc.private_results(),
                        &calc.interpret_private()
                    )
                ),
                OutputFormat::Json => println!("{}", render_json(&calc.snapshot())),
            }
        }
        Commands::Public {
            preset,
            private_preset,
            fields,
            private_fields,
            format,
        } => {
            let resolved = load_config(&project_root, cli.config.as_deref())?;
            let mut calc = resolved.calculator();
            if let Some(name) = private_preset {
                calc.apply_private_preset(parse_private_preset(&name)?);
            }
            private_fields.apply(&mut calc);
            if let Some(name) = preset {
                calc.apply_public_preset(parse_public_preset(&name)?);
            }
            fields.apply(&mut calc);
            warn_if_singular(&calc);

            match format {
                OutputFormat::Text => print!(
                    "{}",
                    render_public_text(
                        calc.public_params(),
                        calc.public_results(),
                        &calc.interpret_public()
                    )
                ),
                OutputFormat::Json => println!("{}", render_json(&calc.snapshot())),
            }
        }
        Commands::Presets { format } => match format {
            OutputFormat::Text => print!("{}", render_presets_text()),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&presets_json())
                    .context("failed to serialize presets")?
            ),
        },
        Commands::Sensitivity {
            engine,
            rows,
            cols,
            format,
        } => {
            let resolved = load_config(&project_root, cli.config.as_deref())?;
            let calc = resolved.calculator();

            let table = match engine {
                Engine::Private => {
                    let rows: Sweep<PrivateField> = rows.parse().context("invalid --rows")?;
                    let cols: Sweep<PrivateField> = cols.parse().context("invalid --cols")?;
                    private_sweep(calc.private_params(), &rows, &cols)?
                }
                Engine::Public => {
                    let rows: Sweep<PublicField> = rows.parse().context("invalid --rows")?;
                    let cols: Sweep<PublicField> = cols.parse().context("invalid --cols")?;
                    public_sweep(
                        calc.public_params(),
                        calc.private_results().bcr,
                        &rows,
                        &cols,
                    )?
                }
            };

            match format {
                OutputFormat::Text => print!("{}", render_sensitivity_text(&table)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&table).context("failed to serialize table")?
                ),
            }
        }
        Commands::Toolkit {
            data,
            filter,
            search,
            tool,
            format,
        } => {
            let resolved = load_config(&project_root, cli.config.as_deref())?;
            let dir = data
                .or(resolved.data_dir)
                .unwrap_or_else(|| PathBuf::from("public"));
            handle_toolkit(&dir, &filter, search, tool, format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let path = path.or(cli.config);
                match config::load_and_resolve(&project_root, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let path = path.or(cli.config);
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print!("{}", render_config_text(&resolved));
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(project_root: &Path, config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let resolved = config::load_and_resolve(project_root, config_path)
        .context("failed to load configuration")?;
    if let Some(ref path) = resolved.config_path {
        eprintln!("Using config: {}", path.display());
    }
    Ok(resolved)
}

fn parse_private_preset(name: &str) -> anyhow::Result<PrivatePreset> {
    name.parse().map_err(anyhow::Error::msg)
}

fn parse_public_preset(name: &str) -> anyhow::Result<PublicPreset> {
    name.parse().map_err(anyhow::Error::msg)
}

fn warn_if_singular(calc: &Calculator) {
    if calc.is_singular() {
        eprintln!("Warning: interest rate + depreciation rate is zero; BCR is undefined");
    }
}

fn render_presets_text() -> String {
    let mut output = String::from("Private presets:\n");
    for preset in PrivatePreset::ALL {
        output.push_str(&format!(
            "  {:<14} {:<20} {}\n",
            preset.as_str(),
            preset.label(),
            format_entries(&preset.overrides().entries())
        ));
    }
    output.push_str("\nPublic presets:\n");
    for preset in PublicPreset::ALL {
        output.push_str(&format!(
            "  {:<14} {:<20} {}\n",
            preset.as_str(),
            preset.label(),
            format_entries(&preset.overrides().entries())
        ));
    }
    output
}

fn format_entries(entries: &[(&str, f64)]) -> String {
    entries
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn presets_json() -> serde_json::Value {
    let private: Vec<_> = PrivatePreset::ALL
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.as_str(),
                "label": p.label(),
                "params": p.overrides(),
            })
        })
        .collect();
    let public: Vec<_> = PublicPreset::ALL
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.as_str(),
                "label": p.label(),
                "params": p.overrides(),
            })
        })
        .collect();
    serde_json::json!({ "private": private, "public": public })
}

fn handle_toolkit(
    dir: &Path,
    filters: &[String],
    search: Option<String>,
    tool: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let data = match ToolkitLoad::load(dir) {
        ToolkitLoad::Loaded(data) => data,
        ToolkitLoad::Failed(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    };

    if let Some(tag) = tool {
        let found = data
            .find_tool(&tag)
            .with_context(|| format!("Tool not found: {}", tag))?;
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(found).context("failed to serialize tool")?
            ),
            OutputFormat::Text => {
                println!("{}", found.name);
                if let Some(ref text) = found.overall_assessment {
                    println!();
                    println!("{}", link_terms(text, &data.terms));
                }
                if let Some(ref text) = found.economic_analysis {
                    println!();
                    println!("Economic analysis:");
                    println!("{}", link_terms(text, &data.terms));
                }
                let tags: Vec<&str> = found
                    .tags
                    .filterable()
                    .map(|t| data.tags_list.display_name(t))
                    .collect();
                if !tags.is_empty() {
                    println!();
                    println!("Tags: {}", tags.join(", "));
                }
                for reference in &found.further_reading {
                    let author = reference.author.as_deref().unwrap_or("");
                    let url = reference.url.as_deref().unwrap_or("");
                    println!("  - {} {} {}", reference.title, author, url);
                }
            }
        }
        return Ok(());
    }

    let mut filter = ToolFilter::new();
    for tag in filters {
        filter.add(tag);
    }
    if let Some(term) = search {
        filter.set_search(term);
    }
    let tools = filter.apply(&data.tools);

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&tools).context("failed to serialize tools")?
        ),
        OutputFormat::Text => {
            if !filter.active().is_empty() {
                let names: Vec<&str> = filter
                    .active()
                    .iter()
                    .map(|t| data.tags_list.display_name(t))
                    .collect();
                println!("Filters: {}", names.join(", "));
            }
            for tool in &tools {
                println!("{:<32} {}", tool.tag, tool.name);
            }
            println!("{} of {} tools", tools.len(), data.tools.len());
        }
    }

    Ok(())
}

fn render_config_text(resolved: &ResolvedConfig) -> String {
    let mut output = String::from("Configuration:\n");
    match resolved.config_path {
        Some(ref p) => output.push_str(&format!("  Source: {}\n", p.display())),
        None => output.push_str("  Source: defaults (no config file found)\n"),
    }

    output.push_str("\nPrivate parameters:\n");
    for field in PrivateField::ALL {
        output.push_str(&format!(
            "  {}: {}\n",
            field,
            field.get(&resolved.private_params)
        ));
    }

    output.push_str("\nPublic parameters:\n");
    for field in PublicField::ALL {
        output.push_str(&format!(
            "  {}: {}\n",
            field,
            field.get(&resolved.public_params)
        ));
    }

    let t = &resolved.thresholds;
    output.push_str("\nThresholds:\n");
    output.push_str(&format!("  modest: {}\n", t.modest));
    output.push_str(&format!("  good: {}\n", t.good));
    output.push_str(&format!("  private_excellent: {}\n", t.private_excellent));
    output.push_str(&format!("  public_excellent: {}\n", t.public_excellent));

    output.push_str("\nToolkit:\n");
    output.push_str(&format!(
        "  data_dir: {}\n",
        resolved
            .data_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "public (default)".to_string())
    ));

    output
}
