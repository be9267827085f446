use crate::cli::args::{FaultPolicyArg, RunArgs};
use crate::core::{PipelineError, PipelineResult, PipelineSummary, Recipe};
use crate::engine::OrderPipeline;
use crate::services::{
    write_summary_json, BreakfastMenu, BreakfastRecipe, ConsoleReporter, FaultInjectingRecipe,
    FaultPolicy, InstantRecipe, PipelineConfig,
};
use anyhow::{Context, Result};

/// Build the pipeline configuration: config file (or defaults), then flag overrides
pub fn build_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    if !args.orders.is_empty() {
        config = config.with_orders(args.orders.iter().map(String::as_str));
    } else if let Some(count) = args.count {
        config = config.with_order_count(count);
    }

    if let Some(workers) = args.intake_workers {
        config = config.with_intake_workers(workers);
    }
    if let Some(workers) = args.prep_workers {
        config = config.with_prep_workers(workers);
    }
    if let Some(workers) = args.delivery_workers {
        config = config.with_delivery_workers(workers);
    }

    if args.min_delay_ms.is_some() || args.max_delay_ms.is_some() {
        let current = config.processing_delay();
        config = config.with_processing_delay(
            args.min_delay_ms.unwrap_or(current.min_ms),
            args.max_delay_ms.unwrap_or(current.max_ms),
        );
    }

    if let Some(poll_interval_ms) = args.poll_interval_ms {
        config = config.with_poll_interval_ms(poll_interval_ms);
    }

    if let Some(policy) = fault_policy(args.fault_policy, args.max_attempts, config.fault_policy())? {
        config = config.with_fault_policy(policy);
    }

    config.validate()?;
    Ok(config)
}

fn fault_policy(
    policy: Option<FaultPolicyArg>,
    max_attempts: Option<u32>,
    current: FaultPolicy,
) -> PipelineResult<Option<FaultPolicy>> {
    let retry_attempts = || {
        max_attempts.unwrap_or(match current {
            FaultPolicy::Retry { max_attempts } => max_attempts,
            FaultPolicy::Drop => FaultPolicy::default().max_attempts(),
        })
    };

    match (policy, max_attempts) {
        (Some(FaultPolicyArg::Drop), Some(attempts)) => Err(PipelineError::configuration(format!(
            "--max-attempts {attempts} cannot be combined with --fault-policy drop"
        ))),
        (Some(FaultPolicyArg::Drop), None) => Ok(Some(FaultPolicy::Drop)),
        (Some(FaultPolicyArg::Retry), _) | (None, Some(_)) => Ok(Some(FaultPolicy::Retry {
            max_attempts: retry_attempts(),
        })),
        (None, None) => Ok(None),
    }
}

/// Choose the recipe every preparation worker runs
pub fn build_recipe(args: &RunArgs) -> Result<Box<dyn Recipe>> {
    let recipe: Box<dyn Recipe> = match &args.menu {
        Some(name) => {
            let menu: BreakfastMenu = name.parse()?;
            let recipe = BreakfastRecipe::new(menu).with_time_scale(args.time_scale);
            if args.overlap {
                Box::new(recipe.with_overlapped_steps())
            } else {
                Box::new(recipe)
            }
        }
        None => Box::new(InstantRecipe::new()),
    };

    if args.fail_orders.is_empty() {
        Ok(recipe)
    } else {
        Ok(Box::new(FaultInjectingRecipe::new(
            recipe,
            args.fail_orders.iter().map(String::as_str),
        )))
    }
}

/// Execute the run command
pub async fn execute_run(args: RunArgs) -> Result<PipelineSummary> {
    let config = build_config(&args)?;
    let recipe = build_recipe(&args)?;
    let reporter = if args.quiet {
        ConsoleReporter::quiet()
    } else {
        ConsoleReporter::new()
    };

    if !args.quiet {
        println!("⚙️  Settings:");
        println!("   - Orders: {}", config.orders().len());
        println!(
            "   - Workers: intake {}, preparation {}, delivery {}",
            config.intake_workers(),
            config.prep_workers(),
            config.delivery_workers()
        );
        println!("   - Recipe: {}", recipe.name());
    }

    let summary = OrderPipeline::new(config, recipe, reporter)
        .run_async()
        .await?;

    if let Some(path) = &args.summary {
        write_summary_json(path, &summary)
            .with_context(|| format!("Failed to save summary to {}", path.display()))?;
        if !args.quiet {
            println!("📄 Summary saved to {}", path.display());
        }
    }

    Ok(summary)
}
