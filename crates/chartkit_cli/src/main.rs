//! Chartkit animation CLI
//!
//! Play chart entry animations in the terminal and inspect easing presets.

use anyhow::{Context, Result};
use chartkit_animation::{Animator, AnimatorObserver, EasingOption, FrameLoop};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod render;

use config::ChartkitConfig;
use render::BarChartView;

#[derive(Parser)]
#[command(name = "chartkit-anim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chartkit animation engine harness", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate a bar chart in the terminal
    Run {
        /// Config file (defaults to ./chartkit.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seconds for the horizontal sweep
        #[arg(long)]
        x_duration: Option<f64>,

        /// Seconds for the vertical grow
        #[arg(long)]
        y_duration: Option<f64>,

        /// Easing preset for X
        #[arg(long)]
        easing_x: Option<String>,

        /// Easing preset for Y
        #[arg(long)]
        easing_y: Option<String>,

        /// Interrupt the animation after this many seconds
        #[arg(long)]
        stop_after: Option<f64>,
    },

    /// List easing presets
    Presets,

    /// Print a preset curve as a table
    Sample {
        /// Preset name (e.g. ease-out-cubic)
        name: String,

        /// Number of intervals to sample
        #[arg(short, long, default_value = "10")]
        steps: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            config,
            x_duration,
            y_duration,
            easing_x,
            easing_y,
            stop_after,
        } => {
            let mut config = ChartkitConfig::load(config.as_deref())?;
            let animation = &mut config.animation;
            if let Some(duration) = x_duration {
                animation.x_duration = duration;
            }
            if let Some(duration) = y_duration {
                animation.y_duration = duration;
            }
            if let Some(name) = easing_x {
                animation.easing_x = parse_easing(&name)?;
            }
            if let Some(name) = easing_y {
                animation.easing_y = parse_easing(&name)?;
            }
            animation.validate()?;

            cmd_run(&config, stop_after)
        }

        Commands::Presets => cmd_presets(),

        Commands::Sample { name, steps } => cmd_sample(&name, steps),
    }
}

fn parse_easing(name: &str) -> Result<EasingOption> {
    name.parse::<EasingOption>()
        .with_context(|| "Run `chartkit-anim presets` to list the available curves")
}

fn cmd_run(config: &ChartkitConfig, stop_after: Option<f64>) -> Result<()> {
    let animation = &config.animation;
    info!(
        "Animating {} bars: x {}s ({}), y {}s ({})",
        config.render.bars,
        animation.x_duration,
        animation.easing_x,
        animation.y_duration,
        animation.easing_y
    );

    let frames = Rc::new(FrameLoop::new(config.render.frame_rate));
    let animator = Animator::with_system_clock(frames.clone());

    let view = Rc::new(BarChartView::new(config.render.bars));
    let observer: Rc<dyn AnimatorObserver> = view.clone();
    animator.subscribe(Rc::downgrade(&observer));

    if let Some(limit) = stop_after {
        let started = Instant::now();
        animator.on_updated(move |handle| {
            if handle.is_running() && started.elapsed().as_secs_f64() >= limit {
                info!("Interrupting after {}s", limit);
                handle.stop();
            }
        });
    }

    animator.on_stopped(|handle| {
        info!(
            phase_x = handle.phase_x(),
            phase_y = handle.phase_y(),
            "Animation stopped"
        );
    });

    let started = Instant::now();
    animator.animate_xy_with_options(
        animation.x_duration,
        animation.y_duration,
        animation.easing_x,
        animation.easing_y,
    );
    let delivered = frames.run_until_idle();

    info!(
        "Done in {:.2}s: {} frames, {} redraws",
        started.elapsed().as_secs_f64(),
        delivered,
        view.redraws()
    );
    Ok(())
}

fn cmd_presets() -> Result<()> {
    for option in EasingOption::ALL {
        println!("{}", option);
    }
    Ok(())
}

fn cmd_sample(name: &str, steps: u32) -> Result<()> {
    if steps == 0 {
        anyhow::bail!("--steps must be at least 1");
    }
    let option = parse_easing(name)?;

    println!("{}", option);
    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        let eased = option.apply(t);
        let width = (eased.clamp(0.0, 1.5) * 40.0).round() as usize;
        println!("{:>6.3}  {:>8.4}  {}", t, eased, "#".repeat(width));
    }
    Ok(())
}
