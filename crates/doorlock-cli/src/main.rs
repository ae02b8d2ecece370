//! Door lock controller on simulated devices.
//!
//! Keys are read from stdin, one keypress per keypad character, and the
//! virtual display is printed to stdout whenever it changes. Logs go to
//! stderr.
//!
//! ```text
//! $ printf '1234\n' | doorlock run
//! ```

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use doorlock_controller::{Controller, SystemClock};
use doorlock_core::{ControllerConfig, KeySymbol};
use doorlock_hardware::mock::{MockKeypad, MockKeypadHandle, MockServo, VirtualLcd};

#[derive(Parser)]
#[command(name = "doorlock")]
#[command(about = "Keypad door lock controller", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the controller, reading keypresses from stdin
    Run {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file
    CheckConfig {
        /// JSON configuration file
        path: PathBuf,
    },

    /// Print the default configuration as JSON
    DefaultConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doorlock=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => ControllerConfig::default(),
            };
            run(config).await
        }
        Commands::CheckConfig { path } => {
            load_config(&path)?;
            println!("{}: configuration OK", path.display());
            Ok(())
        }
        Commands::DefaultConfig => {
            println!("{}", ControllerConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<ControllerConfig> {
    ControllerConfig::from_json_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))
}

async fn run(config: ControllerConfig) -> Result<()> {
    let (keypad, handle) = MockKeypad::new();
    let display = VirtualLcd::new(config.display.columns, config.display.rows);
    let servo = MockServo::with_pulse_bounds(
        config.actuator.min_pulse_us,
        config.actuator.max_pulse_us,
    );

    let mut controller = Controller::new(&config, keypad, display, servo, SystemClock)?;
    controller.start().await?;

    // The handle stays alive here so the keypad survives the end of input.
    let reader = spawn_stdin_reader(handle.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let interrupt = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupted");
                shutdown_tx.send_replace(true);
            }
            Err(error) => {
                warn!(%error, "Cannot listen for interrupts");
                // Dropping the sender would stop the controller.
                std::future::pending::<()>().await;
            }
        }
    });

    let mut shown_revision = None;
    let mut shown_angle = None;

    let result = controller
        .run_with(shutdown_rx, |controller, outcome| {
            let lcd = controller.display();
            if shown_revision != Some(lcd.revision()) {
                println!("{}", lcd.render());
                shown_revision = Some(lcd.revision());
            }

            let servo = controller.actuator();
            let angle = servo.current_angle();
            if shown_angle != angle {
                if let (Some(angle), Some(pulse)) = (angle, servo.pulse_width_us()) {
                    println!("servo: {angle} deg ({pulse} us)");
                }
                shown_angle = angle;
            }

            let idle = outcome.key.is_none() && controller.authenticator().is_quiescent();
            if reader.is_finished() && idle {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await;
    interrupt.abort();
    result?;

    if reader.is_finished() {
        reader.await??;
    } else {
        reader.abort();
    }
    Ok(())
}

/// Forward stdin to the keypad until end of input.
fn spawn_stdin_reader(handle: MockKeypadHandle) -> JoinHandle<Result<()>> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            for c in line.chars().filter(|c| !c.is_whitespace()) {
                match KeySymbol::new(c) {
                    Ok(key) => handle.press(key).await?,
                    Err(error) => warn!(%error, "Ignoring input"),
                }
            }
        }

        info!("End of input");
        Ok(())
    })
}
