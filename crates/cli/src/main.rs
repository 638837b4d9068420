use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use agro_agents::SessionOrchestrator;
use agro_core::models::{Language, Message};
use agro_core::prediction::{predict_yield, AreaUnit, YieldParams};
use agro_engine::RecognitionEngine;
use agro_observability::{init_tracing, AppMetrics};
use agro_transport::Transport;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "agrobot")]
#[command(about = "AgroBot assistant CLI")]
struct Cli {
    /// Reply language: en or hi.
    #[arg(long, default_value = "en")]
    language: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat over the configured (or offline) transport.
    Chat,
    /// One-shot sugarcane yield prediction.
    Yield {
        #[arg(long)]
        district: String,
        #[arg(long)]
        area: f64,
        #[arg(long, default_value = "acre")]
        unit: String,
        #[arg(long)]
        soil: String,
        #[arg(long, default_value = "partial")]
        irrigation: String,
    },
    /// Classify a plant image reference with a fresh local engine.
    Classify {
        image: String,
        /// Seed training images, repeatable, as plant=image pairs.
        #[arg(long = "train-image")]
        train_images: Vec<String>,
    },
    /// Simulate a training run over plant=image pairs and print the
    /// final engine snapshot.
    Train {
        #[arg(long = "image", required = true)]
        images: Vec<String>,
        #[arg(long, default_value_t = 500)]
        tick_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("agro_cli");
    let cli = Cli::parse();
    let lang = Language::from_optional_str(Some(&cli.language));

    match cli.command {
        Command::Chat => run_chat(lang).await?,
        Command::Yield {
            district,
            area,
            unit,
            soil,
            irrigation,
        } => {
            let unit = AreaUnit::parse(&unit).context("invalid --unit value (acre|hectare)")?;
            let total = predict_yield(&YieldParams {
                district,
                area,
                unit,
                soil_type: soil,
                irrigation,
            })?;
            println!("{}", serde_json::json!({ "predicted_yield_quintals": total }));
        }
        Command::Classify {
            image,
            train_images,
        } => {
            let engine = RecognitionEngine::new();
            for pair in &train_images {
                let (plant, image_ref) = split_pair(pair)?;
                if !engine.add_training_image(plant, image_ref) {
                    bail!("unsupported plant type: {plant}");
                }
            }
            let result = engine.classify_image(&image, lang);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Train { images, tick_ms } => {
            let engine =
                RecognitionEngine::new().with_training_tick(Duration::from_millis(tick_ms));
            for pair in &images {
                let (plant, image_ref) = split_pair(pair)?;
                if !engine.add_training_image(plant, image_ref) {
                    bail!("unsupported plant type: {plant}");
                }
            }
            if !engine.train_model().await {
                bail!("training refused: need at least 5 images in total");
            }
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
    }

    Ok(())
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .context("expected plant=image pair, e.g. sugarcane=leaf-01.jpg")
}

async fn run_chat(lang: Language) -> Result<()> {
    let transport = Arc::new(Transport::from_env());
    if !transport.is_remote() {
        println!("No remote assistant configured; replies come from the local resolver.");
    }

    let orchestrator = SessionOrchestrator::new(transport, AppMetrics::shared());
    orchestrator.open().await;

    let mut transcript: Vec<Message> = Vec::new();

    println!("AgroBot chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        if message.is_empty() {
            continue;
        }

        transcript.push(Message::from_user(transcript.len() as u64 + 1, message));
        let reply = orchestrator.handle_turn(message, lang).await;
        transcript.push(Message::from_bot(
            transcript.len() as u64 + 1,
            reply.reply_text.as_str(),
        ));

        println!("\n{}\n", reply.reply_text);
    }

    orchestrator.close().await;
    println!("({} messages this session)", transcript.len());
    Ok(())
}
