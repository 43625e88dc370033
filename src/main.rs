use clap::Parser;
use outpaint::config::Theme;
use outpaint::logger::{self, LogLevel, LoggerConfig};
use outpaint::{BedrockClient, Config};
use std::time::Duration;

/// Local web UI for replacing image backgrounds with Titan outpainting.
#[derive(Debug, Parser)]
#[command(name = "bedrock-outpaint", version, about)]
struct CliArgs {
    /// Address to bind the UI server to
    #[arg(long)]
    host: Option<String>,

    /// Port to serve the UI on
    #[arg(short, long)]
    port: Option<u16>,

    /// UI colour theme (light or dark)
    #[arg(long)]
    theme: Option<Theme>,

    /// Hide the page toolbar
    #[arg(long)]
    hide_toolbar: bool,

    /// AWS region hosting the model
    #[arg(long)]
    region: Option<String>,

    /// Bedrock model identifier
    #[arg(long)]
    model_id: Option<String>,

    /// Seconds to wait for the model, 0 waits forever
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Directory saved images are written to
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Log verbosity (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Emit JSON log lines instead of coloured text
    #[arg(long)]
    json_logs: bool,

    /// Also append plain-text log lines to this file
    #[arg(long)]
    log_file: Option<String>,

    /// Seconds of inactivity before a UI session is dropped
    #[arg(long)]
    session_ttl_secs: Option<u64>,
}

impl CliArgs {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(theme) = self.theme {
            config = config.with_theme(theme);
        }
        if self.hide_toolbar {
            config = config.with_toolbar(false);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(secs) = self.session_ttl_secs {
            config = config.with_session_ttl(Duration::from_secs(secs));
        }

        let mut bedrock = config.bedrock.clone();
        if let Some(region) = &self.region {
            bedrock = bedrock.with_region(region);
        }
        if let Some(model_id) = &self.model_id {
            bedrock = bedrock.with_model(model_id);
        }
        if let Some(secs) = self.timeout_secs {
            bedrock = bedrock.with_timeout_secs(secs);
        }
        config.with_bedrock(bedrock)
    }

    fn logger_config(&self) -> LoggerConfig {
        let mut config = if self.json_logs {
            LoggerConfig::production()
        } else {
            LoggerConfig::new()
        };
        if let Some(path) = &self.log_file {
            config = config.with_file_output(path);
        }
        config.with_level(self.log_level)
    }
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let args = CliArgs::parse();

    logger::init_with_config(args.logger_config())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using process environment");
    }

    let config = args.apply(Config::from_env()?);
    logger::log_startup_info("bedrock-outpaint", env!("CARGO_PKG_VERSION"), &config);

    let client = BedrockClient::new(&config.bedrock).await;
    log::info!("✅ Bedrock client ready for {}", client.image().model_id());

    outpaint::ui::run(config, client.image().clone()).await?;
    log::info!("👋 Server stopped");
    Ok(())
}
