use clap::Parser;
use colored::*;
use tracing::{info, warn};

use error_common::{Result, RustCareError};
use logger_redacted::{init_logging, LoggerConfig};
use voice_assistant_server::{create_app, ServerConfig, VoiceAssistantServer};
use voice_conversation_service::ConversationConfig;

/// RustCare Voice Assistant HTTP Server
#[derive(Parser, Debug)]
#[command(name = "voice-assistant-server")]
#[command(about = "Stateful voice assistant API for the RustCare patient portal")]
struct Args {
    /// Server bind address
    #[arg(long, env = "VOICE_ASSISTANT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, env = "VOICE_ASSISTANT_PORT", default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let logger = LoggerConfig::from_env(args.verbose)
        .with_directive("voice_assistant_server=debug")
        .with_directive("tower_http=info")
        .with_directive("reqwest=warn");
    init_logging(&logger)
        .map_err(|e| RustCareError::InternalError(format!("Failed to initialize logging: {}", e)))?;

    info!("🏥 {}", "Starting RustCare Voice Assistant Server".bright_cyan());
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION").bright_white());
    info!("🌐 Bind address: {}", format!("{}:{}", args.host, args.port).bright_yellow());

    let conversation = ConversationConfig::from_env()
        .map_err(|e| RustCareError::ConfigError(e.to_string()).logged("conversation config"))?;
    info!("🎙️  Chat provider: {}", conversation.provider.name().bright_white());
    if conversation.provider.name() == "openai" {
        warn!("{}", "OpenAI chat provider selected; make sure a BAA covers PHI".bright_yellow());
    }

    let server = VoiceAssistantServer::new(ServerConfig::from_env(), &conversation)
        .map_err(|e| RustCareError::ConfigError(e.to_string()).logged("voice assistant init"))?;

    let app = create_app(server);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RustCareError::NetworkError(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("🚀 {}", format!("Voice assistant running on http://{}", addr).bright_green());
    info!("📋 {}", format!("Health check available at: http://{}/health", addr).bright_blue());
    info!(
        "🎙️  {}",
        format!("Conversation endpoint: http://{}/api/v1/voice/conversation", addr).bright_blue()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RustCareError::ServerError(format!("HTTP server error: {}", e)))?;

    info!("👋 {}", "Voice assistant server stopped".bright_white());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn test_bind_args_fall_back_to_env() {
        let command = Args::command();
        command.clone().debug_assert();

        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(OsStr::to_os_string)
        };
        assert_eq!(env_of("host").as_deref(), Some(OsStr::new("VOICE_ASSISTANT_HOST")));
        assert_eq!(env_of("port").as_deref(), Some(OsStr::new("VOICE_ASSISTANT_PORT")));
    }

    #[test]
    fn test_host_flag_parses() {
        let args = Args::try_parse_from(["voice-assistant-server", "--host", "127.0.0.1"]).unwrap();
        assert_eq!(args.host, "127.0.0.1");
        assert!(!args.verbose);
    }
}
