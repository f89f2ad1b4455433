//! Voice Conversation Service for the RustCare patient portal
//!
//! Drives the voice assistant widget: each inbound utterance is classified
//! into a voice command, answered with a guided reply or a free-text chat
//! reply, and recorded in a bounded per-session history that the client
//! echoes back on its next request.
//!
//! # Components
//!
//! - **Intent Classifier**: fixed keyword buckets, checked in priority order
//! - **Session Store**: per-session state tag, context and last 10 exchanges
//! - **Response Strategy Selector**: guided replies for appointments, face
//!   analysis and doctor listings; chat fallback for everything else
//! - **Conversation Manager**: the public entry point
//!
//! # Chat Providers (Privacy-First)
//!
//! 1. **Ollama** - self-hosted, default
//! 2. **OpenAI** - requires a BAA before PHI may be sent
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use voice_conversation_service::{ConversationConfig, VoiceConversationManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConversationConfig::from_env()?;
//! let manager = VoiceConversationManager::from_config(&config)?;
//!
//! let first = manager
//!     .process_input("I want to book an appointment", "widget-42", None)
//!     .await;
//! assert_eq!(first.show_doctors, Some(true));
//!
//! // Echo the state back on the next turn
//! let second = manager
//!     .process_input("show doctors", "widget-42", Some(first.conversation_state))
//!     .await;
//! println!("{}: {}", second.action, second.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod intent;
pub mod manager;
pub mod messages;
pub mod providers;
pub mod session;
pub mod store;
pub mod strategy;

pub use config::*;
pub use error::*;
pub use intent::*;
pub use manager::*;
pub use providers::{create_responder, ChatContext, ChatResponder};
pub use session::*;
pub use store::*;
pub use strategy::*;
