//! Pushframe operator CLI.
//!
//! # Usage
//!
//! ```bash
//! # Mint a VAPID key pair for deployment configuration
//! pushframe keygen --subject mailto:ops@example.com
//!
//! # Smoke-test a subscription end to end (VAPID keys from the environment)
//! pushframe send \
//!     --endpoint https://push.example.com/send/abc \
//!     --p256dh <base64url> --auth <base64url> \
//!     --title "Test notification"
//! ```

use clap::{Parser, Subcommand};
use pushframe_core::{
    Dispatcher, HttpTransport, MemorySubscriptionStore, Notification, PushSubscription,
    vapid_from_env,
};
use pushframe_crypto::VapidKeyMaterial;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Pushframe delivery engine tooling
#[derive(Parser, Debug)]
#[command(name = "pushframe")]
#[command(about = "Web Push delivery engine tooling")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a VAPID key pair in the engine's configuration encoding
    Keygen {
        /// Operator contact URI for the token `sub` claim
        #[arg(long, default_value = "mailto:ops@example.com")]
        subject: String,
    },

    /// Deliver one notification to a subscription (smoke test)
    Send {
        /// Push service endpoint URL from the subscription
        #[arg(long)]
        endpoint: String,

        /// Subscription public key (URL-safe base64)
        #[arg(long)]
        p256dh: String,

        /// Subscription auth secret (URL-safe base64)
        #[arg(long)]
        auth: String,

        /// Notification title
        #[arg(long)]
        title: String,

        /// Notification body text
        #[arg(long)]
        body: Option<String>,

        /// Click-through URL
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match args.command {
        Command::Keygen { subject } => keygen(&subject),
        Command::Send { endpoint, p256dh, auth, title, body, url } => {
            send(endpoint, p256dh, auth, title, body, url).await?;
        },
    }

    Ok(())
}

#[allow(clippy::print_stdout, reason = "Key export is the command's output")]
fn keygen(subject: &str) {
    let keys = VapidKeyMaterial::generate(subject);

    println!("PUSH_VAPID_PUBLIC_KEY={}", keys.public_key_b64());
    println!("PUSH_VAPID_PRIVATE_KEY={}", keys.private_key_b64());
    println!("PUSH_VAPID_SUBJECT={subject}");
}

#[allow(clippy::print_stdout, reason = "Delivery summary is the command's output")]
async fn send(
    endpoint: String,
    p256dh: String,
    auth: String,
    title: String,
    body: Option<String>,
    url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(keys) = vapid_from_env()? else {
        return Err("push is not configured: set PUSH_VAPID_PUBLIC_KEY and PUSH_VAPID_PRIVATE_KEY"
            .into());
    };

    tracing::info!(endpoint = %endpoint, "delivering test notification");

    let store = MemorySubscriptionStore::new();
    store.insert(
        "cli",
        PushSubscription { id: "cli".to_string(), endpoint, p256dh, auth },
    )?;

    let dispatcher = Dispatcher::new(Some(keys), store, HttpTransport::new()?);

    let notification = Notification { title, body, url, ..Notification::default() };
    let summary = dispatcher.deliver("cli", notification).await?;

    println!("sent: {}, cleaned: {}", summary.sent, summary.cleaned);
    Ok(())
}
