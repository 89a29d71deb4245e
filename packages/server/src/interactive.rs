//! Interactive mode for the server.
//!
//! Prompts for the listen address, the location quoted in generated text,
//! and which text generator to use, then starts the server.

use dialoguer::{Confirm, Input, Select};
use green_map_ai::proposal::DEFAULT_LOCATION;

/// Generator choices offered at startup.
const PROVIDERS: &[(&str, Option<&str>)] = &[
    ("Auto-detect from API keys", None),
    ("OpenAI", Some("openai")),
    ("Anthropic", Some("anthropic")),
];

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Runs the server in interactive mode, prompting for configuration.
///
/// Answers are written to `BIND_ADDR`, `PORT`, `GREEN_MAP_LOCATION` and
/// `AI_PROVIDER` before delegating to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Green Map Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(env_or("BIND_ADDR", "127.0.0.1"))
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(8080)
        .interact_text()
        .unwrap_or(8080);

    let location: String = Input::new()
        .with_prompt("Location for generated proposals")
        .default(env_or("GREEN_MAP_LOCATION", DEFAULT_LOCATION))
        .interact_text()
        .unwrap_or_else(|_| DEFAULT_LOCATION.to_string());

    let labels: Vec<&str> = PROVIDERS.iter().map(|(label, _)| *label).collect();
    let provider_idx = Select::new()
        .with_prompt("Text generator")
        .items(&labels)
        .default(0)
        .interact()
        .unwrap_or(0);

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", port.to_string());
        std::env::set_var("GREEN_MAP_LOCATION", &location);
        if let Some(provider) = PROVIDERS[provider_idx].1 {
            std::env::set_var("AI_PROVIDER", provider);
        }
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
