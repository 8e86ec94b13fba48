//! `ludo check`
//!
//! Configuration, API key and storage diagnostics.

use crate::app::{load_config, open_store, ApiKeys, AppConfig};
use ludo_llm::util::{mask_api_key, validate_api_key};

pub async fn run() -> anyhow::Result<()> {
    println!("🩺 Ludo Check\n");

    let mut all_ok = true;

    print!("Checking configuration... ");
    let config = match load_config() {
        Ok(config) => {
            println!("✅ Loaded");
            config
        }
        Err(e) => {
            println!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.discussion.routing_table() {
        println!("  ❌ Routing: {:#}", e);
        all_ok = false;
    }

    let keys = ApiKeys::from_env();
    all_ok &= check_key("GROQ_API_KEY", keys.groq.as_deref(), "Groq", &config.llm.groq.model);
    all_ok &= check_key(
        "GEMINI_API_KEY",
        keys.gemini.as_deref(),
        "Gemini",
        &config.llm.gemini.model,
    );
    all_ok &= check_store(&config).await;

    println!();
    if all_ok {
        println!("✅ All checks passed! Ready to run Ludo.");
    } else {
        println!("⚠️  Some checks failed. Please fix the issues above.");
        std::process::exit(1);
    }

    Ok(())
}

fn check_key(var: &str, key: Option<&str>, backend: &str, model: &str) -> bool {
    print!("Checking {}... ", var);
    match key_status(key, backend) {
        Ok(masked) => {
            println!("✅ {} ({})", masked, model);
            true
        }
        Err(problem) => {
            println!("❌ {}", problem);
            false
        }
    }
}

/// Masked key, or what is wrong with it
fn key_status(key: Option<&str>, backend: &str) -> Result<String, String> {
    let Some(key) = key else {
        return Err(format!("{} API key is not set", backend));
    };
    match validate_api_key(key, backend) {
        Some(problem) => Err(problem),
        None => Ok(mask_api_key(key)),
    }
}

async fn check_store(config: &AppConfig) -> bool {
    print!("Checking design store... ");
    let store = match open_store(config).await {
        Ok(store) => store,
        Err(e) => {
            println!("❌ {:#}", e);
            return false;
        }
    };
    match store.health_check().await {
        Ok(_) => {
            let path = config.database.resolve_path().unwrap_or_default();
            println!("✅ {}", path.display());
            true
        }
        Err(e) => {
            println!("❌ {}", e);
            false
        }
    }
}
