use memchat::config::MemchatConfig;
use memchat::models::ModelId;

/// Print the model catalog, marking the configured default and missing credentials.
pub fn models(config: &MemchatConfig) {
    println!("Supported models");
    println!("{}", "=".repeat(40));
    for model in ModelId::ALL {
        let provider = model.provider();
        let marker = if model == config.session.model { "*" } else { " " };
        let key = if config.providers.get(provider).api_key.is_some() {
            ""
        } else {
            "  (no API key)"
        };
        println!("{marker} {:<28} {:<10}{key}", model.as_str(), provider.as_str());
    }
}
