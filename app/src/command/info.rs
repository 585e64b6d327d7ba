use bardo_config::Config;

/// Strategy for displaying the resolved configuration.
///
/// Secrets are never printed; only whether credentials resolve.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== bardo Configuration ===\n");

        println!("Provider:");
        println!("  Base URL:    {}", config.provider.base_url);
        println!("  Build label: {}", config.provider.build_label);
        match config.provider.credentials() {
            Ok(_) => println!("  Credentials: resolved"),
            Err(e) => println!("  Credentials: NOT resolved ({e})"),
        }
        println!();

        println!("Timeouts:");
        println!("  Token page: {}s", config.timeouts.token_secs);
        println!("  Query:      {}s", config.timeouts.query_secs);
        println!();

        println!("Templates:");
        let mut categories: Vec<&String> = config.templates.keys().collect();
        categories.sort();
        for category in categories {
            println!("  {category}");
        }

        Ok(())
    }
}
