//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`.

use bardo_client::GeminiClient;
use bardo_config::Config;

mod chat;
mod info;
mod init;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Build a wire client from the loaded configuration.
fn build_client(config: &Config) -> anyhow::Result<GeminiClient> {
    let credentials = config.provider.credentials()?;

    Ok(GeminiClient::new(credentials)
        .with_base_url(config.provider.base_url.clone())
        .with_build_label(config.provider.build_label.clone())
        .with_timeouts(config.timeouts.token(), config.timeouts.query()))
}
