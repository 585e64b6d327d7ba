//! Multi-turn chat command with answer-variant navigation.

use std::io::Write;

use bardo_client::{ChatBackend, ClientError, GeminiClient};
use bardo_config::Config;
use bardo_conversation::Conversation;
use tracing::info;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Prompt template category from the config's `templates` map
    pub category: Option<String>,
}

/// Strategy for executing the Chat command.
///
/// Single-message mode asks once and prints the current answer. Interactive
/// mode keeps one conversation handle alive across turns and adds in-loop
/// commands for navigating the up-to-three alternative answers.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let client = super::build_client(&config)?;
        let mut conversation = Conversation::new(client);

        if let Some(message) = input.message {
            let prompt = config.apply_template(input.category.as_deref(), &message);
            return run_single(&mut conversation, &prompt).await;
        }

        run_interactive(&mut conversation, &config, input.category.as_deref()).await
    }
}

/// One-shot mode: ask once and print the current answer.
///
/// `NoAnswer` is the provider's normal "can't help with that" outcome and
/// keeps the exit code at zero; everything else is a real failure and is
/// propagated so the process exits non-zero.
async fn run_single<B: ChatBackend>(
    conversation: &mut Conversation<B>,
    prompt: &str,
) -> anyhow::Result<()> {
    match conversation.ask(prompt).await {
        Ok(()) => {
            print_current_answer(conversation);
            Ok(())
        }
        Err(ClientError::NoAnswer) => {
            println!("can't answer that question");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_current_answer<B: ChatBackend>(conversation: &Conversation<B>) {
    println!("{}", conversation.current_answer());
    if conversation.answer_count() > 1 {
        println!(
            "({} alternative answers; /next and /prev switch between them)",
            conversation.answer_count()
        );
    }
}

// Inside the loop a failed turn should not end the session, so every error
// is reported and the prompt comes back.
async fn ask_and_print(conversation: &mut Conversation<GeminiClient>, prompt: &str) {
    match conversation.ask(prompt).await {
        Ok(()) => print_current_answer(conversation),
        Err(ClientError::NoAnswer) => {
            println!("can't answer that question");
        }
        Err(e) => {
            eprintln!("Error: {e}");
        }
    }
}

async fn run_interactive(
    conversation: &mut Conversation<GeminiClient>,
    config: &Config,
    category: Option<&str>,
) -> anyhow::Result<()> {
    info!("starting interactive chat (category: {category:?})");
    println!("Commands: /next, /prev, /reset, /answers. Type 'exit', 'quit' or 'q' to end.\n");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if matches!(input, "exit" | "quit" | "q") {
            break;
        }

        if input.is_empty() {
            continue;
        }

        match input {
            "/next" => {
                println!("\n{}\n", conversation.next_answer());
            }
            "/prev" => {
                println!("\n{}\n", conversation.prev_answer());
            }
            "/reset" => {
                conversation.reset();
                println!("(new conversation)");
            }
            "/answers" => {
                println!(
                    "{} answer(s), currently on slot {}",
                    conversation.answer_count(),
                    conversation.current_index()
                );
            }
            prompt => {
                let prompt = config.apply_template(category, prompt);
                println!();
                ask_and_print(conversation, &prompt).await;
                println!();
            }
        }
    }

    Ok(())
}
