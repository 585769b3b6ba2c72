use dotenvy::dotenv;
use rag_chat::{ChatManager, ChatManagerParams};
use rag_client::{RagVectorClient, DEFAULT_BASE_URL};
use std::{
    env,
    io::{self, Write},
    sync::Arc,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let base_url = env::var("RAG_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let service = Arc::new(RagVectorClient::new().with_base_url(base_url));
    let manager = ChatManager::new(ChatManagerParams::new(service));

    let report = manager.initialize().await;
    println!("{}", report.connectivity.label());
    println!(
        "Knowledge entries: {}{}",
        report.knowledge_entries,
        if report.seeded { " (seeded samples)" } else { "" }
    );
    println!("Commands: /new /switch <id> /toggle /clear /history /conversations /knowledge /search <query>");
    println!("Type 'exit' to quit");

    loop {
        let input = read_line("> ")?;

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        if let Some(command) = input.strip_prefix('/') {
            run_command(&manager, command).await;
            continue;
        }

        match manager.send_message(&input).await {
            Ok(exchange) => {
                println!("{}", exchange.assistant.content);
                for context in &exchange.assistant.contexts {
                    println!(
                        "  [{:?} {:.2}] {}",
                        context.kind, context.similarity, context.content
                    );
                }
            }
            Err(error) => println!("error: {error}"),
        }
    }

    Ok(())
}

async fn run_command(manager: &ChatManager, command: &str) {
    let (name, argument) = match command.split_once(' ') {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    match name {
        "new" => {
            let conversation = manager.start_new_conversation().await;
            println!("Started {}", conversation.title);
        }
        "switch" => match manager.switch_conversation(argument).await {
            Ok(conversation) => println!("Switched to {}", conversation.title),
            Err(error) => println!("error: {error}"),
        },
        "toggle" => {
            let enabled = manager.toggle_rag_mode();
            println!("RAG mode {}", if enabled { "on" } else { "off" });
        }
        "clear" => {
            if manager.clear_current_conversation().await.is_some() {
                println!("Cleared");
            }
        }
        "history" => {
            if let Some(conversation) = manager.current_conversation().await {
                for message in &conversation.messages {
                    println!("{:?}: {}", message.role, message.content);
                }
            }
        }
        "conversations" => {
            for conversation in manager.conversations().await {
                println!(
                    "{}  {} ({} messages)",
                    conversation.id,
                    conversation.title,
                    conversation.messages.len()
                );
            }
        }
        "knowledge" => {
            for entry in manager.knowledge().await {
                println!("{}  {}", entry.id, entry.text);
            }
        }
        "search" => match manager.search_knowledge(argument, 3).await {
            Ok(matches) => {
                for found in matches {
                    println!("[{:.2}] {}", found.similarity, found.text);
                }
            }
            Err(error) => println!("error: {error}"),
        },
        other => println!("unknown command: /{other}"),
    }
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
