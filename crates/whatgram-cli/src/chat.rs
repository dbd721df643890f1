//! Interactive chat view: stdin lines, live pushes and session events are
//! handled in one loop, so the workspace has a single owner.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::warn;
use whatgram_client::{Client, ClientEvent, LiveSignal, Workspace};
use whatgram_types::models::{ContentKind, Platform};

use crate::output;

#[derive(Debug, PartialEq)]
pub enum ChatInput {
    Text(String),
    File(PathBuf),
    SendFiles,
    Translate { message_id: String, target: Option<String> },
    Reload,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_input(line: &str) -> ChatInput {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ChatInput::Text(line.to_string());
    };

    let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
    let rest = rest.trim();
    match name {
        "file" if !rest.is_empty() => ChatInput::File(PathBuf::from(rest)),
        "send-files" | "send" => ChatInput::SendFiles,
        "translate" if !rest.is_empty() => {
            let mut parts = rest.split_whitespace();
            let message_id = parts.next().unwrap_or_default().to_string();
            let target = parts.next().map(str::to_string);
            ChatInput::Translate { message_id, target }
        }
        "reload" => ChatInput::Reload,
        "help" => ChatInput::Help,
        "quit" | "exit" => ChatInput::Quit,
        _ => ChatInput::Unknown(line.to_string()),
    }
}

struct ChatView {
    workspace: Workspace,
    printed: HashSet<String>,
}

impl ChatView {
    fn print_new(&mut self, client: &Client) {
        let (Some(selection), Some(user)) = (self.workspace.selection(), client.session().user()) else {
            return;
        };
        let language = user.interface_language.clone();
        for message in self.workspace.messages() {
            if self.printed.insert(message.id.clone()) {
                output::message(message, selection, &user, &language);
            }
        }
    }
}

async fn next_signal(signals: &mut Option<mpsc::UnboundedReceiver<LiveSignal>>) -> Option<LiveSignal> {
    match signals {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

pub async fn run(
    client: &Client,
    events: &mut broadcast::Receiver<ClientEvent>,
    platform: Platform,
    kind: ContentKind,
    id: &str,
) -> Result<()> {
    let mut workspace = client.workspace()?;
    workspace.set_tab(platform, kind).await?;
    let target = workspace.find_target(kind, id)?;
    workspace.select_chat(target).await?;

    let language = client.session().language();
    if let Some(selection) = workspace.selection() {
        output::chat_header(selection, &language);
    }

    let mut view = ChatView { workspace, printed: HashSet::new() };
    view.print_new(client);

    let mut signals = match client.go_live().await {
        Ok(rx) => Some(rx),
        Err(e) => {
            warn!("Live updates unavailable: {}", e);
            output::failure("connectionLost", &e, &language);
            None
        }
    };

    let placeholder = whatgram_locale::translate_key(
        "messageInputPlaceholder",
        &language,
        &[("type", &whatgram_locale::t(kind.as_str(), &language))],
    );
    println!("{}  (/help)", placeholder);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_input(client, &mut view, parse_input(&line)).await {
                    break;
                }
            }
            signal = next_signal(&mut signals) => match signal {
                Some(signal) => {
                    let closed = matches!(signal, LiveSignal::Closed);
                    match view.workspace.handle_signal(signal).await {
                        Ok(()) => view.print_new(client),
                        Err(e) => warn!("Refresh after push failed: {}", e),
                    }
                    if closed {
                        signals = None;
                    }
                }
                None => signals = None,
            },
            event = events.recv() => match event {
                Ok(ClientEvent::Notice(notice)) => output::notice(&notice, &client.session().language()),
                Ok(ClientEvent::SessionEnded { .. }) => break,
                Ok(ClientEvent::SessionStarted { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}

/// Returns `false` when the loop should stop.
async fn handle_input(client: &Client, view: &mut ChatView, input: ChatInput) -> bool {
    let language = client.session().language();
    match input {
        ChatInput::Empty => {}
        ChatInput::Quit => return false,
        ChatInput::Help => {
            println!("/file <path>            {}", whatgram_locale::t("selectFiles", &language));
            println!("/send-files             {}", whatgram_locale::t("uploadFiles", &language));
            println!("/translate <id> [lang]  {}", whatgram_locale::t("translateTo", &language));
            println!("/reload  /quit");
        }
        ChatInput::Text(text) => match view.workspace.send_message(&text).await {
            Ok(_) => view.print_new(client),
            Err(e) => output::failure("sendingFailed", &e, &language),
        },
        ChatInput::File(path) => match view.workspace.add_pending_file(path) {
            Ok(()) => {
                println!("{}", whatgram_locale::t("selectFiles", &language));
                for file in view.workspace.pending_files() {
                    println!("  {}", file.name);
                }
            }
            Err(e) => output::failure("uploadFailed", &e, &language),
        },
        ChatInput::SendFiles => {
            println!("{}", whatgram_locale::t("uploading", &language));
            match view.workspace.upload_files().await {
                Ok(_) => {}
                Err(e) => output::failure("uploadFailed", &e, &language),
            }
            view.print_new(client);
        }
        ChatInput::Translate { message_id, target } => {
            let target = target
                .or_else(|| client.session().user().map(|u| u.preferred_language))
                .unwrap_or(language.clone());
            println!("{}", whatgram_locale::t("translating", &language));
            match view.workspace.translate_by_id(&message_id, &target).await {
                Ok(text) => println!("      {} ({}): {}", whatgram_locale::t("translated", &language), target, text),
                Err(e) => output::failure("translating", &e, &language),
            }
        }
        ChatInput::Reload => match view.workspace.load_messages().await {
            Ok(()) => view.print_new(client),
            Err(e) => eprintln!("! {}", e),
        },
        ChatInput::Unknown(line) => eprintln!("? {}  (/help)", line),
    }
    client.session().is_authenticated()
}
