mod chat;
mod output;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast;
use tracing::debug;
use whatgram_client::{AuthState, Client, ClientConfig, ClientError, ClientEvent};
use whatgram_store::Database;
use whatgram_types::api::{LanguageSettings, MemberAction};
use whatgram_types::models::{ContentKind, Platform};

#[derive(Parser)]
#[command(
    name = "whatgram",
    version,
    about = "WhatsApp, Telegram and WhatGram in one terminal",
    after_help = "Examples:\n  whatgram login --phone +905551234567\n  whatgram list contacts --platform telegram\n  whatgram chat --platform whatsapp --contact <id>\n  whatgram settings --interface en --preferred de"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, help = "Backend URL (overrides WHATGRAM_BACKEND_URL)")]
    backend: Option<String>,

    #[arg(long, global = true, help = "Session database (overrides WHATGRAM_STATE_PATH)")]
    state: Option<PathBuf>,

    #[arg(long, global = true, help = "Keep the session in memory only")]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Log in with phone number and verification code")]
    Login {
        #[arg(long)]
        phone: Option<String>,
    },
    #[command(about = "Forget the saved session")]
    Logout,
    #[command(about = "Show the logged-in user")]
    Whoami,
    #[command(about = "List contacts, groups or channels")]
    List {
        kind: KindArg,
        #[arg(long, value_enum, default_value = "whatsapp")]
        platform: PlatformArg,
    },
    #[command(about = "Mark a platform as connected")]
    Connect {
        #[arg(value_enum)]
        platform: PlatformArg,
    },
    #[command(about = "Create a group")]
    CreateGroup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "", help = "Comma-separated member phone numbers")]
        members: String,
        #[arg(long)]
        public: bool,
        #[arg(long, value_enum, default_value = "whatgram")]
        platform: PlatformArg,
    },
    #[command(about = "Create a channel")]
    CreateChannel {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        private: bool,
        #[arg(long)]
        subscribers_can_message: bool,
        #[arg(long, value_enum, default_value = "whatgram")]
        platform: PlatformArg,
    },
    #[command(about = "Subscribe to a channel")]
    Subscribe {
        channel_id: String,
        #[arg(long, value_enum, default_value = "whatgram")]
        platform: PlatformArg,
    },
    #[command(about = "Add, remove, promote or demote a group member")]
    Member {
        group_id: String,
        phone: String,
        #[arg(long, value_enum, default_value = "add")]
        action: ActionArg,
        #[arg(long, value_enum, default_value = "whatgram")]
        platform: PlatformArg,
    },
    #[command(about = "Show or change language settings")]
    Settings {
        #[arg(long)]
        interface: Option<String>,
        #[arg(long)]
        preferred: Option<String>,
        #[arg(long)]
        auto_translate: Option<bool>,
    },
    #[command(about = "List languages supported by the backend")]
    Languages,
    #[command(about = "Recent messages across all platforms")]
    Inbox {
        #[arg(long, default_value_t = 50)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, help = "Show counters instead of messages")]
        stats: bool,
    },
    #[command(about = "Open a chat")]
    Chat {
        #[arg(long, value_enum, default_value = "whatsapp")]
        platform: PlatformArg,
        #[arg(long, conflicts_with_all = ["group", "channel"])]
        contact: Option<String>,
        #[arg(long, conflicts_with = "channel")]
        group: Option<String>,
        #[arg(long)]
        channel: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Whatsapp,
    Telegram,
    Whatgram,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Whatsapp => Platform::Whatsapp,
            PlatformArg::Telegram => Platform::Telegram,
            PlatformArg::Whatgram => Platform::Whatgram,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Contacts,
    Groups,
    Channels,
}

impl From<KindArg> for ContentKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Contacts => ContentKind::Contacts,
            KindArg::Groups => ContentKind::Groups,
            KindArg::Channels => ContentKind::Channels,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Add,
    Remove,
    Promote,
    Demote,
}

impl From<ActionArg> for MemberAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Add => MemberAction::Add,
            ActionArg::Remove => MemberAction::Remove,
            ActionArg::Promote => MemberAction::Promote,
            ActionArg::Demote => MemberAction::Demote,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whatgram=info,whatgram_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(backend) = cli.backend {
        config = config.with_backend(backend);
    }
    if let Some(state) = cli.state {
        config.state_path = state;
    }

    let client = if cli.ephemeral {
        Client::new(config, Database::open_in_memory()?)?
    } else {
        Client::open(config)?
    };
    debug!("Backend: {}", client.config().api_base());

    let mut events = client.session().subscribe();
    let outcome = match cli.command {
        Command::Login { phone } => login(&client, phone, &mut events).await,
        command => run(&client, command, &mut events).await,
    };

    // Notices raised by the command.
    drain_notices(&client, &mut events);
    outcome
}

fn drain_notices(client: &Client, events: &mut broadcast::Receiver<ClientEvent>) {
    while let Ok(event) = events.try_recv() {
        if let ClientEvent::Notice(notice) = event {
            output::notice(&notice, &client.session().language());
        }
    }
}

async fn run(client: &Client, command: Command, events: &mut broadcast::Receiver<ClientEvent>) -> Result<()> {
    let Some(user) = client.auth().restore_session()? else {
        bail!("not logged in, run `whatgram login` first");
    };
    let language = user.interface_language.clone();

    match command {
        Command::Login { .. } => output::user(&user),
        Command::Logout => {
            client.auth().logout()?;
            println!("{}", whatgram_locale::t("logout", &language));
        }
        Command::Whoami => output::user(&user),
        Command::List { kind, platform } => {
            let mut ws = client.workspace()?;
            ws.set_tab(platform.into(), kind.into()).await?;
            match ContentKind::from(kind) {
                ContentKind::Contacts => output::contacts(ws.contacts(), &language),
                ContentKind::Groups => output::groups(ws.groups(), &language),
                ContentKind::Channels => output::channels(ws.channels(), &language),
            }
        }
        Command::Connect { platform } => {
            let mut ws = client.workspace()?;
            let platform = Platform::from(platform);
            if ws.is_connected(platform) {
                println!("{}: {}", whatgram_locale::t(platform.as_str(), &language), whatgram_locale::t("connected", &language));
            } else {
                ws.connect_platform(platform).await?;
            }
        }
        Command::CreateGroup { name, description, members, public, platform } => {
            let mut ws = client.workspace()?;
            ws.set_tab(platform.into(), ContentKind::Groups).await?;
            match ws.create_group(&name, description.as_deref(), &members, public).await {
                Ok(group) => println!("{} ({})", group.name, group.id),
                Err(e) => {
                    output::failure("groupCreateFailed", &e, &language);
                    return Err(e.into());
                }
            }
        }
        Command::CreateChannel { name, description, private, subscribers_can_message, platform } => {
            let mut ws = client.workspace()?;
            ws.set_tab(platform.into(), ContentKind::Channels).await?;
            match ws
                .create_channel(&name, description.as_deref(), !private, subscribers_can_message)
                .await
            {
                Ok(channel) => println!("{} ({})", channel.name, channel.id),
                Err(e) => {
                    output::failure("channelCreateFailed", &e, &language);
                    return Err(e.into());
                }
            }
        }
        Command::Subscribe { channel_id, platform } => {
            let mut ws = client.workspace()?;
            ws.set_tab(platform.into(), ContentKind::Channels).await?;
            let resp = ws.subscribe_channel(&channel_id).await?;
            println!("{} ({} {})", resp.message, resp.subscriber_count, whatgram_locale::t("subscribers", &language));
        }
        Command::Member { group_id, phone, action, platform } => {
            let mut ws = client.workspace()?;
            ws.set_tab(platform.into(), ContentKind::Groups).await?;
            let resp = ws.manage_group_member(&group_id, &phone, action.into()).await?;
            println!("{} ({} {})", resp.message, resp.member_count, whatgram_locale::t("members", &language));
        }
        Command::Settings { interface, preferred, auto_translate } => {
            settings(client, interface, preferred, auto_translate).await?;
        }
        Command::Languages => {
            let resp = client.api().languages().await?;
            for (code, name) in &resp.languages {
                let marker = if whatgram_locale::is_supported(code) { "" } else { "  (server only)" };
                println!("{:<4} {}{}", code, name, marker);
            }
        }
        Command::Inbox { limit, offset, stats } => {
            if stats {
                output::inbox_stats(&client.api().inbox_stats().await?);
            } else {
                output::inbox(&client.api().unified_inbox(limit, offset).await?);
            }
        }
        Command::Chat { platform, contact, group, channel } => {
            let (kind, id) = match (contact, group, channel) {
                (Some(id), _, _) => (ContentKind::Contacts, id),
                (_, Some(id), _) => (ContentKind::Groups, id),
                (_, _, Some(id)) => (ContentKind::Channels, id),
                _ => bail!("pass one of --contact, --group or --channel"),
            };
            chat::run(client, events, platform.into(), kind, &id).await?;
        }
    }
    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    eprint!("{}: ", label);
    match lines.next_line().await? {
        Some(line) => Ok(line.trim().to_string()),
        None => bail!("input closed"),
    }
}

/// Interactive phone + code login. At the code prompt, `r` resends once
/// the countdown has run out and `c` goes back to the phone prompt.
async fn login(
    client: &Client,
    phone: Option<String>,
    events: &mut broadcast::Receiver<ClientEvent>,
) -> Result<()> {
    let auth = client.auth();
    if let Some(user) = auth.restore_session()? {
        println!("{} ({})", user.username, user.phone);
        return Ok(());
    }

    let language = client.session().language();
    let t = |key: &str| whatgram_locale::t(key, &language);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", t("phoneAuth"));
    let mut phone = match phone {
        Some(phone) => phone,
        None => prompt(&mut lines, &t("phoneNumber")).await?,
    };

    loop {
        if let AuthState::PhoneEntry | AuthState::Unauthenticated = auth.state() {
            println!("{}", t("sendingCode"));
            if let Err(e) = auth.request_code(&phone).await {
                output::failure("sendingFailed", &e, &language);
                phone = prompt(&mut lines, &t("phoneNumber")).await?;
                continue;
            }
            drain_notices(client, events);
        }

        if let Some(label) = auth.countdown_label() {
            println!("{}", label);
        }
        let input = prompt(&mut lines, &format!("{} [r = {}, c = {}]", t("verificationCode"), t("resendCode"), t("changePhone"))).await?;

        match input.as_str() {
            "r" => match auth.resend_code().await {
                Ok(_) => drain_notices(client, events),
                Err(e) => eprintln!("! {}", e),
            },
            "c" => {
                auth.change_phone()?;
                phone = prompt(&mut lines, &t("phoneNumber")).await?;
            }
            code => {
                println!("{}", t("verifying"));
                match auth.verify_code(&phone, code).await {
                    Ok(user) => {
                        output::user(&user);
                        return Ok(());
                    }
                    Err(ClientError::Validation(msg)) => eprintln!("! {}", msg),
                    Err(e) => output::failure("verificationFailed", &e, &language),
                }
            }
        }
    }
}

async fn settings(
    client: &Client,
    interface: Option<String>,
    preferred: Option<String>,
    auto_translate: Option<bool>,
) -> Result<()> {
    let auth = client.auth();
    let current = auth.language_settings().await?;

    if interface.is_none() && preferred.is_none() && auto_translate.is_none() {
        let language = client.session().language();
        println!("{}", whatgram_locale::t("languageSettings", &language));
        println!("  {}: {}", whatgram_locale::t("interfaceLanguage", &language), current.interface_language);
        println!("  {}: {}", whatgram_locale::t("preferredLanguage", &language), current.preferred_language);
        println!("  {}: {}", whatgram_locale::t("autoTranslate", &language), current.auto_translate);
        return Ok(());
    }

    let updated = LanguageSettings {
        interface_language: interface.unwrap_or(current.interface_language),
        preferred_language: preferred.unwrap_or(current.preferred_language),
        auto_translate: auto_translate.unwrap_or(current.auto_translate),
    };
    if let Err(e) = auth.update_language_settings(updated).await {
        output::failure("languageSettingsFailed", &e, &client.session().language());
        return Err(e.into());
    }
    Ok(())
}
