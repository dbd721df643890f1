//! Plain-text rendering of entities, messages and notices.

use chrono::Local;
use whatgram_client::workspace::needs_translation;
use whatgram_client::{ClientError, Notice, NoticeLevel, Selection};
use whatgram_locale::{language_name, t};
use whatgram_types::api::{InboxStats, UnifiedInbox};
use whatgram_types::models::{Channel, Contact, Group, Message, User};

pub fn notice(notice: &Notice, language: &str) {
    let text = notice.render(language);
    match notice.level {
        NoticeLevel::Error => eprintln!("! {}", text),
        NoticeLevel::Success => println!("✓ {}", text),
        NoticeLevel::Info => println!("· {}", text),
    }
}

/// Print a failed operation under the locale key describing it.
pub fn failure(key: &'static str, err: &ClientError, language: &str) {
    notice(&Notice::error(key, err), language);
}

pub fn user(user: &User) {
    println!("{} ({})", user.username, user.phone);
    println!("  id:                 {}", user.id);
    println!("  interface language: {}", user.interface_language);
    println!("  preferred language: {}", user.preferred_language);
    println!("  auto translate:     {}", user.auto_translate);
    println!("  whatsapp connected: {}", user.whatsapp_connected);
    println!("  telegram connected: {}", user.telegram_connected);
}

pub fn contacts(contacts: &[Contact], language: &str) {
    for c in contacts {
        let status = if c.is_online { t("online", language) } else { t("lastSeen", language) };
        println!("{:<24} {:<20} {:<16} {}", c.id, c.name, c.phone, status);
    }
}

pub fn groups(groups: &[Group], language: &str) {
    for g in groups {
        println!(
            "{:<24} {:<20} {} {}",
            g.id,
            g.name,
            g.member_count,
            t("members", language)
        );
    }
}

pub fn channels(channels: &[Channel], language: &str) {
    for c in channels {
        println!(
            "{:<24} {:<20} {} {}",
            c.id,
            c.name,
            c.subscriber_count,
            t("subscribers", language)
        );
    }
}

pub fn chat_header(selection: &Selection, language: &str) {
    let kind = whatgram_locale::t(selection.kind().as_str(), language);
    println!("── {} · {} ──", selection.title(), kind);
}

fn sender_label<'a>(selection: &'a Selection, me: &str, sender_id: &'a str) -> &'a str {
    match selection {
        _ if sender_id == me => "me",
        Selection::Contact { contact, .. } if contact.id == sender_id => &contact.name,
        _ => sender_id,
    }
}

/// One message line, plus a translation hint for foreign-language text.
pub fn message(message: &Message, selection: &Selection, user: &User, language: &str) {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    let sender = sender_label(selection, &user.id, &message.sender_id);

    match &message.file_message {
        Some(file) => println!(
            "[{}] {}: 📎 {} ({})",
            time,
            sender,
            file.original_name,
            format_size(file.file_size)
        ),
        None => println!(
            "[{}] {}: {}",
            time,
            sender,
            message.content.as_deref().unwrap_or_default()
        ),
    }

    if user.auto_translate && needs_translation(message, &user.preferred_language) {
        let source = message.auto_detected_language.as_deref().unwrap_or_default();
        let label = format!(
            "{} → {}",
            language_name(source).unwrap_or(source),
            language_name(&user.preferred_language).unwrap_or(&user.preferred_language)
        );
        match message.translations.get(&user.preferred_language) {
            Some(text) => println!("      {} ({}): {}", t("translated", language), label, text),
            None => println!("      {} {} · /translate {}", t("translateTo", language), label, message.id),
        }
    }
}

pub fn inbox(inbox: &UnifiedInbox) {
    for m in &inbox.messages {
        let chat = m
            .chat_info
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(m.conversation_id.as_str());
        let text = match (&m.content, &m.file_message) {
            (_, Some(file)) => format!("📎 {}", file.original_name),
            (Some(content), None) => content.clone(),
            (None, None) => String::new(),
        };
        let direction = if m.is_sent { "→" } else { "←" };
        println!(
            "{} {:<9} {} {:<20} {}",
            m.timestamp.with_timezone(&Local).format("%m-%d %H:%M"),
            m.platform,
            direction,
            chat,
            text
        );
    }
    println!("{} / {}", inbox.messages.len(), inbox.total);
}

pub fn inbox_stats(stats: &InboxStats) {
    for stat in &stats.platform_stats {
        println!("{:<10} {}", stat.platform, stat.count);
    }
    let counts = &stats.chat_counts;
    println!(
        "chats: {} individual, {} groups, {} channels ({} total)",
        counts.individual, counts.groups, counts.channels, counts.total
    );
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
