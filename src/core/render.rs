//! Turns facade entries into what a chat layer sends: one text message plus
//! one image attachment per billboard crop.

use crate::domain::model::{EntryContent, MenuEntry};

pub const HEADER: &str = "**Today's Menu** 👨‍🍳";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub caption: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuMessage {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

pub fn compose(entries: &[MenuEntry]) -> MenuMessage {
    let mut sections = vec![HEADER.to_string()];
    let mut attachments = Vec::new();

    for entry in entries {
        match &entry.content {
            EntryContent::Text(text) => sections.push(format!("**{}**\n{}", entry.title, text)),
            EntryContent::Unavailable => sections.push(format!(
                "**{}**\nNo menu for this week is available yet.",
                entry.title
            )),
            EntryContent::Image(data) => attachments.push(Attachment {
                filename: attachment_filename(&entry.title),
                caption: entry.title.clone(),
                data: data.clone(),
            }),
        }
    }

    MenuMessage {
        text: sections.join("\n\n"),
        attachments,
    }
}

/// "ITU - Warm Dishes" -> "itu-warm-dishes.png"
pub fn attachment_filename(title: &str) -> String {
    let slug = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "menu.png".to_string()
    } else {
        format!("{}.png", slug)
    }
}
