//! Plain-text rendering of view state.

use std::fmt::Write;

use flame_client::Route;
use flame_client::chat::ChatView;
use flame_client::deck::{Page, SwipeDeck, basics_rows, headline, work_line};
use flame_client::matches::MatchSummary;
use flame_client::profile::{Notice, ProfileEditor};
use flame_types::models::{Message, Section, SectionContent, non_blank};

pub fn route_hint(route: &Route) -> &'static str {
    match route {
        Route::Welcome => "Run `flame register` or `flame login` to get started.",
        Route::Feed => "You're all set. Run `flame feed` to start swiping.",
        Route::Profile => "Finish your profile with `flame onboard` or `flame profile set`.",
        Route::Matches => "Run `flame matches` to see who liked you back.",
        Route::Chat(_) => "Run `flame chat <match-id>` to talk.",
    }
}

pub fn notice(notice: Option<&Notice>) -> Option<String> {
    match notice? {
        Notice::Info(msg) => Some(format!("  ✓ {msg}")),
        Notice::Error(msg) => Some(format!("  ✗ {msg}")),
    }
}

pub fn profile(editor: &ProfileEditor) -> String {
    let me = editor.me();
    let p = editor.profile();
    let completion = editor.completion();
    let mut out = String::new();

    let _ = writeln!(out, "{} <{}>", me.display_name(), me.email);
    let _ = writeln!(out, "Profile {}/{} complete", completion.done, completion.total);
    for field in completion.missing() {
        let _ = writeln!(out, "  - {}", field.hint());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  Age:         {}", p.age.map(|a| a.to_string()).unwrap_or_default());
    let _ = writeln!(out, "  Gender:      {}", p.gender.as_deref().unwrap_or_default());
    let _ = writeln!(out, "  Institution: {}", p.institution.as_deref().unwrap_or_default());
    let _ = writeln!(out, "  Bio:         {}", p.bio.as_deref().unwrap_or_default());
    let _ = writeln!(out, "  Interests:   {}", p.interests.join(", "));
    if let (Some(lat), Some(lon)) = (p.lat, p.lon) {
        let _ = writeln!(out, "  Location:    {lat:.4}, {lon:.4}");
    }

    let _ = writeln!(out, "  Photos:");
    let primary = editor.primary_photo().map(|p| p.id.as_str());
    for photo in editor.photos() {
        let star = if Some(photo.id.as_str()) == primary { "*" } else { " " };
        let _ = writeln!(out, "   {star} {} ({})", photo.url, photo.id);
    }
    out
}

fn dots(count: usize, current: usize) -> String {
    (0..count)
        .map(|i| if i == current { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The current card and page of the deck.
pub fn card(deck: &SwipeDeck) -> String {
    let Some(c) = deck.current() else {
        return "No more profiles right now.".to_string();
    };
    let pages = deck.pages();
    let mut out = String::new();
    let _ = writeln!(out, "── {} ── [{}/{}]", headline(c), deck.position() + 1, deck.len());
    let _ = writeln!(out, "{}", dots(pages.len(), deck.page()));

    let p = &c.profile;
    match deck.current_page() {
        Some(Page::Hero) | None => {
            match c.hero_photo() {
                Some(photo) => {
                    let _ = writeln!(out, "[photo] {}", photo.url);
                }
                None => {
                    let _ = writeln!(out, "[no photo]");
                }
            }
        }
        Some(Page::Work) => {
            let _ = writeln!(out, "Work: {}", work_line(p).unwrap_or_default());
        }
        Some(Page::Education) => {
            let _ = writeln!(out, "Education: {}", non_blank(p.education.as_deref()).unwrap_or_default());
        }
        Some(Page::Basics) => {
            for (label, value) in basics_rows(p) {
                let _ = writeln!(out, "{label:<7} {value}");
            }
        }
        Some(Page::Section { section, item }) => {
            if let Some(s) = deck.sections_for(&c.id).get(section) {
                out.push_str(&section_page(s, item));
            }
        }
        Some(Page::About) => {
            if let Some(bio) = non_blank(p.bio.as_deref()) {
                let _ = writeln!(out, "{bio}");
            }
            if !p.interests.is_empty() {
                let _ = writeln!(out, "Into: {}", p.interests.join(" · "));
            }
        }
    }
    out
}

fn section_page(section: &Section, item: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", section.title);
    match &section.content {
        SectionContent::Text { body } => {
            let _ = writeln!(out, "{body}");
        }
        SectionContent::Gallery { images } => {
            for url in images {
                let _ = writeln!(out, "[photo] {url}");
            }
        }
        SectionContent::Card { items } => {
            if let Some(card) = item.and_then(|i| items.get(i)) {
                if let Some(image) = &card.image {
                    let _ = writeln!(out, "[photo] {image}");
                }
                if let Some(text) = &card.text {
                    let _ = writeln!(out, "{text}");
                }
            }
        }
        SectionContent::Links { links } => {
            for link in links {
                let label = link.label.as_deref().unwrap_or(link.url.as_str());
                let _ = writeln!(out, "→ {label} <{}>", link.url);
            }
        }
        SectionContent::Unsupported { kind } => {
            let _ = writeln!(out, "(\"{kind}\" sections aren't supported yet)");
        }
    }
    out
}

pub fn match_row(row: &MatchSummary) -> String {
    format!("{:<38} {:<16} {}", row.match_id, row.name, row.preview())
}

pub fn message(chat: &ChatView, index: usize, message: &Message) -> String {
    let who = if chat.is_mine(message) {
        "you".to_string()
    } else {
        chat.title()
    };
    let time = message.created_at.format("%H:%M");
    let avatar = if chat.show_avatar(index) {
        chat.avatar_for(message)
            .map(|p| format!("  [{}]", p.url))
            .unwrap_or_default()
    } else {
        String::new()
    };
    format!("{time} {who}: {}{avatar}", message.content)
}
