use anyhow::{Context, Result};

use flame_client::chat::ChatView;
use flame_client::{AppContextInner, ViewScope};

use super::Input;
use crate::render;

pub async fn run(ctx: &AppContextInner, match_id: &str) -> Result<()> {
    let mut chat = ChatView::open(ctx, match_id, ViewScope::new())
        .await?
        .context("Chat closed before it loaded")?;
    let mut incoming = chat.take_incoming();
    let mut input = Input::new();

    println!("── {} ──", chat.title());
    if !chat.is_live() {
        println!("(live updates unavailable, new messages show after you send)");
    }
    print_new(&mut chat, 0);
    let mut shown = chat.messages().len();

    loop {
        let line = tokio::select! {
            line = input.line() => line?,
            pushed = async {
                match incoming.as_mut() {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                match pushed {
                    Some(message) => {
                        chat.receive(message);
                    }
                    // reader stopped; keep going over HTTP
                    None => incoming = None,
                }
                shown = print_new(&mut chat, shown);
                continue;
            }
            _ = tokio::signal::ctrl_c() => None,
        };

        let Some(line) = line else { break };
        if line == "/quit" {
            break;
        }
        if let Err(e) = chat.send(ctx, &line).await {
            println!("  ✗ {e}");
        }
        shown = print_new(&mut chat, shown);
    }

    chat.close().await;
    Ok(())
}

/// Print messages past `from` when a scroll was requested. Returns the new count.
fn print_new(chat: &mut ChatView, from: usize) -> usize {
    if !chat.take_scroll_request() {
        return from;
    }
    let messages = chat.messages();
    for (i, message) in messages.iter().enumerate().skip(from) {
        println!("{}", render::message(chat, i, message));
    }
    messages.len()
}
