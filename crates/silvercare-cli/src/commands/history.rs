use anyhow::Result;

use silvercare_application::AppContext;

use super::utils::{format_message, today_heading};

pub fn run(context: &AppContext, clear: bool) -> Result<()> {
    let conversation = context.conversation();

    if clear {
        conversation.clear();
        println!("대화 기록을 지웠습니다.");
        return Ok(());
    }

    let messages = conversation.messages();
    if messages.is_empty() {
        println!("대화 기록이 없습니다.");
        return Ok(());
    }

    println!("{} · 메시지 {}개", today_heading(), messages.len());
    for message in &messages {
        println!("{}", format_message(message));
    }
    if let Some(error) = conversation.error() {
        println!("(마지막 오류: {})", error);
    }
    Ok(())
}
