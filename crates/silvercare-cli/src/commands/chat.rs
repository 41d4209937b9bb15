use anyhow::Result;

use silvercare_application::AppContext;
use silvercare_core::chat::SendOutcome;

use super::utils::{format_message, prompt_line};

const QUIT_COMMANDS: [&str; 3] = ["/quit", "/exit", "종료"];

pub async fn run(context: &AppContext, message: Option<String>) -> Result<()> {
    if let Some(message) = message {
        send_and_print(context, &message).await;
        return Ok(());
    }

    context.start()?;

    println!(
        "{}님, 안녕하세요! 실버메이트입니다. (끝내려면 /quit)",
        context.profile().name
    );
    while let Some(line) = prompt_line("> ")? {
        if QUIT_COMMANDS.contains(&line.as_str()) {
            break;
        }
        send_and_print(context, &line).await;
    }
    Ok(())
}

async fn send_and_print(context: &AppContext, content: &str) {
    match context.companion().send(content).await {
        SendOutcome::Skipped => {}
        SendOutcome::Replied {
            message,
            action_required,
            suggested_actions,
        } => {
            println!("{}", format_message(&message));
            if action_required {
                println!("  ⚠️  가족이나 의료진에게 연락이 필요할 수 있어요.");
            }
            for action in suggested_actions {
                println!("  • {}", action);
            }
        }
        SendOutcome::Failed { error } => {
            eprintln!("메시지를 보내지 못했습니다: {}", error);
        }
    }
}
