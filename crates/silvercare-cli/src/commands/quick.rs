use anyhow::Result;
use chrono::{Local, Timelike};

use silvercare_application::{AlertSequence, AppContext};

use super::utils::{confirm, format_alert, prompt_line};
use crate::QuickAction;

pub async fn run(context: &AppContext, action: QuickAction) -> Result<()> {
    let quick = context.quick_actions();

    let sequence = match action {
        QuickAction::Emergency { yes } => {
            let confirmed = yes
                || confirm(
                    "🚨 응급상황이 발생했습니다! 가족 및 응급서비스(119, 가족, 담당 의료진)에 즉시 연락하시겠습니까?",
                )?;
            quick.emergency_call(confirmed, context.telemetry().current())
        }
        QuickAction::Family { choice } => {
            let choice = match choice {
                Some(choice) => Some(choice),
                None => ask_family_choice(context)?,
            };
            quick.family_call(choice.as_deref())
        }
        QuickAction::Medication { take } => quick.medication_check(Local::now().hour(), take),
        QuickAction::Report => quick.health_report(),
    };

    print_as_they_arrive(sequence).await;
    Ok(())
}

fn ask_family_choice(context: &AppContext) -> Result<Option<String>> {
    let family = context.quick_actions().family();

    println!("📞 누구에게 전화를 걸까요?\n");
    for (i, contact) in family.iter().enumerate() {
        println!(
            "{}. {}({}) - {}",
            i + 1,
            contact.name,
            contact.relationship,
            contact.phone
        );
    }
    let answer = prompt_line(&format!("\n번호를 입력하세요 (1-{}): ", family.len()))?;
    Ok(answer.filter(|a| !a.is_empty()))
}

async fn print_as_they_arrive(mut sequence: AlertSequence) {
    while let Some(alert) = sequence.next().await {
        println!("{}\n", format_alert(&alert));
    }
}
