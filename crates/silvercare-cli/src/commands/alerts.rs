use anyhow::{Result, bail};

use silvercare_application::AppContext;

use super::utils::format_alert;
use crate::AlertsAction;

pub fn run(context: &AppContext, action: AlertsAction) -> Result<()> {
    let notifications = context.notifications();

    match action {
        AlertsAction::List => {
            let alerts = notifications.alerts();
            println!(
                "알림 {}개 (읽지 않음 {}개)",
                alerts.len(),
                notifications.unread_count()
            );
            for alert in &alerts {
                println!("{}", format_alert(alert));
            }
        }
        AlertsAction::Read { id } => {
            if notifications.mark_read(&id) {
                println!("읽음으로 표시했습니다.");
            } else if notifications.alerts().iter().any(|a| a.id == id) {
                println!("이미 읽은 알림입니다.");
            } else {
                bail!("Alert not found: {}", id);
            }
        }
        AlertsAction::Dismiss { id } => {
            if !notifications.dismiss(&id) {
                bail!("Alert not found: {}", id);
            }
            println!("알림을 삭제했습니다.");
        }
        AlertsAction::Clear => {
            notifications.clear_all();
            println!("모든 알림을 삭제했습니다.");
        }
    }
    Ok(())
}
