use anyhow::Result;
use chrono::Local;

use silvercare_application::AppContext;
use silvercare_core::telemetry::{VitalsAssessment, VitalsSnapshot};
use silvercare_core::time::format_time;

const RECENT_ENTRIES: usize = 5;

pub async fn run(context: &AppContext, watch: Option<usize>) -> Result<()> {
    let telemetry = context.telemetry();
    context.start()?;

    match telemetry.current() {
        Some(current) => print_snapshot(&current),
        None => println!("건강 데이터가 없습니다. (telemetry.autostart = false)"),
    }

    let history = telemetry.history();
    if history.len() > 1 {
        println!("\n최근 기록:");
        for entry in history.iter().rev().skip(1).take(RECENT_ENTRIES) {
            println!("  {}", summary_line(entry));
        }
    }

    let Some(ticks) = watch else {
        return Ok(());
    };
    if !telemetry.is_simulating() {
        telemetry.start()?;
    }

    let mut last_seen = telemetry.current().map(|c| c.timestamp);
    let mut seen = 0;
    while seen < ticks {
        tokio::time::sleep(telemetry.tick_interval()).await;
        let Some(current) = telemetry.current() else {
            continue;
        };
        if Some(current.timestamp) != last_seen {
            last_seen = Some(current.timestamp);
            seen += 1;
            println!("  {}", summary_line(&current));
        }
    }
    Ok(())
}

fn print_snapshot(snapshot: &VitalsSnapshot) {
    let assessment = VitalsAssessment::of(snapshot);

    println!(
        "건강 상태 ({}) · 종합: {}",
        format_time(&snapshot.timestamp, &Local),
        assessment.overall()
    );
    println!("  심박수    {:>6} bpm   {}", snapshot.heart_rate, assessment.heart_rate);
    println!("  혈압      {:>10} mmHg", snapshot.blood_pressure);
    println!("  체온      {:>6.1} °C    {}", snapshot.temperature, assessment.temperature);
    println!("  걸음수    {:>6} 걸음  {}", snapshot.steps, assessment.steps);
    println!("  수면      {:>6.1} 시간  {}", snapshot.sleep_hours, assessment.sleep);
    println!(
        "  복약      {}",
        if snapshot.medication_taken {
            "복용 완료"
        } else {
            "미복용"
        }
    );
}

fn summary_line(snapshot: &VitalsSnapshot) -> String {
    format!(
        "{}  HR {} · BP {} · {:.1}°C · {} 걸음",
        format_time(&snapshot.timestamp, &Local),
        snapshot.heart_rate,
        snapshot.blood_pressure,
        snapshot.temperature,
        snapshot.steps
    )
}
