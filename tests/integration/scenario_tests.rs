use super::*;
use tariff_watcher::core::{AlertDecision, StateStore};
use tariff_watcher::models::{MonitorState, StateSnapshot};

const HIGH_GAS: &str = "<p>Gas 0,9100 €/Smc</p>";

fn state(price: &str, notified: bool) -> MonitorState {
    MonitorState {
        last_price: Some(dec(price)),
        notified,
    }
}

#[tokio::test]
async fn test_low_electricity_price_sends_one_alert() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    env.serve_page(&format!("<p>Luce 0,0950 €/kWh</p>{}", HIGH_GAS)).await;
    env.telegram_responds(200).await;

    let report = env.run().await?;

    assert_eq!(report.checks[0].decision, AlertDecision::Notified);
    let saved = env.store().load()?;
    assert_eq!(saved.electricity, state("0.095", true));
    assert_eq!(saved.gas, state("0.91", false));

    let messages = env.sent_messages().await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("chat_id=42"));
    assert!(messages[0].contains("electricity"));
    assert!(messages[0].contains("0.0950"));
    Ok(())
}

#[tokio::test]
async fn test_recovery_clears_lock_without_alert() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    env.store().save(&StateSnapshot {
        electricity: state("0.09", true),
        gas: MonitorState::default(),
    })?;
    env.serve_page(&format!("<p>Luce 0,1500 €/kWh</p>{}", HIGH_GAS)).await;
    env.telegram_responds(200).await;

    let report = env.run().await?;

    assert_eq!(report.checks[0].decision, AlertDecision::Reset);
    assert_eq!(env.store().load()?.electricity, state("0.15", false));
    assert!(env.sent_messages().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_hysteresis_across_runs() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    let mut sent = 0;

    for price in ["0,0500", "0,0500", "0,1200", "0,0500"] {
        env.server.reset().await;
        env.serve_page(&format!("<p>Luce {} €/kWh</p>{}", price, HIGH_GAS)).await;
        env.telegram_responds(200).await;

        env.run().await?;
        sent += env.sent_messages().await.len();
    }

    assert_eq!(sent, 2);
    assert!(env.store().load()?.electricity.notified);
    Ok(())
}

#[tokio::test]
async fn test_failed_delivery_retries_next_run() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    env.serve_page(&format!("<p>Luce 0,0950 €/kWh</p>{}", HIGH_GAS)).await;
    env.telegram_responds(500).await;

    let report = env.run().await?;
    assert_eq!(report.checks[0].decision, AlertDecision::DeliveryFailed);
    assert!(!env.store().load()?.electricity.notified);

    env.server.reset().await;
    env.serve_page(&format!("<p>Luce 0,0950 €/kWh</p>{}", HIGH_GAS)).await;
    env.telegram_responds(200).await;

    let report = env.run().await?;
    assert_eq!(report.checks[0].decision, AlertDecision::Notified);
    assert!(env.store().load()?.electricity.notified);
    Ok(())
}

#[tokio::test]
async fn test_blocked_page_keeps_existing_lock() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    let prior = StateSnapshot {
        electricity: state("0.09", true),
        gas: state("0.8", true),
    };
    env.store().save(&prior)?;

    Mock::given(method("GET"))
        .and(path(TARIFF_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&env.server)
        .await;

    let report = env.run().await?;

    assert!(report.checks.iter().all(|c| c.decision == AlertDecision::NoObservation));
    assert_eq!(env.store().load()?, prior);
    Ok(())
}

#[tokio::test]
async fn test_price_behind_hidden_markup() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    env.serve_page(
        r#"<div class="tariff"><span>0.0950<!-- -->€/kWh</span></div>
           <div class="tariff"><span>0.7900<!-- -->€/Smc</span></div>"#,
    )
    .await;
    env.telegram_responds(200).await;

    let report = env.run().await?;

    assert_eq!(report.snapshot.electricity.last_price, Some(dec("0.095")));
    assert_eq!(report.snapshot.gas.last_price, Some(dec("0.79")));
    assert_eq!(report.notifications_sent(), 2);
    assert_eq!(env.sent_messages().await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_missing_credentials_never_trips() -> anyhow::Result<()> {
    let mut env = TestEnv::start().await?;
    env.config.telegram.bot_token = None;
    env.serve_page(&format!("<p>Luce 0,0950 €/kWh</p>{}", HIGH_GAS)).await;

    let report = env.run().await?;

    assert_eq!(report.checks[0].decision, AlertDecision::DeliveryFailed);
    assert!(!env.store().load()?.electricity.notified);
    assert!(env.sent_messages().await.is_empty());
    Ok(())
}
