use std::collections::BTreeSet;

use anyhow::Context;
use chrono::{Duration, Utc};
use qf_app::App;
use qf_core::config::AppConfig;
use qf_core::onboarding::{OnboardingStep, StepSequence};
use qf_core::ports::WidgetSlotPort;
use qf_core::{EntitlementUpdate, PreferencesPatch, QuoteId, SubscriptionStatus, UserId};
use tracing::debug;

use super::{render, Commands};
use crate::bootstrap::{build_app, build_widget_slot};

pub async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Widget => show_widget(config),
        Commands::Feed { user, advance } => feed(&build_app(config)?, &user.into(), advance).await,
        Commands::Like { quote, user } => like(&build_app(config)?, &user.into(), quote.into()).await,
        Commands::Unlike { quotes, user } => {
            let ids: Vec<QuoteId> = quotes.into_iter().map(QuoteId::from).collect();
            unlike(&build_app(config)?, &user.into(), &ids).await
        }
        Commands::Entitlement {
            user,
            set,
            trial_days,
        } => entitlement(&build_app(config)?, &user.into(), set, trial_days).await,
        Commands::Preferences {
            user,
            categories,
            notify_at,
            notifications,
        } => {
            let patch = PreferencesPatch {
                categories: categories.map(|c| c.into_iter().collect()),
                notification_time: notify_at,
                notifications_enabled: notifications,
            };
            build_app(config)?
                .update_preferences()
                .execute(&user.into(), &patch)
                .await?;
            println!("preferences updated");
            Ok(())
        }
        Commands::Onboard {
            user,
            email,
            name,
            categories,
            notify_at,
            extended,
        } => {
            let sequence = if extended {
                StepSequence::extended()
            } else {
                StepSequence::standard()
            };
            let app = build_app(config)?;
            let mut flow = app.onboarding(sequence);
            if let Some(name) = name {
                flow.set_name(name);
            }
            flow.set_categories(categories.into_iter().collect::<BTreeSet<_>>());
            if let Some(time) = notify_at {
                flow.set_notification_time(time);
            }
            while flow.current_step() != OnboardingStep::Completed {
                let step = flow.next();
                debug!(?step, "onboarding advanced");
            }

            let committed = flow.commit(&user.into(), &email).await?;
            println!(
                "onboarded {} with categories: {}",
                committed.profile.email,
                committed
                    .preferences
                    .categories
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            Ok(())
        }
    }
}

fn show_widget(config: &AppConfig) -> anyhow::Result<()> {
    let slot = build_widget_slot(config)?;
    match slot.read() {
        Some(quote) => println!("{}", render::quote_block(&quote)),
        None => println!("no quote available"),
    }
    Ok(())
}

async fn feed(app: &App, user: &UserId, advance: Option<usize>) -> anyhow::Result<()> {
    let summary = app
        .start_session()
        .execute(user)
        .await
        .context("failed to start session")?;
    println!("{}", render::session_header(&summary));

    let feed = app.feed();
    let likes = app.likes();
    if let Some(index) = advance {
        let moved = feed.advance(index)?;
        if moved.limit_reached {
            println!("free quota of {} reached, upgrade to see more", feed.quota());
            feed.acknowledge_upsell();
        }
    }

    let quotes = feed.visible_slice();
    let current = feed.current_index();
    for (index, quote) in quotes.iter().enumerate() {
        println!(
            "{}{}",
            render::feed_line(index, quote, feed.is_interactive(index), likes.is_liked(&quote.id)),
            if index == current { "  <" } else { "" }
        );
    }
    let hidden = feed.len().saturating_sub(quotes.len());
    if hidden > 0 {
        println!("... {hidden} more for premium members");
    }
    Ok(())
}

async fn like(app: &App, user: &UserId, quote_id: QuoteId) -> anyhow::Result<()> {
    let likes = app.likes();
    likes.fetch_all(Some(user)).await?;
    likes.like(&quote_id).await?;
    println!("liked {quote_id}");
    Ok(())
}

async fn unlike(app: &App, user: &UserId, quote_ids: &[QuoteId]) -> anyhow::Result<()> {
    let likes = app.likes();
    likes.fetch_all(Some(user)).await?;
    if let [single] = quote_ids {
        likes.unlike(single).await?;
        println!("unliked {single}");
        return Ok(());
    }

    let report = likes.remove_many(quote_ids).await?;
    println!("{}", render::unlike_report(&report));
    if !report.is_complete() {
        anyhow::bail!("{} like(s) could not be removed", report.failed.len());
    }
    Ok(())
}

async fn entitlement(
    app: &App,
    user: &UserId,
    set: Option<SubscriptionStatus>,
    trial_days: i64,
) -> anyhow::Result<()> {
    if let Some(status) = set {
        let update = purchase_update(status, trial_days);
        app.apply_entitlement_update().execute(user, &update).await?;
    }

    let status = app.check_entitlement().execute(user).await?;
    println!("{}", render::entitlement(&status));
    Ok(())
}

/// Subscription fields recorded for a purchase made now.
fn purchase_update(status: SubscriptionStatus, trial_days: i64) -> EntitlementUpdate {
    let now = Utc::now();
    let (trial_end_date, start, end) = match status {
        SubscriptionStatus::Free => (None, None, None),
        SubscriptionStatus::Trial => (Some(now + Duration::days(trial_days)), None, None),
        SubscriptionStatus::Monthly => (None, Some(now), Some(now + Duration::days(30))),
        SubscriptionStatus::Yearly => (None, Some(now), Some(now + Duration::days(365))),
    };
    EntitlementUpdate {
        subscription_status: status,
        trial_end_date,
        subscription_start_date: start,
        subscription_end_date: end,
    }
}
