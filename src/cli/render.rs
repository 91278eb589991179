use qf_app::usecases::{BulkUnlikeReport, EntitlementStatus, SessionSummary};
use qf_core::Quote;

pub(crate) fn quote_block(quote: &Quote) -> String {
    format!("{}\n{}", quote.text_en, quote.text_zh)
}

/// One feed row: position, lock and like markers, English text.
pub(crate) fn feed_line(index: usize, quote: &Quote, interactive: bool, liked: bool) -> String {
    let lock = if interactive { ' ' } else { '#' };
    let heart = if liked { '*' } else { ' ' };
    format!("{index:>3} {lock}{heart} [{}] {}", quote.id, quote.text_en)
}

pub(crate) fn session_header(summary: &SessionSummary) -> String {
    let plan = if summary.premium { "premium" } else { "free" };
    let mut header = format!(
        "{} ({}), {} quotes, {} liked",
        summary.profile.name.as_deref().unwrap_or(&summary.profile.email),
        plan,
        summary.feed_len,
        summary.liked_count
    );
    if !summary.likes_synced {
        header.push_str(" (likes unavailable)");
    }
    header
}

pub(crate) fn entitlement(status: &EntitlementStatus) -> String {
    let mut out = format!(
        "status: {}\npremium: {}",
        status.subscription_status,
        if status.premium { "yes" } else { "no" }
    );
    if let Some(end) = status.profile.trial_end_date {
        out.push_str(&format!("\ntrial ends: {}", end.to_rfc3339()));
    }
    if let Some(end) = status.profile.subscription_end_date {
        out.push_str(&format!("\nsubscription ends: {}", end.to_rfc3339()));
    }
    out
}

pub(crate) fn unlike_report(report: &BulkUnlikeReport) -> String {
    let mut out = format!("removed {} like(s)", report.removed.len());
    for (quote_id, error) in &report.failed {
        out.push_str(&format!("\nfailed to remove {quote_id}: {error}"));
    }
    out
}
