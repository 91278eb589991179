//! Like synchronizer.
//!
//! Local membership is updated synchronously before the remote call is issued.
//! Every mutation takes a ticket; when the remote call resolves, only the newest
//! ticket for that quote may reconcile local state. An older ticket resolving late
//! records its acknowledgement but never overwrites a newer local intent.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use qf_core::ports::{GatewayError, LikedQuoteRepositoryPort};
use qf_core::{QuoteId, UserId};
use tracing::{debug, error, info, info_span, warn, Instrument};

#[derive(Debug, thiserror::Error)]
pub enum LikeSyncError {
    #[error("no signed-in user to sync likes for")]
    NoActiveUser,

    #[error("failed to like quote {quote_id}: {source}")]
    Like {
        quote_id: QuoteId,
        #[source]
        source: GatewayError,
    },

    #[error("failed to unlike quote {quote_id}: {source}")]
    Unlike {
        quote_id: QuoteId,
        #[source]
        source: GatewayError,
    },

    #[error("failed to fetch liked quotes, please retry: {0}")]
    Fetch(#[source] GatewayError),
}

impl LikeSyncError {
    /// The quote a failed mutation was about.
    pub fn quote_id(&self) -> Option<&QuoteId> {
        match self {
            LikeSyncError::Like { quote_id, .. } | LikeSyncError::Unlike { quote_id, .. } => {
                Some(quote_id)
            }
            LikeSyncError::NoActiveUser | LikeSyncError::Fetch(_) => None,
        }
    }
}

/// Result of a bulk unlike: ids whose remote delete failed are listed with their
/// error, every other id stays removed.
#[derive(Debug, Default)]
pub struct BulkUnlikeReport {
    pub removed: Vec<QuoteId>,
    pub failed: Vec<(QuoteId, GatewayError)>,
}

impl BulkUnlikeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeOp {
    Like,
    Unlike,
}

impl LikeOp {
    fn target(self) -> bool {
        matches!(self, LikeOp::Like)
    }

    fn into_error(self, quote_id: QuoteId, source: GatewayError) -> LikeSyncError {
        match self {
            LikeOp::Like => LikeSyncError::Like { quote_id, source },
            LikeOp::Unlike => LikeSyncError::Unlike { quote_id, source },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticket: u64,
    target: bool,
}

#[derive(Default)]
struct LikeState {
    user: Option<UserId>,
    /// What the UI shows: acknowledged state plus outstanding optimistic edits.
    liked: HashSet<QuoteId>,
    /// Last state the remote store acknowledged, per quote.
    confirmed: HashSet<QuoteId>,
    confirmed_ticket: HashMap<QuoteId, u64>,
    pending: HashMap<QuoteId, Pending>,
    next_ticket: u64,
    /// Tickets below this belong to a previous user session and are ignored.
    ticket_floor: u64,
    fetch_seq: u64,
}

impl LikeState {
    fn set_liked(&mut self, quote_id: &QuoteId, liked: bool) {
        if liked {
            self.liked.insert(quote_id.clone());
        } else {
            self.liked.remove(quote_id);
        }
    }

    fn issue(&mut self, quote_id: &QuoteId, target: bool) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending
            .insert(quote_id.clone(), Pending { ticket, target });
        ticket
    }

    fn confirm(&mut self, quote_id: &QuoteId, ticket: u64, liked: bool) -> bool {
        let newer = self
            .confirmed_ticket
            .get(quote_id)
            .map_or(true, |last| ticket > *last);
        if newer {
            self.confirmed_ticket.insert(quote_id.clone(), ticket);
            if liked {
                self.confirmed.insert(quote_id.clone());
            } else {
                self.confirmed.remove(quote_id);
            }
        }
        newer
    }

    /// Settle `ticket`. Returns true when the local state was rolled back.
    fn reconcile(
        &mut self,
        quote_id: &QuoteId,
        ticket: u64,
        target: bool,
        result: &Result<(), GatewayError>,
    ) -> bool {
        if ticket < self.ticket_floor {
            return false;
        }
        let is_latest = self
            .pending
            .get(quote_id)
            .is_some_and(|p| p.ticket == ticket);
        if is_latest {
            self.pending.remove(quote_id);
        }

        match result {
            Ok(()) => {
                let advanced = self.confirm(quote_id, ticket, target);
                if advanced && !self.pending.contains_key(quote_id) {
                    let confirmed = self.confirmed.contains(quote_id);
                    self.set_liked(quote_id, confirmed);
                }
                false
            }
            Err(_) if is_latest => {
                let confirmed = self.confirmed.contains(quote_id);
                self.set_liked(quote_id, confirmed);
                true
            }
            Err(_) => false,
        }
    }
}

pub struct LikeSynchronizer {
    repo: Arc<dyn LikedQuoteRepositoryPort>,
    state: Mutex<LikeState>,
}

impl LikeSynchronizer {
    pub fn new(repo: Arc<dyn LikedQuoteRepositoryPort>) -> Self {
        Self {
            repo,
            state: Mutex::new(LikeState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, LikeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_liked(&self, quote_id: &QuoteId) -> bool {
        self.state().liked.contains(quote_id)
    }

    pub fn liked_ids(&self) -> HashSet<QuoteId> {
        self.state().liked.clone()
    }

    pub fn active_user(&self) -> Option<UserId> {
        self.state().user.clone()
    }

    /// Replace the local set with the remote one for `user_id`.
    ///
    /// `None` clears everything and never fails. On a remote failure the previous
    /// set is kept. Optimistic edits still in flight for the same user are laid
    /// over the fetched set.
    pub async fn fetch_all(&self, user_id: Option<&UserId>) -> Result<(), LikeSyncError> {
        let Some(user_id) = user_id else {
            let mut state = self.state();
            let floor = state.next_ticket;
            let fetch_seq = state.fetch_seq + 1;
            *state = LikeState {
                next_ticket: floor,
                ticket_floor: floor,
                fetch_seq,
                ..LikeState::default()
            };
            info!("liked quotes cleared, no active user");
            return Ok(());
        };

        let seq = {
            let mut state = self.state();
            state.fetch_seq += 1;
            state.fetch_seq
        };

        let span = info_span!("usecase.likes.fetch_all", user_id = %user_id);
        async {
            let ids = self.repo.fetch_liked_quote_ids(user_id).await.map_err(|e| {
                error!(error = %e, "failed to fetch liked quotes");
                LikeSyncError::Fetch(e)
            })?;

            let mut state = self.state();
            if state.fetch_seq != seq {
                debug!("liked quote fetch superseded by a newer one");
                return Ok(());
            }

            if state.user.as_ref() != Some(user_id) {
                let floor = state.next_ticket;
                state.pending.clear();
                state.confirmed_ticket.clear();
                state.ticket_floor = floor;
                state.user = Some(user_id.clone());
            }

            // Acknowledged tickets survive a same-user refetch: an older late
            // success never beats a newer acknowledged edit.
            state.confirmed = ids.into_iter().collect();
            state.liked = state.confirmed.clone();
            let overlay: Vec<(QuoteId, bool)> = state
                .pending
                .iter()
                .map(|(id, p)| (id.clone(), p.target))
                .collect();
            for (id, target) in overlay {
                state.set_liked(&id, target);
            }
            info!(count = state.liked.len(), "liked quotes synced");
            Ok(())
        }
        .instrument(span)
        .await
    }

    pub async fn like(&self, quote_id: &QuoteId) -> Result<(), LikeSyncError> {
        self.mutate(quote_id, LikeOp::Like).await
    }

    pub async fn unlike(&self, quote_id: &QuoteId) -> Result<(), LikeSyncError> {
        self.mutate(quote_id, LikeOp::Unlike).await
    }

    async fn mutate(&self, quote_id: &QuoteId, op: LikeOp) -> Result<(), LikeSyncError> {
        let target = op.target();
        let (user_id, ticket) = {
            let mut state = self.state();
            let user_id = state.user.clone().ok_or(LikeSyncError::NoActiveUser)?;
            let settled = !state.pending.contains_key(quote_id)
                && state.liked.contains(quote_id) == target;
            if settled {
                debug!(quote_id = %quote_id, ?op, "like state already settled");
                return Ok(());
            }
            state.set_liked(quote_id, target);
            (user_id, state.issue(quote_id, target))
        };

        let result = match op {
            LikeOp::Like => self.repo.like_quote(quote_id, &user_id).await,
            LikeOp::Unlike => self.repo.unlike_quote(quote_id, &user_id).await,
        };

        let rolled_back = self.state().reconcile(quote_id, ticket, target, &result);
        match result {
            Ok(()) => Ok(()),
            Err(source) => {
                if rolled_back {
                    warn!(quote_id = %quote_id, ?op, error = %source, "remote like sync failed, rolled back");
                } else {
                    debug!(quote_id = %quote_id, ?op, "stale like sync failure ignored");
                }
                Err(op.into_error(quote_id.clone(), source))
            }
        }
    }

    /// Bulk unlike. All ids leave the local set immediately; one remote call is
    /// issued per id and each failure is reported on its own without touching
    /// the ids that succeeded.
    pub async fn remove_many(&self, quote_ids: &[QuoteId]) -> Result<BulkUnlikeReport, LikeSyncError> {
        let (user_id, tickets) = {
            let mut state = self.state();
            let user_id = state.user.clone().ok_or(LikeSyncError::NoActiveUser)?;
            let tickets: Vec<(QuoteId, u64)> = quote_ids
                .iter()
                .map(|id| {
                    state.set_liked(id, false);
                    (id.clone(), state.issue(id, false))
                })
                .collect();
            (user_id, tickets)
        };

        let span = info_span!("usecase.likes.remove_many", count = tickets.len());
        async {
            let results = join_all(tickets.iter().map(|(id, _)| {
                let user_id = &user_id;
                async move { self.repo.unlike_quote(id, user_id).await }
            }))
            .await;

            let mut report = BulkUnlikeReport::default();
            let mut state = self.state();
            for ((id, ticket), result) in tickets.into_iter().zip(results) {
                state.reconcile(&id, ticket, false, &result);
                match result {
                    Ok(()) => report.removed.push(id),
                    Err(e) => {
                        warn!(quote_id = %id, error = %e, "bulk unlike failed for quote");
                        report.failed.push((id, e));
                    }
                }
            }
            info!(
                removed = report.removed.len(),
                failed = report.failed.len(),
                "bulk unlike finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Like(String),
        Unlike(String),
    }

    /// Remote fake. Mutations resolve immediately with the scripted outcome, or
    /// wait on a gate the test opens explicitly.
    #[derive(Default)]
    struct MockLikeRepository {
        liked: Mutex<Vec<QuoteId>>,
        fetch_fails: Mutex<bool>,
        outcomes: Mutex<VecDeque<Result<(), GatewayError>>>,
        gates: Mutex<VecDeque<oneshot::Receiver<Result<(), GatewayError>>>>,
        failing_ids: Mutex<HashSet<String>>,
        calls: Mutex<Vec<Call>>,
    }

    impl MockLikeRepository {
        fn with_liked(ids: &[&str]) -> Self {
            let repo = Self::default();
            *repo.liked.lock().unwrap() = ids.iter().map(|s| QuoteId::from(*s)).collect();
            repo
        }

        fn push_outcome(&self, outcome: Result<(), GatewayError>) {
            self.outcomes.lock().unwrap().push_back(outcome);
        }

        fn gate(&self) -> oneshot::Sender<Result<(), GatewayError>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }

        async fn resolve(&self, quote_id: &QuoteId) -> Result<(), GatewayError> {
            if self.failing_ids.lock().unwrap().contains(quote_id.as_str()) {
                return Err(GatewayError::Status {
                    code: 500,
                    message: "boom".into(),
                });
            }
            let gate = self.gates.lock().unwrap().pop_front();
            if let Some(rx) = gate {
                return rx.await.unwrap_or(Err(GatewayError::Network("dropped".into())));
            }
            self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LikedQuoteRepositoryPort for MockLikeRepository {
        async fn fetch_liked_quote_ids(&self, _user_id: &UserId) -> Result<Vec<QuoteId>, GatewayError> {
            if *self.fetch_fails.lock().unwrap() {
                return Err(GatewayError::Network("offline".into()));
            }
            Ok(self.liked.lock().unwrap().clone())
        }

        async fn like_quote(&self, quote_id: &QuoteId, _user_id: &UserId) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(Call::Like(quote_id.to_string()));
            self.resolve(quote_id).await
        }

        async fn unlike_quote(&self, quote_id: &QuoteId, _user_id: &UserId) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(Call::Unlike(quote_id.to_string()));
            self.resolve(quote_id).await
        }
    }

    async fn synced(repo: Arc<MockLikeRepository>) -> LikeSynchronizer {
        let sync = LikeSynchronizer::new(repo);
        sync.fetch_all(Some(&UserId::from("u1"))).await.unwrap();
        sync
    }

    fn q(id: &str) -> QuoteId {
        QuoteId::from(id)
    }

    #[tokio::test]
    async fn test_like_without_user_fails() {
        let sync = LikeSynchronizer::new(Arc::new(MockLikeRepository::default()));

        let err = sync.like(&q("a")).await.unwrap_err();

        assert!(matches!(err, LikeSyncError::NoActiveUser));
        assert!(!sync.is_liked(&q("a")));
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_set() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a", "b"]));
        let sync = synced(repo).await;

        assert!(sync.is_liked(&q("a")));
        assert!(sync.is_liked(&q("b")));
        assert!(!sync.is_liked(&q("c")));
        assert_eq!(sync.active_user(), Some(UserId::from("u1")));
    }

    #[tokio::test]
    async fn test_fetch_all_without_user_clears() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a"]));
        let sync = synced(repo).await;

        sync.fetch_all(None).await.unwrap();

        assert!(sync.liked_ids().is_empty());
        assert!(sync.active_user().is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_set() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a"]));
        let sync = synced(repo.clone()).await;
        *repo.fetch_fails.lock().unwrap() = true;

        let err = sync.fetch_all(Some(&UserId::from("u1"))).await.unwrap_err();

        assert!(matches!(err, LikeSyncError::Fetch(_)));
        assert!(sync.is_liked(&q("a")));
    }

    #[tokio::test]
    async fn test_like_twice_stays_liked() {
        let repo = Arc::new(MockLikeRepository::default());
        let sync = synced(repo.clone()).await;

        sync.like(&q("a")).await.unwrap();
        sync.like(&q("a")).await.unwrap();

        assert!(sync.is_liked(&q("a")));
        assert_eq!(repo.calls(), vec![Call::Like("a".into())]);
    }

    #[tokio::test]
    async fn test_failed_unlike_rolls_back_and_names_quote() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a"]));
        let sync = synced(repo.clone()).await;
        repo.push_outcome(Err(GatewayError::Network("timeout".into())));

        let err = sync.unlike(&q("a")).await.unwrap_err();

        assert!(sync.is_liked(&q("a")));
        assert!(matches!(err, LikeSyncError::Unlike { .. }));
        assert_eq!(err.quote_id(), Some(&q("a")));
        assert!(err.to_string().contains("a"));
    }

    #[tokio::test]
    async fn test_failed_like_rolls_back() {
        let repo = Arc::new(MockLikeRepository::default());
        let sync = synced(repo.clone()).await;
        repo.push_outcome(Err(GatewayError::Status {
            code: 503,
            message: "unavailable".into(),
        }));

        let err = sync.like(&q("a")).await.unwrap_err();

        assert!(!sync.is_liked(&q("a")));
        assert!(matches!(err, LikeSyncError::Like { .. }));
    }

    #[tokio::test]
    async fn test_local_state_is_optimistic_while_remote_in_flight() {
        let repo = Arc::new(MockLikeRepository::default());
        let sync = synced(repo.clone()).await;
        let a = q("a");
        let gate = repo.gate();

        let like = sync.like(&a);
        let check = async {
            tokio::task::yield_now().await;
            let seen = sync.is_liked(&a);
            gate.send(Ok(())).unwrap();
            seen
        };
        let (result, seen_during_flight) = tokio::join!(like, check);

        result.unwrap();
        assert!(seen_during_flight);
        assert!(sync.is_liked(&a));
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_undo_newer_unlike() {
        let repo = Arc::new(MockLikeRepository::default());
        let sync = synced(repo.clone()).await;
        let a = q("a");
        let like_gate = repo.gate();
        let unlike_gate = repo.gate();

        let like = sync.like(&a);
        let unlike_then_fail_like = async {
            tokio::task::yield_now().await;
            let unlike = sync.unlike(&a);
            let resolve = async {
                tokio::task::yield_now().await;
                unlike_gate.send(Ok(())).unwrap();
                tokio::task::yield_now().await;
                like_gate
                    .send(Err(GatewayError::Network("late".into())))
                    .unwrap();
            };
            let (unlike_result, ()) = tokio::join!(unlike, resolve);
            unlike_result
        };
        let (like_result, unlike_result) = tokio::join!(like, unlike_then_fail_like);

        assert!(like_result.is_err());
        unlike_result.unwrap();
        assert!(!sync.is_liked(&a));
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_undo_newer_like() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a"]));
        let sync = synced(repo.clone()).await;
        let a = q("a");
        let unlike_gate = repo.gate();
        let like_gate = repo.gate();

        let unlike = sync.unlike(&a);
        let relike = async {
            tokio::task::yield_now().await;
            let like = sync.like(&a);
            let resolve = async {
                tokio::task::yield_now().await;
                like_gate.send(Ok(())).unwrap();
                tokio::task::yield_now().await;
                unlike_gate
                    .send(Err(GatewayError::Network("late".into())))
                    .unwrap();
            };
            let (like_result, ()) = tokio::join!(like, resolve);
            like_result
        };
        let (unlike_result, like_result) = tokio::join!(unlike, relike);

        assert!(unlike_result.is_err());
        like_result.unwrap();
        assert!(sync.is_liked(&a));
    }

    #[tokio::test]
    async fn test_latest_failure_reverts_to_last_acknowledged_state() {
        let repo = Arc::new(MockLikeRepository::default());
        let sync = synced(repo.clone()).await;
        let a = q("a");
        let like_gate = repo.gate();
        let unlike_gate = repo.gate();

        let like = sync.like(&a);
        let unlike = async {
            tokio::task::yield_now().await;
            let unlike = sync.unlike(&a);
            let resolve = async {
                tokio::task::yield_now().await;
                like_gate.send(Ok(())).unwrap();
                tokio::task::yield_now().await;
                unlike_gate
                    .send(Err(GatewayError::Network("down".into())))
                    .unwrap();
            };
            let (result, ()) = tokio::join!(unlike, resolve);
            result
        };
        let (like_result, unlike_result) = tokio::join!(like, unlike);

        like_result.unwrap();
        assert!(unlike_result.is_err());
        assert!(sync.is_liked(&a));
    }

    #[tokio::test]
    async fn test_refetch_does_not_let_late_success_undo_newer_like() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a"]));
        let sync = synced(repo.clone()).await;
        let a = q("a");
        let unlike_gate = repo.gate();

        let unlike = sync.unlike(&a);
        let relike_and_refetch = async {
            tokio::task::yield_now().await;
            sync.like(&a).await.unwrap();
            sync.fetch_all(Some(&UserId::from("u1"))).await.unwrap();
            let after_refetch = sync.is_liked(&a);
            unlike_gate.send(Ok(())).unwrap();
            after_refetch
        };
        let (unlike_result, liked_after_refetch) = tokio::join!(unlike, relike_and_refetch);

        unlike_result.unwrap();
        assert!(liked_after_refetch);
        assert!(sync.is_liked(&a));
    }

    #[tokio::test]
    async fn test_refetch_keeps_late_success_of_latest_edit() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a"]));
        let sync = synced(repo.clone()).await;
        let a = q("a");
        let gate = repo.gate();

        let unlike = sync.unlike(&a);
        let refetch = async {
            tokio::task::yield_now().await;
            sync.fetch_all(Some(&UserId::from("u1"))).await.unwrap();
            gate.send(Ok(())).unwrap();
        };
        let (result, ()) = tokio::join!(unlike, refetch);

        result.unwrap();
        assert!(!sync.is_liked(&a));
    }

    #[tokio::test]
    async fn test_remove_many_reports_partial_failures() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a", "b", "c"]));
        let sync = synced(repo.clone()).await;
        repo.failing_ids.lock().unwrap().insert("b".into());

        let report = sync
            .remove_many(&[q("a"), q("b"), q("c")])
            .await
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.removed, vec![q("a"), q("c")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, q("b"));
        assert!(!sync.is_liked(&q("a")));
        assert!(!sync.is_liked(&q("c")));
        assert!(sync.is_liked(&q("b")));
        assert_eq!(repo.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_remove_many_applies_locally_before_remote() {
        let repo = Arc::new(MockLikeRepository::with_liked(&["a"]));
        let sync = synced(repo.clone()).await;
        let a = q("a");
        let ids = [a.clone()];
        let gate = repo.gate();

        let remove = sync.remove_many(&ids);
        let check = async {
            tokio::task::yield_now().await;
            let seen = sync.is_liked(&a);
            gate.send(Ok(())).unwrap();
            seen
        };
        let (report, seen) = tokio::join!(remove, check);

        assert!(report.unwrap().is_complete());
        assert!(!seen);
    }

    #[tokio::test]
    async fn test_switching_user_drops_stale_resolutions() {
        let repo = Arc::new(MockLikeRepository::default());
        let sync = synced(repo.clone()).await;
        let a = q("a");
        let gate = repo.gate();

        let like = sync.like(&a);
        let switch = async {
            tokio::task::yield_now().await;
            sync.fetch_all(Some(&UserId::from("u2"))).await.unwrap();
            gate.send(Err(GatewayError::Network("late".into()))).unwrap();
        };
        let (result, ()) = tokio::join!(like, switch);

        assert!(result.is_err());
        assert_eq!(sync.active_user(), Some(UserId::from("u2")));
        assert!(!sync.is_liked(&a));
    }
}
