//! Win/loss aggregation across two rosters.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::fetch::{FaceitApi, FetchError};
use crate::models::{MapTally, PlayerId, StatRecord};

/// Fetch every player's recent matches and tally wins/losses per map.
///
/// Players of `roster_1` then `roster_2` are fetched concurrently, at most
/// `concurrency` at a time. Results come back in input order, so index `i`
/// always belongs to player `i` no matter which request finishes first.
/// The first failed fetch aborts the whole aggregation.
pub async fn calculate_winloss(
    api: &dyn FaceitApi,
    roster_1: &[PlayerId],
    roster_2: &[PlayerId],
    match_limit: u32,
    concurrency: usize,
) -> Result<(MapTally, MapTally), FetchError> {
    let players: Vec<PlayerId> = roster_1.iter().chain(roster_2).cloned().collect();
    debug!(
        "Fetching {} players from {} (limit {}, concurrency {})",
        players.len(),
        api.name(),
        match_limit,
        concurrency
    );

    let results: Vec<Vec<StatRecord>> = stream::iter(players)
        .map(|player| async move { api.fetch_player_stats(&player, match_limit).await })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let (tally_1, tally_2) = fold_winloss(&results, roster_1.len());
    info!(
        "Tallied {} matches for roster 1, {} for roster 2",
        tally_1.total_matches(),
        tally_2.total_matches()
    );
    Ok((tally_1, tally_2))
}

/// Fold per-player stat records into one tally per roster.
///
/// `results[i]` belongs to roster 1 when `i < roster_1_len`, otherwise to
/// roster 2. Records on maps outside the pool are skipped.
pub fn fold_winloss(results: &[Vec<StatRecord>], roster_1_len: usize) -> (MapTally, MapTally) {
    let mut tally_1 = MapTally::new();
    let mut tally_2 = MapTally::new();

    for (player_index, records) in results.iter().enumerate() {
        let tally = if player_index < roster_1_len {
            &mut tally_1
        } else {
            &mut tally_2
        };
        for record in records {
            let Some(map) = record.map() else {
                continue;
            };
            tally.record(map, record.is_win());
        }
    }

    (tally_1, tally_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFaceit;
    use crate::models::{CsMap, WinLoss};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn records(map: &str, wins: usize, losses: usize) -> Vec<StatRecord> {
        let mut out: Vec<StatRecord> = (0..wins).map(|_| StatRecord::new(map, true)).collect();
        out.extend((0..losses).map(|_| StatRecord::new(map, false)));
        out
    }

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    #[test]
    fn test_fold_single_player_mirage() {
        let results = vec![records("de_mirage", 10, 0)];
        let (tally_1, tally_2) = fold_winloss(&results, 1);

        assert_eq!(tally_1.get(CsMap::Mirage), WinLoss::new(10, 0));
        for map in CsMap::ALL.into_iter().filter(|m| *m != CsMap::Mirage) {
            assert_eq!(tally_1.get(map), WinLoss::new(0, 0));
        }
        assert_eq!(tally_2, MapTally::new());
    }

    #[test]
    fn test_fold_attributes_by_index() {
        let results = vec![
            records("de_nuke", 2, 1),
            records("de_nuke", 1, 0),
            records("de_nuke", 0, 3),
        ];
        let (tally_1, tally_2) = fold_winloss(&results, 2);

        assert_eq!(tally_1.get(CsMap::Nuke), WinLoss::new(3, 1));
        assert_eq!(tally_2.get(CsMap::Nuke), WinLoss::new(0, 3));
    }

    #[test]
    fn test_fold_ignores_maps_outside_pool() {
        let mut with_noise = records("de_train", 1, 1);
        with_noise.extend(records("de_vertigo", 5, 5));
        with_noise.extend(records("de_overpass", 2, 0));
        with_noise.extend(records("aim_map", 1, 0));

        let (noisy, _) = fold_winloss(&[with_noise], 1);
        let (clean, _) = fold_winloss(&[records("de_train", 1, 1)], 1);

        assert_eq!(noisy, clean);
        assert_eq!(noisy.len(), 7);
    }

    #[test]
    fn test_fold_empty_rosters() {
        let (tally_1, tally_2) = fold_winloss(&[], 0);
        assert_eq!(tally_1.len(), 7);
        assert_eq!(tally_2.len(), 7);
        assert_eq!(tally_1.total_matches() + tally_2.total_matches(), 0);
    }

    #[tokio::test]
    async fn test_calculate_winloss_fetches_every_player() {
        let mock = MockFaceit::new()
            .with_player("a1", records("de_inferno", 5, 0))
            .with_player("a2", records("de_dust2", 1, 2))
            .with_player("b1", records("de_inferno", 0, 5));

        let (tally_1, tally_2) =
            calculate_winloss(&mock, &ids(&["a1", "a2"]), &ids(&["b1"]), 20, 4)
                .await
                .unwrap();

        assert_eq!(mock.call_count(), 3);
        assert_eq!(tally_1.get(CsMap::Inferno), WinLoss::new(5, 0));
        assert_eq!(tally_1.get(CsMap::Dust2), WinLoss::new(1, 2));
        assert_eq!(tally_2.get(CsMap::Inferno), WinLoss::new(0, 5));
    }

    #[tokio::test]
    async fn test_calculate_winloss_preserves_order_when_completion_is_reversed() {
        // Roster 1's player answers last; its results must still land in roster 1.
        let mock = MockFaceit::new()
            .with_player("slow", records("de_ancient", 4, 0))
            .with_delay("slow", 80)
            .with_player("fast", records("de_ancient", 0, 4));

        let (tally_1, tally_2) = calculate_winloss(&mock, &ids(&["slow"]), &ids(&["fast"]), 20, 2)
            .await
            .unwrap();

        assert_eq!(tally_1.get(CsMap::Ancient), WinLoss::new(4, 0));
        assert_eq!(tally_2.get(CsMap::Ancient), WinLoss::new(0, 4));
    }

    #[tokio::test]
    async fn test_calculate_winloss_respects_match_limit() {
        let mock = MockFaceit::new().with_player("a1", records("de_anubis", 30, 0));

        let (tally_1, _) = calculate_winloss(&mock, &ids(&["a1"]), &[], 20, 1)
            .await
            .unwrap();

        assert_eq!(tally_1.get(CsMap::Anubis), WinLoss::new(20, 0));
    }

    #[tokio::test]
    async fn test_calculate_winloss_fails_fast_on_any_error() {
        let mock = MockFaceit::new()
            .with_player("a1", records("de_mirage", 3, 0))
            .with_failing_player("b1");

        let err = calculate_winloss(&mock, &ids(&["a1"]), &ids(&["b1"]), 20, 4)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_calculate_winloss_zero_concurrency_still_runs() {
        let mock = MockFaceit::new().with_player("a1", records("de_nuke", 1, 0));

        let (tally_1, _) = calculate_winloss(&mock, &ids(&["a1"]), &[], 20, 0)
            .await
            .unwrap();

        assert_eq!(tally_1.get(CsMap::Nuke), WinLoss::new(1, 0));
    }

    #[tokio::test]
    async fn test_calculate_winloss_runs_on_spawned_task() {
        // Handlers run this future on the runtime's worker threads.
        let api: Arc<dyn FaceitApi> = Arc::new(
            MockFaceit::new()
                .with_player("a1", records("de_train", 2, 1))
                .with_player("b1", records("de_train", 1, 2)),
        );
        let roster_1 = ids(&["a1"]);
        let roster_2 = ids(&["b1"]);

        let handle = tokio::spawn(async move {
            calculate_winloss(api.as_ref(), &roster_1, &roster_2, 20, 2).await
        });
        let (tally_1, tally_2) = handle.await.unwrap().unwrap();

        assert_eq!(tally_1.get(CsMap::Train), WinLoss::new(2, 1));
        assert_eq!(tally_2.get(CsMap::Train), WinLoss::new(1, 2));
    }
}
