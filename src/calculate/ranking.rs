//! Map ranking by win-rate differential.

use std::collections::BTreeMap;

use super::{calculate_win_rate, round_to};
use crate::models::{CsMap, MapTally, RankedMap};

/// Per-map win rate of a tally, rounded to 3 decimals.
pub fn win_rates(tally: &MapTally) -> BTreeMap<CsMap, f64> {
    tally
        .iter()
        .map(|(map, wl)| (map, round_to(calculate_win_rate(wl.wins, wl.losses), 3)))
        .collect()
}

/// Rank every map for both rosters.
///
/// Each list holds all seven maps, sorted descending by the roster's own win
/// rate minus the opponent's. Equal differentials keep canonical map order.
/// The differential for a map in one list is the negation of the other's.
pub fn rank_maps(tally_1: &MapTally, tally_2: &MapTally) -> (Vec<RankedMap>, Vec<RankedMap>) {
    let rates_1 = win_rates(tally_1);
    let rates_2 = win_rates(tally_2);

    (
        rank_against(&rates_1, &rates_2),
        rank_against(&rates_2, &rates_1),
    )
}

fn rank_against(own: &BTreeMap<CsMap, f64>, opponent: &BTreeMap<CsMap, f64>) -> Vec<RankedMap> {
    let rate = |rates: &BTreeMap<CsMap, f64>, map: CsMap| rates.get(&map).copied().unwrap_or(0.0);

    let mut diffs: Vec<(CsMap, f64)> = CsMap::ALL
        .into_iter()
        .map(|map| (map, rate(own, map) - rate(opponent, map)))
        .collect();
    // stable, so ties stay in canonical order
    diffs.sort_by(|a, b| b.1.total_cmp(&a.1));

    diffs
        .into_iter()
        .map(|(map, diff)| RankedMap {
            map,
            differential: round_to(diff, 2),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WinLoss;
    use pretty_assertions::assert_eq;

    fn tally(entries: &[(CsMap, u32, u32)]) -> MapTally {
        entries
            .iter()
            .map(|(m, w, l)| (*m, WinLoss::new(*w, *l)))
            .collect()
    }

    /// A spread of tallies covering empty maps, perfect records and mixes.
    fn sample_tallies() -> Vec<MapTally> {
        let mut out = vec![MapTally::new()];
        for seed in 1..40u32 {
            out.push(
                CsMap::ALL
                    .into_iter()
                    .enumerate()
                    .map(|(i, m)| {
                        let i = i as u32;
                        (m, WinLoss::new((seed * (i + 3)) % 11, (seed * (i + 7)) % 5))
                    })
                    .collect(),
            );
        }
        out
    }

    fn differential(list: &[RankedMap], map: CsMap) -> f64 {
        list.iter().find(|r| r.map == map).unwrap().differential
    }

    #[test]
    fn test_win_rates_rounded_and_zero_policy() {
        let rates = win_rates(&tally(&[(CsMap::Mirage, 2, 1), (CsMap::Nuke, 10, 0)]));

        assert_eq!(rates[&CsMap::Mirage], 0.667);
        assert_eq!(rates[&CsMap::Nuke], 1.0);
        assert_eq!(rates[&CsMap::Train], 0.0);
        assert_eq!(rates.len(), 7);
    }

    #[test]
    fn test_win_rates_within_unit_interval() {
        for t in sample_tallies() {
            for (map, rate) in win_rates(&t) {
                assert!((0.0..=1.0).contains(&rate), "{} rate {} out of range", map, rate);
            }
        }
    }

    #[test]
    fn test_mirage_scenario() {
        let t1 = tally(&[(CsMap::Mirage, 10, 0)]);
        let rates = win_rates(&t1);
        assert_eq!(rates[&CsMap::Mirage], 1.0);

        let (ranked_1, _) = rank_maps(&t1, &MapTally::new());
        assert_eq!(
            ranked_1[0],
            RankedMap {
                map: CsMap::Mirage,
                differential: 1.0
            }
        );
    }

    #[test]
    fn test_inferno_scenario() {
        let t1 = tally(&[(CsMap::Inferno, 5, 0)]);
        let t2 = tally(&[(CsMap::Inferno, 0, 5)]);

        let (ranked_1, ranked_2) = rank_maps(&t1, &t2);

        assert_eq!(differential(&ranked_1, CsMap::Inferno), 1.0);
        assert_eq!(differential(&ranked_2, CsMap::Inferno), -1.0);
        assert_eq!(ranked_1[0].map, CsMap::Inferno);
        assert_eq!(ranked_2.last().unwrap().map, CsMap::Inferno);
    }

    #[test]
    fn test_every_map_exactly_once() {
        for t in sample_tallies() {
            let (ranked_1, ranked_2) = rank_maps(&t, &MapTally::new());
            for list in [ranked_1, ranked_2] {
                let mut maps: Vec<CsMap> = list.iter().map(|r| r.map).collect();
                maps.sort();
                assert_eq!(maps, CsMap::ALL.to_vec());
            }
        }
    }

    #[test]
    fn test_sorted_descending() {
        let tallies = sample_tallies();
        for pair in tallies.windows(2) {
            let (ranked_1, ranked_2) = rank_maps(&pair[0], &pair[1]);
            for list in [ranked_1, ranked_2] {
                for w in list.windows(2) {
                    assert!(w[0].differential >= w[1].differential, "{:?}", list);
                }
            }
        }
    }

    #[test]
    fn test_lists_are_mirror_images() {
        let tallies = sample_tallies();
        for pair in tallies.windows(2) {
            let (ranked_1, ranked_2) = rank_maps(&pair[0], &pair[1]);
            for map in CsMap::ALL {
                assert_eq!(
                    differential(&ranked_1, map),
                    -differential(&ranked_2, map),
                    "{}",
                    map
                );
            }
        }
    }

    #[test]
    fn test_ties_keep_canonical_order() {
        let (ranked_1, ranked_2) = rank_maps(&MapTally::new(), &MapTally::new());
        let expected: Vec<RankedMap> = CsMap::ALL
            .into_iter()
            .map(|map| RankedMap {
                map,
                differential: 0.0,
            })
            .collect();

        assert_eq!(ranked_1, expected);
        assert_eq!(ranked_2, expected);
    }

    #[test]
    fn test_differential_rounding() {
        // 2/3 - 1/3 = 0.667 - 0.333 = 0.334 -> 0.33
        let t1 = tally(&[(CsMap::Dust2, 2, 1)]);
        let t2 = tally(&[(CsMap::Dust2, 1, 2)]);
        let (ranked_1, ranked_2) = rank_maps(&t1, &t2);

        assert_eq!(differential(&ranked_1, CsMap::Dust2), 0.33);
        assert_eq!(differential(&ranked_2, CsMap::Dust2), -0.33);
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let tallies = sample_tallies();
        let first = rank_maps(&tallies[3], &tallies[7]);
        let second = rank_maps(&tallies[3], &tallies[7]);
        assert_eq!(first, second);
    }
}
