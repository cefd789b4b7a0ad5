//! Integration tests for rounds and the bracket orchestrator.

use bracket_core::{
    Bracket, BracketContext, Competitor, CompetitorRegistry, CompetitorSource, Differentials,
    MatchResult, MatchupResolver, PairingStrategy, ResultLog, RoundOutcome, RoundResolver,
    Seeding, SeedingSource,
};

fn registry() -> CompetitorRegistry {
    let mut r = CompetitorRegistry::new();
    for (id, name) in [(1, "A"), (2, "B"), (3, "C"), (4, "D")] {
        r.register(Competitor::new(id, name)).unwrap();
    }
    r
}

fn initial(r: &CompetitorRegistry) -> Seeding {
    Seeding::from_identifiers(r, ["A", "B", "C", "D"].map(Some)).unwrap()
}

fn record(r: &CompetitorRegistry, log: &mut ResultLog, a: &str, b: &str, s1: i64, s2: i64) {
    let first = r.resolve(a).unwrap().clone();
    let second = r.resolve(b).unwrap().clone();
    log.register(MatchResult::new(first, second, s1, s2));
}

fn names(s: &Seeding) -> Vec<Option<&str>> {
    s.slots()
        .iter()
        .map(|slot| slot.as_ref().map(|c| c.name.as_str()))
        .collect()
}

fn paired(round: &RoundOutcome) -> Vec<(&str, &str)> {
    round
        .matchups
        .iter()
        .map(|m| {
            let first = m.first.as_ref().unwrap().name.as_str();
            let second = m.second.as_ref().unwrap().name.as_str();
            (first, second)
        })
        .collect()
}

/// Final seeded from the winners of two semi-final matchups.
fn final_round() -> RoundResolver {
    let seeding = SeedingSource::lookup(|view| {
        let winner = |key: &str| view.outcome(key).and_then(|o| o.winner()).cloned();
        Ok(Seeding::from_slots(vec![winner("semi_1"), winner("semi_2")]))
    });
    RoundResolver::new(seeding, PairingStrategy::Sequential)
}

fn seeded_matchup(first: usize, second: usize) -> MatchupResolver {
    MatchupResolver::new(CompetitorSource::seed(first), CompetitorSource::seed(second))
}

fn sequential(seeding: impl Into<SeedingSource>) -> RoundResolver {
    RoundResolver::new(seeding, PairingStrategy::Sequential)
}

fn three_node_bracket() -> Bracket {
    let mut bracket = Bracket::new();
    bracket
        .next("semi_1", seeded_matchup(0, 3))
        .next("semi_2", seeded_matchup(1, 2))
        .next("final", final_round());
    bracket
}

#[test]
fn bracket_incomplete_while_final_has_no_result() {
    let r = registry();
    let mut log = ResultLog::new();
    record(&r, &mut log, "A", "D", 3, 0);
    record(&r, &mut log, "B", "C", 1, 2);

    let mut bracket = three_node_bracket();
    let mut ctx = BracketContext::new(&r, &mut log);
    assert!(!bracket.recompute(&initial(&r), &mut ctx).unwrap());
    assert!(!bracket.is_complete());

    let fin = bracket.outcome("final").unwrap().as_round().unwrap();
    assert_eq!(fin.matchups.len(), 1);
    assert_eq!(fin.matchups[0].first.as_ref().unwrap().name, "A");
    assert_eq!(fin.matchups[0].second.as_ref().unwrap().name, "C");
    assert_eq!(names(&fin.winners), vec![None]);
}

#[test]
fn bracket_complete_once_every_node_has_a_winner() {
    let r = registry();
    let mut log = ResultLog::new();
    record(&r, &mut log, "A", "D", 3, 0);
    record(&r, &mut log, "B", "C", 1, 2);
    record(&r, &mut log, "C", "A", 1, 2);
    let mut tracker = Differentials::new(&r);

    let mut bracket = three_node_bracket();
    {
        let mut ctx = BracketContext::new(&r, &mut log).with_tracker(&mut tracker);
        assert!(bracket.recompute(&initial(&r), &mut ctx).unwrap());
    }
    assert!(bracket.is_complete());
    assert_eq!(bracket.outcome("final").unwrap().winner().unwrap().name, "A");
    assert_eq!(bracket.outcome("semi_2").unwrap().loser().unwrap().name, "B");

    assert_eq!(tracker.score_diff.get("A").unwrap(), 4);
    assert_eq!(tracker.win_diff.get("A").unwrap(), 2);
    assert_eq!(tracker.win_diff.get("C").unwrap(), 0);
    assert_eq!(tracker.score_diff.get("D").unwrap(), -3);
}

#[test]
fn lookups_read_latest_outcomes_regardless_of_registration_order() {
    let r = registry();
    let mut log = ResultLog::new();
    record(&r, &mut log, "A", "D", 3, 0);
    record(&r, &mut log, "B", "C", 1, 2);
    record(&r, &mut log, "A", "C", 2, 1);

    let mut bracket = Bracket::new();
    bracket
        .next("final", final_round())
        .next("semi_1", seeded_matchup(0, 3))
        .next("semi_2", seeded_matchup(1, 2));
    let seeding = initial(&r);

    {
        let mut ctx = BracketContext::new(&r, &mut log);
        assert!(!bracket.recompute(&seeding, &mut ctx).unwrap());
    }
    // No semi-final outcomes yet: the final pairs two unresolved slots.
    let fin = bracket.outcome("final").unwrap().as_round().unwrap();
    assert_eq!(fin.matchups.len(), 1);
    assert!(!fin.matchups[0].is_played());

    log.release_all();
    let mut ctx = BracketContext::new(&r, &mut log);
    assert!(bracket.recompute(&seeding, &mut ctx).unwrap());
    assert_eq!(bracket.outcome("final").unwrap().winner().unwrap().name, "A");
}

#[test]
fn round_splits_winners_and_losers_and_merges_differentials() {
    let r = registry();
    let mut log = ResultLog::new();
    record(&r, &mut log, "A", "D", 3, 1);
    record(&r, &mut log, "C", "B", 2, 0);

    let round = RoundResolver::new(initial(&r), PairingStrategy::Cross);
    let mut ctx = BracketContext::new(&r, &mut log);
    let outcome = round.resolve(&mut ctx).unwrap();

    assert_eq!(names(&outcome.winners), vec![Some("A"), Some("C")]);
    assert_eq!(names(&outcome.losers), vec![Some("D"), Some("B")]);
    assert_eq!(outcome.differentials.score_diff.values(), &[2, -2, 2, -2]);
    assert_eq!(outcome.differentials.win_diff.values(), &[1, -1, 1, -1]);
}

#[test]
fn completion_checks_only_the_first_winner_of_a_round() {
    let r = registry();
    let mut log = ResultLog::new();
    record(&r, &mut log, "B", "C", 1, 2);

    let mut bracket = Bracket::new();
    bracket.next("round", RoundResolver::new(SeedingSource::initial(), PairingStrategy::Cross));
    let mut ctx = BracketContext::new(&r, &mut log);
    assert!(!bracket.recompute(&initial(&r), &mut ctx).unwrap());
    let round = bracket.outcome("round").unwrap().as_round().unwrap();
    assert_eq!(names(&round.winners), vec![None, Some("C")]);

    let mut log = ResultLog::new();
    record(&r, &mut log, "A", "D", 1, 0);
    let mut ctx = BracketContext::new(&r, &mut log);
    assert!(bracket.recompute(&initial(&r), &mut ctx).unwrap());
    let round = bracket.outcome("round").unwrap().as_round().unwrap();
    assert_eq!(names(&round.winners), vec![Some("A"), None]);
}

#[test]
fn later_round_avoids_rematches_from_earlier_round() {
    let r = registry();
    let mut log = ResultLog::new();
    record(&r, &mut log, "A", "C", 1, 0);
    record(&r, &mut log, "B", "D", 1, 0);
    record(&r, &mut log, "A", "D", 1, 0);
    record(&r, &mut log, "B", "C", 1, 0);
    record(&r, &mut log, "A", "B", 2, 1);

    let mut bracket = Bracket::new();
    bracket
        .next("round_1", sequential(SeedingSource::initial()))
        .next("round_2", sequential(SeedingSource::initial()).avoiding_rematches())
        .next(
            "final",
            MatchupResolver::new(
                CompetitorSource::winner_of("round_2"),
                CompetitorSource::lookup(|view| {
                    view.outcome("round_2")
                        .and_then(|o| o.as_round())
                        .and_then(|round| round.winners.get(1))
                        .cloned()
                }),
            ),
        );

    let mut ctx = BracketContext::new(&r, &mut log);
    assert!(bracket.recompute(&initial(&r), &mut ctx).unwrap());

    let round_2 = bracket.outcome("round_2").unwrap().as_round().unwrap();
    assert_eq!(paired(round_2), vec![("A", "D"), ("B", "C")]);
    assert_eq!(names(&round_2.winners), vec![Some("A"), Some("B")]);
    assert_eq!(bracket.outcome("final").unwrap().winner().unwrap().name, "A");
}

#[test]
fn winners_of_feeds_the_next_round() {
    let r = registry();
    let mut log = ResultLog::new();
    record(&r, &mut log, "A", "C", 3, 2);
    record(&r, &mut log, "D", "B", 1, 0);
    record(&r, &mut log, "A", "D", 0, 1);
    record(&r, &mut log, "C", "B", 5, 5);

    let mut bracket = Bracket::new();
    bracket
        .next("round_1", sequential(SeedingSource::initial()))
        .next("final", sequential(SeedingSource::winners_of("round_1")))
        .next("third", sequential(SeedingSource::losers_of("round_1")));

    let mut ctx = BracketContext::new(&r, &mut log);
    // The third-place match is a draw, so the bracket stays incomplete.
    assert!(!bracket.recompute(&initial(&r), &mut ctx).unwrap());
    assert_eq!(bracket.outcome("final").unwrap().winner().unwrap().name, "D");
    let third = bracket.outcome("third").unwrap().as_round().unwrap();
    assert!(third.matchups[0].is_played());
    assert!(third.winners.get(0).is_none());
}

#[test]
fn random_round_avoiding_rematches_never_repeats_a_played_pair() {
    let r = registry();
    // Only (A,D),(B,C) avoids the earlier A-B, C-D and A-C meetings.
    for _ in 0..50 {
        let mut log = ResultLog::new();
        for (a, b) in [("A", "B"), ("C", "D"), ("A", "C")] {
            record(&r, &mut log, a, b, 1, 0);
            log.take(&r, a, b).unwrap().unwrap();
        }
        record(&r, &mut log, "A", "D", 2, 0);
        record(&r, &mut log, "B", "C", 0, 2);

        let round = RoundResolver::new(initial(&r), PairingStrategy::Random).avoiding_rematches();
        let mut ctx = BracketContext::new(&r, &mut log);
        let outcome = round.resolve(&mut ctx).unwrap();

        let mut pairs: Vec<_> = paired(&outcome)
            .into_iter()
            .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        pairs.sort();
        assert_eq!(pairs, vec![("A", "D"), ("B", "C")]);
        assert!(outcome.matchups.iter().all(|m| m.is_played()));
    }
}
