//! Integration tests for JSON fixtures and the standings report.

use bracket_core::fixture::Fixture;
use bracket_core::{BracketError, Identifier};
use serde_json::json;

fn semis_and_final() -> serde_json::Value {
    json!({
        "competitors": [
            { "id": 1, "name": "Alpha", "aliases": ["ALP"] },
            { "id": 2, "name": "Beta" },
            { "id": 3, "name": "Gamma" },
            { "id": 4, "name": "Delta" }
        ],
        "seeding": ["Alpha", 2, "Gamma", "Delta"],
        "results": [
            { "first": "ALP", "second": "Delta", "scores": [3, 0] },
            { "first": "Beta", "second": "Gamma", "scores": [1, 2] },
            { "first": "Gamma", "second": 1, "scores": [1, 2], "alt_wins": [true, false] }
        ],
        "nodes": [
            { "key": "semi_1", "matchup": { "first": { "seed": 0 }, "second": { "seed": 3 } } },
            { "key": "semi_2", "matchup": { "first": { "seed": 1 }, "second": { "seed": 2 } } },
            { "key": "final", "matchup": {
                "first": { "winner_of": "semi_1" },
                "second": { "winner_of": "semi_2" }
            } }
        ]
    })
}

#[test]
fn runs_fixture_and_ranks_by_default_tiebreakers() {
    let fixture = Fixture::from_json(&semis_and_final().to_string()).unwrap();
    let report = fixture.run().unwrap();

    assert!(report.complete);
    let keys: Vec<_> = report.nodes.iter().map(|n| n.key.as_str()).collect();
    assert_eq!(keys, vec!["semi_1", "semi_2", "final"]);
    assert_eq!(report.nodes[2].winners, vec![Some("Alpha".to_string())]);
    assert_eq!(report.nodes[2].losers, vec![Some("Gamma".to_string())]);

    let order: Vec<_> = report.standings.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(order, vec!["Alpha", "Gamma", "Beta", "Delta"]);
    let alpha = &report.standings[0];
    assert_eq!((alpha.rank, alpha.win_diff, alpha.score_diff), (1, 2, 4));
    // Gamma's secondary flag overrides the final's secondary win margin only.
    let gamma = &report.standings[1];
    assert_eq!((gamma.win_diff, gamma.alt_win_diff), (0, 2));
}

#[test]
fn round_nodes_parse_strategy_and_rematch_flag() {
    let fixture: Fixture = serde_json::from_value(json!({
        "competitors": [
            { "id": 1, "name": "A" }, { "id": 2, "name": "B" },
            { "id": 3, "name": "C" }, { "id": 4, "name": "D" }
        ],
        "seeding": ["A", "B", "C", "D"],
        "results": [
            { "first": "A", "second": "D", "scores": [2, 0] },
            { "first": "B", "second": "C", "scores": [0, 1] },
            { "first": "A", "second": "C", "scores": [1, 0] },
            { "first": "B", "second": "D", "scores": [0, 0] }
        ],
        "nodes": [
            { "key": "r1", "round": { "seeding": "initial", "strategy": "cross" } },
            {
                "key": "r2",
                "round": { "seeding": "initial", "strategy": "cross", "avoid_rematches": true }
            }
        ],
        "tiebreakers": [{ "track": "score_diff", "coefficient": -1 }]
    }))
    .unwrap();
    let report = fixture.run().unwrap();

    assert_eq!(report.nodes[0].winners, vec![Some("A".to_string()), Some("C".to_string())]);
    // r2 cannot replay A-D or B-C, so it pairs A-C and B-D; B-D is a draw.
    assert_eq!(report.nodes[1].winners, vec![Some("A".to_string()), None]);
    assert!(report.complete);
    assert_eq!(report.standings[0].name, "A");
    assert_eq!(report.standings[0].score_diff, 3);
}

#[test]
fn empty_slot_keeps_bracket_incomplete() {
    let fixture: Fixture = serde_json::from_value(json!({
        "competitors": [{ "id": 1, "name": "Solo" }],
        "nodes": [{
            "key": "bye",
            "matchup": { "first": { "competitor": "Solo" }, "second": "empty" }
        }]
    }))
    .unwrap();
    let report = fixture.run().unwrap();
    assert!(!report.complete);
    assert_eq!(report.nodes[0].winners, vec![None]);
}

#[test]
fn unknown_competitor_in_seeding_is_reported() {
    let fixture: Fixture = serde_json::from_value(json!({
        "competitors": [{ "id": 1, "name": "Solo" }],
        "seeding": ["Solo", "Ghost"]
    }))
    .unwrap();
    assert_eq!(
        fixture.run().unwrap_err(),
        BracketError::NotFound("Ghost".into())
    );
}

#[test]
fn duplicate_competitor_is_reported() {
    let fixture: Fixture = serde_json::from_value(json!({
        "competitors": [{ "id": 1, "name": "Solo" }, { "id": 1, "name": "Other" }]
    }))
    .unwrap();
    assert_eq!(
        fixture.run().unwrap_err(),
        BracketError::DuplicateRegistration(Identifier::Id(1))
    );
}

#[test]
fn random_round_with_rematch_avoidance_pairs_the_only_fresh_matchups() {
    let json = json!({
        "competitors": [
            { "id": 1, "name": "A" }, { "id": 2, "name": "B" },
            { "id": 3, "name": "C" }, { "id": 4, "name": "D" }
        ],
        "seeding": ["A", "C", "B", "D"],
        "results": [
            { "first": "A", "second": "B", "scores": [1, 0] },
            { "first": "C", "second": "D", "scores": [1, 0] },
            { "first": "A", "second": "C", "scores": [1, 0] },
            { "first": "A", "second": "D", "scores": [1, 0] },
            { "first": "B", "second": "C", "scores": [1, 0] }
        ],
        "nodes": [
            { "key": "r1", "round": { "seeding": "initial" } },
            { "key": "m", "matchup": { "first": { "seed": 0 }, "second": { "seed": 1 } } },
            {
                "key": "r2",
                "round": { "seeding": "initial", "strategy": "random", "avoid_rematches": true }
            }
        ]
    });

    for _ in 0..20 {
        let fixture: Fixture = serde_json::from_value(json.clone()).unwrap();
        let report = fixture.run().unwrap();
        // Only A-D and B-C are still unplayed, and both have a result waiting.
        let mut winners = report.nodes[2].winners.clone();
        winners.sort();
        assert_eq!(winners, vec![Some("A".to_string()), Some("B".to_string())]);
    }
}
