mod common;

use common::*;
use eemap_lib::{
    find_path, plan_route_focus, resolve_node, safest_path, shortest_hops, Error, FileStageCache,
    MemoryStageCache, RouteStrategy, SqliteSource, Starmap, StarmapPipeline,
};

fn standard_starmap(env: &FixtureEnv) -> Starmap {
    let source = SqliteSource::open(&env.db_path).expect("fixture opens");
    StarmapPipeline::new(source, MemoryStageCache::new())
        .load()
        .expect("pipeline runs")
}

#[test]
fn shortest_path_takes_low_sec_shortcut() {
    let env = FixtureEnv::new();
    let starmap = standard_starmap(&env);

    let path = shortest_hops(&starmap, JITA, AMARR).expect("route exists");
    assert_eq!(path.systems, vec![JITA, NIYABAINEN, AMARR]);
    assert_eq!(path.hop_count(), 2);
    assert_eq!(path.risk, 2_000.0);
}

#[test]
fn safest_path_stays_in_high_sec() {
    let env = FixtureEnv::new();
    let starmap = standard_starmap(&env);

    let safest = safest_path(&starmap, JITA, AMARR).expect("route exists");
    assert_eq!(safest.systems, vec![JITA, PERIMETER, ASHAB, AMARR]);
    assert_eq!(safest.risk, 3.0);

    let shortest = shortest_hops(&starmap, JITA, AMARR).expect("route exists");
    assert!(safest.risk <= shortest.risk);
    assert!(shortest.hop_count() <= safest.hop_count());

    let highsec = find_path(&starmap, RouteStrategy::HighSecOnly, JITA, AMARR).unwrap();
    assert_eq!(highsec.systems, safest.systems);
}

#[test]
fn route_focus_keeps_constellations_of_both_paths() {
    let env = FixtureEnv::new();
    let starmap = standard_starmap(&env);

    let focus = plan_route_focus(&starmap, "jita", "AMARR").expect("route exists");
    assert_eq!(focus.start, JITA);
    assert_eq!(focus.goal, AMARR);
    assert_eq!(focus.constellations, vec!["Kimotoro", "Throne Worlds"]);
    assert!(focus.focus.contains(NIYABAINEN));
    assert!(!focus.focus.contains(TAMA));
    assert_eq!(focus.shortest.edges(), vec![(JITA, NIYABAINEN), (NIYABAINEN, AMARR)]);
    assert_eq!(starmap.node_count(), 6, "working copy leaves the source intact");
}

#[test]
fn pruned_system_cannot_be_resolved() {
    let env = FixtureEnv::new();
    let starmap = standard_starmap(&env);

    let err = resolve_node(&starmap, "Isolated").expect_err("pruned from standard map");
    assert!(matches!(err, Error::UnknownSystem { .. }));
}

#[test]
fn misspelled_name_suggests_close_systems() {
    let env = FixtureEnv::new();
    let starmap = standard_starmap(&env);

    let err = plan_route_focus(&starmap, "Jitta", "Amarr").expect_err("typo");
    match &err {
        Error::UnknownSystem { suggestions, .. } => {
            assert_eq!(suggestions.first().map(String::as_str), Some("Jita"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Did you mean"));
}

#[test]
fn one_way_gate_has_no_return_route() {
    let env = FixtureEnv::with_sql(
        "INSERT INTO systems VALUES (1, 'R', 'C', 'Origin', 0.9);
         INSERT INTO systems VALUES (2, 'R', 'C', 'Outpost', 0.9);
         INSERT INTO neighbors VALUES (2, 1, 0.9);",
    );
    let source = SqliteSource::open(&env.db_path).unwrap();
    let cache = FileStageCache::new(&env.cache_dir);
    let starmap = StarmapPipeline::new(source, cache).load().unwrap();

    assert!(shortest_hops(&starmap, 1, 2).is_ok());
    let err = plan_route_focus(&starmap, "Outpost", "Origin").expect_err("one-way gate");
    assert!(matches!(err, Error::RouteNotFound { ref start, ref goal } if start == "Outpost" && goal == "Origin"));
}
