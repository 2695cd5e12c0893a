mod common;

use std::fs;

use common::*;
use eemap_lib::cache::encode_stage;
use eemap_lib::{
    attach_production, build_from_source, derive_edge_production, FileStageCache, SqliteSource,
    Stage, StageCache, Starmap,
};

fn enriched_fixture(env: &FixtureEnv) -> Starmap {
    let source = SqliteSource::open(&env.db_path).expect("fixture opens");
    let mut starmap = build_from_source(&source).expect("fixture builds");
    attach_production(&mut starmap, &source).expect("production rows");
    derive_edge_production(&mut starmap);
    starmap
}

#[test]
fn file_cache_roundtrip_is_lossless() {
    let env = FixtureEnv::new();
    let starmap = enriched_fixture(&env);
    let cache = FileStageCache::new(&env.cache_dir);

    cache.store(Stage::Enriched, &starmap).expect("store");
    assert!(cache.contains(Stage::Enriched));
    assert!(!cache.contains(Stage::Raw));
    assert!(cache
        .stage_path(Stage::Enriched)
        .ends_with("eemap_cache_enriched.bin"));

    let restored = cache.load(Stage::Enriched).expect("cached stage");
    assert_eq!(restored, starmap);
    assert_eq!(restored.edges_between(JITA, PERIMETER).count(), 2);
    let jita = restored.system(JITA).and_then(|n| n.production()).unwrap();
    assert_eq!(jita.totals["Tritanium"], 15.0);

    // Adjacency is rebuilt on load.
    let outgoing: Vec<i64> = restored.outgoing(JITA).map(|e| e.target).collect();
    assert_eq!(outgoing, vec![PERIMETER, PERIMETER, NIYABAINEN]);
}

#[test]
fn missing_entry_is_a_miss() {
    let env = FixtureEnv::new();
    let cache = FileStageCache::new(&env.cache_dir);
    assert!(cache.load(Stage::Standard).is_none());
}

#[test]
fn corrupt_and_truncated_files_are_misses() {
    let env = FixtureEnv::new();
    let starmap = enriched_fixture(&env);
    let cache = FileStageCache::new(&env.cache_dir);
    cache.store(Stage::Raw, &starmap).unwrap();

    let path = cache.stage_path(Stage::Raw);
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();
    assert!(cache.contains(Stage::Raw));
    assert!(cache.load(Stage::Raw).is_none());

    fs::write(&path, &bytes[..10]).unwrap();
    assert!(cache.load(Stage::Raw).is_none());
}

#[test]
fn snapshot_for_another_stage_or_version_is_rejected() {
    let env = FixtureEnv::new();
    let starmap = enriched_fixture(&env);
    let cache = FileStageCache::new(&env.cache_dir);
    fs::create_dir_all(&env.cache_dir).unwrap();

    let raw_bytes = encode_stage(Stage::Raw, &starmap).unwrap();
    fs::write(cache.stage_path(Stage::Standard), &raw_bytes).unwrap();
    assert!(cache.load(Stage::Standard).is_none());

    let mut future = raw_bytes.clone();
    future[4] = 99;
    fs::write(cache.stage_path(Stage::Raw), &future).unwrap();
    assert!(cache.load(Stage::Raw).is_none());
}

#[test]
fn store_replaces_previous_entry() {
    let env = FixtureEnv::new();
    let starmap = enriched_fixture(&env);
    let cache = FileStageCache::new(&env.cache_dir);

    cache.store(Stage::Standard, &starmap).unwrap();
    cache.store(Stage::Standard, &Starmap::new()).unwrap();

    let restored = cache.load(Stage::Standard).unwrap();
    assert!(restored.is_empty());

    let leftovers: Vec<_> = fs::read_dir(&env.cache_dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name())
        .collect();
    assert_eq!(leftovers.len(), 1, "temporary files are renamed into place");
}

#[test]
fn clear_removes_every_stage() {
    let env = FixtureEnv::new();
    let starmap = enriched_fixture(&env);
    let cache = FileStageCache::new(&env.cache_dir);
    for stage in Stage::ALL {
        cache.store(stage, &starmap).unwrap();
    }

    cache.clear().unwrap();
    assert!(Stage::ALL.iter().all(|&stage| !cache.contains(stage)));
    cache.clear().expect("clearing twice is fine");
}
