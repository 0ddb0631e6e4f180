//! Delve Headless Generation Harness
//!
//! Drives the full dungeon pipeline across a seed sweep and validates every
//! layout invariant. Runs entirely in-process — no rendering, no host engine.
//!
//! Usage:
//!   cargo run -p delve-simtest
//!   cargo run -p delve-simtest -- --verbose
//!   cargo run -p delve-simtest -- --json

use delve_core::prelude::*;
use delve_logic::aabb::{Aabb, Vec3};
use delve_logic::validation::{validate_layout, Severity};
use serde::Serialize;

// ── Test harness ────────────────────────────────────────────────────────

const SEED_COUNT: u64 = 50;
const MAX_TICKS: u64 = 64;

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    if !json {
        println!("=== Delve Generation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Seed sweep: pipeline runs and settles on every seed
    let dungeons = run_seed_sweep(&mut results, json);

    // 2. Layout validation over the sweep
    results.extend(validate_layouts(&dungeons, verbose, json));

    // 3. Connection statistics (reported, not failed)
    results.extend(report_connectivity(&dungeons, json));

    // 4. Determinism
    results.extend(validate_determinism(json));

    // 5. Persistence round-trip
    results.extend(validate_persistence(json));

    // 6. Degenerate inputs
    results.extend(validate_degenerate_inputs(json));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).expect("results serialize")
        );
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed, total, failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn standard_volume() -> Aabb {
    Aabb::new(Vec3::ZERO, Vec3::new(80.0, 10.0, 80.0))
}

// ── 1. Seed sweep ───────────────────────────────────────────────────────

fn run_seed_sweep(results: &mut Vec<TestResult>, json: bool) -> Vec<DungeonEngine> {
    if !json {
        println!("--- Seed Sweep ---");
    }
    let mut dungeons = Vec::new();
    let mut stalled = Vec::new();
    let mut failed_seeds = Vec::new();

    for seed in 0..SEED_COUNT {
        match DungeonEngine::generate(standard_volume(), seed, DungeonConfig::default()) {
            Ok(mut engine) => {
                let mut ticks = 0;
                while engine.tick() == GenerationStatus::InProgress {
                    ticks += 1;
                    if ticks >= MAX_TICKS {
                        stalled.push(seed);
                        break;
                    }
                }
                dungeons.push(engine);
            }
            Err(e) => failed_seeds.push((seed, e.to_string())),
        }
    }

    results.push(TestResult {
        name: "sweep_generation_succeeds".into(),
        passed: failed_seeds.is_empty(),
        detail: if failed_seeds.is_empty() {
            format!("{} seeds generated", SEED_COUNT)
        } else {
            format!("{} seeds failed: {:?}", failed_seeds.len(), failed_seeds)
        },
    });

    results.push(TestResult {
        name: "sweep_connection_settles".into(),
        passed: stalled.is_empty(),
        detail: if stalled.is_empty() {
            format!("all dungeons settled within {} ticks", MAX_TICKS)
        } else {
            format!("seeds never settled: {:?}", stalled)
        },
    });

    let max_ticks = dungeons.iter().map(|d| d.ticks()).max().unwrap_or(0);
    let total_rooms: usize = dungeons.iter().map(|d| d.rooms().len()).sum();
    results.push(TestResult {
        name: "sweep_produces_rooms".into(),
        passed: dungeons.iter().all(|d| !d.rooms().is_empty()),
        detail: format!(
            "{} rooms across {} dungeons, deepest settle: {} ticks",
            total_rooms,
            dungeons.len(),
            max_ticks
        ),
    });

    dungeons
}

// ── 2. Layout validation ────────────────────────────────────────────────

fn validate_layouts(dungeons: &[DungeonEngine], verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Layout Validation ---");
    }
    let mut results = Vec::new();

    let mut geometry_errors = Vec::new();
    let mut collapsed_hallways = 0usize;

    for engine in dungeons {
        let findings = validate_layout(
            &engine.leaf_volumes(),
            &engine.hallways(),
            engine.config().min_room_fraction,
        );
        for finding in findings {
            match finding.severity {
                // Connectivity is reported separately; a raycast miss can
                // collapse a corridor without making the geometry invalid.
                Severity::Error if finding.category != "connectivity" => {
                    geometry_errors.push(format!("seed {}: {}", engine.seed(), finding.message));
                }
                Severity::Warning => collapsed_hallways += 1,
                _ => {}
            }
        }
    }

    results.push(TestResult {
        name: "layout_geometry_valid".into(),
        passed: geometry_errors.is_empty(),
        detail: if geometry_errors.is_empty() {
            "no room or hallway geometry errors".into()
        } else {
            format!(
                "{} errors, first: {}",
                geometry_errors.len(),
                geometry_errors[0]
            )
        },
    });

    results.push(TestResult {
        name: "layout_collapsed_hallways".into(),
        passed: true,
        detail: format!("{} zero-length hallways across sweep", collapsed_hallways),
    });

    // Sibling cells partition their parent exactly
    let mut partition_errors = 0usize;
    for engine in dungeons {
        let tree = engine.tree();
        for id in tree.ids() {
            let node = tree.node(id);
            let Some((low, high)) = node.children else {
                continue;
            };
            let axis = node.split_axis;
            let boundary_matches = (tree.node(low).cell.max.get(axis)
                - tree.node(high).cell.min.get(axis))
            .abs()
                < 1e-4;
            if !boundary_matches
                || !node.cell.contains(&tree.node(low).cell)
                || !node.cell.contains(&tree.node(high).cell)
            {
                partition_errors += 1;
            }
        }
    }
    results.push(TestResult {
        name: "layout_cells_partition_parents".into(),
        passed: partition_errors == 0,
        detail: format!("{} malformed splits", partition_errors),
    });

    if verbose && !json {
        let leaf_counts: Vec<usize> = dungeons.iter().map(|d| d.rooms().len()).collect();
        let min = leaf_counts.iter().min().copied().unwrap_or(0);
        let max = leaf_counts.iter().max().copied().unwrap_or(0);
        println!("  Leaf counts across sweep: {}..{}", min, max);
    }

    results
}

// ── 3. Connectivity report ──────────────────────────────────────────────

fn report_connectivity(dungeons: &[DungeonEngine], json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Connectivity ---");
    }
    let mut results = Vec::new();

    let fully_connected = dungeons.iter().filter(|d| d.is_fully_connected()).count();
    results.push(TestResult {
        name: "connectivity_rate".into(),
        passed: true,
        detail: format!(
            "{}/{} dungeons fully connected",
            fully_connected,
            dungeons.len()
        ),
    });

    // Hallway count always mirrors connection state exactly.
    let mut drifted = Vec::new();
    for engine in dungeons {
        let tree = engine.tree();
        let connected = tree.ids().filter(|id| tree.node(*id).connected).count();
        if engine.hallways().len() != connected {
            drifted.push(engine.seed());
        }
    }
    results.push(TestResult {
        name: "connectivity_one_hallway_per_join".into(),
        passed: drifted.is_empty(),
        detail: if drifted.is_empty() {
            "hallway count matches connected node count everywhere".into()
        } else {
            format!("seeds drifted: {:?}", drifted)
        },
    });

    results
}

// ── 4. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Determinism ---");
    }
    let mut results = Vec::new();

    let run = |seed: u64| {
        let mut engine = DungeonEngine::generate(standard_volume(), seed, DungeonConfig::default())
            .expect("standard volume");
        let mut ticks = 0;
        while engine.tick() == GenerationStatus::InProgress && ticks < MAX_TICKS {
            ticks += 1;
        }
        engine
    };

    let a = run(1234);
    let b = run(1234);
    results.push(TestResult {
        name: "determinism_same_seed".into(),
        passed: a.rooms() == b.rooms() && a.hallways() == b.hallways() && a.ticks() == b.ticks(),
        detail: format!(
            "seed 1234 twice: {} rooms, {} hallways, {} ticks",
            a.rooms().len(),
            a.hallways().len(),
            a.ticks()
        ),
    });

    let c = run(5678);
    results.push(TestResult {
        name: "determinism_seeds_vary".into(),
        passed: a.rooms() != c.rooms(),
        detail: "different seeds carve different rooms".into(),
    });

    results
}

// ── 5. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Persistence ---");
    }
    let mut results = Vec::new();

    let mut engine = DungeonEngine::generate(standard_volume(), 99, DungeonConfig::default())
        .expect("standard volume");
    engine.tick();

    let mut buffer = Vec::new();
    match engine.save(&mut buffer) {
        Ok(()) => match DungeonEngine::load(&buffer[..]) {
            Ok(mut resumed) => {
                let mut ticks = 0;
                while engine.tick() == GenerationStatus::InProgress && ticks < MAX_TICKS {
                    ticks += 1;
                }
                ticks = 0;
                while resumed.tick() == GenerationStatus::InProgress && ticks < MAX_TICKS {
                    ticks += 1;
                }
                results.push(TestResult {
                    name: "persistence_resume_matches".into(),
                    passed: engine.hallways() == resumed.hallways()
                        && engine.ticks() == resumed.ticks(),
                    detail: format!(
                        "mid-generation save resumed to identical result ({} bytes)",
                        buffer.len()
                    ),
                });
            }
            Err(e) => results.push(TestResult {
                name: "persistence_resume_matches".into(),
                passed: false,
                detail: format!("load failed: {}", e),
            }),
        },
        Err(e) => results.push(TestResult {
            name: "persistence_resume_matches".into(),
            passed: false,
            detail: format!("save failed: {}", e),
        }),
    }

    results
}

// ── 6. Degenerate inputs ────────────────────────────────────────────────

fn validate_degenerate_inputs(json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Degenerate Inputs ---");
    }
    let mut results = Vec::new();

    let flat = Aabb::new(Vec3::ZERO, Vec3::new(80.0, 0.0, 80.0));
    results.push(TestResult {
        name: "degenerate_flat_volume_rejected".into(),
        passed: DungeonEngine::generate(flat, 1, DungeonConfig::default()).is_err(),
        detail: "zero-height root volume is an error".into(),
    });

    let bad_config = DungeonConfig {
        min_split_fraction: 0.5,
        ..Default::default()
    };
    results.push(TestResult {
        name: "degenerate_config_rejected".into(),
        passed: DungeonEngine::generate(standard_volume(), 1, bad_config).is_err(),
        detail: "min_split_fraction of 0.5 leaves no split range".into(),
    });

    // Too small to split: a single-leaf dungeon completes immediately.
    let tiny = Aabb::new(Vec3::ZERO, Vec3::new(10.0, 7.0, 10.0));
    match DungeonEngine::generate(tiny, 1, DungeonConfig::default()) {
        Ok(mut engine) => {
            let status = engine.tick();
            results.push(TestResult {
                name: "degenerate_tiny_volume_single_room".into(),
                passed: engine.rooms().len() == 1
                    && status == GenerationStatus::Complete
                    && engine.hallways().is_empty(),
                detail: format!(
                    "{} room(s), settled in {} tick(s)",
                    engine.rooms().len(),
                    engine.ticks()
                ),
            });
        }
        Err(e) => results.push(TestResult {
            name: "degenerate_tiny_volume_single_room".into(),
            passed: false,
            detail: format!("generation failed: {}", e),
        }),
    }

    results
}
