//! Integration tests for build selection

use rigbuild::prelude::*;
use rigbuild::{ConstraintOrder, ProfileTable};
use std::path::PathBuf;
use std::sync::Arc;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_selector(name: &str) -> Selector {
    let catalog = Catalog::load(&fixture_path(name)).expect("fixture catalog should load");
    Selector::new(Arc::new(catalog)).expect("fixture catalog should be complete")
}

fn builtin_selector(config: SelectorConfig) -> Selector {
    let catalog = Arc::new(Catalog::builtin().unwrap());
    Selector::with_config(catalog, ProfileTable::builtin(), config).unwrap()
}

fn names(build: &BuildResult) -> Vec<&str> {
    build.iter().map(|(_, p)| p.model_name.as_str()).collect()
}

#[test]
fn test_builds_fit_budget_across_range() {
    for order in [ConstraintOrder::CompatibilityFirst, ConstraintOrder::BudgetFirst] {
        let selector = builtin_selector(SelectorConfig {
            constraint_order: order,
            ..SelectorConfig::default()
        });
        let minimum = selector.minimum_budget().unwrap();

        for usage in Usage::ALL {
            let mut budget = minimum;
            while budget < 4000.0 {
                let build = selector
                    .build(budget, usage.id())
                    .unwrap_or_else(|e| panic!("{:?} {} at {}: {}", order, usage, budget, e));

                assert!(
                    build.total_price <= budget,
                    "{} build at {} costs {}",
                    usage,
                    budget,
                    build.total_price
                );
                assert_eq!(build.parts.len(), Category::ALL.len());
                for category in Category::ALL {
                    assert_eq!(build.part(category).unwrap().category, category);
                }
                assert!(build.is_compatible(), "{} build at {} mixes sockets", usage, budget);

                budget += 37.5;
            }
        }
    }
}

#[test]
fn test_build_is_deterministic() {
    let selector = builtin_selector(SelectorConfig::default());
    let first = selector.build(1234.56, "design").unwrap();
    for _ in 0..5 {
        assert_eq!(selector.build(1234.56, "design").unwrap(), first);
    }
}

#[test]
fn test_totals_match_parts() {
    let selector = builtin_selector(SelectorConfig::default());
    let build = selector.build(1800.0, "video_editing").unwrap();
    let price: f64 = build.iter().map(|(_, p)| p.price).sum();
    let performance: f64 = build.iter().map(|(_, p)| p.performance_score).sum();
    assert!((build.total_price - price).abs() < 1e-9);
    assert!((build.total_performance - performance).abs() < 1e-9);
    assert!((build.remaining_budget() - (1800.0 - build.total_price)).abs() < 1e-9);
}

#[test]
fn test_monotonic_in_budget() {
    let selector = fixture_selector("two_socket_catalog.json");
    let budgets = [560.0, 700.0, 1000.0, 1200.0, 1300.0, 1400.0, 1500.0, 2000.0, 3000.0];

    let builds: Vec<BuildResult> = budgets
        .iter()
        .map(|b| selector.build(*b, "gaming").unwrap())
        .collect();

    let totals: Vec<f64> = builds.iter().map(|b| b.total_price).collect();
    assert_eq!(
        totals,
        vec![560.0, 620.0, 960.0, 960.0, 1070.0, 1370.0, 1500.0, 1670.0, 1670.0]
    );

    for pair in builds.windows(2) {
        assert!(pair[1].total_price >= pair[0].total_price);
        assert!(pair[1].total_performance >= pair[0].total_performance);
    }
}

#[test]
fn test_minimum_budget_boundary() {
    let selector = fixture_selector("two_socket_catalog.json");
    let minimum = selector.minimum_budget().unwrap();
    assert_eq!(minimum, 560.0);

    let build = selector.build(minimum, "gaming").unwrap();
    assert_eq!(build.total_price, minimum);
    assert_eq!(
        names(&build),
        vec!["cpu-a1", "mb-a1", "ram-1", "ssd-1", "gpu-1", "psu-1", "case-1"]
    );

    let err = selector.build(minimum - 1.0, "gaming").unwrap_err();
    assert_eq!(
        err,
        SelectionError::BudgetExceeded {
            budget: 559.0,
            required: 560.0
        }
    );
}

#[test]
fn test_builtin_minimum_boundary() {
    let selector = builtin_selector(SelectorConfig::default());
    let minimum = selector.minimum_budget().unwrap();

    for usage in Usage::ALL {
        let build = selector.build(minimum, usage.id()).unwrap();
        assert!(build.total_price <= minimum);

        let err = selector.build(minimum - 1.0, usage.id()).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::BudgetExceeded { .. } | SelectionError::NoCompatibleBuild { .. }
        ));
    }
}

#[test]
fn test_gaming_two_sockets_scenario() {
    let selector = fixture_selector("two_socket_catalog.json");
    let build = selector.build(1500.0, "gaming").unwrap();

    // Best-value board is on socket A, the chosen CPU is on B.
    let cpu = build.part(Category::Cpu).unwrap();
    let board = build.part(Category::Motherboard).unwrap();
    assert_eq!(cpu.model_name, "cpu-b2");
    assert_eq!(board.model_name, "mb-b1");
    assert_eq!(cpu.socket, board.socket);
    assert_eq!(build.socket(), Some("B"));

    assert_eq!(build.allocations[&Category::Gpu].target, 675.0);
    assert_eq!(build.part(Category::Gpu).unwrap().model_name, "gpu-3");
    assert_eq!(build.total_price, 1500.0);
}

#[test]
fn test_downgrade_trims_cheapest_loss() {
    let selector = fixture_selector("two_socket_catalog.json");
    let build = selector.build(1300.0, "gaming").unwrap();

    // 1370 provisional; dropping the GPU one step loses least per dollar.
    assert_eq!(
        names(&build),
        vec!["cpu-b2", "mb-b1", "ram-2", "ssd-2", "gpu-2", "psu-1", "case-1"]
    );
    assert_eq!(build.total_price, 1070.0);
}

#[test]
fn test_alternatives_match_platform() {
    let selector = fixture_selector("two_socket_catalog.json");
    let build = selector.build(1500.0, "gaming").unwrap();

    for board in &build.alternatives[&Category::Motherboard] {
        assert_eq!(board.socket.as_deref(), Some("B"));
        assert_ne!(board.model_name, "mb-b1");
    }
    for cpu in &build.alternatives[&Category::Cpu] {
        assert_eq!(cpu.socket.as_deref(), Some("B"));
    }
    assert!(build.alternatives[&Category::Gpu].len() <= 3);
}

#[test]
fn test_unknown_usage() {
    let selector = fixture_selector("two_socket_catalog.json");
    let err = selector.build(1500.0, "unknown_value").unwrap_err();
    assert!(matches!(err, SelectionError::InvalidUsage(_)));
}

#[test]
fn test_usage_aliases() {
    let selector = fixture_selector("two_socket_catalog.json");
    let canonical = selector.build(1500.0, "office").unwrap();
    assert_eq!(selector.build(1500.0, "Office_Work").unwrap(), canonical);
}

#[test]
fn test_mismatched_sockets_never_build() {
    let selector = fixture_selector("mismatched_sockets.json");
    for budget in [100.0, 1000.0, 10_000.0, 1e9] {
        let err = selector.build(budget, "gaming").unwrap_err();
        assert_eq!(err, SelectionError::NoCompatibleBuild { budget });
    }
    assert_eq!(selector.minimum_budget(), None);
}

#[test]
fn test_concurrent_builds_share_catalog() {
    let selector = Arc::new(builtin_selector(SelectorConfig::default()));
    let expected = selector.build(1500.0, "gaming").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let selector = Arc::clone(&selector);
            std::thread::spawn(move || selector.build(1500.0, "gaming").unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
