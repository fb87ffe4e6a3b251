// tests/unit_graph.rs
//! Structural properties of tier expansion.

use std::collections::{HashMap, HashSet, VecDeque};

use trustnet_core::error::Result;
use trustnet_core::graph::{extract_into, ExpandOptions, ResourceBudget, SocialGraph};
use trustnet_core::types::UserId;

/// Deterministic pseudo-random edge list (xorshift).
fn random_edges(nodes: i64, edges: usize, mut seed: u64) -> Vec<(i64, i64)> {
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    (0..edges)
        .map(|_| {
            let a = (next() % nodes as u64) as i64;
            let b = (next() % nodes as u64) as i64;
            (a, b)
        })
        .collect()
}

fn build(edges: &[(i64, i64)], depth: usize, opts: &ExpandOptions) -> Result<SocialGraph> {
    let mut g = SocialGraph::new(depth);
    for &(a, b) in edges {
        g.add_edge(UserId(a), UserId(b))?;
    }
    g.expand_all(opts)?;
    Ok(g)
}

/// Plain BFS hop counts, independent of the tiering code.
fn bfs(edges: &[(i64, i64)], from: i64, depth: usize) -> HashMap<i64, usize> {
    let mut adj: HashMap<i64, HashSet<i64>> = HashMap::new();
    for &(a, b) in edges {
        adj.entry(a).or_default().insert(b);
        adj.entry(b).or_default().insert(a);
    }
    let mut dist = HashMap::new();
    let mut queue = VecDeque::from([(from, 0usize)]);
    let mut seen = HashSet::from([from]);
    while let Some((node, d)) = queue.pop_front() {
        if d == depth {
            continue;
        }
        for &next in adj.get(&node).into_iter().flatten() {
            if seen.insert(next) {
                dist.insert(next, d + 1);
                queue.push_back((next, d + 1));
            }
        }
    }
    dist
}

#[test]
fn test_add_edge_symmetry() -> Result<()> {
    let edges = random_edges(40, 120, 7);
    let g = build(&edges, 1, &ExpandOptions::sequential())?;
    for &(a, b) in &edges {
        assert!(g.tier(UserId(a), 1).contains(&UserId(b)));
        assert!(g.tier(UserId(b), 1).contains(&UserId(a)));
    }
    Ok(())
}

#[test]
fn test_add_edge_idempotent() -> Result<()> {
    let edges = random_edges(30, 60, 11);
    let once = build(&edges, 1, &ExpandOptions::sequential())?;
    let doubled: Vec<_> = edges.iter().chain(edges.iter()).copied().collect();
    let twice = build(&doubled, 1, &ExpandOptions::sequential())?;
    for user in once.users() {
        assert_eq!(once.tier(user, 1), twice.tier(user, 1));
    }
    Ok(())
}

#[test]
fn test_tiers_are_disjoint() -> Result<()> {
    let edges = random_edges(60, 100, 3);
    let g = build(&edges, 4, &ExpandOptions::default())?;
    for user in g.users() {
        let mut seen = HashSet::new();
        for k in 1..=4 {
            for other in g.tier(user, k) {
                assert!(seen.insert(other), "{other} appears twice for {user}");
            }
        }
    }
    Ok(())
}

#[test]
fn test_tiers_match_shortest_paths() -> Result<()> {
    let edges = random_edges(80, 140, 99);
    let depth = 4;
    let g = build(&edges, depth, &ExpandOptions::default())?;
    for user in g.users() {
        let expected = bfs(&edges, user.0, depth);
        for (&other, &hops) in &expected {
            assert_eq!(g.tier_of(user, UserId(other)), Some(hops), "{user} -> {other}");
        }
        let total: usize = (1..=depth).map(|k| g.tier(user, k).len()).sum();
        let self_edge = usize::from(g.tier(user, 1).contains(&user));
        assert_eq!(total, expected.len() + self_edge);
    }
    Ok(())
}

#[test]
fn test_scenario_a_tiers() -> Result<()> {
    let g = build(&[(1, 2), (2, 3)], 2, &ExpandOptions::sequential())?;
    assert_eq!(g.tier(UserId(1), 1), vec![UserId(2)]);
    assert_eq!(g.tier(UserId(1), 2), vec![UserId(3)]);
    Ok(())
}

#[test]
fn test_scenario_b_bad_id_creates_no_node() -> Result<()> {
    let mut g = SocialGraph::new(2);
    let stats = extract_into(&mut g, [("abc", "5")])?;
    assert_eq!(stats.rejected, 1);
    assert!(g.is_empty());
    Ok(())
}

#[test]
fn test_scenario_c_duplicate_edge_counted_once() -> Result<()> {
    let mut g = SocialGraph::new(2);
    extract_into(&mut g, [("1", "2"), ("1", "2"), ("1", "2")])?;
    assert_eq!(g.tier(UserId(1), 1), vec![UserId(2)]);
    Ok(())
}

#[test]
fn test_self_edge_does_not_leak_into_deeper_tiers() -> Result<()> {
    let g = build(&[(1, 1), (1, 2), (2, 3)], 3, &ExpandOptions::sequential())?;
    assert_eq!(g.tier_of(UserId(1), UserId(1)), Some(1));
    assert!(g.tier(UserId(2), 2).is_empty());
    assert_eq!(g.tier(UserId(3), 2), vec![UserId(1)]);
    assert!(!g.tier(UserId(3), 3).contains(&UserId(3)));
    Ok(())
}

#[test]
fn test_budget_failure_leaves_completed_tiers() -> Result<()> {
    let mut g = SocialGraph::new(3);
    for (a, b) in random_edges(50, 200, 5) {
        g.add_edge(UserId(a), UserId(b))?;
    }
    let opts = ExpandOptions::sequential().with_budget(ResourceBudget {
        max_tier_size: Some(1),
        ..ResourceBudget::default()
    });
    let err = g.expand_all(&opts).err();
    assert!(err.is_some_and(|e| e.is_resource()));
    assert_eq!(g.completed_depth(), 1);
    Ok(())
}
