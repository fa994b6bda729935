use dynamic_connectivity::euler_tour_forest::{EulerTourForest, TourItem};
use dynamic_connectivity::{Error, InvalidArgument};
use rand::{rngs::StdRng, Rng, SeedableRng};

mod common;

use common::{guard, init_logger, SlowGraph};

use TourItem::{Arc as A, Vertex as V};

fn assert_all_connections(f: &EulerTourForest, is_conn: &[&str]) {
    for (i, conn) in is_conn.iter().enumerate() {
        for (j, c) in conn.chars().enumerate() {
            if i != j {
                assert_eq!(f.is_connected(i, j), Ok(c == '1'), "{i} {j}");
            }
        }
    }
}

fn assert_counters(f: &EulerTourForest, v: usize) {
    let t = f.tours();
    let root = f.tree_root(v);
    assert_eq!(
        (t.vertex_count(root), t.level_edge_count(root)),
        t.recount(root)
    );
}

#[test]
fn test_path() {
    init_logger();
    let mut f = guard(EulerTourForest::new(4));
    assert_all_connections(&f, &["1000", "0100", "0010", "0001"]);
    f.add_new_edge(0, 1).unwrap();
    assert_eq!(f.tour(1), [V(0), A(0, 1), V(1), A(1, 0)]);
    f.add_new_edge(1, 2).unwrap();
    assert_eq!(
        f.tour(2),
        [V(1), A(1, 0), V(0), A(0, 1), A(1, 2), V(2), A(2, 1)]
    );
    f.add_new_edge(2, 3).unwrap();
    assert_eq!(
        f.tour(0),
        [
            V(2),
            A(2, 1),
            V(1),
            A(1, 0),
            V(0),
            A(0, 1),
            A(1, 2),
            A(2, 3),
            V(3),
            A(3, 2)
        ]
    );
    assert_all_connections(&f, &["1111", "1111", "1111", "1111"]);
    assert_eq!(f.component_size(3), 4);

    let (one, two) = f.erase_existing_edge(1, 2).unwrap();
    assert_eq!(one, f.tree_root(0));
    assert_eq!(two, f.tree_root(3));
    assert_eq!(f.tour(0), [V(1), A(1, 0), V(0), A(0, 1)]);
    assert_eq!(f.tour(3), [A(2, 3), V(3), A(3, 2), V(2)]);
    assert_all_connections(&f, &["1100", "1100", "0011", "0011"]);
    assert_eq!((f.component_size(0), f.component_size(2)), (2, 2));
    for v in 0..4 {
        assert_counters(&f, v);
    }
}

#[test]
fn test_star_cut_by_reverse_orientation() {
    let mut f = guard(EulerTourForest::new(5));
    for v in 1..5 {
        f.add_new_edge(0, v).unwrap();
    }
    assert_eq!(f.num_edges(), 4);
    assert!(f.contains_edge(3, 0));
    let (three, zero) = f.erase_existing_edge(3, 0).unwrap();
    assert_eq!(f.tour(3), [V(3)]);
    assert_eq!(three, f.home(3));
    assert_eq!(f.tours().size(zero), 4);
    assert!(!f.contains_edge(0, 3));
    assert_all_connections(&f, &["11101", "11101", "11101", "00010", "11101"]);
}

#[test]
fn test_errors() {
    let mut f = EulerTourForest::new(3);
    assert_eq!(
        f.add_new_edge(1, 1),
        Err(Error::from(InvalidArgument::SelfLoop(1)))
    );
    assert_eq!(
        f.add_new_edge(0, 3),
        Err(Error::from(InvalidArgument::VertexOutOfRange {
            vertex: 3,
            n: 3
        }))
    );
    assert_eq!(f.erase_existing_edge(0, 1), Err(Error::EdgeNotFound(0, 1)));
    assert!(matches!(
        f.is_connected(2, 2),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        f.is_connected(5, 2),
        Err(Error::InvalidArgument(_))
    ));
    f.add_new_edge(0, 1).unwrap();
    assert_eq!(f.add_new_edge(1, 0), Err(Error::EdgeAlreadyExists(1, 0)));
    f.add_new_edge(1, 2).unwrap();
    assert!(matches!(
        f.add_new_edge(0, 2),
        Err(Error::InvariantViolation(_))
    ));
    // Rejected calls change nothing.
    assert_eq!(f.num_edges(), 2);
    assert_eq!(f.tours().total_size(), 7);
}

#[test]
fn test_level_edge_flags_follow_vertices() {
    let mut f = EulerTourForest::new(6);
    for (u, v) in [(0, 1), (1, 2), (3, 4), (4, 5)] {
        f.add_new_edge(u, v).unwrap();
    }
    f.set_has_level_edges(2, true);
    f.set_has_level_edges(5, true);
    f.add_new_edge(2, 3).unwrap();
    let t = f.tours();
    let mut c = t.begin_with_level_edges(f.tree_root(0));
    let mut marked = vec![];
    while !c.is_end() {
        marked.push(f.vertex_at(c.node()).unwrap());
        c = t.next_with_level_edges(c).unwrap();
    }
    marked.sort();
    assert_eq!(marked, [2, 5]);
    let (left, right) = f.erase_existing_edge(3, 4).unwrap();
    assert_eq!(f.tours().level_edge_count(left), 1);
    assert_eq!(f.tours().level_edge_count(right), 1);
}

/// Links and cuts random edges, checking connectivity against a graph search.
fn random_forest(n: usize, q: usize, seed: u64) {
    init_logger();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut f = guard(EulerTourForest::with_rng(n, StdRng::seed_from_u64(seed)));
    let mut slow = SlowGraph::new(n);
    let mut edges = vec![];
    for q in 0..q {
        if edges.is_empty() || rng.gen_bool(0.6) {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            if u == v || f.is_connected(u, v).unwrap() {
                continue;
            }
            f.add_new_edge(u, v).unwrap();
            slow.insert(u, v);
            edges.push((u, v));
        } else {
            let (u, v) = edges.swap_remove(rng.gen_range(0..edges.len()));
            let (ru, rv) = if rng.gen() {
                f.erase_existing_edge(u, v).unwrap()
            } else {
                let (rv, ru) = f.erase_existing_edge(v, u).unwrap();
                (ru, rv)
            };
            slow.erase(u, v);
            assert_eq!(ru, f.tree_root(u));
            assert_eq!(rv, f.tree_root(v));
        }
        if q % 20 == 0 {
            let groups = slow.groups();
            for u in 0..n {
                let size = groups.iter().filter(|&&g| g == groups[u]).count();
                assert_eq!(f.component_size(u), size);
                // Every tour has one occurrence per vertex and two per tree edge.
                assert_eq!(f.tour(u).len(), 3 * size - 2);
                assert_counters(&f, u);
                for v in 0..n {
                    if u != v {
                        assert_eq!(f.is_connected(u, v), Ok(groups[u] == groups[v]));
                    }
                }
            }
        }
    }
}

#[test]
fn test_random_forest1() {
    random_forest(10, 3000, 9232345);
}

#[test]
fn test_random_forest2() {
    random_forest(40, 3000, 100000007);
}

#[test]
#[should_panic]
fn test_component_size_out_of_range_panics() {
    let f = EulerTourForest::new(3);
    f.component_size(3);
}
