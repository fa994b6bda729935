use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::{LazyLock, Mutex};

use flexi_logger::{Logger, LoggerHandle};
use scopeguard::{OnUnwind, ScopeGuard};

#[allow(dead_code)]
pub static LOGGER: LazyLock<Mutex<LoggerHandle>> = LazyLock::new(|| {
    Mutex::new(
        Logger::try_with_env_or_str("info")
            .unwrap()
            .write_mode(flexi_logger::WriteMode::SupportCapture)
            .log_to_stdout()
            .set_palette("196;208;3;7;8".to_owned())
            .format(|w, now, record| {
                let style = flexi_logger::style(record.level());
                write!(
                    w,
                    "{} {pref}[{}] {}{suf}",
                    now.format("%H:%M:%S"),
                    &record.level().as_str()[0..1],
                    record.args(),
                    pref = style.prefix(),
                    suf = style.suffix(),
                )
            })
            .start()
            .unwrap(),
    )
});

#[allow(dead_code)]
pub fn init_logger() {
    let _ = &*LOGGER;
}

/// Logs the value if the test panics while holding it.
#[allow(dead_code)]
pub fn guard<L: Debug>(l: L) -> ScopeGuard<L, impl FnOnce(L), OnUnwind> {
    scopeguard::guard_on_unwind(l, |l| log::error!("Crash with {l:?}"))
}

/// Connectivity by graph search over adjacency sets.
#[derive(Debug, Clone)]
pub struct SlowGraph {
    adj: Vec<BTreeSet<usize>>,
}

#[allow(dead_code)]
impl SlowGraph {
    pub fn new(n: usize) -> Self {
        Self {
            adj: vec![BTreeSet::new(); n],
        }
    }

    pub fn insert(&mut self, u: usize, v: usize) -> bool {
        self.adj[u].insert(v) && self.adj[v].insert(u)
    }

    pub fn erase(&mut self, u: usize, v: usize) -> bool {
        self.adj[u].remove(&v) && self.adj[v].remove(&u)
    }

    pub fn contains(&self, u: usize, v: usize) -> bool {
        self.adj[u].contains(&v)
    }

    /// Edges (u, v) with u < v.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(u, adj)| adj.range(u + 1..).map(move |&v| (u, v)))
            .collect()
    }

    /// Component id of each vertex, starting from 1.
    pub fn groups(&self) -> Vec<usize> {
        let mut groups = vec![0; self.adj.len()];
        let mut group_id = 0;
        for u in 0..self.adj.len() {
            if groups[u] == 0 {
                group_id += 1;
                groups[u] = group_id;
                let mut stack = vec![u];
                while let Some(u) = stack.pop() {
                    stack.extend(self.adj[u].iter().copied().filter(|&v| {
                        if groups[v] == 0 {
                            groups[v] = group_id;
                            true
                        } else {
                            false
                        }
                    }));
                }
            }
        }
        groups
    }
}
