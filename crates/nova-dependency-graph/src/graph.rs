use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::BufRead;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::{Label, TargetInfoError, TargetNode};

type Closure = Arc<HashSet<Label>>;

/// The target universe of one sync, plus memoized transitive-dependency closures.
///
/// The graph is immutable once built. Closures are computed lazily, at most once per target,
/// and shared by every later query; concurrent first access to the same target blocks until
/// the one computation finishes.
///
/// Lookups of ids that aren't in the graph contribute nothing. Dependency cycles (which Bazel
/// doesn't produce) are logged and broken rather than looping forever.
#[derive(Debug)]
pub struct DependencyGraph {
    root_targets: HashSet<Label>,
    targets: HashMap<Label, TargetNode>,
    direct_dependencies: HashMap<Label, HashSet<Label>>,
    closures: HashMap<Label, OnceLock<Closure>>,
    closure_computations: AtomicUsize,
    no_dependencies: HashSet<Label>,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new(HashSet::new(), HashMap::new())
    }
}

impl DependencyGraph {
    pub fn new(root_targets: HashSet<Label>, targets: HashMap<Label, TargetNode>) -> Self {
        let direct_dependencies: HashMap<Label, HashSet<Label>> = targets
            .iter()
            .map(|(id, target)| (id.clone(), target.dependencies.iter().cloned().collect()))
            .collect();
        let closures = targets
            .keys()
            .map(|id| (id.clone(), OnceLock::new()))
            .collect();

        tracing::debug!(
            target: "nova.dependency_graph",
            targets = targets.len(),
            root_targets = root_targets.len(),
            edges = direct_dependencies.values().map(HashSet::len).sum::<usize>(),
            "built dependency graph"
        );

        Self {
            root_targets,
            targets,
            direct_dependencies,
            closures,
            closure_computations: AtomicUsize::new(0),
            no_dependencies: HashSet::new(),
        }
    }

    /// Build a graph from targets keyed by their own id. A repeated id replaces the earlier one.
    pub fn from_targets(
        root_targets: impl IntoIterator<Item = Label>,
        targets: impl IntoIterator<Item = TargetNode>,
    ) -> Self {
        let mut by_id = HashMap::new();
        for target in targets {
            if let Some(previous) = by_id.insert(target.id.clone(), target) {
                tracing::debug!(
                    target: "nova.dependency_graph",
                    id = %previous.id,
                    "replacing duplicate target"
                );
            }
        }
        Self::new(root_targets.into_iter().collect(), by_id)
    }

    /// Build a graph from target-info JSON, one object per line. Blank lines are skipped.
    pub fn from_json_lines(
        root_targets: impl IntoIterator<Item = Label>,
        reader: impl BufRead,
    ) -> Result<Self, TargetInfoError> {
        let mut targets = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let target: TargetNode =
                serde_json::from_str(&line).map_err(|source| TargetInfoError::Json {
                    line: idx + 1,
                    source,
                })?;
            targets.push(target);
        }
        Ok(Self::from_targets(root_targets, targets))
    }

    pub fn target(&self, id: &Label) -> Option<&TargetNode> {
        self.targets.get(id)
    }

    pub fn contains(&self, id: &Label) -> bool {
        self.targets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn root_targets(&self) -> &HashSet<Label> {
        &self.root_targets
    }

    pub fn is_root_target(&self, id: &Label) -> bool {
        self.root_targets.contains(id)
    }

    /// Number of per-target closures computed so far.
    pub fn closure_computations(&self) -> usize {
        self.closure_computations.load(Ordering::Relaxed)
    }

    /// Ids `id` depends on directly. Empty for unknown ids.
    pub fn direct_dependency_ids(&self, id: &Label) -> &HashSet<Label> {
        self.direct_dependencies
            .get(id)
            .unwrap_or(&self.no_dependencies)
    }

    /// Every target reachable from `ids` through at least one dependency edge.
    ///
    /// The targets of `ids` themselves are only included when another member depends on them.
    pub fn transitive_closure<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a Label>,
    ) -> BTreeSet<&TargetNode> {
        let mut result = BTreeSet::new();
        for id in ids {
            self.extend_with_closure(&mut result, id);
        }
        result
    }

    /// Targets within `depth` dependency hops of `ids`, including `ids` themselves.
    ///
    /// A negative depth means no limit.
    pub fn all_targets_at_depth<'a>(
        &self,
        depth: i32,
        ids: impl IntoIterator<Item = &'a Label>,
    ) -> BTreeSet<&TargetNode> {
        let ids: HashSet<&Label> = ids.into_iter().collect();

        if depth < 0 {
            let mut result = self.nodes(ids.iter().copied());
            for id in &ids {
                self.extend_with_closure(&mut result, id);
            }
            return result;
        }

        let mut result = BTreeSet::new();
        let mut frontier = ids;
        for _ in 0..depth {
            result.extend(self.nodes(frontier.iter().copied()));
            frontier = frontier
                .iter()
                .flat_map(|id| self.direct_dependency_ids(id))
                .collect();
        }
        result.extend(self.nodes(frontier.iter().copied()));
        result
    }

    /// Dependencies of `id` that aren't root targets, together with everything they depend on.
    ///
    /// Only direct dependencies are checked against the root targets; a root target deeper in
    /// the graph is still part of its dependent's closure.
    pub fn transitive_dependencies_without_root_targets(&self, id: &Label) -> BTreeSet<&TargetNode> {
        let mut result = BTreeSet::new();
        if !self.contains(id) {
            tracing::debug!(
                target: "nova.dependency_graph",
                id = %id,
                "target not in dependency graph"
            );
            return result;
        }

        for dependency in self.direct_dependency_ids(id) {
            if self.is_root_target(dependency) {
                continue;
            }
            if let Some(node) = self.targets.get(dependency) {
                result.insert(node);
            }
            self.extend_with_closure(&mut result, dependency);
        }
        result
    }

    fn nodes<'a>(&self, ids: impl IntoIterator<Item = &'a Label>) -> BTreeSet<&TargetNode> {
        ids.into_iter()
            .filter_map(|id| self.targets.get(id))
            .collect()
    }

    fn extend_with_closure<'s>(&'s self, result: &mut BTreeSet<&'s TargetNode>, id: &Label) {
        if let Some(closure) = self.closure(id) {
            result.extend(closure.iter().filter_map(|dep| self.targets.get(dep)));
        }
    }

    /// The memoized closure of `id`, computing it (and any missing closures below it) first.
    ///
    /// Traversal uses an explicit stack, so deep graphs don't overflow the thread stack. Each
    /// closure is only computed once its dependencies' closures are available.
    fn closure(&self, id: &Label) -> Option<Closure> {
        let cell = self.closures.get(id)?;
        if let Some(closure) = cell.get() {
            return Some(Arc::clone(closure));
        }

        // (target, dependencies already pushed)
        let mut stack: Vec<(&Label, bool)> = vec![(id, false)];
        let mut on_path: HashSet<&Label> = HashSet::new();

        while let Some((current, expanded)) = stack.pop() {
            let Some(cell) = self.closures.get(current) else {
                continue;
            };

            if expanded {
                cell.get_or_init(|| self.compute_closure(current));
                on_path.remove(current);
                continue;
            }
            if cell.get().is_some() {
                continue;
            }

            on_path.insert(current);
            stack.push((current, true));
            for dependency in self.direct_dependency_ids(current) {
                if on_path.contains(dependency) {
                    tracing::warn!(
                        target: "nova.dependency_graph",
                        from = %current,
                        to = %dependency,
                        "ignoring dependency cycle"
                    );
                    continue;
                }
                match self.closures.get(dependency) {
                    Some(dependency_cell) if dependency_cell.get().is_none() => {
                        stack.push((dependency, false));
                    }
                    Some(_) => {}
                    None => tracing::debug!(
                        target: "nova.dependency_graph",
                        from = %current,
                        to = %dependency,
                        "dependency not in dependency graph"
                    ),
                }
            }
        }

        cell.get().cloned()
    }

    /// Direct dependencies of `id` plus their closures. Closures that aren't available (only
    /// possible across a cycle) contribute nothing.
    fn compute_closure(&self, id: &Label) -> Closure {
        self.closure_computations.fetch_add(1, Ordering::Relaxed);

        let mut closure = HashSet::new();
        for dependency in self.direct_dependency_ids(id) {
            if !self.targets.contains_key(dependency) {
                continue;
            }
            closure.insert(dependency.clone());
            if let Some(dependency_closure) = self.closures.get(dependency).and_then(OnceLock::get) {
                closure.extend(dependency_closure.iter().cloned());
            }
        }
        Arc::new(closure)
    }
}
