use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::scene::node::{Geometry, NodeKind, NodeStyle, SceneNodeSpec};
use crate::scene::transition::{TransitionSpec, Tween};

/// Lifecycle phase of a retained node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodePhase {
    Entering,
    Active,
    Exiting,
}

/// One retained visual element, identified by its key across frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub key: String,
    pub kind: NodeKind,
    pub data_ref: Option<String>,
    pub text: Option<String>,
    pub phase: NodePhase,
    from_geometry: Geometry,
    from_style: NodeStyle,
    target_geometry: Geometry,
    target_style: NodeStyle,
    tween: Tween,
}

impl SceneNode {
    /// Geometry at the current tween position.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.from_geometry
            .lerp(&self.target_geometry, self.tween.progress())
    }

    /// Style at the current tween position.
    #[must_use]
    pub fn style(&self) -> NodeStyle {
        self.from_style
            .lerp(&self.target_style, self.tween.progress())
    }

    #[must_use]
    pub fn target_geometry(&self) -> &Geometry {
        &self.target_geometry
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.tween.is_done()
    }
}

/// Keys touched by one reconcile pass, in target order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub exited: Vec<String>,
}

impl DiffSummary {
    #[must_use]
    pub fn is_update_only(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

/// Persistent keyed element tree, patched (never rebuilt) by reconcile.
///
/// A new reconcile interrupts any in-flight transition: nodes restart
/// their tween from the currently interpolated state toward the new
/// target (last call wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
}

impl SceneTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in paint order: target-description order, then exiting nodes.
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.key == key)
    }

    /// Diffs the retained tree against `target` by key.
    ///
    /// Matched keys become update nodes tweening from their current
    /// interpolated state; unmatched target keys enter from a collapsed,
    /// fully transparent state; unmatched existing keys exit toward that
    /// state and are removed when their tween completes (immediately at
    /// zero duration). Tree order follows `target` order.
    pub fn reconcile(
        &mut self,
        target: Vec<SceneNodeSpec>,
        spec: TransitionSpec,
    ) -> ChartResult<DiffSummary> {
        let mut seen = IndexMap::with_capacity(target.len());
        for entry in &target {
            entry.geometry.validate()?;
            if seen.insert(entry.key.clone(), ()).is_some() {
                return Err(ChartError::DuplicateSceneKey(entry.key.clone()));
            }
        }

        let duration = spec.effective_duration_ms();
        let mut previous: IndexMap<String, SceneNode> = self
            .nodes
            .drain(..)
            .map(|node| (node.key.clone(), node))
            .collect();

        let mut summary = DiffSummary::default();
        let mut next = Vec::with_capacity(target.len());

        for entry in target {
            match previous.shift_remove(&entry.key) {
                Some(existing) => {
                    let from_geometry = existing.geometry();
                    let from_style = existing.style();
                    summary.updated.push(entry.key.clone());
                    next.push(SceneNode {
                        key: entry.key,
                        kind: entry.kind,
                        data_ref: entry.data_ref,
                        text: entry.text,
                        phase: NodePhase::Active,
                        from_geometry,
                        from_style,
                        target_geometry: entry.geometry,
                        target_style: entry.style,
                        tween: Tween::new(duration),
                    });
                }
                None => {
                    summary.entered.push(entry.key.clone());
                    next.push(SceneNode {
                        key: entry.key,
                        kind: entry.kind,
                        data_ref: entry.data_ref,
                        text: entry.text,
                        phase: if duration > 0.0 {
                            NodePhase::Entering
                        } else {
                            NodePhase::Active
                        },
                        from_geometry: entry.geometry.collapsed(),
                        from_style: entry.style.faded(),
                        target_geometry: entry.geometry,
                        target_style: entry.style,
                        tween: Tween::new(duration),
                    });
                }
            }
        }

        for (key, existing) in previous {
            summary.exited.push(key);
            if duration <= 0.0 {
                continue;
            }
            let from_geometry = existing.geometry();
            let from_style = existing.style();
            let target_geometry = from_geometry.collapsed();
            let target_style = from_style.faded();
            next.push(SceneNode {
                phase: NodePhase::Exiting,
                from_geometry,
                from_style,
                target_geometry,
                target_style,
                tween: Tween::new(duration),
                ..existing
            });
        }

        trace!(
            entered = summary.entered.len(),
            updated = summary.updated.len(),
            exited = summary.exited.len(),
            "reconciled scene tree"
        );

        self.nodes = next;
        Ok(summary)
    }

    /// Advances all in-flight tweens and drops exiting nodes that have
    /// finished collapsing.
    pub fn advance(&mut self, delta_ms: f64) {
        for node in &mut self.nodes {
            node.tween.advance(delta_ms);
            if node.phase == NodePhase::Entering && node.tween.is_done() {
                node.phase = NodePhase::Active;
            }
        }
        self.nodes
            .retain(|node| !(node.phase == NodePhase::Exiting && node.tween.is_done()));
    }

    /// True once no node has an unfinished tween.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.nodes.iter().all(SceneNode::is_settled)
    }
}

#[cfg(test)]
mod tests {
    use crate::render::Color;
    use crate::scene::node::{Geometry, NodeKind, NodeStyle, SceneNodeSpec};
    use crate::scene::transition::TransitionSpec;

    use super::{NodePhase, SceneTree};

    fn bar(key: &str, width: f64) -> SceneNodeSpec {
        SceneNodeSpec::new(
            key,
            NodeKind::Bar,
            Geometry::Rect {
                x: 0.0,
                y: 0.0,
                width,
                height: 10.0,
            },
            NodeStyle::filled(Color::rgb(0.2, 0.4, 0.6)),
        )
    }

    #[test]
    fn duplicate_target_keys_are_rejected() {
        let mut tree = SceneTree::new();
        let err = tree
            .reconcile(vec![bar("a", 1.0), bar("a", 2.0)], TransitionSpec::none())
            .expect_err("duplicate key");
        assert!(matches!(err, crate::ChartError::DuplicateSceneKey(_)));
    }

    #[test]
    fn exit_nodes_collapse_then_disappear() {
        let mut tree = SceneTree::new();
        tree.reconcile(vec![bar("a", 40.0)], TransitionSpec::none())
            .expect("initial");

        let summary = tree
            .reconcile(Vec::new(), TransitionSpec::new(100.0))
            .expect("exit pass");
        assert_eq!(summary.exited, vec!["a".to_owned()]);
        assert_eq!(tree.nodes()[0].phase, NodePhase::Exiting);

        tree.advance(100.0);
        assert!(tree.is_empty());
    }

    #[test]
    fn interrupted_transition_restarts_from_current_state() {
        let mut tree = SceneTree::new();
        tree.reconcile(vec![bar("a", 0.0)], TransitionSpec::none())
            .expect("initial");
        tree.reconcile(vec![bar("a", 100.0)], TransitionSpec::new(100.0))
            .expect("grow");
        tree.advance(50.0);

        // Interrupt mid-flight; the new tween starts from the partially
        // grown width, not from zero.
        tree.reconcile(vec![bar("a", 100.0)], TransitionSpec::new(100.0))
            .expect("interrupt");
        let Geometry::Rect { width, .. } = tree.nodes()[0].geometry() else {
            panic!("expected rect");
        };
        assert!(width > 0.0);
    }
}
