use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::{Action, Plan, Result, State};

/// Renders plans as Graphviz DOT graphs, for debugging an agent's choices.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoapVisualizer;

impl GoapVisualizer {
    /// Creates a visualizer.
    pub fn new() -> Self {
        Self
    }

    /// Renders the available actions, the initial and goal states, and the
    /// chosen plan as a DOT graph.
    pub fn render_plan(&self, actions: &[&Action], current_state: &State, goal_state: &State, plan: &Plan) -> String {
        let mut dot = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_graph(&mut dot, actions, current_state, goal_state, plan);
        dot
    }

    /// Writes the DOT graph of [`render_plan`](Self::render_plan) to `path`.
    pub fn visualize_plan(
        &self,
        actions: &[&Action],
        current_state: &State,
        goal_state: &State,
        plan: &Plan,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let dot = self.render_plan(actions, current_state, goal_state, plan);
        fs::write(path, dot)?;
        Ok(())
    }

    fn write_graph(
        &self,
        out: &mut String,
        actions: &[&Action],
        current_state: &State,
        goal_state: &State,
        plan: &Plan,
    ) -> std::fmt::Result {
        writeln!(out, "digraph GOAP {{")?;
        writeln!(out, "    rankdir=LR;")?;
        writeln!(out, "    node [shape=box, style=filled, fillcolor=lightblue];")?;
        writeln!(out, "    edge [fontsize=10];")?;

        writeln!(
            out,
            "    initial [label=\"Initial State\\n{}\", fillcolor=lightgreen];",
            Self::state_to_string(current_state)
        )?;
        writeln!(
            out,
            "    goal [label=\"Goal State\\n{}\", fillcolor=lightpink];",
            Self::state_to_string(goal_state)
        )?;

        for (i, action) in actions.iter().enumerate() {
            let fill = if plan.steps().any(|s| s == action.name) {
                ", fillcolor=lightcoral"
            } else {
                ""
            };
            writeln!(
                out,
                "    action_{} [label=\"{}\\nCost: {}\\nPre: {}\\nEff: {}\"{}];",
                i,
                action.name,
                action.cost,
                Self::state_to_string(&action.preconditions),
                Self::state_to_string(&action.effects),
                fill
            )?;
        }

        for (i, action) in actions.iter().enumerate() {
            if action.can_perform(current_state) {
                writeln!(out, "    initial -> action_{} [label=\"possible\"];", i)?;
            }
        }

        for (i, action) in actions.iter().enumerate() {
            let mut new_state = current_state.clone();
            action.apply_effects(&mut new_state);
            if new_state.satisfies(goal_state) {
                writeln!(out, "    action_{} -> goal [label=\"achieves\"];", i)?;
            }
        }

        // Chosen path
        writeln!(out, "    edge [color=red, penwidth=2.0];")?;
        let mut previous = "initial".to_string();
        for step in plan.steps() {
            if let Some(idx) = actions.iter().position(|a| a.name == step) {
                let node = format!("action_{}", idx);
                writeln!(out, "    {} -> {};", previous, node)?;
                previous = node;
            }
        }
        writeln!(out, "    {} -> goal;", previous)?;

        writeln!(out, "}}")
    }

    fn state_to_string(state: &State) -> String {
        state
            .facts()
            .map(|fact| fact.to_string())
            .collect::<Vec<_>>()
            .join("\\n")
    }
}
