use goap_agent::{
    Action, ActionBehavior, ActionRecord, Agent, DataProvider, GoapVisualizer, Goal, Plan,
    Result, State,
};

/// Positions on a one-dimensional forest path.
type Position = i32;

/// Shared scratch data the actions work on.
#[derive(Debug, Default)]
struct Backpack {
    has_axe: bool,
    logs: u32,
}

/// The simulation hosting the woodcutter.
struct Forest {
    position: Position,
    axe_at: Position,
    tree_at: Position,
    backpack: Backpack,
}

impl Forest {
    fn new() -> Self {
        Self {
            position: 0,
            axe_at: 2,
            tree_at: -3,
            backpack: Backpack::default(),
        }
    }
}

impl DataProvider for Forest {
    type Target = Position;
    type Blackboard = Backpack;

    fn world_state(&self) -> State {
        [
            ("has_axe", self.backpack.has_axe),
            ("has_wood", self.backpack.logs >= 3),
        ]
        .into_iter()
        .collect()
    }

    fn create_goal_state(&self) -> Vec<Goal> {
        vec![State::from_fact("has_wood", true)]
    }

    fn plan_found(&mut self, goal: &Goal, plan: &Plan) {
        println!("Plan for {}: {} (cost {})", goal, plan, plan.cost());
    }

    fn plan_failed(&mut self, goals: &[Goal]) {
        println!("No plan for {} goals", goals.len());
    }

    fn plan_aborted(&mut self, action: &Action) {
        println!("Plan aborted by {}", action.name);
    }

    fn actions_finished(&mut self) {
        println!("Finished with {} logs", self.backpack.logs);
    }

    fn move_agent(&mut self, action: &Action, record: &mut ActionRecord<Position>) -> bool {
        let Some(&target) = record.target() else {
            return false;
        };
        self.position += (target - self.position).signum();
        println!("  walking to {} for {}: at {}", target, action.name, self.position);
        self.position == target
    }

    fn blackboard(&mut self) -> &mut Backpack {
        &mut self.backpack
    }
}

struct PickUpAxe {
    action: Action,
}

impl ActionBehavior<Forest> for PickUpAxe {
    fn action(&self) -> &Action {
        &self.action
    }

    fn check_procedural_precondition(&mut self, forest: &Forest, record: &mut ActionRecord<Position>) -> bool {
        record.set_target(forest.axe_at);
        true
    }

    fn perform(&mut self, record: &mut ActionRecord<Position>, backpack: &mut Backpack) -> bool {
        backpack.has_axe = true;
        record.mark_done();
        true
    }
}

struct ChopWood {
    action: Action,
}

impl ActionBehavior<Forest> for ChopWood {
    fn action(&self) -> &Action {
        &self.action
    }

    fn check_procedural_precondition(&mut self, forest: &Forest, record: &mut ActionRecord<Position>) -> bool {
        record.set_target(forest.tree_at);
        true
    }

    fn perform(&mut self, record: &mut ActionRecord<Position>, backpack: &mut Backpack) -> bool {
        backpack.logs += 1;
        println!("  chop! {} logs", backpack.logs);
        if backpack.logs >= 3 {
            record.mark_done();
        }
        true
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let pick_up_axe = Action::new("pick_up_axe", 2.0)?
        .with_effect("has_axe", true)
        .requiring_range();
    let chop_wood = Action::new("chop_wood", 4.0)?
        .with_precondition("has_axe", true)
        .with_effect("has_wood", true)
        .requiring_range();

    // Render the plan before running it
    let forest = Forest::new();
    let definitions = [chop_wood.clone(), pick_up_axe.clone()];
    let goal = State::from_fact("has_wood", true);
    if let Some(plan) = goap_agent::Planner::new()
        .plan_actions(&definitions, &forest.world_state(), &goal)
        .into_plan()
    {
        let refs: Vec<&Action> = definitions.iter().collect();
        let dot = GoapVisualizer::new().render_plan(&refs, &forest.world_state(), &goal, &plan);
        println!("{}", dot);
    }

    let mut agent = Agent::builder("woodcutter")
        .data_provider(forest)
        .action(ChopWood { action: chop_wood })
        .action(PickUpAxe { action: pick_up_axe })
        .build()?;

    for tick in 0..30 {
        println!("[{}] {:?}", tick, agent.stack().frames());
        agent.update();
        if agent.provider().backpack.logs >= 3 && agent.current_plan().is_none() {
            break;
        }
    }

    Ok(())
}
