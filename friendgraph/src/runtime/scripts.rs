use redis::Script;
use std::sync::LazyLock;

pub const GRAPH_PLAN_SCRIPT_BODY: &str = include_str!("../../lua/graph_plan.lua");

pub static GRAPH_PLAN_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(GRAPH_PLAN_SCRIPT_BODY));
