use crate::game::Board;

/// Opaque serialized agent state, as written to and read from checkpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentState {
    pub data: Vec<u8>,
}

/// Universal interface for anything that can pick a column.
pub trait Agent {
    /// Select a column for the side to move on `board`.
    ///
    /// When `training` is true the agent may explore and may even return a
    /// column that is not legal; callers validate. When false the agent must
    /// return a legal column. Returns `None` only when no column is legal.
    fn select_move(&mut self, board: &Board, training: bool) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
