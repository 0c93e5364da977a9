/// Runtime settings for a [`Parser`](super::Parser)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Initial depth of the state and value stacks. The stacks double in
    /// size whenever they fill.
    pub initial_stack_capacity: usize,

    /// Number of consecutive retries an error handler may request for one
    /// lookahead before the parse fails
    pub max_recovery_attempts: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            initial_stack_capacity: 10,
            max_recovery_attempts: 1000,
        }
    }
}
