/// The paired state and semantic value stacks of an LR parser. Both stacks
/// always have the same depth. Capacity starts at a configured size and
/// doubles whenever a push finds the stacks full.
pub struct Stack<V> {
    states: Vec<usize>,
    values: Vec<V>,
    capacity: usize,
}

impl<V> Stack<V> {
    /// Creates a new stack, prepopulated with an entry for the start state.
    /// The sentinel value is never passed to a join function.
    pub fn new(capacity: usize, sentinel: V) -> Stack<V> {
        let capacity = capacity.max(1);
        let mut states = Vec::with_capacity(capacity);
        let mut values = Vec::with_capacity(capacity);
        states.push(0);
        values.push(sentinel);

        Stack {
            states,
            values,
            capacity,
        }
    }

    /// Returns the state at the top of the stack
    pub fn peek_state(&self) -> usize {
        self.states.last().copied().unwrap_or(0)
    }

    /// Returns the number of entries, including the start state sentinel
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pushes a state and its value, growing the stacks first if they are
    /// full
    pub fn push(&mut self, state: usize, value: V) {
        if self.states.len() == self.capacity {
            self.capacity *= 2;
            self.states.reserve_exact(self.capacity - self.states.len());
            self.values.reserve_exact(self.capacity - self.values.len());
        }
        self.states.push(state);
        self.values.push(value);
    }

    /// Pops the top n entries and returns their values in stack order. The
    /// start state sentinel is never popped.
    pub fn pop(&mut self, n: usize) -> Vec<V> {
        let at = self.states.len().saturating_sub(n).max(1);
        self.states.truncate(at);
        self.values.split_off(at)
    }

    /// Returns the values above the start state sentinel
    pub fn values_mut(&mut self) -> &mut [V] {
        &mut self.values[1..]
    }

    /// Consumes the stack, returning the value at the top
    pub fn into_top(mut self) -> Option<V> {
        if self.values.len() > 1 {
            self.values.pop()
        } else {
            None
        }
    }
}
