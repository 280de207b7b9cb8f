//! State Machine Runtime
//!
//! Flat, table-driven state machines with typed states and events.
//!
//! Transitions carry *effects* as plain data rather than closures. `send`
//! hands the effects of the fired transition back to the caller, which
//! applies them to whatever it owns. This keeps the machine free of captured
//! mutable state, so re-entrancy and idempotence can be audited from the
//! transition table alone.

use std::collections::VecDeque;

use smallvec::SmallVec;

/// Number of transitions kept in history
pub const HISTORY_LIMIT: usize = 64;

/// A transition in the state machine
#[derive(Clone, Debug)]
pub struct Transition<S, E, A> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
    pub effects: SmallVec<[A; 2]>,
}

impl<S, E, A> Transition<S, E, A> {
    /// Create a simple transition without effects
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
            effects: SmallVec::new(),
        }
    }

    /// Add an effect to emit when this transition fires
    pub fn with_effect(mut self, effect: A) -> Self {
        self.effects.push(effect);
        self
    }
}

/// The outcome of a fired transition
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<S, A> {
    pub from: S,
    pub to: S,
    /// Effects of the transition, in declaration order
    pub effects: SmallVec<[A; 2]>,
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E, A> {
    initial_state: S,
    transitions: Vec<Transition<S, E, A>>,
}

impl<S, E, A> StateMachineBuilder<S, E, A>
where
    S: Copy + Eq,
    E: Copy + Eq,
    A: Clone,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
        }
    }

    /// Add a transition
    pub fn transition(mut self, transition: Transition<S, E, A>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E, A> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            history: VecDeque::new(),
        }
    }
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine<S, E, A> {
    current_state: S,
    transitions: Vec<Transition<S, E, A>>,
    /// Most recent transitions, oldest first
    history: VecDeque<(S, E, S)>,
}

impl<S, E, A> StateMachine<S, E, A>
where
    S: Copy + Eq,
    E: Copy + Eq,
    A: Clone,
{
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E, A> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Get transition history, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = &(S, E, S)> {
        self.history.iter()
    }

    /// Send an event to the state machine
    ///
    /// Returns `None` when no transition matches, leaving the state unchanged.
    pub fn send(&mut self, event: E) -> Option<Fired<S, A>> {
        let from = self.current_state;
        let transition = self
            .transitions
            .iter()
            .find(|t| t.from_state == from && t.event == event)?;
        let to = transition.to_state;
        let effects = transition.effects.clone();

        self.current_state = to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back((from, event, to));

        Some(Fired { from, to, effects })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Door {
        Closed,
        Open,
        Locked,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Input {
        Push,
        Pull,
        Lock,
        Unlock,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Sound {
        Creak,
        Click,
        Bell,
    }

    fn door() -> StateMachine<Door, Input, Sound> {
        StateMachine::builder(Door::Closed)
            .transition(
                Transition::new(Door::Closed, Input::Push, Door::Open)
                    .with_effect(Sound::Creak)
                    .with_effect(Sound::Bell),
            )
            .transition(Transition::new(Door::Open, Input::Pull, Door::Closed))
            .transition(Transition::new(Door::Closed, Input::Lock, Door::Locked).with_effect(Sound::Click))
            .transition(Transition::new(Door::Locked, Input::Unlock, Door::Closed))
            .build()
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = door();
        assert_eq!(fsm.current_state(), Door::Closed);

        let fired = fsm.send(Input::Push).unwrap();
        assert_eq!(fired.from, Door::Closed);
        assert_eq!(fired.to, Door::Open);
        assert_eq!(fired.effects.as_slice(), &[Sound::Creak, Sound::Bell]);

        assert!(fsm.send(Input::Pull).unwrap().effects.is_empty());
        assert_eq!(fsm.current_state(), Door::Closed);
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = door();
        assert!(fsm.send(Input::Pull).is_none());
        assert!(fsm.send(Input::Unlock).is_none());
        assert_eq!(fsm.current_state(), Door::Closed);
        assert_eq!(fsm.history().len(), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut fsm = door();
        for _ in 0..HISTORY_LIMIT {
            fsm.send(Input::Lock);
            fsm.send(Input::Unlock);
        }

        let history: Vec<_> = fsm.history().copied().collect();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(
            history.last(),
            Some(&(Door::Locked, Input::Unlock, Door::Closed))
        );
    }
}
