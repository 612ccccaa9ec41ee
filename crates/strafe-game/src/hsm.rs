//! Hierarchical state machine
//!
//! A generic state-stack engine with no knowledge of movement. States are
//! identifiers implementing [`HsmState`]; per-state data lives in the
//! owner, which every callback receives. The stack runs from the outermost
//! (root) state to the innermost active child, and at most one branch of
//! the hierarchy is active at a time.

use std::fmt;

/// The next step a state wants the machine to take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition<S> {
    /// Stay in the current configuration.
    None,
    /// Replace the branch rooted at the requesting state's level with a
    /// new state, exiting the old branch innermost-first. The optional
    /// scalar is forwarded to the new state's `on_enter`.
    Sibling(S, Option<f32>),
    /// Push a nested child under the requesting state. Only honored when
    /// the requester is currently the innermost state; otherwise the
    /// request is ignored, which keeps a settled machine idempotent.
    InnerEntry(S),
}

/// Behavior set for one state identifier.
///
/// All callbacks run synchronously on the owner; `on_enter`/`on_exit` fire
/// exactly once per genuine enter/exit. A `Sibling` transition to the
/// current state still exits and re-enters it.
pub trait HsmState: Copy + PartialEq + fmt::Debug + 'static {
    type Owner;

    fn on_enter(self, owner: &mut Self::Owner, arg: Option<f32>);
    fn on_exit(self, owner: &mut Self::Owner);
    fn update(self, owner: &mut Self::Owner, dt: f32);
    fn transition(self, owner: &Self::Owner) -> Transition<Self>;
}

/// Errors from misusing the machine. These indicate a broken transition
/// table or call sequence and must be treated as fatal by the host.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HsmError {
    #[error("state machine is already initialized")]
    AlreadyInitialized,

    #[error("state machine used before initialization")]
    NotInitialized,

    #[error("transition graph failed to stabilize after {0} transitions in one tick")]
    TransitionLoop(usize),
}

/// Transitions applied per `process_transitions` call before the graph is
/// declared broken.
const MAX_TRANSITIONS_PER_TICK: usize = 16;

/// A stack of active states rooted at an initial state.
pub struct Hsm<S: HsmState> {
    stack: Vec<S>,
}

impl<S: HsmState> Hsm<S> {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Enter the initial root state. Fails if already initialized.
    pub fn init(&mut self, owner: &mut S::Owner, initial: S) -> Result<(), HsmError> {
        if !self.stack.is_empty() {
            return Err(HsmError::AlreadyInitialized);
        }
        self.stack.push(initial);
        initial.on_enter(owner, None);
        Ok(())
    }

    /// Resolve transitions until the stack stabilizes for this tick.
    ///
    /// Levels are scanned outermost-first and the scan restarts after every
    /// applied transition, so outer transitions take priority over inner
    /// ones. A graph that keeps requesting transitions without stabilizing
    /// exhausts the iteration cap and is reported as fatal.
    pub fn process_transitions(&mut self, owner: &mut S::Owner) -> Result<(), HsmError> {
        if self.stack.is_empty() {
            return Err(HsmError::NotInitialized);
        }
        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            let Some((level, transition)) = self.pending_transition(owner) else {
                return Ok(());
            };
            self.apply(owner, level, transition);
        }
        Err(HsmError::TransitionLoop(MAX_TRANSITIONS_PER_TICK))
    }

    fn pending_transition(&self, owner: &S::Owner) -> Option<(usize, Transition<S>)> {
        let innermost = self.stack.len() - 1;
        for (level, state) in self.stack.iter().enumerate() {
            match state.transition(owner) {
                Transition::None => {}
                Transition::InnerEntry(next) => {
                    if level == innermost {
                        return Some((level, Transition::InnerEntry(next)));
                    }
                }
                sibling @ Transition::Sibling(..) => return Some((level, sibling)),
            }
        }
        None
    }

    fn apply(&mut self, owner: &mut S::Owner, level: usize, transition: Transition<S>) {
        match transition {
            Transition::Sibling(next, arg) => {
                // Exit the replaced branch innermost-first.
                while self.stack.len() > level {
                    if let Some(exited) = self.stack.pop() {
                        exited.on_exit(owner);
                    }
                }
                tracing::debug!("state transition at level {}: -> {:?}", level, next);
                self.stack.push(next);
                next.on_enter(owner, arg);
            }
            Transition::InnerEntry(next) => {
                tracing::debug!("inner entry: -> {:?}", next);
                self.stack.push(next);
                next.on_enter(owner, None);
            }
            Transition::None => {}
        }
    }

    /// Run `update` on every active state, outermost to innermost. Call
    /// only after transitions have stabilized for the tick.
    pub fn update(&mut self, owner: &mut S::Owner, dt: f32) {
        let states = self.stack.clone();
        for state in states {
            state.update(owner, dt);
        }
    }

    /// Whether `state` is anywhere in the active stack.
    pub fn is_in_state(&self, state: S) -> bool {
        self.stack.contains(&state)
    }

    /// The innermost active state, if initialized.
    pub fn innermost(&self) -> Option<S> {
        self.stack.last().copied()
    }

    /// Diagnostic serialization, outermost first.
    pub fn stack_string(&self) -> String {
        self.stack
            .iter()
            .map(|s| format!("{:?}", s))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl<S: HsmState> Default for Hsm<S> {
    fn default() -> Self {
        Self::new()
    }
}
