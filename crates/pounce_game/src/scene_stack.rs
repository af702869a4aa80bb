//! LIFO stack of scenes. Only the top scene receives input, ticks and draws.

use crate::error::SceneStackError;

/// What the caller must do after a successful `pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackSignal {
    /// Another scene is now active.
    Resumed,
    /// The last scene was removed; the application should quit.
    Quit,
}

#[derive(Debug)]
pub struct SceneStack<S> {
    scenes: Vec<S>,
}

impl<S> Default for SceneStack<S> {
    fn default() -> Self {
        Self { scenes: Vec::new() }
    }
}

impl<S> SceneStack<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses the current scene underneath `scene`.
    pub fn push(&mut self, scene: S) {
        self.scenes.push(scene);
    }

    /// Drops the active scene. Removing the last one yields `Quit` once;
    /// popping again after that is an error.
    pub fn pop(&mut self) -> Result<StackSignal, SceneStackError> {
        self.scenes.pop().ok_or(SceneStackError::Empty)?;
        if self.scenes.is_empty() {
            Ok(StackSignal::Quit)
        } else {
            Ok(StackSignal::Resumed)
        }
    }

    pub fn active(&self) -> Result<&S, SceneStackError> {
        self.scenes.last().ok_or(SceneStackError::Empty)
    }

    pub fn active_mut(&mut self) -> Result<&mut S, SceneStackError> {
        self.scenes.last_mut().ok_or(SceneStackError::Empty)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_is_last_pushed() {
        let mut stack = SceneStack::new();
        stack.push("A");
        stack.push("B");
        stack.push("C");
        assert_eq!(stack.active(), Ok(&"C"));

        assert_eq!(stack.pop(), Ok(StackSignal::Resumed));
        assert_eq!(stack.active(), Ok(&"B"));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn popping_last_scene_signals_quit_exactly_once() {
        let mut stack = SceneStack::new();
        stack.push(1);
        stack.push(2);

        let signals: Vec<_> = (0..4).map(|_| stack.pop()).collect();
        assert_eq!(
            signals,
            vec![
                Ok(StackSignal::Resumed),
                Ok(StackSignal::Quit),
                Err(SceneStackError::Empty),
                Err(SceneStackError::Empty),
            ]
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn empty_stack_has_no_active_scene() {
        let mut stack: SceneStack<u8> = SceneStack::new();
        assert_eq!(stack.active(), Err(SceneStackError::Empty));
        assert_eq!(stack.active_mut().err(), Some(SceneStackError::Empty));
    }

    #[test]
    fn active_mut_edits_only_the_top_scene() {
        let mut stack = SceneStack::new();
        stack.push(String::from("menu"));
        stack.push(String::from("game"));
        if let Ok(top) = stack.active_mut() {
            top.push_str("-paused");
        }
        assert_eq!(stack.pop(), Ok(StackSignal::Resumed));
        assert_eq!(stack.active().map(String::as_str), Ok("menu"));
    }
}
