//! Previous-render memory.
//!
//! `Previous<T>` answers "what was this value on the render before this one".
//! The read (`get`) always reflects pre-update state; the stored value only
//! advances when the caller reports a completed render via `advance`. Before
//! the first completed render the answer is `None`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Previous<T> {
    last: Option<T>,
}

impl<T> Default for Previous<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T> Previous<T> {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Value supplied on the preceding render, `None` on the first.
    pub fn get(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Record the value the just-completed render used.
    pub fn advance(&mut self, current: T) {
        self.last = Some(current);
    }
}

impl Previous<bool> {
    /// Absent counts as `false`.
    pub fn was(&self) -> bool {
        self.last.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_before_first_render() {
        let p: Previous<bool> = Previous::new();
        assert_eq!(p.get(), None);
        assert!(!p.was());
    }

    #[test]
    fn get_reflects_pre_update_state() {
        let mut p = Previous::new();
        p.advance(false);
        assert_eq!(p.get(), Some(&false));
        p.advance(true);
        assert_eq!(p.get(), Some(&true));
        assert!(p.was());
    }
}
