use std::cell::RefCell;
use std::rc::Rc;

/// The single mutable state value a viewer owns.
///
/// Hosts decide where the value lives: a reactive signal in the browser, a
/// plain `Rc<RefCell<_>>` in tests. Both methods return `None` once the host
/// has torn the state down, and callers must drop their result in that case.
pub trait StateCell<T> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>;
    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;
}

impl<T> StateCell<T> for Rc<RefCell<T>> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }

    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}
