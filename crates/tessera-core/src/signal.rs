use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

/// Shared observable value. Clones refer to the same cell.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

struct Inner<T> {
    value: T,
    next_id: SubId,
    subs: Vec<(SubId, Rc<dyn Fn(&T)>)>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            next_id: 0,
            subs: Vec::new(),
        })))
    }
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }
    pub fn set(&self, v: T) {
        self.0.borrow_mut().value = v;
        self.notify();
    }
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subs.push((id, Rc::new(f)));
        id
    }
    /// Removes a subscriber. Returns whether `id` was still subscribed.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        let mut inner = self.0.borrow_mut();
        let before = inner.subs.len();
        inner.subs.retain(|(sub, _)| *sub != id);
        inner.subs.len() != before
    }
    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subs.len()
    }

    // Subscribers may read the signal again, so the borrow is released
    // before any of them runs.
    fn notify(&self) {
        let subs = self.0.borrow().subs.clone();
        for (_, s) in subs {
            let inner = self.0.borrow();
            s(&inner.value);
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signal").field(&self.0.borrow().value).finish()
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}

/// Boolean predicate evaluated every time it is consulted.
pub type Condition = Rc<dyn Fn() -> bool>;

pub fn condition(f: impl Fn() -> bool + 'static) -> Condition {
    Rc::new(f)
}

impl From<Signal<bool>> for Condition {
    fn from(s: Signal<bool>) -> Self {
        Rc::new(move || s.get())
    }
}
