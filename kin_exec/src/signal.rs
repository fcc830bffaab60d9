//! # Signals
//!
//! A [`Signal`] delivers each emitted value to every connected slot, synchronously and in the
//! order the slots were connected. There is no queueing: `emit` returns once every slot has run.

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// An output port which any number of slots can subscribe to.
pub struct Signal<T> {
    slots: Vec<Box<dyn FnMut(&T)>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Subscribe a slot to this signal. It will be called after all previously connected slots.
    pub fn connect<F>(&mut self, slot: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.slots.push(Box::new(slot));
    }

    /// Deliver a value to every connected slot.
    pub fn emit(&mut self, value: &T) {
        for slot in self.slots.iter_mut() {
            slot(value);
        }
    }

    /// Number of connected slots.
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_emit_in_connection_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<u32> = Signal::new();

        let first = log.clone();
        signal.connect(move |v| first.borrow_mut().push(("first", *v)));
        let second = log.clone();
        signal.connect(move |v| second.borrow_mut().push(("second", *v)));

        assert_eq!(signal.num_slots(), 2);

        signal.emit(&1);
        signal.emit(&2);

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("first", 2), ("second", 2)]
        );
    }

    #[test]
    fn test_emit_without_slots() {
        let mut signal: Signal<f64> = Signal::default();
        signal.emit(&1.0);
        assert_eq!(signal.num_slots(), 0);
    }
}
