use std::cell::Cell;
use std::rc::Rc;

use stageset_core::{Identifiable, Identity, LoadError, Snapshot};

/// Minimal aggregate member used as the collection item across the suites.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
}

impl Customer {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("customer-{id}"),
        }
    }
}

impl Identifiable for Customer {
    fn identity(&self) -> Identity {
        Identity::new(self.id.clone())
    }
}

/// Snapshot over an in-memory base set.
#[allow(dead_code)]
pub fn snapshot_of(ids: &[&str]) -> Snapshot<Customer> {
    Snapshot::from_items(ids.iter().map(|id| Customer::new(id)))
}

/// Snapshot whose loader counts its own invocations.
#[allow(dead_code)]
pub fn counting_snapshot(ids: &[&str]) -> (Snapshot<Customer>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let items: Vec<Customer> = ids.iter().map(|id| Customer::new(id)).collect();

    let snapshot = Snapshot::new(move || {
        counter.set(counter.get() + 1);
        items.clone().into_iter().map(Ok)
    });

    (snapshot, calls)
}

/// Snapshot whose loader yields the given items and then fails, counting
/// its own invocations.
#[allow(dead_code)]
pub fn failing_snapshot(ids: &[&str]) -> (Snapshot<Customer>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let items: Vec<Customer> = ids.iter().map(|id| Customer::new(id)).collect();

    let snapshot = Snapshot::new(move || {
        counter.set(counter.get() + 1);
        let mut sequence: Vec<Result<Customer, LoadError>> =
            items.clone().into_iter().map(Ok).collect();
        sequence.push(Err(LoadError::new("base source unavailable")));
        sequence.into_iter()
    });

    (snapshot, calls)
}

/// Identities of the logical view, in yield order. Panics on loader failure.
#[allow(dead_code)]
pub fn view_ids(snapshot: &Snapshot<Customer>) -> Vec<String> {
    snapshot
        .to_vec()
        .expect("loader failed")
        .into_iter()
        .map(|customer| customer.id)
        .collect()
}
