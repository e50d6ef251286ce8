//! Feature-gated diagnostics counters. With the `counter` feature disabled
//! the `counter!` macro compiles to nothing.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

#[derive(Default)]
pub struct CounterU64 {
    atomic: AtomicU64,
}

impl CounterU64 {
    pub const fn new() -> Self {
        Self {
            atomic: AtomicU64::new(0),
        }
    }

    pub fn inc(&self) {
        // Adding one is associative and commutative.
        self.atomic.fetch_add(1, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.atomic.load(Ordering::Acquire)
    }
}

lazy_static::lazy_static! {
    pub static ref __COUNTERS: Mutex<HashMap<&'static str, Arc<CounterU64>>> =
        Mutex::new(HashMap::new());
}

pub fn insert_counter(descr: &'static str) -> Arc<CounterU64> {
    let mut counters = __COUNTERS.lock().unwrap();
    counters.entry(descr).or_default().clone()
}

pub fn report_counters() {
    let counters = __COUNTERS.lock().unwrap();
    for (counter_name, counter) in counters.iter() {
        log::info!(target: "counter_report", "{}: {}", counter_name, counter.value());
    }
}

#[macro_export]
macro_rules! counter {
    ($descr:literal) => {
        if cfg!(feature = "counter") {
            use $crate::utils::counter::{insert_counter, lazy_static, CounterU64};
            lazy_static::lazy_static! {
                static ref COUNTER_REF: std::sync::Arc<CounterU64> = insert_counter($descr);
            }
            COUNTER_REF.inc();
        };
    };
}

pub use counter;
// Reexport for ease of use in the macro expansion.
pub use lazy_static;
