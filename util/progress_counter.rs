use std::sync::{
	atomic::{AtomicU64, Ordering},
	Arc,
};

/// A `ProgressCounter` tracks the progress of a long running operation. Clones share the same underlying counter, so one thread can increment it while another reads it.
#[derive(Clone, Debug)]
pub struct ProgressCounter {
	current: Arc<AtomicU64>,
	total: u64,
}

impl ProgressCounter {
	pub fn new(total: u64) -> ProgressCounter {
		ProgressCounter {
			current: Arc::new(AtomicU64::new(0)),
			total,
		}
	}
	pub fn total(&self) -> u64 {
		self.total
	}
	pub fn get(&self) -> u64 {
		self.current.load(Ordering::Relaxed)
	}
	pub fn set(&self, value: u64) {
		self.current.store(value, Ordering::Relaxed);
	}
	pub fn inc(&self, amount: u64) {
		self.current.fetch_add(amount, Ordering::Relaxed);
	}
	/// The fraction of the operation that has completed so far, in `[0, 1]`.
	pub fn fraction(&self) -> f32 {
		if self.total == 0 {
			return 1.0;
		}
		let fraction = self.get() as f32 / self.total as f32;
		fraction.min(1.0)
	}
}

#[test]
fn test_progress_counter() {
	let counter = ProgressCounter::new(4);
	assert_eq!(counter.get(), 0);
	let clone = counter.clone();
	clone.inc(1);
	assert_eq!(counter.get(), 1);
	counter.inc(1);
	assert_eq!(clone.get(), 2);
	assert!((counter.fraction() - 0.5).abs() < std::f32::EPSILON);
	counter.set(4);
	assert!((counter.fraction() - 1.0).abs() < std::f32::EPSILON);
}
