use chrono::Utc;
use crate::domain::ProductId;

/// Source of "now" in milliseconds.
pub type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Wall-clock milliseconds since the Unix epoch.
pub fn system_clock() -> Clock {
    Box::new(|| Utc::now().timestamp_millis())
}

/// Hands out timestamp ids that never repeat within a session, even when
/// the clock stalls or steps backwards.
pub struct IdGenerator {
    clock: Clock,
    last: Option<i64>,
}

impl IdGenerator {
    pub fn new(clock: Clock) -> Self {
        Self { clock, last: None }
    }

    /// Ensures future ids are greater than `id`.
    pub fn observe(&mut self, id: ProductId) {
        self.last = Some(self.last.map_or(id.0, |last| last.max(id.0)));
    }

    /// Returns `None` once the largest issued id is `i64::MAX` and the clock
    /// has not moved past it; the generator never repeats an id.
    pub fn next_id(&mut self) -> Option<ProductId> {
        let now = (self.clock)();
        let id = match self.last {
            Some(last) if now <= last => last.checked_add(1)?,
            _ => now,
        };
        self.last = Some(id);
        Some(ProductId(id))
    }
}
