//! Ordered evidence tiers.
//!
//! A `Waterfall` is a list of named tier closures evaluated top to bottom. The
//! first tier returning `Some` wins; the terminal `resolve` argument is the
//! assumption used when every tier misses, so resolution is always total.

use tracing::{debug, trace};

use crate::domain::InferredInput;

type Tier<'a, T> = Box<dyn Fn() -> Option<InferredInput<T>> + 'a>;

pub struct Waterfall<'a, T> {
    field: &'static str,
    tiers: Vec<(&'static str, Tier<'a, T>)>,
}

impl<'a, T> Waterfall<'a, T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            tiers: Vec::new(),
        }
    }

    /// Append a tier below the ones already added.
    pub fn tier(
        mut self,
        name: &'static str,
        check: impl Fn() -> Option<InferredInput<T>> + 'a,
    ) -> Self {
        self.tiers.push((name, Box::new(check)));
        self
    }

    pub fn resolve(self, assume: impl FnOnce() -> InferredInput<T>) -> InferredInput<T> {
        for (name, check) in &self.tiers {
            match check() {
                Some(hit) => {
                    debug!(
                        field = self.field,
                        tier = *name,
                        source = hit.source.as_str(),
                        confidence = hit.confidence,
                        "resolved"
                    );
                    return hit;
                }
                None => trace!(field = self.field, tier = *name, "tier miss"),
            }
        }
        let fallback = assume();
        debug!(
            field = self.field,
            tier = "assumption",
            confidence = fallback.confidence,
            "resolved"
        );
        fallback
    }
}
