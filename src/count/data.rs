/*!
Time series buckets of accumulated values.

A [`Buckets`] is a fixed-length circular window over ticked time. The slot at
`oldest_idx` holds the oldest retained bucket; indices after it (wrapping)
hold successively newer buckets, and `(oldest_idx + len - 1) % len` is the
bucket currently accumulating, whose logical tick is `oldest_tick + len - 1`.
Old entries expire implicitly when newer ticks overwrite their slot, so the
window slides without ever being rescanned.

Not threadsafe, bring your own lock.
*/

/// Numeric capability of a bucket entry. Implemented for exactly `i64` and
/// `f64`; the generic bound makes mixing the two kinds a type error instead
/// of a runtime panic.
pub trait Value: Copy + PartialOrd + Send + 'static {
    const ZERO: Self;

    fn add(self, other: Self) -> Self;

    /// Rendering used by [`Buckets::snapshot`]; floats keep three decimals.
    fn render(self) -> String;
}

impl Value for i64 {
    const ZERO: Self = 0;

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn render(self) -> String {
        self.to_string()
    }
}

impl Value for f64 {
    const ZERO: Self = 0.0;

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn render(self) -> String {
        format!("{self:.3}")
    }
}

/// Determines which bucket is currently accumulating. As the ticker rolls
/// over, the values in each bucket "slide" towards expiry.
#[derive(Clone)]
pub struct BucketPeriod(std::sync::Arc<dyn Fn() -> i64 + Send + Sync>);

impl BucketPeriod {
    /// A ticker from an arbitrary function; tests use this with a manually
    /// advanced counter.
    pub fn from_fn(ticker: impl Fn() -> i64 + Send + Sync + 'static) -> BucketPeriod {
        BucketPeriod(std::sync::Arc::new(ticker))
    }

    pub fn one_second() -> BucketPeriod {
        BucketPeriod::spanning(1)
    }

    pub fn one_minute() -> BucketPeriod {
        BucketPeriod::spanning(60)
    }

    pub fn five_minutes() -> BucketPeriod {
        BucketPeriod::spanning(5 * 60)
    }

    pub fn fifteen_minutes() -> BucketPeriod {
        BucketPeriod::spanning(15 * 60)
    }

    pub fn one_hour() -> BucketPeriod {
        BucketPeriod::spanning(60 * 60)
    }

    fn spanning(seconds: i64) -> BucketPeriod {
        BucketPeriod::from_fn(move || {
            chrono::Utc::now().timestamp().div_euclid(seconds)
        })
    }

    pub fn tick(&self) -> i64 {
        (self.0)()
    }
}

impl std::fmt::Debug for BucketPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BucketPeriod").finish()
    }
}

/// A history of accumulating values over periodic intervals of time.
pub struct Buckets<V: Value> {
    buckets: Vec<V>,
    ticker: BucketPeriod,
    oldest_idx: usize,
    oldest_tick: i64,
}

impl<V: Value> Buckets<V> {
    /// A window of `length` buckets, each spanning one tick of `ticker`.
    /// The current bucket starts at index 0.
    ///
    /// `length` must be at least 1; the counter constructors validate that
    /// before building.
    pub fn new(ticker: BucketPeriod, length: usize) -> Buckets<V> {
        let tick = ticker.tick();
        Buckets {
            buckets: vec![V::ZERO; length],
            ticker,
            oldest_idx: 1,
            oldest_tick: tick - length as i64 + 1,
        }
    }

    /// Add `delta` into the bucket for the current tick, zero-filling any
    /// ticks that passed since the last write.
    pub fn increment(&mut self, delta: V) {
        let tick = self.ticker.tick();
        let len = self.buckets.len();

        let newest_tick = self.oldest_tick + len as i64 - 1;
        if newest_tick == tick {
            let newest_idx = if self.oldest_idx == 0 {
                len - 1
            } else {
                self.oldest_idx - 1
            };
            self.buckets[newest_idx] = self.buckets[newest_idx].add(delta);
            return;
        }

        let gap = tick - newest_tick;
        if gap >= len as i64 {
            // every retained bucket is stale, start over
            self.oldest_tick = tick - len as i64 + 1;
            for (i, bucket) in self.buckets.iter_mut().enumerate() {
                *bucket = if i == 0 { delta } else { V::ZERO };
            }
            self.oldest_idx = 1;
            return;
        }

        // overwrite the gap with zeros, oldest first
        for _ in 0..gap - 1 {
            self.buckets[self.oldest_idx] = V::ZERO;
            self.oldest_idx = (self.oldest_idx + 1) % len;
        }
        self.oldest_tick += gap;

        self.buckets[self.oldest_idx] = delta;
        self.oldest_idx = (self.oldest_idx + 1) % len;
    }

    /// Apply `cmp` to the most recently *completed* bucket (never the one
    /// still accumulating) and `v`.
    ///
    /// Forces a refresh first so the window reflects the current tick even
    /// when nothing has been written since it advanced; this is why reading
    /// health takes the same exclusive lock as writes.
    pub fn compare(&mut self, cmp: impl Fn(V, V) -> bool, v: V) -> bool {
        self.increment(V::ZERO);

        let len = self.buckets.len();
        let last_completed = (self.oldest_idx + len - 2) % len;
        cmp(self.buckets[last_completed], v)
    }

    /// Sum across all buckets, including the currently accumulating one.
    pub fn sum(&self) -> V {
        self.buckets[1..]
            .iter()
            .fold(self.buckets[0], |acc, bucket| acc.add(*bucket))
    }

    /// Window contents rendered newest to oldest, e.g. `"[1, 3, 5, 2]"`.
    /// Refreshes the window first.
    pub fn snapshot(&mut self) -> String {
        self.increment(V::ZERO);

        let len = self.buckets.len();
        let mut parts = Vec::with_capacity(len);
        // newest lives just below oldest_idx, wrapping downwards
        for offset in 1..=len {
            let idx = (self.oldest_idx + len - offset) % len;
            parts.push(self.buckets[idx].render());
        }
        format!("[{}]", parts.join(", "))
    }
}

/// True iff `a <= b`.
pub fn less_eq<V: Value>(a: V, b: V) -> bool {
    a <= b
}

/// True iff `a >= b`.
pub fn greater_eq<V: Value>(a: V, b: V) -> bool {
    a >= b
}
