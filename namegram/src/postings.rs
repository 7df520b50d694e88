//! Pull-based cursors over posting lists.
//!
//! Every iterator starts before its first element. `0` is the sentinel for
//! "no current id", both before the first `advance` and after exhaustion, so
//! document id 0 can never be yielded.
//!
//! The combinators require their inputs to yield ascending ids.

pub trait PostingIterator {
    /// The id under the cursor, or 0.
    fn current_id(&self) -> u64;

    /// Move to the next id and return it, or 0 once exhausted.
    fn advance(&mut self) -> u64;

    /// Move to the first id `>= target` and return it, or 0 once exhausted.
    /// Does not move when the current id already satisfies the bound.
    fn skip_to(&mut self, target: u64) -> u64 {
        let current = self.current_id();
        if current != 0 && current >= target {
            return current;
        }
        loop {
            let id = self.advance();
            if id == 0 || id >= target {
                return id;
            }
        }
    }
}

impl<T: PostingIterator + ?Sized> PostingIterator for Box<T> {
    fn current_id(&self) -> u64 {
        (**self).current_id()
    }

    fn advance(&mut self) -> u64 {
        (**self).advance()
    }

    fn skip_to(&mut self, target: u64) -> u64 {
        (**self).skip_to(target)
    }
}

/// Forward cursor over a fully materialized id sequence.
#[derive(Debug, Clone, Default)]
pub struct OwningPostingIterator {
    ids: Vec<u64>,
    // 0 is before the start; n is ids[n - 1]; ids.len() + 1 is exhausted
    pos: usize,
}

impl OwningPostingIterator {
    pub fn new(ids: Vec<u64>) -> Self {
        Self { ids, pos: 0 }
    }

    pub fn push(&mut self, id: u64) {
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl PostingIterator for OwningPostingIterator {
    fn current_id(&self) -> u64 {
        match self.pos {
            0 => 0,
            n => self.ids.get(n - 1).copied().unwrap_or(0),
        }
    }

    fn advance(&mut self) -> u64 {
        if self.pos <= self.ids.len() {
            self.pos += 1;
        }
        self.current_id()
    }
}

/// Ids present in every input.
pub struct AndPostingIterator {
    iterators: Vec<Box<dyn PostingIterator>>,
    current: u64,
}

impl AndPostingIterator {
    pub fn new(iterators: Vec<Box<dyn PostingIterator>>) -> Self {
        Self {
            iterators,
            current: 0,
        }
    }

    fn next_match(&mut self) -> u64 {
        let Some(first) = self.iterators.first_mut() else {
            return 0;
        };
        let mut target = first.advance();

        'search: loop {
            if target == 0 {
                return 0;
            }
            for it in self.iterators.iter_mut() {
                let id = it.skip_to(target);
                if id == 0 {
                    return 0;
                }
                if id > target {
                    target = id;
                    continue 'search;
                }
            }
            return target;
        }
    }
}

impl PostingIterator for AndPostingIterator {
    fn current_id(&self) -> u64 {
        self.current
    }

    fn advance(&mut self) -> u64 {
        self.current = self.next_match();
        self.current
    }
}

/// Ids present in any input, each yielded once.
pub struct OrPostingIterator {
    iterators: Vec<Box<dyn PostingIterator>>,
    current: u64,
    started: bool,
}

impl OrPostingIterator {
    pub fn new(iterators: Vec<Box<dyn PostingIterator>>) -> Self {
        Self {
            iterators,
            current: 0,
            started: false,
        }
    }
}

impl PostingIterator for OrPostingIterator {
    fn current_id(&self) -> u64 {
        self.current
    }

    fn advance(&mut self) -> u64 {
        if !self.started {
            self.started = true;
            for it in self.iterators.iter_mut() {
                it.advance();
            }
        } else if self.current != 0 {
            let current = self.current;
            for it in self.iterators.iter_mut() {
                if it.current_id() == current {
                    it.advance();
                }
            }
        }

        self.current = self
            .iterators
            .iter()
            .map(|it| it.current_id())
            .filter(|&id| id != 0)
            .min()
            .unwrap_or(0);
        self.current
    }
}

/// Drain `it` from its current position into a vector.
pub fn collect_ids<I: PostingIterator + ?Sized>(it: &mut I) -> Vec<u64> {
    let mut ids = Vec::new();
    loop {
        let id = it.advance();
        if id == 0 {
            return ids;
        }
        ids.push(id);
    }
}
