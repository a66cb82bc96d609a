/// Resilient image resolution
///
/// One resolver instance drives one rendered image. It walks its candidate
/// list in order, advancing on failure signals, and settles on the first
/// source that loads. Only when every candidate has failed does it give up
/// and hand the caller an initials badge to render instead.

/// Where a resolver is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    /// Still walking the candidate list
    Probing,
    /// A candidate loaded; terminal
    Resolved,
    /// Every candidate failed; terminal
    Exhausted,
}

/// Outcome of one load attempt, reported by the host's resource loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Success,
    Failure,
}

/// Host capability that fetches one URI and reports exactly one outcome.
///
/// How a URI is actually fetched (network, disk, cache) is the host's
/// business; the resolver only sees the signal.
pub trait ResourceLoader {
    async fn load(&self, uri: &str) -> LoadOutcome;
}

/// The final display source for one image slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// A candidate loaded successfully
    Source(String),
    /// Every candidate failed; render this initials badge instead
    Fallback(String),
}

/// Per-image fallback state machine.
///
/// The cursor always points at the next untried candidate, so after a
/// request is issued the most recently requested source is `cursor - 1`.
/// A candidate is never retried once it has failed, and repeated URIs in
/// the list are each tried on their own turn.
#[derive(Debug)]
pub struct ImageResolver {
    candidates: Vec<String>,
    cursor: usize,
    status: ResolveStatus,
}

impl ImageResolver {
    /// Build a resolver over a candidate list. Blank entries are discarded
    /// up front; they could never load.
    pub fn new(candidates: Vec<String>) -> Self {
        let candidates = candidates.into_iter().filter(|c| !c.is_empty()).collect();
        ImageResolver {
            candidates,
            cursor: 0,
            status: ResolveStatus::Probing,
        }
    }

    /// Issue the next untried candidate, advancing the cursor past it.
    /// Returns `None` once the machine is terminal; an empty list exhausts
    /// immediately.
    pub fn next_request(&mut self) -> Option<&str> {
        if self.status != ResolveStatus::Probing {
            return None;
        }

        if self.cursor < self.candidates.len() {
            let uri = &self.candidates[self.cursor];
            self.cursor += 1;
            Some(uri)
        } else {
            self.status = ResolveStatus::Exhausted;
            None
        }
    }

    /// Feed the outcome for the most recently issued candidate.
    /// On failure, returns the next candidate to request, if any remain.
    pub fn on_outcome(&mut self, outcome: LoadOutcome) -> Option<&str> {
        match outcome {
            LoadOutcome::Success => {
                // Terminal states stay terminal; a stray late signal is a no-op
                if self.status == ResolveStatus::Probing {
                    self.status = ResolveStatus::Resolved;
                }
                None
            }
            LoadOutcome::Failure => self.next_request(),
        }
    }

    pub fn status(&self) -> ResolveStatus {
        self.status
    }

    /// The source that loaded, once resolved
    pub fn resolved_source(&self) -> Option<&str> {
        if self.status == ResolveStatus::Resolved && self.cursor > 0 {
            Some(&self.candidates[self.cursor - 1])
        } else {
            None
        }
    }

    /// How many candidates have been issued so far
    pub fn attempts(&self) -> usize {
        self.cursor
    }
}

/// Two-letter initials badge derived from the first two space-separated
/// words of a display name, upper-cased. One word yields one letter.
pub fn initials_for(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Drive one resolver to completion against the host's loader.
///
/// Candidates are awaited one at a time; once a request is issued its
/// outcome is always awaited. There is no cancellation and no retry.
/// Separate images resolve on their own independent machines.
pub async fn resolve<L: ResourceLoader>(
    loader: &L,
    candidates: Vec<String>,
    display_name: &str,
) -> ResolvedImage {
    let mut resolver = ImageResolver::new(candidates);
    let mut next = resolver.next_request().map(str::to_owned);

    while let Some(uri) = next {
        let outcome = loader.load(&uri).await;
        next = resolver.on_outcome(outcome).map(str::to_owned);
    }

    match resolver.resolved_source() {
        Some(source) => ResolvedImage::Source(source.to_string()),
        None => ResolvedImage::Fallback(initials_for(display_name)),
    }
}
