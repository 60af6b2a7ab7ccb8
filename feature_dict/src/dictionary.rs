use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::FeatureId;
use crate::perfect_hash::{DisplacementHash, PerfectHash, PerfectHashError};

/// Identifier returned for names a frozen dictionary has never seen.
pub const UNKNOWN_FEATURE: FeatureId = 0;

/// Errors raised by dictionary mode transitions.
///
/// Every variant is a precondition failure: callers must not retry or fall back.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Hash backing requested after identifiers were already handed out.
    #[error("perfect hash requested after {assigned} feature ids were already assigned")]
    HashOnNonEmptyDictionary { assigned: usize },
    /// Hash backing requested twice.
    #[error("dictionary is already backed by a perfect hash")]
    AlreadyHashBacked,
    /// The perfect hash parameters could not be loaded.
    #[error("failed to load perfect hash: {0}")]
    PerfectHash(#[from] PerfectHashError),
}

#[derive(Debug)]
enum Backing {
    Growable {
        ids: HashMap<String, FeatureId>,
        names: Vec<String>,
    },
    HashBacked {
        function: Box<dyn PerfectHash>,
    },
}

/// Bidirectional mapping between feature names and [`FeatureId`]s.
///
/// A dictionary starts out growable: every unseen name receives the next
/// identifier, starting at 1. [`freeze`](Self::freeze) stops growth, after
/// which unseen names map to [`UNKNOWN_FEATURE`]. Alternatively an empty
/// dictionary can be switched to a precomputed perfect hash, which then owns
/// the whole identifier space.
#[derive(Debug)]
pub struct FeatureDictionary {
    backing: Backing,
    frozen: bool,
}

impl Default for FeatureDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureDictionary {
    /// Creates an empty, growable dictionary.
    pub fn new() -> Self {
        Self {
            backing: Backing::Growable {
                ids: HashMap::new(),
                names: Vec::new(),
            },
            frozen: false,
        }
    }

    /// Creates a dictionary backed by `function` from the start.
    pub fn with_perfect_hash<H: PerfectHash + 'static>(function: H) -> Self {
        Self {
            backing: Backing::HashBacked {
                function: Box::new(function),
            },
            frozen: false,
        }
    }

    /// Returns the identifier for `name`, assigning a new one when the
    /// dictionary is growable and not frozen.
    pub fn convert(&mut self, name: &str) -> FeatureId {
        match &mut self.backing {
            Backing::HashBacked { function } => function.index(name),
            Backing::Growable { ids, names } => {
                if let Some(&id) = ids.get(name) {
                    return id;
                }
                if self.frozen {
                    return UNKNOWN_FEATURE;
                }
                names.push(name.to_string());
                let id = names.len();
                ids.insert(name.to_string(), id);
                id
            }
        }
    }

    /// Read-only variant of [`convert`](Self::convert) that never assigns identifiers.
    pub fn lookup(&self, name: &str) -> FeatureId {
        match &self.backing {
            Backing::HashBacked { function } => function.index(name),
            Backing::Growable { ids, .. } => ids.get(name).copied().unwrap_or(UNKNOWN_FEATURE),
        }
    }

    /// Returns the name stored for `id`.
    ///
    /// Hash-backed dictionaries do not retain names and render the identifier
    /// itself. Growable dictionaries return an empty string for identifiers
    /// that were never assigned.
    pub fn name(&self, id: FeatureId) -> Cow<'_, str> {
        match &self.backing {
            Backing::HashBacked { .. } => Cow::Owned(id.to_string()),
            Backing::Growable { names, .. } => id
                .checked_sub(1)
                .and_then(|index| names.get(index))
                .map_or(Cow::Borrowed(""), |name| Cow::Borrowed(name.as_str())),
        }
    }

    /// Renders a sequence of identifiers as space separated names.
    pub fn render(&self, ids: &[FeatureId]) -> String {
        ids.iter()
            .map(|&id| self.name(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Size of the identifier space, including the reserved identifier 0
    /// for growable dictionaries.
    pub fn num_feats(&self) -> usize {
        match &self.backing {
            Backing::HashBacked { function } => function.number_of_keys(),
            Backing::Growable { names, .. } => names.len() + 1,
        }
    }

    /// Number of names assigned dynamically so far.
    pub fn assigned(&self) -> usize {
        match &self.backing {
            Backing::HashBacked { .. } => 0,
            Backing::Growable { names, .. } => names.len(),
        }
    }

    /// Stops growth: unseen names map to [`UNKNOWN_FEATURE`] from now on.
    pub fn freeze(&mut self) {
        if !self.frozen {
            debug!(assigned = self.assigned(), "feature dictionary frozen");
        }
        self.frozen = true;
    }

    /// Whether [`freeze`](Self::freeze) has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// True once identifiers come from a perfect hash instead of the growable map.
    pub fn using_perfect_hash(&self) -> bool {
        matches!(self.backing, Backing::HashBacked { .. })
    }

    /// Switches an empty dictionary to the supplied perfect hash function.
    pub fn enable_hash<H: PerfectHash + 'static>(
        &mut self,
        function: H,
    ) -> Result<(), DictionaryError> {
        self.ensure_hashable()?;
        info!(
            keys = function.number_of_keys(),
            "feature dictionary backed by perfect hash"
        );
        self.backing = Backing::HashBacked {
            function: Box::new(function),
        };
        Ok(())
    }

    /// Loads a [`DisplacementHash`] from `path` and enables it.
    pub fn enable_hash_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DictionaryError> {
        self.ensure_hashable()?;
        let function = DisplacementHash::read(path)?;
        self.enable_hash(function)
    }

    fn ensure_hashable(&self) -> Result<(), DictionaryError> {
        match &self.backing {
            Backing::HashBacked { .. } => Err(DictionaryError::AlreadyHashBacked),
            Backing::Growable { names, .. } if !names.is_empty() => {
                Err(DictionaryError::HashOnNonEmptyDictionary {
                    assigned: names.len(),
                })
            }
            Backing::Growable { .. } => Ok(()),
        }
    }
}
