/// Whether the input surface is in the middle of a composition gesture
/// (IME conversion, dead keys, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum InputPhase {
    #[default]
    Idle,
    Composing,
}

/// Local draft of one authoritative string field.
///
/// Keystrokes always land in the draft. Commits happen on every change
/// while idle and exactly once at the end of a composition. Upstream
/// values overwrite the draft only while idle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DraftSync {
    draft: String,
    phase: InputPhase,
    /// Last authoritative value seen, absorbed or not.
    upstream: String,
}

impl DraftSync {
    pub fn new(authoritative: impl Into<String>) -> Self {
        let upstream = authoritative.into();
        Self {
            draft: upstream.clone(),
            phase: InputPhase::Idle,
            upstream,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[cfg(test)]
    pub fn phase(&self) -> InputPhase {
        self.phase
    }

    pub fn is_composing(&self) -> bool {
        self.phase == InputPhase::Composing
    }

    pub fn composition_start(&mut self) {
        self.phase = InputPhase::Composing;
    }

    /// A raw change event. Returns the value to commit, if any.
    pub fn input(&mut self, text: impl Into<String>) -> Option<String> {
        self.draft = text.into();
        match self.phase {
            InputPhase::Idle => Some(self.draft.clone()),
            InputPhase::Composing => None,
        }
    }

    /// End of a composition gesture carrying the finalized text, which is
    /// always committed.
    ///
    /// An upstream value that arrived mid-gesture is older than this commit
    /// and is not restored.
    pub fn composition_end(&mut self, text: impl Into<String>) -> String {
        self.phase = InputPhase::Idle;
        self.draft = text.into();
        self.draft.clone()
    }

    /// Feed the current authoritative value. Returns true when the draft
    /// was overwritten.
    pub fn absorb(&mut self, authoritative: &str) -> bool {
        if authoritative == self.upstream {
            return false;
        }
        self.upstream = authoritative.to_string();

        if self.is_composing() || self.draft == authoritative {
            return false;
        }
        self.draft = authoritative.to_string();
        true
    }
}
