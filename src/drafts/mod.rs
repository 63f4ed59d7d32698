mod sync;

pub(crate) use sync::{DraftSync, InputPhase};
