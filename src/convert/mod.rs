//! Script-variant conversion for display text.
//!
//! Conversion runs only on text headed for output. Matching always happens on
//! the unconverted transcript so offsets stay valid against the timing map.

pub mod hant;
pub mod table;

pub use hant::HantConverter;
pub use table::TableConverter;

/// Maps text between two written variants of the same script. Never fails.
pub trait ScriptConverter {
    fn convert(&self, text: &str) -> String;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ScriptConverter for Identity {
    fn convert(&self, text: &str) -> String {
        text.to_string()
    }
}

impl<C: ScriptConverter + ?Sized> ScriptConverter for &C {
    fn convert(&self, text: &str) -> String {
        (**self).convert(text)
    }
}
