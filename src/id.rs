//! Element id generation.

use uuid::Uuid;

/// Produces ids that are unique across one editing session.
pub trait IdGenerator {
    fn generate(&mut self) -> String;
}

/// Random v4 UUIDs in their simple (hyphenless) form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Continue numbering after `count` already-issued ids.
    pub fn starting_after(prefix: impl Into<String>, count: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: count + 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String,
{
    fn generate(&mut self) -> String {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_distinct() {
        let mut ids = UuidGenerator;
        let a = ids.generate();
        let b = ids.generate();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new("el");
        assert_eq!(ids.generate(), "el-1");
        assert_eq!(ids.generate(), "el-2");

        let mut resumed = SequentialIds::starting_after("el", 2);
        assert_eq!(resumed.generate(), "el-3");
    }

    #[test]
    fn test_closure_generator() {
        let mut gen = || "fixed".to_string();
        assert_eq!(IdGenerator::generate(&mut gen), "fixed");
    }
}
