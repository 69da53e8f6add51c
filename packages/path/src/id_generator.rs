/// Default seed for node ids produced by the interpreter
pub const DEFAULT_NODE_SEED: &str = "node";

/// Sequential ID generator for nodes within a single path
#[derive(Clone, Debug)]
pub struct IDGenerator {
    seed: String,
    count: u32,
}

impl IDGenerator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids handed out so far
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Default for IDGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut gen = IDGenerator::new("shape");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert_eq!(id1, "shape-1");
        assert_eq!(id2, "shape-2");
        assert_eq!(id3, "shape-3");
        assert_eq!(gen.count(), 3);
    }

    #[test]
    fn test_default_seed() {
        let mut gen = IDGenerator::default();
        assert_eq!(gen.seed(), DEFAULT_NODE_SEED);
        assert_eq!(gen.new_id(), "node-1");
    }
}
