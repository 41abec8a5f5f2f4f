use std::fmt;
use std::sync::Arc;

/// A node function. `args[0]` is the node's constant, `args[1..]` are the
/// values behind its connections. Must be pure: no side effects, no hidden state.
pub type NodeFunction = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

#[derive(Clone)]
struct CatalogEntry {
    name: String,
    function: NodeFunction,
}

/// Ordered list of the functions a node may select by index.
///
/// Cloning is cheap; clones share the same entries and are handed to every
/// genome and every evaluation task.
#[derive(Clone, Default)]
pub struct FunctionCatalog {
    entries: Arc<Vec<CatalogEntry>>,
}

impl FunctionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration
    pub fn with<F>(mut self, name: &str, function: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.push(name, function);
        self
    }

    pub fn push<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.entries).push(CatalogEntry {
            name: name.to_string(),
            function: Arc::new(function),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NodeFunction> {
        self.entries.get(index).map(|e| &e.function)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Invoke the function at `index`. Genomes only carry indices drawn from
    /// `0..len()`, so an out-of-range index is a caller bug.
    pub fn call(&self, index: usize, args: &[f64]) -> f64 {
        (self.entries[index].function)(args)
    }
}

impl fmt::Debug for FunctionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionCatalog")
            .field("functions", &self.names())
            .finish()
    }
}
