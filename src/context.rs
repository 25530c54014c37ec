use std::path::PathBuf;

/// Settings shared by every packaging step
#[derive(Clone)]
pub struct Context {
    /// Print source paths and compressed sizes
    pub verbose: bool,

    /// Directory the root files and packaged directories are resolved against;
    /// the archive is written here as well
    pub base_dir: PathBuf,
}

impl Context {
    pub fn new(base_dir: PathBuf, verbose: bool) -> Self {
        Self { verbose, base_dir }
    }
}
