// Library surface for headless/integration tests and reuse.
// The ratatui widget and event loop stay in main.rs so this tree
// never touches terminal state.
pub mod config;
pub mod cue;
pub mod jam;
pub mod judge;
pub mod runtime;
pub mod session;
pub mod util;
