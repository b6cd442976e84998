//! Command implementations.

pub mod completion;
pub mod run;
pub mod version;

pub use self::completion::execute_completion;
pub use self::run::execute_run;
pub use self::version::execute_version;
