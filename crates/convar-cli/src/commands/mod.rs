pub mod console;
pub mod repl;
pub mod run;
