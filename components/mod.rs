mod todo_input;
pub use todo_input::*;
