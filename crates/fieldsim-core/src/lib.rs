pub mod field;
pub mod id;
pub mod key;
pub mod position;
pub mod time;
pub mod value;

// Re-export commonly used types
pub use field::Field;
pub use id::{NodeId, ProgramId};
pub use key::Key;
pub use position::Position;
pub use time::Time;
pub use value::Value;
