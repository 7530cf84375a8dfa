pub mod util;

pub use util::{OutputTarget, generated_at, split_csv};
